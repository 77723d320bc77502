//! Device-wide settings: the pattern ID, read protection and the bits that
//! must stay zero.

use crate::bitstream::Bitstream;
use crate::entity::{
    unknown_port, BitstreamEntity, CommitContext, EntityKind, EntityLocation, EntityOutput,
    LoadContext, SaveContext, UNRECOVERABLE_STATE,
};
use crate::error::EntityError;
use crate::layout::SystemSite;
use gpar_diagnostics::{Diagnostic, Location};
use std::ops::Range;

/// The device-wide configuration block.
#[derive(Clone, Debug)]
pub struct SystemBlock {
    site: SystemSite,
    /// User pattern ID, readable over I2C.
    pub pattern_id: u8,
    /// Blocks read-back of the configuration.
    pub read_protect: bool,
}

impl SystemBlock {
    pub(crate) fn new(site: SystemSite) -> Self {
        Self {
            site,
            pattern_id: 0,
            read_protect: false,
        }
    }
}

impl BitstreamEntity for SystemBlock {
    fn kind(&self) -> EntityKind {
        EntityKind::System
    }

    fn index(&self) -> usize {
        0
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            config_base: Some(self.site.pattern_id_base),
            ..EntityLocation::default()
        }
    }

    fn description(&self) -> String {
        "SYSTEM".to_string()
    }

    fn primitive_name(&self) -> &'static str {
        "GP_SYSTEM"
    }

    fn accepts_primitive(&self, _cell_type: &str) -> bool {
        false
    }

    fn config_len(&self) -> usize {
        self.config_regions().iter().map(Range::len).sum()
    }

    fn config_regions(&self) -> Vec<Range<usize>> {
        let s = &self.site;
        let mut regions = vec![
            s.pattern_id_base..s.pattern_id_base + 8,
            s.read_protect_bit..s.read_protect_bit + 1,
        ];
        regions.extend(s.reserved.iter().cloned());
        regions
    }

    fn get_input(&self, _port: &str) -> Option<EntityOutput> {
        None
    }

    fn set_input(&mut self, port: &str, _source: EntityOutput) -> Result<(), EntityError> {
        Err(unknown_port(&self.description(), port))
    }

    fn is_configured(&self) -> bool {
        self.pattern_id != 0 || self.read_protect
    }

    fn summary(&self) -> String {
        format!(
            "pattern id {:#04x}, read protect {}",
            self.pattern_id,
            if self.read_protect { "on" } else { "off" }
        )
    }

    fn commit_changes(&mut self, _ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, _ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        bits.write_field(self.site.pattern_id_base, 8, u64::from(self.pattern_id))?;
        bits.set(self.site.read_protect_bit, self.read_protect)?;
        for range in self.site.reserved {
            for bit in range.clone() {
                bits.set(bit, false)?;
            }
        }
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        self.pattern_id = bits.read_field(self.site.pattern_id_base, 8)? as u8;
        self.read_protect = bits.get(self.site.read_protect_bit)?;
        let mut stray = Vec::new();
        for range in self.site.reserved {
            for bit in range.clone() {
                if bits.get(bit)? {
                    stray.push(bit);
                }
            }
        }
        if let Some(first) = stray.first() {
            ctx.sink.emit(
                Diagnostic::warning(
                    UNRECOVERABLE_STATE,
                    format!("{} reserved bits are set", stray.len()),
                    Location::Entity(self.description()),
                )
                .with_note(format!("first is bit {first}"))
                .with_help("they are cleared when the bitstream is written again"),
            );
        }
        Ok(())
    }
}
