//! The low-frequency oscillator.
//!
//! Bits: 0 power-down enable, 1 auto power-down, 2-3 output divider code,
//! 4 oscillator on.

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::FabricSite;

const DIVIDERS: [u8; 4] = [1, 2, 4, 16];

/// A low-frequency oscillator.
#[derive(Clone, Debug)]
pub struct LfOscillator {
    index: usize,
    site: FabricSite,
    pwrdn: EntityOutput,
    /// Whether `PWRDN` can stop the oscillator.
    pub power_down_enable: bool,
    /// Whether the oscillator stops when nothing loads it.
    pub auto_power_down: bool,
    /// Output divider: 1, 2, 4 or 16.
    pub divider: u8,
    /// Whether the oscillator runs.
    pub enabled: bool,
}

impl LfOscillator {
    pub(crate) fn new(index: usize, site: FabricSite) -> Self {
        Self {
            index,
            site,
            pwrdn: EntityOutput::None,
            power_down_enable: false,
            auto_power_down: false,
            divider: 1,
            enabled: false,
        }
    }
}

impl BitstreamEntity for LfOscillator {
    fn kind(&self) -> EntityKind {
        EntityKind::LfOscillator
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            matrix: self.site.matrix,
            input_base: Some(self.site.input_base),
            output: Some((self.site.matrix, self.site.output_word)),
            config_base: Some(self.site.config_base),
        }
    }

    fn description(&self) -> String {
        format!("LFOSC_{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_LFOSC"
    }

    fn config_len(&self) -> usize {
        5
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["PWRDN"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["CLKOUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        (port == "PWRDN").then_some(self.pwrdn)
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        if port != "PWRDN" {
            return Err(unknown_port(&self.description(), port));
        }
        self.pwrdn = source;
        Ok(())
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &["PWRDN_EN", "AUTO_PWRDN", "OUT_DIV"]
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }

    fn summary(&self) -> String {
        format!(
            "PWRDN={} pwrdn_en={} auto_pwrdn={} div={}",
            self.pwrdn,
            u8::from(self.power_down_enable),
            u8::from(self.auto_power_down),
            self.divider
        )
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());
        self.power_down_enable = ctx.flag(&name, "PWRDN_EN")?;
        self.auto_power_down = ctx.flag(&name, "AUTO_PWRDN")?;
        let div = ctx.int(&name, "OUT_DIV")?.unwrap_or(1);
        if !DIVIDERS.iter().any(|d| i64::from(*d) == div) {
            return Err(EntityError::drc(
                &name,
                format!("OUT_DIV must be 1, 2, 4 or 16, got {div}"),
            ));
        }
        self.divider = div as u8;
        self.enabled = true;
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)?;
        let base = self.site.config_base;
        let code = DIVIDERS
            .iter()
            .position(|d| *d == self.divider)
            .ok_or_else(|| {
                EntityError::encoding(self.description(), format!("divider {}", self.divider))
            })?;
        bits.set(base, self.power_down_enable)?;
        bits.set(base + 1, self.auto_power_down)?;
        bits.write_field(base + 2, 2, code as u64)?;
        bits.set(base + 4, self.enabled)?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)?;
        let base = self.site.config_base;
        self.power_down_enable = bits.get(base)?;
        self.auto_power_down = bits.get(base + 1)?;
        self.divider = DIVIDERS[bits.read_field(base + 2, 2)? as usize];
        self.enabled = bits.get(base + 4)?;
        Ok(())
    }
}
