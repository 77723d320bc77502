//! D flip-flops. One configuration bit holds the power-on value.

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::FabricSite;

/// A D flip-flop.
#[derive(Clone, Debug)]
pub struct Dff {
    index: usize,
    site: FabricSite,
    d: EntityOutput,
    clk: EntityOutput,
    /// Power-on output value.
    pub init: bool,
}

impl Dff {
    pub(crate) fn new(index: usize, site: FabricSite) -> Self {
        Self {
            index,
            site,
            d: EntityOutput::None,
            clk: EntityOutput::None,
            init: false,
        }
    }
}

impl BitstreamEntity for Dff {
    fn kind(&self) -> EntityKind {
        EntityKind::Dff
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
        format!("DFF_{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_DFF"
    }

    fn config_len(&self) -> usize {
        1
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["D", "CLK"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["Q"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        match port {
            "D" => Some(self.d),
            "CLK" => Some(self.clk),
            _ => None,
        }
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        match port {
            "D" => self.d = source,
            "CLK" => self.clk = source,
            _ => return Err(unknown_port(&self.description(), port)),
        }
        Ok(())
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &["INIT"]
    }

    fn is_configured(&self) -> bool {
        self.init || !self.d.is_ground_or_none() || !self.clk.is_ground_or_none()
    }

    fn summary(&self) -> String {
        format!("D={} CLK={} INIT={}", self.d, self.clk, u8::from(self.init))
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());
        self.init = ctx.flag(&name, "INIT")?;
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)?;
        bits.set(self.site.config_base, self.init)?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)?;
        self.init = bits.get(self.site.config_base)?;
        Ok(())
    }
}
