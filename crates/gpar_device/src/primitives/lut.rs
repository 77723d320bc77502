//! Look-up tables. The configuration region is the truth table, entry 0 first.

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::LutSite;

static INPUT_NAMES: [&str; 4] = ["IN0", "IN1", "IN2", "IN3"];

/// An n-input look-up table.
#[derive(Clone, Debug)]
pub struct Lut {
    index: usize,
    ordinal: usize,
    site: LutSite,
    inputs: [EntityOutput; 4],
    /// Truth table; bit `i` is the output for input value `i`.
    pub init: u16,
}

impl Lut {
    /// `ordinal` numbers the LUT among those of the same width.
    pub(crate) fn new(index: usize, ordinal: usize, site: LutSite) -> Self {
        Self {
            index,
            ordinal,
            site,
            inputs: [EntityOutput::None; 4],
            init: 0,
        }
    }

    /// Number of inputs.
    pub fn width(&self) -> usize {
        self.site.inputs
    }

    fn port_index(&self, port: &str) -> Option<usize> {
        self.input_ports().iter().position(|p| *p == port)
    }
}

impl BitstreamEntity for Lut {
    fn kind(&self) -> EntityKind {
        EntityKind::Lut
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
        format!("LUT{}_{}", self.site.inputs, self.ordinal)
    }

    fn primitive_name(&self) -> &'static str {
        match self.site.inputs {
            2 => "GP_2LUT",
            3 => "GP_3LUT",
            _ => "GP_4LUT",
        }
    }

    fn config_len(&self) -> usize {
        1 << self.site.inputs
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &INPUT_NAMES[..self.site.inputs]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["OUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        self.port_index(port).map(|i| self.inputs[i])
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        let i = self
            .port_index(port)
            .ok_or_else(|| unknown_port(&self.description(), port))?;
        self.inputs[i] = source;
        Ok(())
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &["INIT"]
    }

    fn is_configured(&self) -> bool {
        self.init != 0 || self.inputs.iter().any(|i| !i.is_ground_or_none())
    }

    fn summary(&self) -> String {
        let inputs: Vec<String> = self.inputs[..self.width()]
            .iter()
            .map(ToString::to_string)
            .collect();
        format!(
            "INIT={:#0width$b} inputs=[{}]",
            self.init,
            inputs.join(", "),
            width = self.config_len() + 2
        )
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());
        let init = ctx.int(&name, "INIT")?.unwrap_or(0);
        if init < 0 || init >= 1 << self.config_len() {
            return Err(EntityError::drc(
                &name,
                format!("INIT {init} does not fit {} bits", self.config_len()),
            ));
        }
        self.init = init as u16;
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)?;
        bits.write_field(self.site.config_base, self.config_len(), u64::from(self.init))?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)?;
        self.init = bits.read_field(self.site.config_base, self.config_len())? as u16;
        Ok(())
    }
}
