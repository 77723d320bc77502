//! Clock buffers: one fabric input, one output, no configuration bits.

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::BufferSite;

/// A clock buffer.
#[derive(Clone, Debug)]
pub struct ClockBuffer {
    index: usize,
    site: BufferSite,
    input: EntityOutput,
}

impl ClockBuffer {
    pub(crate) fn new(index: usize, site: BufferSite) -> Self {
        Self {
            index,
            site,
            input: EntityOutput::None,
        }
    }
}

impl BitstreamEntity for ClockBuffer {
    fn kind(&self) -> EntityKind {
        EntityKind::ClockBuffer
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            matrix: self.site.matrix,
            input_base: Some(self.site.input_base),
            output: Some((self.site.matrix, self.site.output_word)),
            config_base: None,
        }
    }

    fn description(&self) -> String {
        format!("CLKBUF_{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_CLKBUF"
    }

    fn config_len(&self) -> usize {
        0
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["IN"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["OUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        (port == "IN").then_some(self.input)
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        if port != "IN" {
            return Err(unknown_port(&self.description(), port));
        }
        self.input = source;
        Ok(())
    }

    fn is_configured(&self) -> bool {
        !self.input.is_ground_or_none()
    }

    fn summary(&self) -> String {
        format!("IN={}", self.input)
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        ctx.warn_unknown(&self.description(), self.known_parameters());
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)
    }
}
