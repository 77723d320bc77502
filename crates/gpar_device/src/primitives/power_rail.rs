//! The ground and Vdd rails.

use crate::bitstream::Bitstream;
use crate::entity::{
    unknown_port, BitstreamEntity, CommitContext, EntityKind, EntityLocation, EntityOutput,
    LoadContext, SaveContext,
};
use crate::error::EntityError;

/// A constant rail. Index 0 is ground, index 1 is Vdd.
#[derive(Clone, Debug)]
pub struct PowerRail {
    value: bool,
}

impl PowerRail {
    pub(crate) fn new(value: bool) -> Self {
        Self { value }
    }

    /// `true` for Vdd.
    pub fn value(&self) -> bool {
        self.value
    }

    /// The rail as a signal.
    pub fn output(&self) -> EntityOutput {
        EntityOutput::Rail(self.value)
    }
}

impl BitstreamEntity for PowerRail {
    fn kind(&self) -> EntityKind {
        EntityKind::PowerRail
    }

    fn index(&self) -> usize {
        usize::from(self.value)
    }

    fn location(&self) -> EntityLocation {
        EntityLocation::default()
    }

    fn description(&self) -> String {
        if self.value { "VDD" } else { "GND" }.to_string()
    }

    fn primitive_name(&self) -> &'static str {
        if self.value {
            "GP_VDD"
        } else {
            "GP_VSS"
        }
    }

    fn config_len(&self) -> usize {
        0
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["OUT"]
    }

    fn get_input(&self, _port: &str) -> Option<EntityOutput> {
        None
    }

    fn set_input(&mut self, port: &str, _source: EntityOutput) -> Result<(), EntityError> {
        Err(unknown_port(&self.description(), port))
    }

    fn is_configured(&self) -> bool {
        false
    }

    fn summary(&self) -> String {
        self.description()
    }

    fn commit_changes(&mut self, _ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        Ok(())
    }

    fn save(&self, _bits: &mut Bitstream, _ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        Ok(())
    }

    fn load(&mut self, _bits: &Bitstream, _ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        Ok(())
    }
}
