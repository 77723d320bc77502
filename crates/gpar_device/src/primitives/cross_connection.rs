//! Matrix-to-matrix relays.
//!
//! A cross-connection selects a signal in one routing matrix and presents it
//! as an output word of the other. They are allocated by the router, never
//! bound to netlist cells.

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::CrossSite;

/// One cross-connection.
#[derive(Clone, Debug)]
pub struct CrossConnection {
    index: usize,
    site: CrossSite,
    input: EntityOutput,
}

impl CrossConnection {
    pub(crate) fn new(index: usize, site: CrossSite) -> Self {
        Self {
            index,
            site,
            input: EntityOutput::None,
        }
    }

    /// The matrix the signal is taken from.
    pub fn from_matrix(&self) -> usize {
        self.site.from_matrix
    }

    /// The matrix the signal is delivered to.
    pub fn to_matrix(&self) -> usize {
        1 - self.site.from_matrix
    }
}

impl BitstreamEntity for CrossConnection {
    fn kind(&self) -> EntityKind {
        EntityKind::CrossConnection
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            matrix: self.site.from_matrix,
            input_base: Some(self.site.input_base),
            output: Some((self.to_matrix(), self.site.output_word)),
            config_base: None,
        }
    }

    fn description(&self) -> String {
        format!("XCONN{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_XCONN"
    }

    fn accepts_primitive(&self, _cell_type: &str) -> bool {
        false
    }

    fn config_len(&self) -> usize {
        0
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["I"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["O"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        (port == "I").then_some(self.input)
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        if port != "I" {
            return Err(unknown_port(&self.description(), port));
        }
        self.input = source;
        Ok(())
    }

    fn is_configured(&self) -> bool {
        !self.input.is_ground_or_none()
    }

    fn summary(&self) -> String {
        format!(
            "matrix {} -> {}: {}",
            self.from_matrix(),
            self.to_matrix(),
            self.input
        )
    }

    fn commit_changes(&mut self, _ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::part::Part;
    use crate::test_util::load_fresh;

    #[test]
    fn relays_between_matrices() {
        let mut device = Device::new(Part::Slg46620);
        let lut = device.directory().port(EntityKind::Lut, 0, "OUT").unwrap();
        let xconn = device.cross_connection(0).unwrap();
        assert_eq!((xconn.from_matrix(), xconn.to_matrix()), (0, 1));
        assert_eq!(xconn.location().output, Some((1, 31)));
        assert!(!xconn.accepts_primitive("GP_XCONN"));

        let relayed = device.directory().port(EntityKind::CrossConnection, 0, "O").unwrap();
        device.cross_connection_mut(0).unwrap().set_input("I", lut).unwrap();
        device.lut_mut(7).unwrap().set_input("IN0", relayed).unwrap();

        let loaded = load_fresh(&device);
        assert_eq!(loaded.cross_connection(0).unwrap().get_input("I"), Some(lut));
        assert_eq!(loaded.lut(7).unwrap().get_input("IN0"), Some(relayed));
    }

    #[test]
    fn wrong_matrix_driver_is_an_encoding_error() {
        let mut device = Device::new(Part::Slg46620);
        let lut = device.directory().port(EntityKind::Lut, 7, "OUT").unwrap();
        device.cross_connection_mut(0).unwrap().set_input("I", lut).unwrap();
        let sink = gpar_diagnostics::DiagnosticSink::new();
        let err = device.save_bitstream(&sink).unwrap_err();
        assert!(matches!(
            err,
            crate::DeviceError::Entity(EntityError::Encoding { .. })
        ));
    }
}
