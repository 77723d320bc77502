//! Voltage references.
//!
//! Bits: 0-4 output level in 50 mV steps (`mV / 50 - 1`), 5-6 input divider
//! minus one, 7 Vdd-divided source, 8 power.

use crate::bitstream::Bitstream;
use crate::entity::{
    unknown_port, BitstreamEntity, CommitContext, EntityKind, EntityLocation, EntityOutput,
    LoadContext, SaveContext,
};
use crate::error::EntityError;

const STEP_MV: u16 = 50;
const MAX_MV: u16 = 1200;

/// Where the reference takes its voltage from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum VrefSource {
    /// The internal bandgap, scaled to `millivolts`.
    #[default]
    Constant,
    /// Vdd divided by `vin_div`.
    VddDivided,
}

/// A voltage reference.
#[derive(Clone, Debug)]
pub struct VoltageReference {
    index: usize,
    config_base: usize,
    vin: EntityOutput,
    /// Output level in millivolts for [`VrefSource::Constant`].
    pub millivolts: u16,
    /// Divider applied to the input, 1 to 4.
    pub vin_div: u8,
    /// Whether the reference is powered.
    pub powered: bool,
}

impl VoltageReference {
    pub(crate) fn new(index: usize, config_base: usize) -> Self {
        Self {
            index,
            config_base,
            vin: EntityOutput::None,
            millivolts: STEP_MV,
            vin_div: 1,
            powered: false,
        }
    }

    /// The reference's source, derived from what drives `VIN`.
    pub fn source(&self) -> VrefSource {
        if self.vin == EntityOutput::VDD {
            VrefSource::VddDivided
        } else {
            VrefSource::Constant
        }
    }

    /// Whether this is a powered constant reference of `mv` millivolts.
    pub fn is_constant(&self, mv: u16) -> bool {
        self.powered && self.source() == VrefSource::Constant && self.millivolts == mv
    }
}

impl BitstreamEntity for VoltageReference {
    fn kind(&self) -> EntityKind {
        EntityKind::VoltageReference
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            config_base: Some(self.config_base),
            ..EntityLocation::default()
        }
    }

    fn description(&self) -> String {
        format!("VREF{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_VREF"
    }

    fn config_len(&self) -> usize {
        9
    }

    fn dedicated_inputs(&self) -> &'static [&'static str] {
        &["VIN"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["VOUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        (port == "VIN").then_some(self.vin)
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        if port != "VIN" {
            return Err(unknown_port(&self.description(), port));
        }
        self.vin = source;
        Ok(())
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &["VREF", "VIN_DIV"]
    }

    fn is_configured(&self) -> bool {
        self.powered
    }

    fn summary(&self) -> String {
        match self.source() {
            VrefSource::Constant => format!("{} mV", self.millivolts),
            VrefSource::VddDivided => format!("VDD / {}", self.vin_div),
        }
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());
        let mv = ctx.int(&name, "VREF")?.unwrap_or(i64::from(STEP_MV));
        if mv < i64::from(STEP_MV) || mv > i64::from(MAX_MV) || mv % i64::from(STEP_MV) != 0 {
            return Err(EntityError::drc(
                &name,
                format!("VREF must be a multiple of 50 mV in 50..=1200, got {mv}"),
            ));
        }
        let div = ctx.int(&name, "VIN_DIV")?.unwrap_or(1);
        if !(1..=4).contains(&div) {
            return Err(EntityError::drc(
                &name,
                format!("VIN_DIV must be in 1..=4, got {div}"),
            ));
        }
        self.millivolts = mv as u16;
        self.vin_div = div as u8;
        self.powered = true;
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, _ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        if !self.powered {
            return Ok(());
        }
        if matches!(self.vin, EntityOutput::Port { .. }) {
            return Err(EntityError::drc(
                self.description(),
                format!("VIN must be unconnected or VDD, got {}", self.vin),
            ));
        }
        let base = self.config_base;
        bits.write_field(base, 5, u64::from(self.millivolts / STEP_MV - 1))?;
        bits.write_field(base + 5, 2, u64::from(self.vin_div - 1))?;
        bits.set(base + 7, self.source() == VrefSource::VddDivided)?;
        bits.set(base + 8, true)?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, _ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        let base = self.config_base;
        let step = bits.read_field(base, 5)? as u16 + 1;
        if step * STEP_MV > MAX_MV {
            return Err(EntityError::encoding(
                self.description(),
                format!("level code {} exceeds {MAX_MV} mV", step - 1),
            ));
        }
        self.millivolts = step * STEP_MV;
        self.vin_div = bits.read_field(base + 5, 2)? as u8 + 1;
        self.vin = if bits.get(base + 7)? {
            EntityOutput::VDD
        } else {
            EntityOutput::GROUND
        };
        self.powered = bits.get(base + 8)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::part::Part;
    use crate::test_util::{commit_with, load_fresh};

    #[test]
    fn level_validation() {
        let device = Device::new(Part::Slg46620);
        let mut vref = device.vref(0).unwrap().clone();
        commit_with(&mut vref, "GP_VREF", &[("VREF", "1000")]).unwrap();
        assert!(vref.is_constant(1000));
        assert!(commit_with(&mut vref, "GP_VREF", &[("VREF", "1025")]).is_err());
        assert!(commit_with(&mut vref, "GP_VREF", &[("VREF", "1250")]).is_err());
        assert!(commit_with(&mut vref, "GP_VREF", &[("VIN_DIV", "5")]).is_err());
    }

    #[test]
    fn vdd_source_roundtrip() {
        let mut device = Device::new(Part::Slg46620);
        {
            let vref = device.vref_mut(3).unwrap();
            vref.powered = true;
            vref.vin_div = 3;
            vref.set_input("VIN", EntityOutput::VDD).unwrap();
        }
        let loaded = load_fresh(&device);
        let vref = loaded.vref(3).unwrap();
        assert!(vref.powered);
        assert_eq!(vref.source(), VrefSource::VddDivided);
        assert_eq!(vref.vin_div, 3);
        assert!(!vref.is_constant(50));
    }

    #[test]
    fn constant_roundtrip() {
        let mut device = Device::new(Part::Slg46140);
        {
            let vref = device.vref_mut(1).unwrap();
            vref.powered = true;
            vref.millivolts = 1200;
        }
        let loaded = load_fresh(&device);
        assert!(loaded.vref(1).unwrap().is_constant(1200));
        assert!(!loaded.vref(0).unwrap().is_configured());
    }

    #[test]
    fn fabric_input_rejected() {
        let mut device = Device::new(Part::Slg46620);
        let lut = device.directory().port(EntityKind::Lut, 0, "OUT").unwrap();
        {
            let vref = device.vref_mut(0).unwrap();
            vref.powered = true;
            vref.set_input("VIN", lut).unwrap();
        }
        let sink = gpar_diagnostics::DiagnosticSink::new();
        assert!(device.save_bitstream(&sink).is_err());
    }
}
