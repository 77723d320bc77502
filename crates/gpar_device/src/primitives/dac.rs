//! Digital-to-analog converters.
//!
//! A DAC's data comes either from its own constant register or from the
//! comparator data bus of the fabric. Its reference and output are analog
//! and never pass through the routing matrix.

use crate::bitstream::Bitstream;
use crate::entity::{
    unknown_port, BitstreamEntity, CommitContext, EntityKind, EntityLocation, EntityOutput,
    LoadContext, PortRole, SaveContext, UNRECOVERABLE_STATE,
};
use crate::error::EntityError;
use crate::layout::DacSite;
use crate::part::Part;
use gpar_diagnostics::{Diagnostic, Location};
use std::ops::Range;

static DIN_NAMES: [&str; 8] = ["DIN0", "DIN1", "DIN2", "DIN3", "DIN4", "DIN5", "DIN6", "DIN7"];

static DEDICATED: [&str; 9] = [
    "VREF", "DIN0", "DIN1", "DIN2", "DIN3", "DIN4", "DIN5", "DIN6", "DIN7",
];

/// Value of the select bit when data comes from the constant register.
/// The polarity is reversed between the two instances.
const SELECT_WHEN_REGISTER: [bool; 2] = [false, true];

/// The only reference level the DAC is characterised for.
const REFERENCE_MV: u16 = 1000;

/// A DAC instance.
#[derive(Clone, Debug)]
pub struct Dac {
    index: usize,
    site: DacSite,
    vref: EntityOutput,
    din: [EntityOutput; 8],
}

impl Dac {
    pub(crate) fn new(index: usize, site: DacSite) -> Self {
        Self {
            index,
            site,
            vref: EntityOutput::GROUND,
            din: [EntityOutput::GROUND; 8],
        }
    }

    /// Whether the data inputs are all tied to rails.
    pub fn is_constant(&self) -> bool {
        self.din.iter().all(|d| d.rail().is_some() || d.is_none())
    }

    /// The constant data word, when every input is a rail.
    pub fn constant_value(&self) -> Option<u8> {
        if !self.is_constant() {
            return None;
        }
        Some(
            self.din
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, d)| acc | (u8::from(d.rail() == Some(true)) << i)),
        )
    }

    /// The first data bit whose source differs from `DIN0`, if any.
    ///
    /// Ground and Vdd are distinct sources; unconnected bits count as ground.
    fn first_mismatched_din(&self) -> Option<usize> {
        let source = |d: EntityOutput| match d {
            EntityOutput::None => (Some(false), None),
            other => (other.rail(), other.entity()),
        };
        let first = source(self.din[0]);
        self.din.iter().position(|d| source(*d) != first)
    }

    fn select_when_register(&self) -> bool {
        SELECT_WHEN_REGISTER[self.index % SELECT_WHEN_REGISTER.len()]
    }

    fn check_reference(&self, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        let EntityOutput::Port {
            entity,
            kind: EntityKind::VoltageReference,
            ..
        } = self.vref
        else {
            return Err(EntityError::drc(
                &name,
                format!("VREF must be driven by a voltage reference, got {}", self.vref),
            ));
        };
        let vref = ctx
            .entity(entity)
            .and_then(|e| e.as_vref())
            .ok_or_else(|| EntityError::drc(&name, format!("VREF driver {entity} is missing")))?;
        if !vref.is_constant(REFERENCE_MV) {
            return Err(EntityError::drc(
                &name,
                format!("VREF must be a constant {REFERENCE_MV} mV reference"),
            ));
        }
        Ok(())
    }
}

impl BitstreamEntity for Dac {
    fn kind(&self) -> EntityKind {
        EntityKind::Dac
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            config_base: Some(self.site.register),
            ..EntityLocation::default()
        }
    }

    fn description(&self) -> String {
        format!("DAC{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_DAC"
    }

    fn config_len(&self) -> usize {
        11
    }

    fn config_regions(&self) -> Vec<Range<usize>> {
        let s = &self.site;
        vec![
            s.register..s.register + 8,
            s.power..s.power + 1,
            s.select..s.select + 1,
            s.always_on..s.always_on + 1,
        ]
    }

    fn dedicated_inputs(&self) -> &'static [&'static str] {
        &DEDICATED
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["VOUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        if port == "VREF" {
            return Some(self.vref);
        }
        let i = DIN_NAMES.iter().position(|p| *p == port)?;
        Some(self.din[i])
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        if port == "VREF" {
            self.vref = source;
            return Ok(());
        }
        let i = DIN_NAMES
            .iter()
            .position(|p| *p == port)
            .ok_or_else(|| unknown_port(&self.description(), port))?;
        self.din[i] = source;
        Ok(())
    }

    fn cell_port_role(&self, _cell_type: &str, port: &str, bit: usize) -> PortRole {
        match (port, bit) {
            ("DIN", b) if b < DIN_NAMES.len() => PortRole::Input(DIN_NAMES[b]),
            ("VREF", 0) => PortRole::Input("VREF"),
            ("VOUT", 0) => PortRole::Output("VOUT"),
            _ => PortRole::Unknown,
        }
    }

    fn is_configured(&self) -> bool {
        !self.vref.is_ground_or_none()
    }

    fn summary(&self) -> String {
        match self.constant_value() {
            Some(v) => format!("VREF={} DIN={v:#04x}", self.vref),
            None => format!("VREF={} DIN=fabric", self.vref),
        }
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        ctx.warn_unknown(&self.description(), self.known_parameters());
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        if self.vref.is_ground_or_none() {
            return Ok(());
        }
        if ctx.part() == Part::Slg46140 {
            return Err(EntityError::Unimplemented {
                entity: self.description(),
                part: ctx.part(),
            });
        }
        self.check_reference(ctx)?;

        if let Some(i) = self.first_mismatched_din() {
            return Err(EntityError::drc(
                &self.description(),
                format!(
                    "all DIN bits must come from the same source; DIN0 is {} but DIN{i} is {}",
                    self.din[0], self.din[i]
                ),
            ));
        }
        let constant = self.constant_value();

        let s = &self.site;
        bits.set(s.power, true)?;
        bits.set(s.always_on, true)?;
        let register = self.select_when_register();
        bits.set(s.select, if constant.is_some() { register } else { !register })?;
        bits.write_field(s.register, 8, u64::from(constant.unwrap_or(0)))?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        let s = self.site;
        if !bits.get(s.power)? {
            self.vref = EntityOutput::GROUND;
            self.din = [EntityOutput::GROUND; 8];
            return Ok(());
        }
        if ctx.part() == Part::Slg46140 {
            return Err(EntityError::Unimplemented {
                entity: self.description(),
                part: ctx.part(),
            });
        }
        // The DAC's bits do not say which reference drove it; assume its paired one.
        self.vref = ctx
            .directory
            .port(EntityKind::VoltageReference, s.vref, "VOUT")
            .unwrap_or(EntityOutput::None);

        if bits.get(s.select)? == self.select_when_register() {
            let value = bits.read_field(s.register, 8)?;
            for (i, din) in self.din.iter_mut().enumerate() {
                *din = EntityOutput::Rail((value >> i) & 1 == 1);
            }
        } else {
            self.din = [EntityOutput::None; 8];
            ctx.sink.emit(
                Diagnostic::warning(
                    UNRECOVERABLE_STATE,
                    "DAC data comes from the fabric; its source is not recorded",
                    Location::Entity(self.description()),
                )
                .with_note("DIN is left unconnected"),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use gpar_diagnostics::DiagnosticSink;

    fn with_reference(device: &mut Device, index: usize, mv: u16) -> EntityOutput {
        let vref = device.vref_mut(index).unwrap();
        vref.powered = true;
        vref.millivolts = mv;
        device
            .directory()
            .port(EntityKind::VoltageReference, index, "VOUT")
            .unwrap()
    }

    fn drive_constant(dac: &mut Dac, value: u8) {
        for (i, name) in DIN_NAMES.iter().enumerate() {
            dac.set_input(name, EntityOutput::Rail((value >> i) & 1 == 1))
                .unwrap();
        }
    }

    #[test]
    fn unused_dac_writes_nothing() {
        let device = Device::new(Part::Slg46620);
        let sink = DiagnosticSink::new();
        let bits = device.save_bitstream(&sink).unwrap();
        let site = device.layout().dacs[0];
        assert!(!bits.get(site.power).unwrap());
        assert!(!bits.get(site.always_on).unwrap());
        assert_eq!(bits.read_field(site.register, 8).unwrap(), 0);
    }

    #[test]
    fn constant_data_select_polarity() {
        let mut device = Device::new(Part::Slg46620);
        for i in 0..2 {
            let vref = with_reference(&mut device, i, 1000);
            let dac = device.dac_mut(i).unwrap();
            dac.set_input("VREF", vref).unwrap();
            drive_constant(dac, 0xff);
        }
        let sink = DiagnosticSink::new();
        let bits = device.save_bitstream(&sink).unwrap();
        let dac0 = device.layout().dacs[0];
        let dac1 = device.layout().dacs[1];
        assert!(bits.get(dac0.power).unwrap());
        assert!(!bits.get(dac0.select).unwrap());
        assert!(bits.get(dac1.select).unwrap());
        assert_eq!(bits.read_field(dac0.register, 8).unwrap(), 0xff);

        let mut loaded = Device::new(Part::Slg46620);
        loaded.load_bitstream(&bits, &sink).unwrap();
        let dac = loaded.dac(1).unwrap();
        assert_eq!(dac.constant_value(), Some(0xff));
        assert_eq!(
            dac.get_input("VREF").unwrap().kind(),
            Some(EntityKind::VoltageReference)
        );
    }

    #[test]
    fn fabric_data_flips_select() {
        let mut device = Device::new(Part::Slg46620);
        let vref = with_reference(&mut device, 0, 1000);
        let lut = device.directory().port(EntityKind::Lut, 0, "OUT").unwrap();
        let dac = device.dac_mut(0).unwrap();
        dac.set_input("VREF", vref).unwrap();
        for name in DIN_NAMES {
            dac.set_input(name, lut).unwrap();
        }
        let sink = DiagnosticSink::new();
        let bits = device.save_bitstream(&sink).unwrap();
        let site = device.layout().dacs[0];
        assert!(bits.get(site.select).unwrap());

        let mut loaded = Device::new(Part::Slg46620);
        loaded.load_bitstream(&bits, &sink).unwrap();
        assert_eq!(sink.warning_count(), 1);
        assert!(loaded.dac(0).unwrap().get_input("DIN0").unwrap().is_none());
    }

    #[test]
    fn mixed_sources_rejected() {
        let mut device = Device::new(Part::Slg46620);
        let vref = with_reference(&mut device, 0, 1000);
        let lut0 = device.directory().port(EntityKind::Lut, 0, "OUT").unwrap();
        let lut1 = device.directory().port(EntityKind::Lut, 1, "OUT").unwrap();
        let dac = device.dac_mut(0).unwrap();
        dac.set_input("VREF", vref).unwrap();
        for (i, name) in DIN_NAMES.iter().enumerate() {
            dac.set_input(name, if i < 4 { lut0 } else { lut1 }).unwrap();
        }
        let sink = DiagnosticSink::new();
        let err = device.save_bitstream(&sink).unwrap_err();
        assert!(err.to_string().contains("same source"));
    }

    #[test]
    fn mixed_rails_rejected() {
        let mut device = Device::new(Part::Slg46620);
        let vref = with_reference(&mut device, 0, 1000);
        let dac = device.dac_mut(0).unwrap();
        dac.set_input("VREF", vref).unwrap();
        drive_constant(dac, 0b0000_0101);
        let sink = DiagnosticSink::new();
        let err = device.save_bitstream(&sink).unwrap_err();
        assert!(err.to_string().contains("DIN0 is VDD but DIN1 is GND"));

        let dac = device.dac_mut(0).unwrap();
        drive_constant(dac, 0);
        dac.set_input("DIN3", EntityOutput::None).unwrap();
        assert!(device.save_bitstream(&sink).is_ok());
    }

    #[test]
    fn one_reference_feeds_both_dacs() {
        let mut device = Device::new(Part::Slg46620);
        let vref = with_reference(&mut device, 0, 1000);
        for i in 0..2 {
            let dac = device.dac_mut(i).unwrap();
            dac.set_input("VREF", vref).unwrap();
            drive_constant(dac, 0xff);
        }
        let sink = DiagnosticSink::new();
        let bits = device.save_bitstream(&sink).unwrap();
        for site in device.layout().dacs {
            assert!(bits.get(site.power).unwrap());
        }
    }

    #[test]
    fn reference_rules() {
        let mut device = Device::new(Part::Slg46620);
        let wrong_level = with_reference(&mut device, 0, 900);
        device.dac_mut(0).unwrap().set_input("VREF", wrong_level).unwrap();
        let sink = DiagnosticSink::new();
        assert!(device.save_bitstream(&sink).is_err());

        let other = with_reference(&mut device, 1, 1000);
        device.dac_mut(0).unwrap().set_input("VREF", other).unwrap();
        assert!(device.save_bitstream(&sink).is_ok());

        let lut = device.directory().port(EntityKind::Lut, 0, "OUT").unwrap();
        device.dac_mut(0).unwrap().set_input("VREF", lut).unwrap();
        assert!(device.save_bitstream(&sink).is_err());
    }

    #[test]
    fn small_part_is_unimplemented() {
        let mut device = Device::new(Part::Slg46140);
        let vref = with_reference(&mut device, 0, 1000);
        device.dac_mut(0).unwrap().set_input("VREF", vref).unwrap();
        let sink = DiagnosticSink::new();
        let err = device.save_bitstream(&sink).unwrap_err();
        assert!(matches!(
            err,
            crate::DeviceError::Entity(EntityError::Unimplemented { .. })
        ));
    }

    #[test]
    fn din_bus_maps_by_bit() {
        let device = Device::new(Part::Slg46620);
        let dac = device.dac(0).unwrap();
        assert_eq!(dac.cell_port_role("GP_DAC", "DIN", 7), PortRole::Input("DIN7"));
        assert_eq!(dac.cell_port_role("GP_DAC", "DIN", 8), PortRole::Unknown);
        assert_eq!(dac.cell_port_role("GP_DAC", "VOUT", 0), PortRole::Output("VOUT"));
    }
}
