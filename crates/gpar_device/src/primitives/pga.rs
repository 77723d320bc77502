//! The programmable gain amplifier.
//!
//! Bits, relative to the configuration base:
//!
//! | bit | field |
//! |-----|-------|
//! | 0   | VIN_P taken from DAC0 |
//! | 1   | VIN_SEL input mux enabled |
//! | 2   | differential |
//! | 3-5 | gain code, `log2(gain / 0.25)` |
//! | 6   | force on |
//! | 7   | pseudo-differential |
//!
//! Two more bits at the output-control base force the ADC on and enable the
//! output to non-ADC loads. The force-on bits are derived from the netlist at
//! commit time and ignored on load.

use crate::bitstream::Bitstream;
use crate::entity::{
    unknown_port, BitstreamEntity, CommitContext, EntityKind, EntityLocation, EntityOutput,
    LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::PgaSite;
use std::fmt;
use std::ops::Range;

/// Legal gains, times 100, indexed by gain code.
const GAINS: [u16; 7] = [25, 50, 100, 200, 400, 800, 1600];

/// Input configuration.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum PgaMode {
    /// Single-ended, VIN_P only.
    #[default]
    Single,
    /// Differential.
    Diff,
    /// Pseudo-differential.
    Pdiff,
}

impl PgaMode {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "SINGLE" => Some(PgaMode::Single),
            "DIFF" => Some(PgaMode::Diff),
            "PDIFF" => Some(PgaMode::Pdiff),
            _ => None,
        }
    }

    /// Whether the mode allows `gain` (times 100).
    pub fn allows(self, gain: u16) -> bool {
        let in_range = match self {
            PgaMode::Single => gain <= 800,
            PgaMode::Diff | PgaMode::Pdiff => gain >= 100,
        };
        in_range && GAINS.contains(&gain)
    }
}

impl fmt::Display for PgaMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PgaMode::Single => "SINGLE",
            PgaMode::Diff => "DIFF",
            PgaMode::Pdiff => "PDIFF",
        })
    }
}

/// The PGA.
#[derive(Clone, Debug)]
pub struct Pga {
    index: usize,
    site: PgaSite,
    vin_p: EntityOutput,
    vin_n: EntityOutput,
    vin_sel: EntityOutput,
    /// Gain times 100.
    pub gain: u16,
    /// Input configuration.
    pub mode: PgaMode,
    has_non_adc_loads: bool,
}

impl Pga {
    pub(crate) fn new(index: usize, site: PgaSite) -> Self {
        Self {
            index,
            site,
            vin_p: EntityOutput::GROUND,
            vin_n: EntityOutput::GROUND,
            vin_sel: EntityOutput::VDD,
            gain: 100,
            mode: PgaMode::Single,
            has_non_adc_loads: false,
        }
    }

    /// Whether anything other than the ADC listens to `VOUT`.
    pub fn has_non_adc_loads(&self) -> bool {
        self.has_non_adc_loads
    }

    fn gain_code(&self) -> Result<u64, EntityError> {
        GAINS
            .iter()
            .position(|g| *g == self.gain)
            .map(|c| c as u64)
            .ok_or_else(|| {
                EntityError::encoding(self.description(), format!("gain {} has no code", self.gain))
            })
    }

    fn check_gain(&self) -> Result<(), EntityError> {
        if self.mode.allows(self.gain) {
            return Ok(());
        }
        let legal = match self.mode {
            PgaMode::Single => "0.25, 0.5, 1, 2, 4 or 8",
            PgaMode::Diff | PgaMode::Pdiff => "1, 2, 4, 8 or 16",
        };
        Err(EntityError::drc(
            self.description(),
            format!(
                "GAIN {} is not legal in {} mode; use {legal}",
                f64::from(self.gain) / 100.0,
                self.mode
            ),
        ))
    }
}

impl BitstreamEntity for Pga {
    fn kind(&self) -> EntityKind {
        EntityKind::Pga
    }

    fn index(&self) -> usize {
        self.index
    }

    fn location(&self) -> EntityLocation {
        EntityLocation {
            config_base: Some(self.site.config_base),
            ..EntityLocation::default()
        }
    }

    fn description(&self) -> String {
        format!("PGA{}", self.index)
    }

    fn primitive_name(&self) -> &'static str {
        "GP_PGA"
    }

    fn config_len(&self) -> usize {
        10
    }

    fn config_regions(&self) -> Vec<Range<usize>> {
        let s = &self.site;
        vec![
            s.config_base..s.config_base + 8,
            s.output_control_base..s.output_control_base + 2,
        ]
    }

    fn dedicated_inputs(&self) -> &'static [&'static str] {
        &["VIN_P", "VIN_N", "VIN_SEL"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["VOUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        match port {
            "VIN_P" => Some(self.vin_p),
            "VIN_N" => Some(self.vin_n),
            "VIN_SEL" => Some(self.vin_sel),
            _ => None,
        }
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        match port {
            "VIN_P" => self.vin_p = source,
            "VIN_N" => self.vin_n = source,
            "VIN_SEL" => self.vin_sel = source,
            _ => return Err(unknown_port(&self.description(), port)),
        }
        Ok(())
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &["GAIN", "INPUT_MODE"]
    }

    fn is_configured(&self) -> bool {
        self.gain != 100
            || self.mode != PgaMode::Single
            || !self.vin_p.is_ground_or_none()
            || !self.vin_n.is_ground_or_none()
            || self.vin_sel != EntityOutput::VDD
    }

    fn summary(&self) -> String {
        format!(
            "{} gain={} VIN_P={} VIN_N={} VIN_SEL={}",
            self.mode,
            f64::from(self.gain) / 100.0,
            self.vin_p,
            self.vin_n,
            self.vin_sel
        )
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());

        if let Some(value) = ctx.param("GAIN") {
            let gain = value
                .as_real()
                .map(|g| (g * 100.0).round())
                .filter(|g| GAINS.iter().any(|legal| f64::from(*legal) == *g))
                .ok_or_else(|| {
                    EntityError::drc(
                        &name,
                        format!("GAIN must be 0.25, 0.5, 1, 2, 4, 8 or 16, got {value}"),
                    )
                })?;
            self.gain = gain as u16;
        }
        if let Some(text) = ctx.param_text("INPUT_MODE") {
            self.mode = PgaMode::parse(&text).ok_or_else(|| {
                EntityError::drc(
                    &name,
                    format!("INPUT_MODE must be SINGLE, DIFF or PDIFF, got {text}"),
                )
            })?;
        }
        self.check_gain()?;

        self.has_non_adc_loads = false;
        if let Some(cell) = ctx.cell {
            let vout = cell.connection("VOUT").first().and_then(|b| b.net());
            if let Some(net) = vout.and_then(|id| ctx.module.net(id)) {
                self.has_non_adc_loads = net.node_ports.iter().any(|np| np.cell != cell.name)
                    || !net.module_ports.is_empty();
            }
        }
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        let base = self.site.config_base;

        let dac0 = ctx.directory.find(EntityKind::Dac, 0);
        let from_dac0 = self.vin_p.kind() == Some(EntityKind::Dac) && self.vin_p.entity() == dac0;
        bits.set(base, from_dac0)?;

        let mux = match self.vin_sel {
            EntityOutput::None | EntityOutput::Rail(true) => false,
            EntityOutput::Rail(false) => {
                return Err(EntityError::drc(&name, "VIN_SEL must be driven by an IOB or Vdd"))
            }
            EntityOutput::Port { entity, .. } => {
                let pin = ctx.entity(entity).and_then(|e| e.as_iob()).map(|iob| iob.pin());
                if pin != Some(self.site.vin_sel_pin) {
                    return Err(EntityError::drc(
                        &name,
                        format!(
                            "VIN_SEL may only come from pin {}, got {}",
                            self.site.vin_sel_pin, self.vin_sel
                        ),
                    ));
                }
                true
            }
        };
        bits.set(base + 1, mux)?;

        let (diff, pdiff) = match self.mode {
            PgaMode::Single => (false, false),
            PgaMode::Diff => (true, false),
            PgaMode::Pdiff => (true, true),
        };
        bits.set(base + 2, diff)?;
        bits.set(base + 7, pdiff)?;

        self.check_gain()?;
        bits.write_field(base + 3, 3, self.gain_code()?)?;

        bits.set(base + 6, self.has_non_adc_loads)?;
        bits.set(self.site.output_control_base, self.has_non_adc_loads)?;
        bits.set(self.site.output_control_base + 1, self.has_non_adc_loads)?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        let base = self.site.config_base;

        self.vin_p = if bits.get(base)? {
            ctx.directory
                .port(EntityKind::Dac, 0, "VOUT")
                .unwrap_or(EntityOutput::None)
        } else {
            EntityOutput::GROUND
        };

        self.vin_sel = if bits.get(base + 1)? {
            ctx.layout
                .iob_for_pin(self.site.vin_sel_pin)
                .and_then(|(i, _)| ctx.directory.port(EntityKind::Iob, i, "IN"))
                .unwrap_or(EntityOutput::None)
        } else {
            EntityOutput::VDD
        };

        self.mode = match (bits.get(base + 2)?, bits.get(base + 7)?) {
            (false, false) => PgaMode::Single,
            (true, false) => PgaMode::Diff,
            (true, true) => PgaMode::Pdiff,
            (false, true) => {
                return Err(EntityError::encoding(
                    self.description(),
                    "pseudo-differential bit set without differential bit",
                ))
            }
        };

        let code = bits.read_field(base + 3, 3)? as usize;
        self.gain = *GAINS.get(code).ok_or_else(|| {
            EntityError::encoding(self.description(), "gain code 7 (x32) is not supported")
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Device;
    use crate::part::Part;
    use crate::test_util::{commit_with, load_fresh};
    use gpar_diagnostics::DiagnosticSink;

    fn saved_config(device: &Device) -> (Bitstream, usize) {
        let sink = DiagnosticSink::new();
        let bits = device.save_bitstream(&sink).unwrap();
        (bits, device.layout().pga.unwrap().config_base)
    }

    #[test]
    fn quarter_gain_single() {
        let mut device = Device::new(Part::Slg46620);
        let pga = device.pga_mut().unwrap();
        commit_with(pga, "GP_PGA", &[("GAIN", "0.25"), ("INPUT_MODE", "SINGLE")]).unwrap();
        assert_eq!(pga.gain, 25);
        let (bits, base) = saved_config(&device);
        assert!(!bits.get(base + 5).unwrap());
        assert!(!bits.get(base + 4).unwrap());
        assert!(!bits.get(base + 3).unwrap());
    }

    #[test]
    fn unity_gain_in_every_mode() {
        for mode in ["SINGLE", "DIFF", "PDIFF"] {
            let mut device = Device::new(Part::Slg46620);
            let pga = device.pga_mut().unwrap();
            commit_with(pga, "GP_PGA", &[("GAIN", "1"), ("INPUT_MODE", mode)]).unwrap();
            assert_eq!(pga.gain, 100);
            let (bits, base) = saved_config(&device);
            assert!(!bits.get(base + 5).unwrap());
            assert!(bits.get(base + 4).unwrap());
            assert!(!bits.get(base + 3).unwrap());
        }
    }

    #[test]
    fn gain_mode_partition() {
        let device = Device::new(Part::Slg46620);
        let mut pga = device.pga().unwrap().clone();
        let mut commit = |params: &[(&str, &str)]| commit_with(&mut pga, "GP_PGA", params);
        assert!(commit(&[("GAIN", "16"), ("INPUT_MODE", "SINGLE")]).is_err());
        assert!(commit(&[("GAIN", "0.25"), ("INPUT_MODE", "DIFF")]).is_err());
        assert!(commit(&[("GAIN", "16"), ("INPUT_MODE", "PDIFF")]).is_ok());
        assert!(commit(&[("GAIN", "16"), ("INPUT_MODE", "DIFF")]).is_ok());
        assert!(commit(&[("GAIN", "3")]).is_err());
        assert!(commit(&[("INPUT_MODE", "QUAD")]).is_err());
    }

    #[test]
    fn mode_bits_roundtrip() {
        let mut device = Device::new(Part::Slg46620);
        {
            let pga = device.pga_mut().unwrap();
            pga.mode = PgaMode::Pdiff;
            pga.gain = 800;
        }
        let (bits, base) = saved_config(&device);
        assert!(bits.get(base + 2).unwrap());
        assert!(bits.get(base + 7).unwrap());
        let loaded = load_fresh(&device);
        let pga = loaded.pga().unwrap();
        assert_eq!(pga.mode, PgaMode::Pdiff);
        assert_eq!(pga.gain, 800);
        assert_eq!(pga.get_input("VIN_SEL"), Some(EntityOutput::VDD));
    }

    #[test]
    fn undefined_mode_rejected_on_load() {
        let device = Device::new(Part::Slg46620);
        let (mut bits, base) = saved_config(&device);
        bits.set(base + 7, true).unwrap();
        let sink = DiagnosticSink::new();
        let mut loaded = Device::new(Part::Slg46620);
        assert!(loaded.load_bitstream(&bits, &sink).is_err());
    }

    #[test]
    fn vin_sel_rules() {
        let mut device = Device::new(Part::Slg46620);
        device.pga_mut().unwrap().set_input("VIN_SEL", EntityOutput::GROUND).unwrap();
        let sink = DiagnosticSink::new();
        assert!(device.save_bitstream(&sink).is_err());

        let pin15 = device.iob_id_for_pin(15).unwrap();
        let wrong = EntityOutput::Port {
            entity: pin15,
            kind: EntityKind::Iob,
            port: "IN",
        };
        device.pga_mut().unwrap().set_input("VIN_SEL", wrong).unwrap();
        assert!(device.save_bitstream(&sink).is_err());

        let pin16 = device.iob_id_for_pin(16).unwrap();
        let right = EntityOutput::Port {
            entity: pin16,
            kind: EntityKind::Iob,
            port: "IN",
        };
        device.pga_mut().unwrap().set_input("VIN_SEL", right).unwrap();
        let loaded = load_fresh(&device);
        assert_eq!(loaded.pga().unwrap().get_input("VIN_SEL"), Some(right));
    }

    #[test]
    fn dac_input_reconstructed() {
        let mut device = Device::new(Part::Slg46620);
        let dac0 = device.directory().port(EntityKind::Dac, 0, "VOUT").unwrap();
        device.pga_mut().unwrap().set_input("VIN_P", dac0).unwrap();
        let loaded = load_fresh(&device);
        assert_eq!(loaded.pga().unwrap().get_input("VIN_P"), Some(dac0));
    }
}
