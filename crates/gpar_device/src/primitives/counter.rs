//! Counter/delay blocks.
//!
//! The configuration region is `width + 3` bits: the terminal count
//! (`COUNT_TO - 1`), a 2-bit reset mode and an enable bit.

use crate::bitstream::Bitstream;
use crate::entity::{
    load_inputs, save_inputs, unknown_port, BitstreamEntity, CommitContext, EntityKind,
    EntityLocation, EntityOutput, LoadContext, SaveContext,
};
use crate::error::EntityError;
use crate::layout::CounterSite;

/// Which `RST` edge or level restarts the count.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ResetMode {
    /// Rising edge.
    #[default]
    Rising,
    /// Falling edge.
    Falling,
    /// Both edges.
    Both,
    /// While high.
    Level,
}

impl ResetMode {
    const ALL: [ResetMode; 4] = [
        ResetMode::Rising,
        ResetMode::Falling,
        ResetMode::Both,
        ResetMode::Level,
    ];

    fn code(self) -> u64 {
        self as u64
    }

    fn parse(text: &str) -> Option<Self> {
        match text {
            "RISING" => Some(ResetMode::Rising),
            "FALLING" => Some(ResetMode::Falling),
            "BOTH" => Some(ResetMode::Both),
            "LEVEL" => Some(ResetMode::Level),
            _ => None,
        }
    }
}

/// A counter of 8 or 14 bits.
#[derive(Clone, Debug)]
pub struct Counter {
    index: usize,
    site: CounterSite,
    clk: EntityOutput,
    rst: EntityOutput,
    /// Number of clocks per output pulse, `1..=2^width`.
    pub count_to: u32,
    /// Reset behaviour.
    pub reset_mode: ResetMode,
    /// Whether the block is powered.
    pub enabled: bool,
}

impl Counter {
    pub(crate) fn new(index: usize, site: CounterSite) -> Self {
        Self {
            index,
            site,
            clk: EntityOutput::None,
            rst: EntityOutput::None,
            count_to: 1,
            reset_mode: ResetMode::default(),
            enabled: false,
        }
    }

    /// Counter width in bits.
    pub fn width(&self) -> usize {
        self.site.width
    }
}

impl BitstreamEntity for Counter {
    fn kind(&self) -> EntityKind {
        EntityKind::Counter
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
        format!("COUNT{}_{}", self.site.width, self.index)
    }

    fn primitive_name(&self) -> &'static str {
        if self.site.width == 14 {
            "GP_COUNT14"
        } else {
            "GP_COUNT8"
        }
    }

    fn accepts_primitive(&self, cell_type: &str) -> bool {
        // An 8-bit count fits a 14-bit counter.
        cell_type == self.primitive_name() || cell_type == "GP_COUNT8"
    }

    fn config_len(&self) -> usize {
        self.site.width + 3
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["CLK", "RST"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["OUT"]
    }

    fn get_input(&self, port: &str) -> Option<EntityOutput> {
        match port {
            "CLK" => Some(self.clk),
            "RST" => Some(self.rst),
            _ => None,
        }
    }

    fn set_input(&mut self, port: &str, source: EntityOutput) -> Result<(), EntityError> {
        match port {
            "CLK" => self.clk = source,
            "RST" => self.rst = source,
            _ => return Err(unknown_port(&self.description(), port)),
        }
        Ok(())
    }

    fn known_parameters(&self) -> &'static [&'static str] {
        &["COUNT_TO", "RESET_MODE"]
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }

    fn summary(&self) -> String {
        format!(
            "CLK={} RST={} COUNT_TO={} reset={:?}",
            self.clk, self.rst, self.count_to, self.reset_mode
        )
    }

    fn commit_changes(&mut self, ctx: &CommitContext<'_>) -> Result<(), EntityError> {
        let name = self.description();
        ctx.warn_unknown(&name, self.known_parameters());
        // A GP_COUNT8 keeps its 8-bit range on a 14-bit slot.
        let width = match ctx.cell {
            Some(cell) if cell.cell_type == "GP_COUNT8" => self.site.width.min(8),
            _ => self.site.width,
        };
        let max = 1i64 << width;
        let count_to = ctx.int(&name, "COUNT_TO")?.unwrap_or(1);
        if !(1..=max).contains(&count_to) {
            return Err(EntityError::drc(
                &name,
                format!("COUNT_TO must be in 1..={max}, got {count_to}"),
            ));
        }
        self.count_to = count_to as u32;
        if let Some(text) = ctx.param_text("RESET_MODE") {
            self.reset_mode = ResetMode::parse(&text).ok_or_else(|| {
                EntityError::drc(
                    &name,
                    format!("RESET_MODE must be RISING, FALLING, BOTH or LEVEL, got {text}"),
                )
            })?;
        }
        self.enabled = true;
        Ok(())
    }

    fn save(&self, bits: &mut Bitstream, ctx: &SaveContext<'_>) -> Result<(), EntityError> {
        save_inputs(self, bits, ctx)?;
        if !self.enabled {
            return Ok(());
        }
        let base = self.site.config_base;
        let w = self.site.width;
        bits.write_field(base, w, u64::from(self.count_to.saturating_sub(1)))?;
        bits.write_field(base + w, 2, self.reset_mode.code())?;
        bits.set(base + w + 2, true)?;
        Ok(())
    }

    fn load(&mut self, bits: &Bitstream, ctx: &LoadContext<'_>) -> Result<(), EntityError> {
        load_inputs(self, bits, ctx)?;
        let base = self.site.config_base;
        let w = self.site.width;
        self.count_to = bits.read_field(base, w)? as u32 + 1;
        self.reset_mode = ResetMode::ALL[bits.read_field(base + w, 2)? as usize];
        self.enabled = bits.get(base + w + 2)?;
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
    fn count_to_range() {
        let device = Device::new(Part::Slg46620);
        let mut c8 = device.counter(2).unwrap().clone();
        assert_eq!(c8.width(), 8);
        commit_with(&mut c8, "GP_COUNT8", &[("COUNT_TO", "100000000")]).unwrap();
        assert_eq!(c8.count_to, 256);
        assert!(commit_with(&mut c8, "GP_COUNT8", &[("COUNT_TO", "100000001")]).is_err());
        assert!(commit_with(&mut c8, "GP_COUNT8", &[("COUNT_TO", "0")]).is_err());
    }

    #[test]
    fn wide_counter_accepts_narrow_cells() {
        let device = Device::new(Part::Slg46620);
        let c14 = device.counter(0).unwrap();
        assert!(c14.accepts_primitive("GP_COUNT14"));
        assert!(c14.accepts_primitive("GP_COUNT8"));
        assert!(!device.counter(2).unwrap().accepts_primitive("GP_COUNT14"));
    }

    #[test]
    fn narrow_cell_on_wide_counter_keeps_its_range() {
        let device = Device::new(Part::Slg46620);
        let mut c14 = device.counter(0).unwrap().clone();
        assert_eq!(c14.width(), 14);
        commit_with(&mut c14, "GP_COUNT8", &[("COUNT_TO", "100000000")]).unwrap();
        assert_eq!(c14.count_to, 256);
        let err = commit_with(&mut c14, "GP_COUNT8", &[("COUNT_TO", "100101100")]).unwrap_err();
        assert!(err.to_string().contains("1..=256"), "{err}");
        commit_with(&mut c14, "GP_COUNT14", &[("COUNT_TO", "100101100")]).unwrap();
        assert_eq!(c14.count_to, 300);
    }

    #[test]
    fn reset_mode_parsed() {
        let device = Device::new(Part::Slg46620);
        let mut c = device.counter(1).unwrap().clone();
        commit_with(&mut c, "GP_COUNT14", &[("RESET_MODE", "LEVEL")]).unwrap();
        assert_eq!(c.reset_mode, ResetMode::Level);
        assert!(commit_with(&mut c, "GP_COUNT14", &[("RESET_MODE", "SIDEWAYS")]).is_err());
    }

    #[test]
    fn save_load_roundtrip() {
        let mut device = Device::new(Part::Slg46620);
        let osc = device.directory().port(EntityKind::LfOscillator, 0, "CLKOUT").unwrap();
        {
            let c = device.counter_mut(0).unwrap();
            c.count_to = 12_000;
            c.reset_mode = ResetMode::Both;
            c.enabled = true;
            c.set_input("CLK", osc).unwrap();
        }
        let loaded = load_fresh(&device);
        let c = loaded.counter(0).unwrap();
        assert_eq!(c.count_to, 12_000);
        assert_eq!(c.reset_mode, ResetMode::Both);
        assert!(c.enabled);
        assert_eq!(c.get_input("CLK"), Some(osc));
        assert!(!loaded.counter(1).unwrap().is_configured());
    }
}
