//! Literal per-part register maps.
//!
//! Every address here is a hardware constant from the vendor's bit-layout
//! tables. Input-bus addresses are in words (one word selects one driver);
//! configuration addresses are absolute bit offsets.

use crate::part::Part;
use std::ops::Range;

mod slg46140;
mod slg46620;

/// A pin's I/O buffer.
#[derive(Clone, Copy, Debug)]
pub struct IobSite {
    /// Package pin number.
    pub pin: u32,
    /// Routing matrix the pin belongs to.
    pub matrix: usize,
    /// First input-bus word (`OUT`, then `OE`).
    pub input_base: usize,
    /// Output word carrying the pad's input value.
    pub output_word: usize,
    /// First configuration bit.
    pub config_base: usize,
}

/// A look-up table with `inputs` fabric inputs.
#[derive(Clone, Copy, Debug)]
pub struct LutSite {
    /// Number of inputs (2, 3 or 4).
    pub inputs: usize,
    /// Routing matrix.
    pub matrix: usize,
    /// First input-bus word.
    pub input_base: usize,
    /// Output word.
    pub output_word: usize,
    /// First truth-table bit.
    pub config_base: usize,
}

/// A generic fabric block with inputs, one output and a config region.
#[derive(Clone, Copy, Debug)]
pub struct FabricSite {
    /// Routing matrix.
    pub matrix: usize,
    /// First input-bus word.
    pub input_base: usize,
    /// Output word.
    pub output_word: usize,
    /// First configuration bit.
    pub config_base: usize,
}

/// A counter of `width` bits.
#[derive(Clone, Copy, Debug)]
pub struct CounterSite {
    /// Counter width in bits (8 or 14).
    pub width: usize,
    /// Routing matrix.
    pub matrix: usize,
    /// First input-bus word (`CLK`, then `RST`).
    pub input_base: usize,
    /// Output word.
    pub output_word: usize,
    /// First configuration bit.
    pub config_base: usize,
}

/// A block with inputs and an output but no configuration bits.
#[derive(Clone, Copy, Debug)]
pub struct BufferSite {
    /// Routing matrix.
    pub matrix: usize,
    /// Input-bus word.
    pub input_base: usize,
    /// Output word.
    pub output_word: usize,
}

/// A DAC. Bit fields are absolute offsets.
#[derive(Clone, Copy, Debug)]
pub struct DacSite {
    /// First of eight constant data bits.
    pub register: usize,
    /// Power-on bit.
    pub power: usize,
    /// Data source selector (register vs. fabric).
    pub select: usize,
    /// Keep-alive bit set whenever the DAC is powered.
    pub always_on: usize,
    /// Reference paired with this DAC; assumed as its driver when loading.
    pub vref: usize,
}

/// The programmable gain amplifier.
#[derive(Clone, Copy, Debug)]
pub struct PgaSite {
    /// First of eight configuration bits.
    pub config_base: usize,
    /// Two output-control bits (ADC force-on, buffer enable).
    pub output_control_base: usize,
    /// The pin whose IOB may drive `VIN_SEL`.
    pub vin_sel_pin: u32,
}

/// A cross-connection leaving `from_matrix`.
#[derive(Clone, Copy, Debug)]
pub struct CrossSite {
    /// Matrix the signal is taken from.
    pub from_matrix: usize,
    /// Input-bus word in `from_matrix`.
    pub input_base: usize,
    /// Output word in the other matrix.
    pub output_word: usize,
}

/// Device-wide configuration.
#[derive(Clone, Debug)]
pub struct SystemSite {
    /// First of eight pattern-ID bits.
    pub pattern_id_base: usize,
    /// Read-protect bit.
    pub read_protect_bit: usize,
    /// Bits that must stay zero.
    pub reserved: &'static [Range<usize>],
}

/// The full register map of one part.
#[derive(Debug)]
pub struct PartLayout {
    /// The part this map describes.
    pub part: Part,
    /// Total bitstream length.
    pub total_bits: usize,
    /// Bits per input-bus word.
    pub word_width: usize,
    /// First bit of each matrix's input bus.
    pub matrix_bases: &'static [usize],
    /// Package pin count, including power pins.
    pub pin_count: u32,
    /// I/O buffers, ascending by pin.
    pub iobs: &'static [IobSite],
    /// LUTs, matrix 0 first.
    pub luts: &'static [LutSite],
    /// Flip-flops.
    pub dffs: &'static [FabricSite],
    /// Counters.
    pub counters: &'static [CounterSite],
    /// Low-frequency oscillators.
    pub lf_oscillators: &'static [FabricSite],
    /// Clock buffers.
    pub clock_buffers: &'static [BufferSite],
    /// Voltage references, by configuration base.
    pub vrefs: &'static [usize],
    /// DACs.
    pub dacs: &'static [DacSite],
    /// The PGA, when the part has one.
    pub pga: Option<PgaSite>,
    /// Cross-connections, grouped by source matrix.
    pub cross_connections: &'static [CrossSite],
    /// Device-wide bits.
    pub system: SystemSite,
}

/// Output word wired to ground in every matrix.
pub const GROUND_WORD: usize = 0;

/// Output word wired to Vdd in every matrix.
pub const VDD_WORD: usize = 63;

impl PartLayout {
    /// Returns the register map for `part`.
    pub fn for_part(part: Part) -> &'static PartLayout {
        match part {
            Part::Slg46620 => &slg46620::LAYOUT,
            Part::Slg46140 => &slg46140::LAYOUT,
        }
    }

    /// Number of routing matrices.
    pub fn matrix_count(&self) -> usize {
        self.matrix_bases.len()
    }

    /// Absolute bit range of input-bus word `word` in `matrix`.
    pub fn input_word_bits(&self, matrix: usize, word: usize) -> Range<usize> {
        let start = self.matrix_bases[matrix] + word * self.word_width;
        start..start + self.word_width
    }

    /// Looks up the IOB for a package pin.
    pub fn iob_for_pin(&self, pin: u32) -> Option<(usize, &IobSite)> {
        self.iobs.iter().enumerate().find(|(_, site)| site.pin == pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_shapes() {
        let big = PartLayout::for_part(Part::Slg46620);
        assert_eq!(big.total_bits, 2048);
        assert_eq!(big.matrix_count(), 2);
        assert_eq!(big.iobs.len(), 18);
        assert_eq!(big.cross_connections.len(), 20);
        assert!(big.pga.is_some());

        let small = PartLayout::for_part(Part::Slg46140);
        assert_eq!(small.total_bits, 1024);
        assert_eq!(small.matrix_count(), 1);
        assert!(small.cross_connections.is_empty());
        assert!(small.pga.is_none());
    }

    #[test]
    fn input_word_addressing() {
        let layout = PartLayout::for_part(Part::Slg46620);
        assert_eq!(layout.input_word_bits(0, 0), 0..6);
        assert_eq!(layout.input_word_bits(0, 3), 18..24);
        assert_eq!(layout.input_word_bits(1, 1), 1030..1036);
    }

    #[test]
    fn power_pins_have_no_iob() {
        let layout = PartLayout::for_part(Part::Slg46620);
        assert!(layout.iob_for_pin(1).is_none());
        assert!(layout.iob_for_pin(11).is_none());
        assert_eq!(layout.iob_for_pin(12).map(|(i, _)| i), Some(9));
    }

    #[test]
    fn output_words_fit_selector() {
        for part in Part::ALL {
            let layout = PartLayout::for_part(part);
            let max = 1 << layout.word_width;
            assert_eq!(VDD_WORD, max - 1);
            assert!(layout.iobs.iter().all(|s| s.output_word < VDD_WORD));
            assert!(layout
                .cross_connections
                .iter()
                .all(|s| s.output_word > GROUND_WORD && s.output_word < VDD_WORD));
        }
    }
}
