//! Register map for the SLG46140 (single routing matrix, 14 pins, 1024 bits).
//!
//! Pins 1 and 8 are VDD and GND. There is no PGA and no cross-connection pool.

use super::{
    BufferSite, CounterSite, CrossSite, DacSite, FabricSite, IobSite, LutSite, PartLayout,
    SystemSite,
};
use crate::part::Part;

pub(crate) static LAYOUT: PartLayout = PartLayout {
    part: Part::Slg46140,
    total_bits: 1024,
    word_width: 6,
    matrix_bases: &[0],
    pin_count: 14,
    iobs: &IOBS,
    luts: &LUTS,
    dffs: &DFFS,
    counters: &COUNTERS,
    lf_oscillators: &LFOSC,
    clock_buffers: &CLKBUFS,
    vrefs: &VREFS,
    dacs: &DACS,
    pga: None,
    cross_connections: &XCONNS,
    system: SystemSite {
        pattern_id_base: 629,
        read_protect_bit: 637,
        reserved: &[638..1024],
    },
};

const IOBS: [IobSite; 12] = [
    IobSite { pin: 2, matrix: 0, input_base: 0, output_word: 1, config_base: 378 },
    IobSite { pin: 3, matrix: 0, input_base: 2, output_word: 2, config_base: 386 },
    IobSite { pin: 4, matrix: 0, input_base: 4, output_word: 3, config_base: 394 },
    IobSite { pin: 5, matrix: 0, input_base: 6, output_word: 4, config_base: 402 },
    IobSite { pin: 6, matrix: 0, input_base: 8, output_word: 5, config_base: 410 },
    IobSite { pin: 7, matrix: 0, input_base: 10, output_word: 6, config_base: 418 },
    IobSite { pin: 9, matrix: 0, input_base: 12, output_word: 7, config_base: 426 },
    IobSite { pin: 10, matrix: 0, input_base: 14, output_word: 8, config_base: 434 },
    IobSite { pin: 11, matrix: 0, input_base: 16, output_word: 9, config_base: 442 },
    IobSite { pin: 12, matrix: 0, input_base: 18, output_word: 10, config_base: 450 },
    IobSite { pin: 13, matrix: 0, input_base: 20, output_word: 11, config_base: 458 },
    IobSite { pin: 14, matrix: 0, input_base: 22, output_word: 12, config_base: 466 },
];

const LUTS: [LutSite; 7] = [
    LutSite { inputs: 2, matrix: 0, input_base: 24, output_word: 13, config_base: 474 },
    LutSite { inputs: 2, matrix: 0, input_base: 26, output_word: 14, config_base: 478 },
    LutSite { inputs: 3, matrix: 0, input_base: 28, output_word: 15, config_base: 482 },
    LutSite { inputs: 3, matrix: 0, input_base: 31, output_word: 16, config_base: 490 },
    LutSite { inputs: 3, matrix: 0, input_base: 34, output_word: 17, config_base: 498 },
    LutSite { inputs: 3, matrix: 0, input_base: 37, output_word: 18, config_base: 506 },
    LutSite { inputs: 4, matrix: 0, input_base: 40, output_word: 19, config_base: 514 },
];

const DFFS: [FabricSite; 4] = [
    FabricSite { matrix: 0, input_base: 44, output_word: 20, config_base: 530 },
    FabricSite { matrix: 0, input_base: 46, output_word: 21, config_base: 531 },
    FabricSite { matrix: 0, input_base: 48, output_word: 22, config_base: 532 },
    FabricSite { matrix: 0, input_base: 50, output_word: 23, config_base: 533 },
];

const COUNTERS: [CounterSite; 4] = [
    CounterSite { width: 14, matrix: 0, input_base: 52, output_word: 24, config_base: 534 },
    CounterSite { width: 8, matrix: 0, input_base: 54, output_word: 25, config_base: 551 },
    CounterSite { width: 8, matrix: 0, input_base: 56, output_word: 26, config_base: 562 },
    CounterSite { width: 8, matrix: 0, input_base: 58, output_word: 27, config_base: 573 },
];

const LFOSC: [FabricSite; 1] = [
    FabricSite { matrix: 0, input_base: 60, output_word: 28, config_base: 584 },
];

const CLKBUFS: [BufferSite; 2] = [
    BufferSite { matrix: 0, input_base: 61, output_word: 29 },
    BufferSite { matrix: 0, input_base: 62, output_word: 30 },
];

const VREFS: [usize; 2] = [589, 598];

const DACS: [DacSite; 2] = [
    DacSite { register: 607, power: 615, select: 616, always_on: 617, vref: 0 },
    DacSite { register: 618, power: 626, select: 627, always_on: 628, vref: 1 },
];

const XCONNS: [CrossSite; 0] = [];
