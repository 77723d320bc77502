//! Register map for the SLG46620 (two routing matrices, 20 pins, 2048 bits).
//!
//! Matrix 0 owns pins 2-10 and the analog blocks; matrix 1 owns pins 12-20.
//! Pins 1 and 11 are VDD and GND.

use super::{
    BufferSite, CounterSite, CrossSite, DacSite, FabricSite, IobSite, LutSite, PartLayout, PgaSite,
    SystemSite,
};
use crate::part::Part;

pub(crate) static LAYOUT: PartLayout = PartLayout {
    part: Part::Slg46620,
    total_bits: 2048,
    word_width: 6,
    matrix_bases: &[0, 1024],
    pin_count: 20,
    iobs: &IOBS,
    luts: &LUTS,
    dffs: &DFFS,
    counters: &COUNTERS,
    lf_oscillators: &LFOSC,
    clock_buffers: &CLKBUFS,
    vrefs: &VREFS,
    dacs: &DACS,
    pga: Some(PgaSite {
        config_base: 708,
        output_control_base: 778,
        vin_sel_pin: 16,
    }),
    cross_connections: &XCONNS,
    system: SystemSite {
        pattern_id_base: 780,
        read_protect_bit: 788,
        reserved: &[716..778, 789..1024, 1681..2048],
    },
};

const IOBS: [IobSite; 18] = [
    IobSite { pin: 2, matrix: 0, input_base: 0, output_word: 1, config_base: 444 },
    IobSite { pin: 3, matrix: 0, input_base: 2, output_word: 2, config_base: 452 },
    IobSite { pin: 4, matrix: 0, input_base: 4, output_word: 3, config_base: 460 },
    IobSite { pin: 5, matrix: 0, input_base: 6, output_word: 4, config_base: 468 },
    IobSite { pin: 6, matrix: 0, input_base: 8, output_word: 5, config_base: 476 },
    IobSite { pin: 7, matrix: 0, input_base: 10, output_word: 6, config_base: 484 },
    IobSite { pin: 8, matrix: 0, input_base: 12, output_word: 7, config_base: 492 },
    IobSite { pin: 9, matrix: 0, input_base: 14, output_word: 8, config_base: 500 },
    IobSite { pin: 10, matrix: 0, input_base: 16, output_word: 9, config_base: 508 },
    IobSite { pin: 12, matrix: 1, input_base: 0, output_word: 1, config_base: 1462 },
    IobSite { pin: 13, matrix: 1, input_base: 2, output_word: 2, config_base: 1470 },
    IobSite { pin: 14, matrix: 1, input_base: 4, output_word: 3, config_base: 1478 },
    IobSite { pin: 15, matrix: 1, input_base: 6, output_word: 4, config_base: 1486 },
    IobSite { pin: 16, matrix: 1, input_base: 8, output_word: 5, config_base: 1494 },
    IobSite { pin: 17, matrix: 1, input_base: 10, output_word: 6, config_base: 1502 },
    IobSite { pin: 18, matrix: 1, input_base: 12, output_word: 7, config_base: 1510 },
    IobSite { pin: 19, matrix: 1, input_base: 14, output_word: 8, config_base: 1518 },
    IobSite { pin: 20, matrix: 1, input_base: 16, output_word: 9, config_base: 1526 },
];

const LUTS: [LutSite; 14] = [
    LutSite { inputs: 2, matrix: 0, input_base: 18, output_word: 10, config_base: 516 },
    LutSite { inputs: 2, matrix: 0, input_base: 20, output_word: 11, config_base: 520 },
    LutSite { inputs: 3, matrix: 0, input_base: 22, output_word: 12, config_base: 524 },
    LutSite { inputs: 3, matrix: 0, input_base: 25, output_word: 13, config_base: 532 },
    LutSite { inputs: 3, matrix: 0, input_base: 28, output_word: 14, config_base: 540 },
    LutSite { inputs: 3, matrix: 0, input_base: 31, output_word: 15, config_base: 548 },
    LutSite { inputs: 4, matrix: 0, input_base: 34, output_word: 16, config_base: 556 },
    LutSite { inputs: 2, matrix: 1, input_base: 18, output_word: 10, config_base: 1534 },
    LutSite { inputs: 2, matrix: 1, input_base: 20, output_word: 11, config_base: 1538 },
    LutSite { inputs: 3, matrix: 1, input_base: 22, output_word: 12, config_base: 1542 },
    LutSite { inputs: 3, matrix: 1, input_base: 25, output_word: 13, config_base: 1550 },
    LutSite { inputs: 3, matrix: 1, input_base: 28, output_word: 14, config_base: 1558 },
    LutSite { inputs: 3, matrix: 1, input_base: 31, output_word: 15, config_base: 1566 },
    LutSite { inputs: 4, matrix: 1, input_base: 34, output_word: 16, config_base: 1574 },
];

const DFFS: [FabricSite; 12] = [
    FabricSite { matrix: 0, input_base: 38, output_word: 17, config_base: 572 },
    FabricSite { matrix: 0, input_base: 40, output_word: 18, config_base: 573 },
    FabricSite { matrix: 0, input_base: 42, output_word: 19, config_base: 574 },
    FabricSite { matrix: 0, input_base: 44, output_word: 20, config_base: 575 },
    FabricSite { matrix: 0, input_base: 46, output_word: 21, config_base: 576 },
    FabricSite { matrix: 0, input_base: 48, output_word: 22, config_base: 577 },
    FabricSite { matrix: 1, input_base: 38, output_word: 17, config_base: 1590 },
    FabricSite { matrix: 1, input_base: 40, output_word: 18, config_base: 1591 },
    FabricSite { matrix: 1, input_base: 42, output_word: 19, config_base: 1592 },
    FabricSite { matrix: 1, input_base: 44, output_word: 20, config_base: 1593 },
    FabricSite { matrix: 1, input_base: 46, output_word: 21, config_base: 1594 },
    FabricSite { matrix: 1, input_base: 48, output_word: 22, config_base: 1595 },
];

const COUNTERS: [CounterSite; 10] = [
    CounterSite { width: 14, matrix: 0, input_base: 50, output_word: 23, config_base: 578 },
    CounterSite { width: 14, matrix: 0, input_base: 52, output_word: 24, config_base: 595 },
    CounterSite { width: 8, matrix: 0, input_base: 54, output_word: 25, config_base: 612 },
    CounterSite { width: 8, matrix: 0, input_base: 56, output_word: 26, config_base: 623 },
    CounterSite { width: 8, matrix: 0, input_base: 58, output_word: 27, config_base: 634 },
    CounterSite { width: 14, matrix: 1, input_base: 50, output_word: 23, config_base: 1596 },
    CounterSite { width: 14, matrix: 1, input_base: 52, output_word: 24, config_base: 1613 },
    CounterSite { width: 8, matrix: 1, input_base: 54, output_word: 25, config_base: 1630 },
    CounterSite { width: 8, matrix: 1, input_base: 56, output_word: 26, config_base: 1641 },
    CounterSite { width: 8, matrix: 1, input_base: 58, output_word: 27, config_base: 1652 },
];

const LFOSC: [FabricSite; 1] = [
    FabricSite { matrix: 0, input_base: 60, output_word: 28, config_base: 645 },
];

const CLKBUFS: [BufferSite; 6] = [
    BufferSite { matrix: 0, input_base: 61, output_word: 29 },
    BufferSite { matrix: 0, input_base: 62, output_word: 30 },
    BufferSite { matrix: 0, input_base: 63, output_word: 31 },
    BufferSite { matrix: 1, input_base: 60, output_word: 28 },
    BufferSite { matrix: 1, input_base: 61, output_word: 29 },
    BufferSite { matrix: 1, input_base: 62, output_word: 30 },
];

const VREFS: [usize; 6] = [650, 659, 668, 677, 1663, 1672];

const DACS: [DacSite; 2] = [
    DacSite { register: 686, power: 694, select: 695, always_on: 696, vref: 0 },
    DacSite { register: 697, power: 705, select: 706, always_on: 707, vref: 1 },
];

const XCONNS: [CrossSite; 20] = [
    CrossSite { from_matrix: 0, input_base: 64, output_word: 31 },
    CrossSite { from_matrix: 0, input_base: 65, output_word: 32 },
    CrossSite { from_matrix: 0, input_base: 66, output_word: 33 },
    CrossSite { from_matrix: 0, input_base: 67, output_word: 34 },
    CrossSite { from_matrix: 0, input_base: 68, output_word: 35 },
    CrossSite { from_matrix: 0, input_base: 69, output_word: 36 },
    CrossSite { from_matrix: 0, input_base: 70, output_word: 37 },
    CrossSite { from_matrix: 0, input_base: 71, output_word: 38 },
    CrossSite { from_matrix: 0, input_base: 72, output_word: 39 },
    CrossSite { from_matrix: 0, input_base: 73, output_word: 40 },
    CrossSite { from_matrix: 1, input_base: 63, output_word: 32 },
    CrossSite { from_matrix: 1, input_base: 64, output_word: 33 },
    CrossSite { from_matrix: 1, input_base: 65, output_word: 34 },
    CrossSite { from_matrix: 1, input_base: 66, output_word: 35 },
    CrossSite { from_matrix: 1, input_base: 67, output_word: 36 },
    CrossSite { from_matrix: 1, input_base: 68, output_word: 37 },
    CrossSite { from_matrix: 1, input_base: 69, output_word: 38 },
    CrossSite { from_matrix: 1, input_base: 70, output_word: 39 },
    CrossSite { from_matrix: 1, input_base: 71, output_word: 40 },
    CrossSite { from_matrix: 1, input_base: 72, output_word: 41 },
];
