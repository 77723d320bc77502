//! Routing limits through the full pipeline.

use gpar_device::{Device, Part};
use gpar_diagnostics::DiagnosticSink;
use gpar_netlist::load_netlist_str;
use gpar_pnr::{codes, place_and_route, PnrError, PnrOptions};

fn lut(name: &str, kind: &str, loc: &str, inputs: &[&str], out: Option<u32>) -> String {
    let mut conns: Vec<String> = inputs
        .iter()
        .enumerate()
        .map(|(i, bit)| format!(r#""IN{i}": [{bit}]"#))
        .collect();
    if let Some(out) = out {
        conns.push(format!(r#""OUT": [{out}]"#));
    }
    format!(
        r#""{name}": {{"type": "{kind}", "parameters": {{"LOC": "{loc} "}},
            "connections": {{{}}}}}"#,
        conns.join(", ")
    )
}

/// Nine bare inputs take pins 2-10 and two LUTs also sit in matrix 0, so
/// `extra` more loads in matrix 1 see eleven distinct matrix-0 drivers.
fn crossing_netlist(extra: bool) -> String {
    let mut cells = vec![
        lut("p", "GP_2LUT", "LUT2_0", &[r#""1""#, r#""1""#], Some(30)),
        lut("q", "GP_2LUT", "LUT2_1", &[r#""1""#, r#""0""#], Some(31)),
        lut("a", "GP_3LUT", "LUT3_4", &["10", "11", "12"], None),
        lut("b", "GP_3LUT", "LUT3_5", &["13", "14", "15"], None),
        lut("c", "GP_3LUT", "LUT3_6", &["16", "17", "18"], None),
    ];
    if extra {
        cells.push(lut("d", "GP_4LUT", "LUT4_1", &["30", "31", r#""0""#, r#""0""#], None));
    } else {
        cells.push(lut("d", "GP_4LUT", "LUT4_1", &["30", r#""0""#, r#""0""#, r#""0""#], None));
    }
    format!(
        r#"{{"modules": {{"top": {{
            "ports": {{"i": {{"direction": "input",
                              "bits": [10, 11, 12, 13, 14, 15, 16, 17, 18]}}}},
            "cells": {{{}}}
        }}}}}}"#,
        cells.join(", ")
    )
}

#[test]
fn ten_crossings_fit() {
    let netlist = load_netlist_str(&crossing_netlist(false), "top").unwrap();
    let mut device = Device::new(Part::Slg46620);
    let sink = DiagnosticSink::new();
    let placement =
        place_and_route(&netlist, &mut device, &PnrOptions::default(), &sink).unwrap();
    assert_eq!(placement.cross_connections.len(), 10);
    assert!(!sink.has_errors());
}

#[test]
fn eleventh_crossing_exhausts_the_pool() {
    let netlist = load_netlist_str(&crossing_netlist(true), "top").unwrap();
    let mut device = Device::new(Part::Slg46620);
    let sink = DiagnosticSink::new();
    let err = place_and_route(&netlist, &mut device, &PnrOptions::default(), &sink)
        .unwrap_err();
    assert!(matches!(err, PnrError::Binding { .. }), "{err:?}");
    assert_eq!(err.code(), codes::E207);

    let diags = sink.diagnostics();
    let diag = diags.iter().find(|d| d.code == codes::E207).unwrap();
    assert!(diag.message.contains("from matrix 0 to matrix 1"));
    assert!(diag.notes.iter().any(|n| n.contains("all 10 connections")));
}
