//! Pin assignment through the full pipeline.

use gpar_device::{Device, Part};
use gpar_diagnostics::DiagnosticSink;
use gpar_netlist::load_netlist_str;
use gpar_pnr::{codes, place_and_route, PnrError, PnrOptions};

fn obuf(name: &str, loc: Option<&str>, out: u32) -> String {
    let attrs = loc.map_or_else(String::new, |l| format!(r#""attributes": {{"LOC": "{l} "}},"#));
    format!(
        r#""{name}": {{"type": "GP_OBUF", {attrs}
            "connections": {{"IN": [2], "OUT": [{out}]}}}}"#
    )
}

fn netlist_with(cells: &[String]) -> String {
    format!(
        r#"{{"modules": {{"top": {{
            "ports": {{"o": {{"direction": "output", "bits": [10, 11, 12]}}}},
            "cells": {{"vdd": {{"type": "GP_VDD", "connections": {{"OUT": [2]}}}}, {}}}
        }}}}}}"#,
        cells.join(", ")
    )
}

#[test]
fn explicit_pin_kept_and_rest_take_lowest_free() {
    let json = netlist_with(&[
        obuf("o3", Some("P3"), 10),
        obuf("oa", None, 11),
        obuf("ob", None, 12),
    ]);
    let netlist = load_netlist_str(&json, "top").unwrap();
    let mut device = Device::new(Part::Slg46620);
    let sink = DiagnosticSink::new();
    let placement =
        place_and_route(&netlist, &mut device, &PnrOptions::default(), &sink).unwrap();

    let pin = |cell: &str| {
        let id = placement.entity_of(cell).unwrap();
        device.entity(id).and_then(|e| e.as_iob()).unwrap().pin()
    };
    assert_eq!(pin("o3"), 3);
    assert_eq!(pin("oa"), 2);
    assert_eq!(pin("ob"), 4);
    for p in [2, 3, 4] {
        assert!(device.iob_for_pin(p).unwrap().is_output());
    }
    assert!(placement.ports.is_empty());
}

#[test]
fn same_pin_twice_is_rejected() {
    let json = netlist_with(&[
        obuf("first", Some("P3"), 10),
        obuf("second", Some("P3"), 11),
    ]);
    let netlist = load_netlist_str(&json, "top").unwrap();
    let mut device = Device::new(Part::Slg46620);
    let sink = DiagnosticSink::new();
    let err = place_and_route(&netlist, &mut device, &PnrOptions::default(), &sink).unwrap_err();

    assert!(matches!(err, PnrError::Binding { .. }));
    let diags = sink.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, codes::E206);
    assert!(diags[0].notes[0].contains("`first`"));
}

#[test]
fn pins_run_out() {
    let cells: Vec<String> = (0..19)
        .map(|i| obuf(&format!("o{i:02}"), None, 10))
        .collect();
    let json = netlist_with(&cells);
    let netlist = load_netlist_str(&json, "top").unwrap();
    let mut device = Device::new(Part::Slg46620);
    let sink = DiagnosticSink::new();
    let err = place_and_route(&netlist, &mut device, &PnrOptions::default(), &sink).unwrap_err();
    assert!(matches!(err, PnrError::Binding { .. }));
    assert_eq!(sink.diagnostics()[0].code, codes::E204);
}
