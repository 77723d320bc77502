//! Pushes netlist parameters into the bound entities.

use crate::bind::is_io_buffer;
use crate::error::{entity_failure, PnrError};
use crate::iob::pad_net;
use crate::placement::Placement;
use gpar_common::InternalError;
use gpar_device::{BitstreamEntity, CommitContext, Device, EntityKind};
use gpar_diagnostics::{DiagnosticSink, Location};
use gpar_netlist::Module;

/// Commits every placed cell and bare pad.
///
/// Pad buffers also see the attributes of the net on their pad, beneath
/// their own parameters, so a `PULLUP` written on a port reaches the IOB.
pub fn commit_all(
    module: &Module,
    device: &mut Device,
    placement: &Placement,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    for (name, id) in &placement.cells {
        let cell = module.cell(name).ok_or_else(|| {
            InternalError::new(format!("placed cell `{name}` is not in {}", module.name))
        })?;
        let mut ctx = CommitContext::for_cell(module, cell, sink);
        if is_io_buffer(&cell.cell_type) {
            let net_attrs = pad_net(device, cell)
                .and_then(|net| module.net(net))
                .map(|net| net.attributes.clone())
                .unwrap_or_default();
            for (key, value) in net_attrs {
                ctx.params.entry(key).or_insert(value);
            }
        }
        commit_one(device, *id, &ctx, Location::Cell(name.clone()), sink)?;
    }

    for ((port, bit), id) in &placement.ports {
        let label = format!("{port}[{bit}]");
        let params = module
            .ports
            .get(port)
            .and_then(|p| p.bits.get(*bit))
            .and_then(|b| b.net())
            .and_then(|net| module.net(net))
            .map(|net| net.attributes.clone())
            .unwrap_or_default();
        let ctx = CommitContext {
            module,
            cell: None,
            name: &label,
            params,
            sink,
        };
        commit_one(device, *id, &ctx, Location::Port(label.clone()), sink)?;
    }
    Ok(())
}

fn commit_one(
    device: &mut Device,
    id: gpar_device::EntityId,
    ctx: &CommitContext<'_>,
    location: Location,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    let entity = device
        .entity_mut(id)
        .ok_or_else(|| InternalError::vanished(format!("entity {id}")))?;
    if entity.kind() == EntityKind::PowerRail {
        return Ok(());
    }
    entity
        .commit_changes(ctx)
        .map_err(|e| entity_failure(sink, e, location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iob::place_iobs;
    use gpar_device::primitives::{PullDirection, PullResistor};
    use gpar_device::Part;
    use gpar_netlist::load_netlist_str;

    #[test]
    fn port_attributes_reach_bare_pads() {
        let json = r#"{"modules": {"top": {
            "ports": {"btn": {"direction": "input", "bits": [2]}},
            "netnames": {"btn": {"bits": [2], "attributes": {"PULLUP": "100k "}}}
        }}}"#;
        let netlist = load_netlist_str(json, "top").unwrap();
        let module = netlist.top_module();
        let mut device = Device::new(Part::Slg46620);
        let sink = DiagnosticSink::new();
        let mut placement = Placement::default();
        place_iobs(module, &device, &mut placement, &sink).unwrap();
        commit_all(module, &mut device, &placement, &sink).unwrap();

        let iob = device.iob_for_pin(2).unwrap();
        assert_eq!(iob.pull, PullResistor::R100k);
        assert_eq!(iob.pull_direction, PullDirection::Up);
        assert!(!sink.has_errors());
    }

    #[test]
    fn cell_parameters_override_net_attributes() {
        let json = r#"{"modules": {"top": {
            "ports": {"btn": {"direction": "input", "bits": [2]}},
            "cells": {
                "ib": {"type": "GP_IBUF", "parameters": {"PULLDOWN": "10k "},
                       "connections": {"IN": [2], "OUT": [3]}}
            },
            "netnames": {"btn": {"bits": [2], "attributes": {"PULLDOWN": "1M "}}}
        }}}"#;
        let netlist = load_netlist_str(json, "top").unwrap();
        let module = netlist.top_module();
        let mut device = Device::new(Part::Slg46620);
        let sink = DiagnosticSink::new();
        let mut placement = Placement::default();
        place_iobs(module, &device, &mut placement, &sink).unwrap();
        commit_all(module, &mut device, &placement, &sink).unwrap();

        let iob = device.iob_for_pin(2).unwrap();
        assert_eq!(iob.pull, PullResistor::R10k);
        assert_eq!(iob.pull_direction, PullDirection::Down);
    }

    #[test]
    fn entity_rejection_is_reported_on_the_cell() {
        let json = r#"{"modules": {"top": {
            "cells": {
                "ib": {"type": "GP_IBUF", "parameters": {"DRIVE_STRENGTH": "3X "},
                       "connections": {"IN": [2], "OUT": [3]}}
            }
        }}}"#;
        let netlist = load_netlist_str(json, "top").unwrap();
        let module = netlist.top_module();
        let mut device = Device::new(Part::Slg46620);
        let sink = DiagnosticSink::new();
        let mut placement = Placement::default();
        place_iobs(module, &device, &mut placement, &sink).unwrap();
        let err = commit_all(module, &mut device, &placement, &sink).unwrap_err();
        assert!(matches!(err, PnrError::Entity(_)));
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.code, crate::codes::E301);
        assert_eq!(diag.location, Location::Cell("ib".into()));
    }
}
