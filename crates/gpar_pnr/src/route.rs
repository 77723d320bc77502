//! Net routing.
//!
//! Every net gets exactly one driver. Each load is then wired to that
//! driver: dedicated inputs directly, fabric inputs through their routing
//! matrix, borrowing a cross-connection when the driver sits in the other
//! matrix. One cross-connection carries a driver into a matrix for every
//! load there.

use crate::codes;
use crate::error::{entity_failure, structural, PnrError};
use crate::placement::Placement;
use gpar_common::InternalError;
use gpar_device::{BitstreamEntity, Device, EntityId, EntityKind, EntityOutput, PortRole};
use gpar_diagnostics::{Diagnostic, DiagnosticSink, Location};
use gpar_netlist::{BitRef, Module, NetId, PortDirection};
use std::collections::{BTreeMap, HashMap};

/// An entity input waiting for its driver.
#[derive(Debug)]
struct Load {
    bit: BitRef,
    entity: EntityId,
    port: &'static str,
    label: String,
    location: Location,
}

/// Net drivers, with a label for each.
type Drivers = BTreeMap<NetId, Vec<(EntityOutput, String)>>;

/// Wires every net of `module` onto the bound entities of `device`.
pub fn route(
    module: &Module,
    device: &mut Device,
    placement: &mut Placement,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    let mut drivers = Drivers::new();
    let mut loads = Vec::new();
    collect_cells(module, device, placement, &mut drivers, &mut loads, sink)?;
    collect_ports(module, device, placement, &mut drivers, &mut loads, sink)?;

    for (net, found) in &drivers {
        if found.len() > 1 {
            let names: Vec<&str> = found.iter().map(|(_, label)| label.as_str()).collect();
            let name = module.net_name(*net);
            sink.emit(
                Diagnostic::error(
                    codes::E103,
                    format!("net `{name}` has {} drivers", found.len()),
                    Location::Net(name.clone()),
                )
                .with_note(format!("driven by {}", names.join(", "))),
            );
            return Err(PnrError::Structural {
                code: codes::E103,
                message: format!("net `{name}` has more than one driver"),
            });
        }
    }

    let mut relays: HashMap<(EntityId, usize), EntityOutput> = HashMap::new();
    for load in loads {
        let source = match load.bit {
            BitRef::Const(logic) => EntityOutput::Rail(logic.tie_level()),
            BitRef::Net(net) => match drivers.get(&net).and_then(|d| d.first()) {
                Some((source, _)) => *source,
                None => {
                    let name = module.net_name(net);
                    return Err(structural(
                        sink,
                        codes::E104,
                        format!("net `{name}` feeds {} but has no driver", load.label),
                        Location::Net(name),
                    ));
                }
            },
        };
        let source = reach(device, placement, &mut relays, &load, source, sink)?;
        let entity = device
            .entity_mut(load.entity)
            .ok_or_else(|| InternalError::vanished(format!("entity {}", load.entity)))?;
        entity
            .set_input(load.port, source)
            .map_err(|e| entity_failure(sink, e, load.location.clone()))?;
    }
    Ok(())
}

/// Makes `source` reachable from the load's input, relaying it across
/// matrices when needed.
fn reach(
    device: &mut Device,
    placement: &mut Placement,
    relays: &mut HashMap<(EntityId, usize), EntityOutput>,
    load: &Load,
    source: EntityOutput,
    sink: &DiagnosticSink,
) -> Result<EntityOutput, PnrError> {
    let EntityOutput::Port { entity: driver, .. } = source else {
        return Ok(source);
    };
    let target = device
        .entity(load.entity)
        .ok_or_else(|| InternalError::vanished(format!("entity {}", load.entity)))?;
    if !target.input_ports().contains(&load.port) {
        return Ok(source);
    }
    let matrix = target.location().matrix;
    let Some((from, _)) = device.directory().output_word(driver) else {
        let name = device
            .entity(driver)
            .map_or_else(|| driver.to_string(), |e| e.description());
        return Err(structural(
            sink,
            codes::E303,
            format!("analog output of {name} cannot drive {}", load.label),
            load.location.clone(),
        ));
    };
    if from == matrix {
        return Ok(source);
    }
    if let Some(relayed) = relays.get(&(driver, matrix)) {
        return Ok(*relayed);
    }

    let free = device
        .directory()
        .family(EntityKind::CrossConnection)
        .filter(|id| !placement.is_claimed(*id))
        .find(|id| {
            device
                .entity(*id)
                .and_then(|e| e.as_cross_connection())
                .is_some_and(|x| x.from_matrix() == from)
        });
    let Some(xconn) = free else {
        let total = device
            .entities()
            .iter()
            .filter_map(|e| e.as_cross_connection())
            .filter(|x| x.from_matrix() == from)
            .count();
        sink.emit(
            Diagnostic::error(
                codes::E207,
                format!("no cross-connection left from matrix {from} to matrix {matrix}"),
                load.location.clone(),
            )
            .with_note(format!("all {total} connections in that direction are in use")),
        );
        return Err(PnrError::Binding {
            code: codes::E207,
            message: format!("cross-connections from matrix {from} exhausted"),
        });
    };

    let relay = device
        .entity_mut(xconn)
        .ok_or_else(|| InternalError::vanished(format!("entity {xconn}")))?;
    relay
        .set_input("I", source)
        .map_err(|e| entity_failure(sink, e, load.location.clone()))?;
    placement.cross_connections.push(xconn);
    let relayed = device
        .output_of(xconn, "O")
        .ok_or_else(|| InternalError::new("cross-connection without an output"))?;
    relays.insert((driver, matrix), relayed);
    Ok(relayed)
}

fn collect_cells(
    module: &Module,
    device: &Device,
    placement: &Placement,
    drivers: &mut Drivers,
    loads: &mut Vec<Load>,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    for cell in module.cells.values() {
        let id = placement
            .entity_of(&cell.name)
            .ok_or_else(|| InternalError::new(format!("cell `{}` was never placed", cell.name)))?;
        let entity = device
            .entity(id)
            .ok_or_else(|| InternalError::vanished(format!("entity {id}")))?;
        for (port, bits) in &cell.connections {
            for (i, bit) in bits.iter().enumerate() {
                let label = format!("`{}.{port}[{i}]`", cell.name);
                match entity.cell_port_role(&cell.cell_type, port, i) {
                    PortRole::Pad => {}
                    PortRole::Unknown => {
                        return Err(structural(
                            sink,
                            codes::E102,
                            format!("{} has no port {port}[{i}]", cell.cell_type),
                            Location::Cell(cell.name.clone()),
                        ));
                    }
                    PortRole::Output(name) => {
                        let Some(net) = bit.net() else { continue };
                        let source = device.output_of(id, name).ok_or_else(|| {
                            InternalError::new(format!("{} has no output {name}", cell.name))
                        })?;
                        drivers.entry(net).or_default().push((source, label));
                    }
                    PortRole::Input(name) => loads.push(Load {
                        bit: *bit,
                        entity: id,
                        port: name,
                        label,
                        location: Location::Cell(cell.name.clone()),
                    }),
                }
            }
        }
    }
    Ok(())
}

/// Top-level port bits placed on their own IOB: inputs drive their net,
/// outputs load it and get their output driver enabled.
fn collect_ports(
    module: &Module,
    device: &mut Device,
    placement: &Placement,
    drivers: &mut Drivers,
    loads: &mut Vec<Load>,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    for ((name, bit), id) in &placement.ports {
        let Some(port) = module.ports.get(name) else {
            continue;
        };
        let Some(value) = port.bits.get(*bit).copied() else {
            continue;
        };
        let label = format!("port `{name}[{bit}]`");
        match port.direction {
            PortDirection::Input => {
                let Some(net) = value.net() else { continue };
                let source = device
                    .output_of(*id, "IN")
                    .ok_or_else(|| InternalError::new(format!("{label} has no pad input")))?;
                drivers.entry(net).or_default().push((source, label));
            }
            PortDirection::Output => {
                let iob = device
                    .entity_mut(*id)
                    .ok_or_else(|| InternalError::vanished(format!("entity {id}")))?;
                let location = Location::Port(format!("{name}[{bit}]"));
                iob.set_input("OE", EntityOutput::VDD)
                    .map_err(|e| entity_failure(sink, e, location.clone()))?;
                loads.push(Load {
                    bit: value,
                    entity: *id,
                    port: "OUT",
                    label,
                    location,
                });
            }
            PortDirection::Inout => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::bind_cells;
    use crate::iob::place_iobs;
    use gpar_device::Part;
    use gpar_netlist::load_netlist_str;

    fn routed(json: &str) -> (Result<Placement, PnrError>, Device, DiagnosticSink) {
        let netlist = load_netlist_str(json, "top").unwrap();
        let module = netlist.top_module();
        let mut device = Device::new(Part::Slg46620);
        let sink = DiagnosticSink::new();
        let mut placement = Placement::default();
        let result = place_iobs(module, &device, &mut placement, &sink)
            .and_then(|()| bind_cells(module, &device, &mut placement, &sink))
            .and_then(|()| route(module, &mut device, &mut placement, &sink))
            .map(|()| placement);
        (result, device, sink)
    }

    #[test]
    fn lut_drives_output_port() {
        let json = r#"{"modules": {"top": {
            "ports": {
                "a": {"direction": "input", "bits": [2]},
                "y": {"direction": "output", "bits": [3]}
            },
            "cells": {
                "inv": {"type": "GP_2LUT", "parameters": {"INIT": "0001"},
                        "connections": {"IN0": [2], "IN1": ["0"], "OUT": [3]}}
            }
        }}}"#;
        let (placement, device, _) = routed(json);
        let placement = placement.unwrap();
        let a = placement.ports[&("a".to_string(), 0)];
        let y = placement.ports[&("y".to_string(), 0)];
        let lut = placement.entity_of("inv").unwrap();

        let lut_entity = device.entity(lut).unwrap();
        assert_eq!(lut_entity.get_input("IN0"), device.output_of(a, "IN"));
        assert_eq!(lut_entity.get_input("IN1"), Some(EntityOutput::GROUND));
        let pad = device.entity(y).unwrap();
        assert_eq!(pad.get_input("OUT"), device.output_of(lut, "OUT"));
        assert_eq!(pad.get_input("OE"), Some(EntityOutput::VDD));
        assert!(placement.cross_connections.is_empty());
    }

    #[test]
    fn multiple_drivers_rejected() {
        let json = r#"{"modules": {"top": {
            "ports": {"y": {"direction": "output", "bits": [3]}},
            "cells": {
                "hi": {"type": "GP_VDD", "connections": {"OUT": [3]}},
                "lo": {"type": "GP_VSS", "connections": {"OUT": [3]}}
            },
            "netnames": {"y": {"bits": [3]}}
        }}}"#;
        let (result, _, sink) = routed(json);
        assert!(matches!(result, Err(PnrError::Structural { .. })));
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.code, codes::E103);
        assert!(diag.message.contains("`y`"));
    }

    #[test]
    fn undriven_load_rejected() {
        let json = r#"{"modules": {"top": {
            "ports": {"y": {"direction": "output", "bits": [3]}},
            "cells": {
                "buf": {"type": "GP_2LUT", "parameters": {"INIT": "1010"},
                        "connections": {"IN0": [7], "OUT": [3]}}
            }
        }}}"#;
        let (result, _, sink) = routed(json);
        assert!(result.is_err());
        assert_eq!(sink.diagnostics()[0].code, codes::E104);
    }

    #[test]
    fn unknown_cell_port_rejected() {
        let json = r#"{"modules": {"top": {
            "cells": {
                "lut": {"type": "GP_2LUT", "connections": {"IN7": ["1"]}}
            }
        }}}"#;
        let (result, _, sink) = routed(json);
        assert!(result.is_err());
        assert_eq!(sink.diagnostics()[0].code, codes::E102);
    }

    #[test]
    fn output_enable_failure_is_reported_at_the_port() {
        let json = r#"{"modules": {"top": {
            "ports": {"y": {"direction": "output", "bits": [3]}}
        }}}"#;
        let netlist = load_netlist_str(json, "top").unwrap();
        let mut device = Device::new(Part::Slg46620);
        let sink = DiagnosticSink::new();
        let mut placement = Placement::default();
        // A LUT has no OE input.
        let lut = device.directory().find(EntityKind::Lut, 0).unwrap();
        placement.ports.insert(("y".to_string(), 0), lut);
        let mut drivers = Drivers::new();
        let mut loads = Vec::new();
        let err = collect_ports(
            netlist.top_module(),
            &mut device,
            &placement,
            &mut drivers,
            &mut loads,
            &sink,
        )
        .unwrap_err();
        assert_eq!(err.code(), codes::E102);
        assert!(loads.is_empty());
        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.code, codes::E102);
        assert_eq!(diag.location, Location::Port("y[0]".into()));
        assert!(diag.message.contains("OE"));
    }

    #[test]
    fn cross_matrix_load_shares_one_relay() {
        // Pin 2 sits in matrix 0; LUT3_4 and LUT3_5 sit in matrix 1.
        let json = r#"{"modules": {"top": {
            "ports": {"a": {"direction": "input", "bits": [2]}},
            "cells": {
                "u1": {"type": "GP_3LUT", "parameters": {"LOC": "LUT3_4 "},
                       "connections": {"IN0": [2]}},
                "u2": {"type": "GP_3LUT", "parameters": {"LOC": "LUT3_5 "},
                       "connections": {"IN0": [2], "IN1": [2]}}
            }
        }}}"#;
        let (placement, device, _) = routed(json);
        let placement = placement.unwrap();
        assert_eq!(placement.cross_connections.len(), 1);
        let xconn = placement.cross_connections[0];
        let relay = device.entity(xconn).unwrap();
        let pad = placement.ports[&("a".to_string(), 0)];
        assert_eq!(relay.get_input("I"), device.output_of(pad, "IN"));
        for cell in ["u1", "u2"] {
            let lut = device.entity(placement.entity_of(cell).unwrap()).unwrap();
            assert_eq!(lut.location().matrix, 1);
            assert_eq!(lut.get_input("IN0"), device.output_of(xconn, "O"));
        }
    }
}
