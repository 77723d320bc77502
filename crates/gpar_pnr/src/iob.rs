//! Pin placement.
//!
//! Every pad buffer cell, and every top-level port bit that no buffer cell
//! claims, needs an IOB. Pads with a `LOC` of the form `P<n>` (on the cell,
//! or on the net attached to the pad) get that pin; the rest take the
//! lowest free pins in ascending order.

use crate::bind::is_io_buffer;
use crate::codes;
use crate::error::{binding, structural, PnrError};
use crate::placement::Placement;
use gpar_device::{BitstreamEntity, Device, EntityKind, PortRole};
use gpar_diagnostics::{DiagnosticSink, Location};
use gpar_netlist::{BitRef, Cell, Module, NetId, ParamValue, PortDirection};
use std::collections::{BTreeMap, BTreeSet};

/// Who needs a pin.
#[derive(Clone, Debug, PartialEq, Eq)]
enum PadOwner {
    Cell(String),
    Port(String, usize),
}

#[derive(Debug)]
struct PadRequest {
    owner: PadOwner,
    pin: Option<u32>,
}

impl PadRequest {
    fn location(&self) -> Location {
        match &self.owner {
            PadOwner::Cell(name) => Location::Cell(name.clone()),
            PadOwner::Port(name, bit) => Location::Port(format!("{name}[{bit}]")),
        }
    }

    fn label(&self) -> String {
        match &self.owner {
            PadOwner::Cell(name) => format!("cell `{name}`"),
            PadOwner::Port(name, bit) => format!("port `{name}[{bit}]`"),
        }
    }
}

/// The net on the pad side of a buffer cell, if connected.
pub fn pad_net(device: &Device, cell: &Cell) -> Option<NetId> {
    let iob = device.iob(0)?;
    cell.connections.iter().find_map(|(port, bits)| {
        (iob.cell_port_role(&cell.cell_type, port, 0) == PortRole::Pad)
            .then(|| bits.first().and_then(|b| b.net()))
            .flatten()
    })
}

/// Places every pad of `module` on an IOB.
pub fn place_iobs(
    module: &Module,
    device: &Device,
    placement: &mut Placement,
    sink: &DiagnosticSink,
) -> Result<(), PnrError> {
    let mut requests = Vec::new();
    let mut claimed_nets = BTreeSet::new();

    for cell in module.cells.values().filter(|c| is_io_buffer(&c.cell_type)) {
        let net = pad_net(device, cell);
        claimed_nets.extend(net);
        let net_loc = net
            .and_then(|id| module.net(id))
            .and_then(|n| n.attributes.get("LOC"));
        let owner = PadOwner::Cell(cell.name.clone());
        let pin = parse_pin(cell.param("LOC").or(net_loc), &owner, sink)?;
        requests.push(PadRequest { owner, pin });
    }

    for port in module.ports.values() {
        for (bit, b) in port.bits.iter().enumerate() {
            let net = b.net();
            if net.is_some_and(|id| claimed_nets.contains(&id)) {
                continue;
            }
            let owner = PadOwner::Port(port.name.clone(), bit);
            if port.direction == PortDirection::Inout {
                return Err(structural(
                    sink,
                    codes::E105,
                    format!("inout port `{}` needs a GP_IOBUF cell", port.name),
                    Location::Port(port.name.clone()),
                ));
            }
            let loc = net
                .and_then(|id| module.net(id))
                .and_then(|n| n.attributes.get("LOC"));
            let pin = parse_pin(loc, &owner, sink)?;
            requests.push(PadRequest { owner, pin });
        }
    }

    let mut by_pin: BTreeMap<u32, String> = BTreeMap::new();
    let (explicit, free): (Vec<PadRequest>, Vec<PadRequest>) =
        requests.into_iter().partition(|r| r.pin.is_some());

    for request in explicit {
        let Some(pin) = request.pin else { continue };
        let id = device.iob_id_for_pin(pin).ok_or_else(|| {
            let reason = if pin == 0 || pin > device.layout().pin_count {
                format!("outside the {}-pin package", device.layout().pin_count)
            } else {
                "a power pin".to_string()
            };
            binding(
                sink,
                codes::E205,
                format!("pin {pin} requested by {} is {reason}", request.label()),
                request.location(),
                Some(format!("I/O pins of {}: {}", device.part(), io_pins(device))),
            )
        })?;
        if let Some(first) = by_pin.get(&pin) {
            return Err(binding(
                sink,
                codes::E206,
                format!("pin {pin} is requested more than once"),
                request.location(),
                Some(format!("already taken by {first}")),
            ));
        }
        by_pin.insert(pin, request.label());
        assign(placement, request.owner, id);
    }

    for request in free {
        let id = device
            .directory()
            .family(EntityKind::Iob)
            .find(|id| !placement.is_claimed(*id))
            .ok_or_else(|| {
                binding(
                    sink,
                    codes::E204,
                    format!("no free I/O pin left for {}", request.label()),
                    request.location(),
                    None,
                )
            })?;
        assign(placement, request.owner, id);
    }
    Ok(())
}

fn assign(placement: &mut Placement, owner: PadOwner, id: gpar_device::EntityId) {
    match owner {
        PadOwner::Cell(name) => {
            placement.cells.insert(name, id);
        }
        PadOwner::Port(name, bit) => {
            placement.ports.insert((name, bit), id);
        }
    }
}

/// Reads a pin constraint: `P<n>` or a bare number.
fn parse_pin(
    loc: Option<&ParamValue>,
    owner: &PadOwner,
    sink: &DiagnosticSink,
) -> Result<Option<u32>, PnrError> {
    let Some(loc) = loc else { return Ok(None) };
    let text = loc.to_string();
    let digits = text
        .strip_prefix('P')
        .or_else(|| text.strip_prefix('p'))
        .unwrap_or(&text);
    match digits.parse::<u32>() {
        Ok(pin) => Ok(Some(pin)),
        Err(_) => {
            let request = PadRequest {
                owner: owner.clone(),
                pin: None,
            };
            Err(binding(
                sink,
                codes::E205,
                format!("LOC {text} on {} is not a pin name", request.label()),
                request.location(),
                Some("pin constraints look like P3".to_string()),
            ))
        }
    }
}

fn io_pins(device: &Device) -> String {
    device
        .layout()
        .iobs
        .iter()
        .map(|s| s.pin.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
