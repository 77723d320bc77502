//! JSON netlist loading and net derivation.

use crate::error::NetlistError;
use crate::ids::NetId;
use crate::model::{
    BitRef, Cell, Module, ModulePort, ModulePortRef, Net, Netlist, NodePort, PortDirection,
};
use crate::param::ParamValue;
use crate::raw::{RawBit, RawCell, RawModule, RawNetlist};
use gpar_common::Logic;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Reads and loads a netlist file, resolving `top` as the top module.
pub fn load_netlist(path: &Path, top: &str) -> Result<Netlist, NetlistError> {
    let text = std::fs::read_to_string(path).map_err(|source| NetlistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_netlist_str(&text, top)
}

/// Loads a netlist from JSON text, resolving `top` as the top module.
///
/// Unknown keys are ignored. Missing `modules`, cell `type`/`connections`,
/// or port `direction`/`bits` are structural errors.
pub fn load_netlist_str(text: &str, top: &str) -> Result<Netlist, NetlistError> {
    let raw: RawNetlist = serde_json::from_str(text)?;
    if raw.modules.is_empty() {
        return Err(NetlistError::NoModules);
    }
    if !raw.modules.contains_key(top) {
        return Err(NetlistError::UnknownTop(top.to_string()));
    }

    let mut modules = BTreeMap::new();
    for (name, raw_module) in &raw.modules {
        modules.insert(name.clone(), build_module(name, raw_module)?);
    }
    Ok(Netlist::new(raw.creator, modules, top.to_string()))
}

fn build_module(name: &str, raw: &RawModule) -> Result<Module, NetlistError> {
    let context = format!("module '{name}'");
    let mut module = Module {
        name: name.to_string(),
        attributes: convert_params(&context, &raw.attributes)?,
        ports: BTreeMap::new(),
        cells: BTreeMap::new(),
        nets: BTreeMap::new(),
    };

    for (port_name, raw_port) in &raw.ports {
        let context = format!("port '{port_name}' of module '{name}'");
        let direction = parse_direction(&context, &raw_port.direction)?;
        let bits = convert_bits(&context, &raw_port.bits)?;
        for (bit, b) in bits.iter().enumerate() {
            if let BitRef::Net(id) = b {
                net_entry(&mut module.nets, *id).module_ports.push(ModulePortRef {
                    port: port_name.clone(),
                    bit,
                });
            }
        }
        module.ports.insert(
            port_name.clone(),
            ModulePort {
                name: port_name.clone(),
                direction,
                bits,
            },
        );
    }

    for (cell_name, raw_cell) in &raw.cells {
        let cell = build_cell(cell_name, raw_cell)?;
        for (port, bits) in &cell.connections {
            for (bit, b) in bits.iter().enumerate() {
                if let BitRef::Net(id) = b {
                    net_entry(&mut module.nets, *id).node_ports.push(NodePort {
                        cell: cell_name.clone(),
                        port: port.clone(),
                        bit,
                    });
                }
            }
        }
        module.cells.insert(cell_name.clone(), cell);
    }

    for (net_name, raw_net) in &raw.netnames {
        let context = format!("net '{net_name}'");
        let bits = convert_bits(&context, &raw_net.bits)?;
        let attributes = convert_params(&context, &raw_net.attributes)?;
        let multi = bits.len() > 1;
        for (i, b) in bits.iter().enumerate() {
            let BitRef::Net(id) = b else { continue };
            let net = net_entry(&mut module.nets, *id);
            if multi {
                net.names.push(format!("{net_name}[{i}]"));
            } else {
                net.names.push(net_name.clone());
            }
            for (k, v) in &attributes {
                net.attributes.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
    }

    Ok(module)
}

fn build_cell(name: &str, raw: &RawCell) -> Result<Cell, NetlistError> {
    let context = format!("cell '{name}'");
    let mut port_directions = BTreeMap::new();
    for (port, dir) in &raw.port_directions {
        let port_context = format!("port '{port}' of cell '{name}'");
        port_directions.insert(port.clone(), parse_direction(&port_context, dir)?);
    }
    let mut connections = BTreeMap::new();
    for (port, bits) in &raw.connections {
        let port_context = format!("port '{port}' of cell '{name}'");
        connections.insert(port.clone(), convert_bits(&port_context, bits)?);
    }
    Ok(Cell {
        name: name.to_string(),
        cell_type: raw.cell_type.clone(),
        parameters: convert_params(&context, &raw.parameters)?,
        attributes: convert_params(&context, &raw.attributes)?,
        port_directions,
        connections,
    })
}

fn net_entry(nets: &mut BTreeMap<NetId, Net>, id: NetId) -> &mut Net {
    nets.entry(id).or_insert_with(|| Net {
        id,
        names: Vec::new(),
        attributes: BTreeMap::new(),
        node_ports: Vec::new(),
        module_ports: Vec::new(),
    })
}

fn parse_direction(context: &str, direction: &str) -> Result<PortDirection, NetlistError> {
    PortDirection::parse(direction).ok_or_else(|| NetlistError::UnknownDirection {
        context: context.to_string(),
        direction: direction.to_string(),
    })
}

fn convert_bits(context: &str, bits: &[RawBit]) -> Result<Vec<BitRef>, NetlistError> {
    bits.iter()
        .map(|bit| match bit {
            RawBit::Net(n) if *n < 2 => Err(NetlistError::ReservedNet {
                context: context.to_string(),
                net: *n,
            }),
            RawBit::Net(n) => Ok(BitRef::Net(NetId::from_raw(*n))),
            RawBit::Const(s) => s
                .parse::<Logic>()
                .map(BitRef::Const)
                .map_err(|_| NetlistError::InvalidBit {
                    context: context.to_string(),
                    value: s.clone(),
                }),
        })
        .collect()
}

fn convert_params(
    context: &str,
    params: &BTreeMap<String, Value>,
) -> Result<BTreeMap<String, ParamValue>, NetlistError> {
    params
        .iter()
        .map(|(name, value)| {
            ParamValue::from_json(value)
                .map(|v| (name.clone(), v))
                .ok_or_else(|| NetlistError::InvalidParameter {
                    context: context.to_string(),
                    name: name.clone(),
                })
        })
        .collect()
}
