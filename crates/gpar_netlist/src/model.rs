//! The in-memory netlist graph.

use crate::ids::NetId;
use crate::param::ParamValue;
use gpar_common::Logic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Direction of a module port or cell port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PortDirection {
    /// Driven from outside.
    Input,
    /// Driven from inside.
    Output,
    /// Bidirectional.
    Inout,
}

impl PortDirection {
    /// Parses the netlist spelling (`input`, `output`, `inout`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "input" => Some(PortDirection::Input),
            "output" => Some(PortDirection::Output),
            "inout" => Some(PortDirection::Inout),
            _ => None,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
            PortDirection::Inout => write!(f, "inout"),
        }
    }
}

/// One bit of a port or connection: a net or a constant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BitRef {
    /// A numbered net.
    Net(NetId),
    /// A constant value.
    Const(Logic),
}

impl BitRef {
    /// Returns the net, if this bit is not a constant.
    pub fn net(self) -> Option<NetId> {
        match self {
            BitRef::Net(id) => Some(id),
            BitRef::Const(_) => None,
        }
    }
}

/// A top-level port of a module.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModulePort {
    /// The port name.
    pub name: String,
    /// The port direction.
    pub direction: PortDirection,
    /// One entry per bit, LSB first.
    pub bits: Vec<BitRef>,
}

/// A cell instance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Instance name.
    pub name: String,
    /// Primitive type, e.g. `GP_4LUT`.
    pub cell_type: String,
    /// Parameters set on the instance.
    pub parameters: BTreeMap<String, ParamValue>,
    /// Attributes set on the instance (`LOC`, `src`, ...).
    pub attributes: BTreeMap<String, ParamValue>,
    /// Declared direction of each port, when the front end wrote one.
    pub port_directions: BTreeMap<String, PortDirection>,
    /// Bits connected to each port, LSB first.
    pub connections: BTreeMap<String, Vec<BitRef>>,
}

impl Cell {
    /// Looks a key up in the parameters, then the attributes.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .get(name)
            .or_else(|| self.attributes.get(name))
    }

    /// Returns the bits connected to `port`, or an empty slice.
    pub fn connection(&self, port: &str) -> &[BitRef] {
        self.connections.get(port).map_or(&[], Vec::as_slice)
    }
}

/// A cell port bit attached to a net.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodePort {
    /// The cell instance name.
    pub cell: String,
    /// The port name on that cell.
    pub port: String,
    /// Bit index within the port.
    pub bit: usize,
}

/// A module port bit attached to a net.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ModulePortRef {
    /// The port name.
    pub port: String,
    /// Bit index within the port.
    pub bit: usize,
}

/// A single-bit net and everything attached to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Net {
    /// The net number.
    pub id: NetId,
    /// Every name this bit carries, in netname order.
    pub names: Vec<String>,
    /// Attributes merged from every netname covering this bit.
    pub attributes: BTreeMap<String, ParamValue>,
    /// Cell ports attached to the net.
    pub node_ports: Vec<NodePort>,
    /// Module ports attached to the net.
    pub module_ports: Vec<ModulePortRef>,
}

impl Net {
    /// A readable name: the first netname, or `$<id>`.
    pub fn display_name(&self) -> String {
        self.names
            .first()
            .cloned()
            .unwrap_or_else(|| format!("${}", self.id))
    }
}

/// A module: ports, cells and the nets derived from them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Module {
    /// The module name.
    pub name: String,
    /// Module attributes.
    pub attributes: BTreeMap<String, ParamValue>,
    /// Top-level ports, by name.
    pub ports: BTreeMap<String, ModulePort>,
    /// Cell instances, by name.
    pub cells: BTreeMap<String, Cell>,
    /// Nets, by number.
    pub nets: BTreeMap<NetId, Net>,
}

impl Module {
    /// Looks up a cell by instance name.
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.cells.get(name)
    }

    /// Looks up a net by number.
    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(&id)
    }

    /// A readable name for a net number, even one with no entry.
    pub fn net_name(&self, id: NetId) -> String {
        self.net(id)
            .map_or_else(|| format!("${id}"), Net::display_name)
    }
}

/// A loaded, read-only netlist with a resolved top module.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Netlist {
    /// The tool that wrote the netlist.
    pub creator: String,
    /// All modules, by name.
    pub modules: BTreeMap<String, Module>,
    top: String,
}

impl Netlist {
    pub(crate) fn new(creator: String, modules: BTreeMap<String, Module>, top: String) -> Self {
        debug_assert!(modules.contains_key(&top));
        Self {
            creator,
            modules,
            top,
        }
    }

    /// The name of the top module.
    pub fn top_name(&self) -> &str {
        &self.top
    }

    /// The top module; its presence is checked when the netlist is loaded.
    pub fn top_module(&self) -> &Module {
        &self.modules[&self.top]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cell() -> Cell {
        let mut cell = Cell {
            name: "lut".into(),
            cell_type: "GP_2LUT".into(),
            parameters: BTreeMap::new(),
            attributes: BTreeMap::new(),
            port_directions: BTreeMap::new(),
            connections: BTreeMap::new(),
        };
        cell.parameters.insert("INIT".into(), ParamValue::Int(6));
        cell.attributes.insert("LOC".into(), ParamValue::Text("LUT2_1".into()));
        cell.connections
            .insert("IN0".into(), vec![BitRef::Net(NetId::from_raw(4))]);
        cell
    }

    #[test]
    fn direction_parse() {
        assert_eq!(PortDirection::parse("inout"), Some(PortDirection::Inout));
        assert_eq!(PortDirection::parse("in"), None);
    }

    #[test]
    fn cell_param_falls_back_to_attributes() {
        let cell = sample_cell();
        assert_eq!(cell.param("INIT"), Some(&ParamValue::Int(6)));
        assert_eq!(cell.param("LOC").and_then(ParamValue::as_str), Some("LUT2_1"));
        assert!(cell.param("NOPE").is_none());
    }

    #[test]
    fn cell_connection_default_empty() {
        let cell = sample_cell();
        assert_eq!(cell.connection("IN0").len(), 1);
        assert!(cell.connection("IN1").is_empty());
    }

    #[test]
    fn net_display_name() {
        let net = Net {
            id: NetId::from_raw(9),
            names: Vec::new(),
            attributes: BTreeMap::new(),
            node_ports: Vec::new(),
            module_ports: Vec::new(),
        };
        assert_eq!(net.display_name(), "$9");
        assert_eq!(BitRef::Net(net.id).net(), Some(net.id));
        assert_eq!(BitRef::Const(Logic::One).net(), None);
    }
}
