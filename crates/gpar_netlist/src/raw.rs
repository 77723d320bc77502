//! Serde mirror of the JSON netlist document.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Deserialize, Debug)]
pub(crate) struct RawNetlist {
    #[serde(default)]
    pub creator: String,
    pub modules: BTreeMap<String, RawModule>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawModule {
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub ports: BTreeMap<String, RawPort>,
    #[serde(default)]
    pub cells: BTreeMap<String, RawCell>,
    #[serde(default)]
    pub netnames: BTreeMap<String, RawNetname>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawPort {
    pub direction: String,
    pub bits: Vec<RawBit>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawCell {
    #[serde(rename = "type")]
    pub cell_type: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub port_directions: BTreeMap<String, String>,
    pub connections: BTreeMap<String, Vec<RawBit>>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawNetname {
    pub bits: Vec<RawBit>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// A bit is either a net number or a constant written as a string.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub(crate) enum RawBit {
    Net(u32),
    Const(String),
}
