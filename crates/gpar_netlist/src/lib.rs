//! Read-only netlist model for technology-mapped designs.
//!
//! The loader accepts the JSON netlist written by the synthesis front end
//! (`modules` → `ports`/`cells`/`netnames`) and builds an immutable
//! [`Netlist`] in which every net knows the cell ports and module ports
//! attached to it. Place-and-route only ever reads this graph.

#![warn(missing_docs)]

pub mod error;
pub mod ids;
pub mod loader;
pub mod model;
pub mod param;
mod raw;

pub use error::NetlistError;
pub use ids::NetId;
pub use loader::{load_netlist, load_netlist_str};
pub use model::{
    BitRef, Cell, Module, ModulePort, ModulePortRef, Net, Netlist, NodePort, PortDirection,
};
pub use param::ParamValue;
