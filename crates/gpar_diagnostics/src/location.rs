//! Design-object locations attached to diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where in the design or device a diagnostic applies.
///
/// Netlists carry no source text, so diagnostics point at named objects
/// instead of byte spans.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Location {
    /// No particular object.
    #[default]
    None,
    /// A netlist cell, by instance name.
    Cell(String),
    /// A netlist net, by name.
    Net(String),
    /// A module port, by name.
    Port(String),
    /// A device entity, by description (e.g. `LUT3_2`).
    Entity(String),
    /// A file on disk.
    File(String),
}

impl Location {
    /// Returns `true` if this location points at nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, Location::None)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::None => Ok(()),
            Location::Cell(name) => write!(f, "cell `{name}`"),
            Location::Net(name) => write!(f, "net `{name}`"),
            Location::Port(name) => write!(f, "port `{name}`"),
            Location::Entity(name) => write!(f, "entity {name}"),
            Location::File(path) => write!(f, "{path}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Location::Cell("dac0".into()).to_string(), "cell `dac0`");
        assert_eq!(Location::Entity("LUT3_2".into()).to_string(), "entity LUT3_2");
        assert_eq!(Location::None.to_string(), "");
    }

    #[test]
    fn default_is_none() {
        assert!(Location::default().is_none());
        assert!(!Location::Net("clk".into()).is_none());
    }
}
