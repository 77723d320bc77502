//! Error types for netlist loading.

use std::path::PathBuf;

/// Structural problems found while reading a netlist.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The netlist file could not be read.
    #[error("failed to read netlist {}: {source}", path.display())]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or is missing a required key.
    #[error("malformed netlist: {0}")]
    Json(#[from] serde_json::Error),

    /// The `modules` map is empty.
    #[error("netlist contains no modules")]
    NoModules,

    /// The requested top module is not defined.
    #[error("top module '{0}' not found in netlist")]
    UnknownTop(String),

    /// A port or cell connection names a direction other than input/output/inout.
    #[error("{context} has unknown direction '{direction}'")]
    UnknownDirection {
        /// The port, e.g. `port 'led' of module 'top'`.
        context: String,
        /// The offending direction string.
        direction: String,
    },

    /// A bit vector holds a string that is not `0`, `1`, `x` or `z`.
    #[error("{context} has invalid bit '{value}'")]
    InvalidBit {
        /// The port or net carrying the bit.
        context: String,
        /// The offending value.
        value: String,
    },

    /// A parameter or attribute is an array, object or null.
    #[error("parameter '{name}' of {context} has an unsupported value")]
    InvalidParameter {
        /// The cell or module carrying the parameter.
        context: String,
        /// The parameter name.
        name: String,
    },

    /// A net number collides with the reserved constant range.
    #[error("{context} references reserved net number {net}")]
    ReservedNet {
        /// The port or net carrying the bit.
        context: String,
        /// The offending number.
        net: u32,
    },
}
