//! Errors from reading a project's `gpar.toml`.

use gpar_device::UnknownPart;
use std::path::PathBuf;

/// Why a project configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read, or does not exist.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the schema.
    #[error("malformed gpar.toml: {0}")]
    Parse(#[from] toml::de::Error),

    /// `target.part` (or the `--part` override) names no supported part.
    #[error(transparent)]
    UnknownPart(#[from] UnknownPart),

    /// A field the build cannot do without is absent or empty.
    #[error("`{0}` must be set")]
    MissingField(&'static str),

    /// A field is present but unusable.
    #[error("`{field}` {reason}")]
    Invalid {
        /// Dotted key of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
