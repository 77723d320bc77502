//! Parsing and validation of `gpar.toml` project configuration files.
//!
//! This crate reads the project configuration file and produces a strongly-typed
//! [`ProjectConfig`], then resolves its target section into a [`ResolvedTarget`]
//! with the part name checked against the supported parts.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_target, ResolvedTarget};
pub use types::*;
