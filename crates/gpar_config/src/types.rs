//! Configuration types deserialized from `gpar.toml`.

use gpar_device::TextFormat;
use serde::Deserialize;

/// The top-level project configuration parsed from `gpar.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Where the netlist lives and which module is the top.
    pub project: ProjectMeta,
    /// The part to build for and its device-wide settings.
    #[serde(default)]
    pub target: TargetConfig,
    /// Where and how to write the bitstream.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Core project settings required in every `gpar.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// An optional project name, used in status messages.
    #[serde(default)]
    pub name: String,
    /// Path to the JSON netlist, relative to the project directory.
    pub netlist: String,
    /// Name of the top module in the netlist.
    pub top: String,
}

/// The device part and its device-wide bits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    /// Part name such as `SLG46620` or `SLG46620V`.
    pub part: Option<String>,
    /// Pattern ID burned into the part.
    #[serde(default)]
    pub pattern_id: u8,
    /// Whether configuration read-back is disabled.
    #[serde(default)]
    pub read_protect: bool,
}

/// Bitstream output settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Output file path, relative to the project directory.
    pub path: Option<String>,
    /// Text form of the written bitstream.
    #[serde(default)]
    pub format: TextFormat,
}
