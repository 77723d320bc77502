//! Reading `gpar.toml` and checking the fields a build needs.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// File name looked up in a project directory.
pub const CONFIG_FILE: &str = "gpar.toml";

/// Reads `<project_dir>/gpar.toml`.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses configuration text. The netlist and top module are required; a
/// part may come from the command line instead.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = toml::from_str(content)?;
    check_required(&config)?;
    Ok(config)
}

fn check_required(config: &ProjectConfig) -> Result<(), ConfigError> {
    let project = &config.project;
    for (field, value) in [("project.netlist", &project.netlist), ("project.top", &project.top)] {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(field));
        }
    }
    if config.output.path.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(ConfigError::Invalid {
            field: "output.path",
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
