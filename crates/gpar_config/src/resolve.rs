//! Target resolution: turning the `[target]` and `[output]` sections into
//! checked values.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use gpar_device::{Part, TextFormat};
use std::path::PathBuf;

/// A fully resolved build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// The part to build for.
    pub part: Part,
    /// Pattern ID burned into the part.
    pub pattern_id: u8,
    /// Whether configuration read-back is disabled.
    pub read_protect: bool,
    /// Where to write the bitstream, if configured.
    pub output: Option<PathBuf>,
    /// Text form of the written bitstream.
    pub format: TextFormat,
}

/// Resolves the target of `config`.
///
/// `part_override` replaces the configured part name, so a command-line
/// flag can supply a part the file does not name.
pub fn resolve_target(
    config: &ProjectConfig,
    part_override: Option<&str>,
) -> Result<ResolvedTarget, ConfigError> {
    let name = part_override
        .or(config.target.part.as_deref())
        .ok_or(ConfigError::MissingField("target.part"))?;
    let part: Part = name.parse()?;

    Ok(ResolvedTarget {
        part,
        pattern_id: config.target.pattern_id,
        read_protect: config.target.read_protect,
        output: config.output.path.as_ref().map(PathBuf::from),
        format: config.output.format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    fn config(target: &str) -> ProjectConfig {
        let toml = format!("[project]\nnetlist = \"top.json\"\ntop = \"top\"\n\n{target}");
        load_config_from_str(&toml).unwrap()
    }

    #[test]
    fn resolve_configured_part() {
        let cfg = config("[target]\npart = \"slg46140\"\npattern_id = 7\n");
        let target = resolve_target(&cfg, None).unwrap();
        assert_eq!(target.part, Part::Slg46140);
        assert_eq!(target.pattern_id, 7);
        assert!(target.output.is_none());
        assert_eq!(target.format, TextFormat::Indexed);
    }

    #[test]
    fn override_wins() {
        let cfg = config("[target]\npart = \"SLG46140\"\n");
        let target = resolve_target(&cfg, Some("SLG46620")).unwrap();
        assert_eq!(target.part, Part::Slg46620);
    }

    #[test]
    fn missing_part() {
        let err = resolve_target(&config(""), None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("target.part")));
    }

    #[test]
    fn unknown_part() {
        let cfg = config("[target]\npart = \"XC7A35T\"\n");
        let err = resolve_target(&cfg, None).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPart(ref p) if p.0 == "XC7A35T"));
    }

    #[test]
    fn output_settings_carry_over() {
        let cfg = config(
            "[target]\npart = \"SLG46620\"\n\n[output]\npath = \"out.txt\"\nformat = \"bits\"\n",
        );
        let target = resolve_target(&cfg, None).unwrap();
        assert_eq!(target.output, Some(PathBuf::from("out.txt")));
        assert_eq!(target.format, TextFormat::Bits);
    }
}
