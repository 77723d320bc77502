//! `gpar build`: netlist in, bitstream file out.
//!
//! 1. Find `gpar.toml` (optional) and merge it with the command line
//! 2. Load the JSON netlist
//! 3. Place, route and save the bitstream
//! 4. Write the bitstream file

use std::path::{Path, PathBuf};

use gpar_config::ProjectConfig;
use gpar_device::{Part, TextFormat};
use gpar_diagnostics::{Diagnostic, DiagnosticSink, Location};
use gpar_pnr::{codes, compile, PnrOptions};

use crate::pipeline::{load_project, render_diagnostics, status};
use crate::{BuildArgs, GlobalArgs};

/// Everything a build needs, after merging flags over `gpar.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// The JSON netlist.
    pub netlist: PathBuf,
    /// Top module name.
    pub top: String,
    /// Target part.
    pub part: Part,
    /// Device-wide settings.
    pub options: PnrOptions,
    /// Output bitstream path.
    pub output: PathBuf,
    /// Output text form.
    pub format: TextFormat,
}

/// Runs the `gpar build` command. Returns exit code 0 on success, 1 on a
/// design error.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let settings = resolve_settings(args, project.as_ref().map(|(dir, c)| (dir.as_path(), c)))?;

    status(global, "Loading", settings.netlist.display());
    let sink = DiagnosticSink::new();
    let netlist = match gpar_netlist::load_netlist(&settings.netlist, &settings.top) {
        Ok(netlist) => netlist,
        Err(err) => {
            sink.emit(Diagnostic::error(
                codes::E101,
                err.to_string(),
                Location::File(settings.netlist.display().to_string()),
            ));
            render_diagnostics(&sink.take_all(), global, args.report_format);
            return Ok(1);
        }
    };

    status(global, "Placing", format!("`{}` on {}", settings.top, settings.part));
    let compiled = match compile(&netlist, settings.part, &settings.options, &sink) {
        Ok(compiled) => compiled,
        Err(_) => {
            let errors = render_diagnostics(&sink.take_all(), global, args.report_format);
            status(global, "Failed", format!("{errors} error(s)"));
            return Ok(1);
        }
    };

    if global.verbose && !global.quiet {
        for usage in compiled.placement.utilization(&compiled.device) {
            let line = format!("{:<8} {:>3}/{}", usage.kind.name(), usage.used, usage.total);
            status(global, "Used", line);
        }
    }

    let bits = compiled
        .device
        .write_to_file(&settings.output, settings.format, &sink)?;
    render_diagnostics(&sink.take_all(), global, args.report_format);
    status(
        global,
        "Wrote",
        format!(
            "{} ({} bits, {} set)",
            settings.output.display(),
            bits.len(),
            bits.count_ones()
        ),
    );
    Ok(0)
}

/// Merges command-line flags over the project configuration.
///
/// Paths from `gpar.toml` are relative to the directory holding it; paths
/// from the command line are taken as given.
pub fn resolve_settings(
    args: &BuildArgs,
    project: Option<(&Path, &ProjectConfig)>,
) -> Result<BuildSettings, Box<dyn std::error::Error>> {
    let netlist = match (&args.netlist, project) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some((dir, config))) => dir.join(&config.project.netlist),
        (None, None) => return Err("no netlist given and no gpar.toml found".into()),
    };
    let top = args
        .top
        .clone()
        .or_else(|| project.map(|(_, c)| c.project.top.clone()))
        .ok_or("no top module given; pass --top or set project.top")?;

    let (part, mut options, mut output, mut format) = match project {
        Some((dir, config)) => {
            let target = gpar_config::resolve_target(config, args.part.as_deref())?;
            let options = PnrOptions {
                pattern_id: target.pattern_id,
                read_protect: target.read_protect,
            };
            (target.part, options, target.output.map(|p| dir.join(p)), target.format)
        }
        None => {
            let name = args.part.as_deref().ok_or("no part given; pass --part")?;
            let part: Part = name.parse()?;
            (part, PnrOptions::default(), None, TextFormat::default())
        }
    };

    if let Some(id) = args.pattern_id {
        options.pattern_id = id;
    }
    options.read_protect |= args.read_protect;
    if let Some(path) = &args.output {
        output = Some(PathBuf::from(path));
    }
    if let Some(f) = args.format {
        format = f.into();
    }

    Ok(BuildSettings {
        output: output.unwrap_or_else(|| netlist.with_extension("txt")),
        netlist,
        top,
        part,
        options,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CliFormat, ReportFormat};
    use gpar_config::load_config_from_str;

    fn args() -> BuildArgs {
        BuildArgs {
            netlist: None,
            top: None,
            part: None,
            output: None,
            format: None,
            pattern_id: None,
            read_protect: false,
            report_format: ReportFormat::Text,
        }
    }

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    const CONFIG: &str = r#"
[project]
netlist = "build/top.json"
top = "Blinky"

[target]
part = "SLG46620"
pattern_id = 5

[output]
path = "build/top.bits"
format = "bits"
"#;

    #[test]
    fn settings_from_config() {
        let config = load_config_from_str(CONFIG).unwrap();
        let dir = Path::new("/work/blinky");
        let settings = resolve_settings(&args(), Some((dir, &config))).unwrap();
        assert_eq!(settings.netlist, dir.join("build/top.json"));
        assert_eq!(settings.top, "Blinky");
        assert_eq!(settings.part, Part::Slg46620);
        assert_eq!(settings.options.pattern_id, 5);
        assert!(!settings.options.read_protect);
        assert_eq!(settings.output, dir.join("build/top.bits"));
        assert_eq!(settings.format, TextFormat::Bits);
    }

    #[test]
    fn flags_override_config() {
        let config = load_config_from_str(CONFIG).unwrap();
        let mut a = args();
        a.part = Some("SLG46140".into());
        a.pattern_id = Some(9);
        a.read_protect = true;
        a.output = Some("out.txt".into());
        a.format = Some(CliFormat::Indexed);
        let settings = resolve_settings(&a, Some((Path::new("/p"), &config))).unwrap();
        assert_eq!(settings.part, Part::Slg46140);
        assert_eq!(settings.options.pattern_id, 9);
        assert!(settings.options.read_protect);
        assert_eq!(settings.output, PathBuf::from("out.txt"));
        assert_eq!(settings.format, TextFormat::Indexed);
    }

    #[test]
    fn flags_alone_suffice() {
        let mut a = args();
        a.netlist = Some("design/top.json".into());
        a.top = Some("top".into());
        a.part = Some("SLG46620V".into());
        let settings = resolve_settings(&a, None).unwrap();
        assert_eq!(settings.output, PathBuf::from("design/top.txt"));
        assert_eq!(settings.format, TextFormat::Indexed);
        assert_eq!(settings.options, PnrOptions::default());
    }

    #[test]
    fn missing_pieces_are_errors() {
        assert!(resolve_settings(&args(), None).is_err());

        let mut a = args();
        a.netlist = Some("top.json".into());
        assert!(resolve_settings(&a, None).is_err());

        a.top = Some("top".into());
        assert!(resolve_settings(&a, None).is_err());

        a.part = Some("XC7A35T".into());
        let err = resolve_settings(&a, None).unwrap_err();
        assert!(err.to_string().contains("XC7A35T"));
    }

    const NETLIST: &str = r#"{"modules": {"top": {
        "ports": {"led": {"direction": "output", "bits": [2]}},
        "cells": {"vdd": {"type": "GP_VDD", "connections": {"OUT": [2]}}},
        "netnames": {"led": {"bits": [2], "attributes": {"LOC": "P4 "}}}
    }}}"#;

    #[test]
    fn build_then_decode() {
        let dir = tempfile::tempdir().unwrap();
        let netlist = dir.path().join("top.json");
        std::fs::write(&netlist, NETLIST).unwrap();

        let mut a = args();
        a.netlist = Some(netlist.to_string_lossy().into_owned());
        a.top = Some("top".into());
        a.part = Some("SLG46620".into());
        assert_eq!(run(&a, &quiet()).unwrap(), 0);

        let output = dir.path().join("top.txt");
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("index"));

        let decode = crate::DecodeArgs {
            bitstream: output.to_string_lossy().into_owned(),
            part: "SLG46620".into(),
            all: false,
        };
        assert_eq!(crate::decode::run(&decode, &quiet()).unwrap(), 0);
    }

    #[test]
    fn design_errors_exit_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let netlist = dir.path().join("top.json");
        std::fs::write(&netlist, NETLIST.replace("P4 ", "P1 ")).unwrap();

        let mut a = args();
        a.netlist = Some(netlist.to_string_lossy().into_owned());
        a.top = Some("top".into());
        a.part = Some("SLG46620".into());
        assert_eq!(run(&a, &quiet()).unwrap(), 1);
        assert!(!dir.path().join("top.txt").exists());
    }

    #[test]
    fn unreadable_netlist_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args();
        a.netlist = Some(dir.path().join("missing.json").to_string_lossy().into_owned());
        a.top = Some("top".into());
        a.part = Some("SLG46620".into());
        assert_eq!(run(&a, &quiet()).unwrap(), 1);
    }
}
