//! Shared helpers for CLI commands: project discovery, status lines and
//! diagnostic rendering.

use std::path::{Path, PathBuf};

use gpar_config::{ProjectConfig, CONFIG_FILE};
use gpar_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};

use crate::{GlobalArgs, ReportFormat};

/// Walks up from `start` looking for the nearest directory containing
/// `gpar.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Loads the project configuration, if there is one.
///
/// With `--config`, the file (or the directory holding it) must exist.
/// Otherwise the current directory and its parents are searched, and no
/// configuration at all is fine.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<Option<(PathBuf, ProjectConfig)>, Box<dyn std::error::Error>> {
    let dir = match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                p.parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            } else {
                p
            }
        }
        None => match find_project_root(&std::env::current_dir()?) {
            Some(dir) => dir,
            None => return Ok(None),
        },
    };
    let config = gpar_config::load_config(&dir)?;
    Ok(Some((dir, config)))
}

/// Prints a cargo-style status line to stderr unless `--quiet` is set.
pub fn status(global: &GlobalArgs, verb: &str, message: impl std::fmt::Display) {
    if !global.quiet {
        eprintln!("{verb:>12} {message}");
    }
}

/// Whether a diagnostic of `severity` should be shown.
fn visible(global: &GlobalArgs, severity: Severity) -> bool {
    match severity {
        Severity::Error => true,
        Severity::Warning => !global.quiet,
        Severity::Info => global.verbose && !global.quiet,
    }
}

/// Renders diagnostics and returns the number of errors among them.
pub fn render_diagnostics(
    diagnostics: &[Diagnostic],
    global: &GlobalArgs,
    format: ReportFormat,
) -> usize {
    let shown: Vec<&Diagnostic> = diagnostics
        .iter()
        .filter(|d| visible(global, d.severity))
        .collect();
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &shown {
                eprint!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&shown).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(quiet: bool, verbose: bool) -> GlobalArgs {
        GlobalArgs {
            quiet,
            verbose,
            color: false,
            config: None,
        }
    }

    #[test]
    fn find_project_root_in_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        assert_eq!(find_project_root(dir.path()), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let nested = dir.path().join("build").join("out");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("empty");
        std::fs::create_dir_all(&nested).unwrap();
        // Only the temp tree is inspected up to its root; nothing there has a config.
        let found = find_project_root(&nested);
        assert!(found.map_or(true, |p| !p.starts_with(dir.path())));
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[project]\nnetlist = \"top.json\"\ntop = \"top\"\n").unwrap();
        let mut args = global(false, false);
        args.config = Some(path.to_string_lossy().into_owned());
        let (root, config) = load_project(&args).unwrap().unwrap();
        assert_eq!(root, dir.path());
        assert_eq!(config.project.top, "top");
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = global(false, false);
        args.config = Some(dir.path().to_string_lossy().into_owned());
        assert!(load_project(&args).is_err());
    }

    #[test]
    fn visibility_follows_flags() {
        assert!(visible(&global(true, false), Severity::Error));
        assert!(!visible(&global(true, true), Severity::Warning));
        assert!(visible(&global(false, false), Severity::Warning));
        assert!(!visible(&global(false, false), Severity::Info));
        assert!(visible(&global(false, true), Severity::Info));
    }
}
