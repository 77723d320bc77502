//! Turning diagnostics into terminal text.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::fmt::Write;

/// Formats one diagnostic for display.
pub trait DiagnosticRenderer {
    /// Renders `diag`, newline-terminated.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// rustc-style output:
///
/// ```text
/// error[E301]: DAC inputs come from more than one source
///   --> cell `dac0`
///    = note: DIN[0] from LUT2_0, DIN[1] from LUT2_1
/// ```
pub struct TerminalRenderer {
    /// Emit ANSI colors on the `severity[code]` tag.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn ansi(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
            Severity::Info => "1;36",
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let tag = format!("{}[{}]", diag.severity, diag.code);
        let mut out = if self.color {
            format!("\x1b[{}m{tag}\x1b[0m", Self::ansi(diag.severity))
        } else {
            tag
        };
        // Writing into a String cannot fail.
        let _ = writeln!(out, ": {}", diag.message);
        if !diag.location.is_none() {
            let _ = writeln!(out, "  --> {}", diag.location);
        }
        let notes = diag.notes.iter().map(|n| ("note", n));
        for (label, line) in notes.chain(diag.help.iter().map(|h| ("help", h))) {
            let _ = writeln!(out, "   = {label}: {line}");
        }
        out
    }
}
