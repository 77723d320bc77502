//! One reported problem or progress message.

use crate::code::DiagnosticCode;
use crate::location::Location;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A message about the design, pinned to the netlist or device object it
/// concerns. Serializes as-is for `--report-format json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// How bad it is.
    pub severity: Severity,
    /// Stable code, e.g. `E206`.
    pub code: DiagnosticCode,
    /// One-line summary.
    pub message: String,
    /// The cell, net, port, entity or file concerned.
    pub location: Location,
    /// Context lines, rendered as `= note:`.
    pub notes: Vec<String>,
    /// Suggested fixes, rendered as `= help:`.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// An error: the compile stops.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Error, code, message, location)
    }

    /// A warning: reported, the compile goes on.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Warning, code, message, location)
    }

    /// Progress, shown with `--verbose`.
    pub fn info(code: DiagnosticCode, message: impl Into<String>, location: Location) -> Self {
        Self::new(Severity::Info, code, message, location)
    }

    /// Appends a note line.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Appends a help line.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn constructors_set_severity() {
        let code = DiagnosticCode::new(Category::Error, 301);
        let at = || Location::Cell("dac".into());
        assert!(Diagnostic::error(code, "mixed DIN sources", at()).severity.is_error());
        assert_eq!(Diagnostic::warning(code, "w", at()).severity, Severity::Warning);
        assert_eq!(Diagnostic::info(code, "i", at()).severity, Severity::Info);
    }

    #[test]
    fn notes_and_help_keep_order() {
        let code = DiagnosticCode::new(Category::Error, 205);
        let diag = Diagnostic::error(code, "P1 is a power pin", Location::Cell("led".into()))
            .with_note("I/O pins: 2, 3, 4")
            .with_note("pin 1 is VDD")
            .with_help("pick an I/O pin or drop LOC");
        assert_eq!(diag.notes, ["I/O pins: 2, 3, 4", "pin 1 is VDD"]);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn json_report_shape() {
        let code = DiagnosticCode::new(Category::Warning, 501);
        let at = Location::Entity("LUT2_0".into());
        let diag = Diagnostic::warning(code, "unknown parameter FOO", at);
        let json: serde_json::Value = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["severity"], "Warning");
        assert_eq!(json["location"]["Entity"], "LUT2_0");
        assert_eq!(json["code"]["number"], 501);
    }
}
