//! Place-and-route failures.
//!
//! Every failure is also pushed into the [`DiagnosticSink`] as an error
//! diagnostic with a code from [`crate::codes`]; the returned [`PnrError`]
//! tells the caller which stage gave up.

use crate::codes;
use gpar_common::InternalError;
use gpar_device::{DeviceError, EntityError};
use gpar_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Location};

/// Why place-and-route stopped.
#[derive(Debug, thiserror::Error)]
pub enum PnrError {
    /// The netlist is inconsistent (drivers, ports, connections).
    #[error("netlist error: {message}")]
    Structural {
        /// Code of the emitted diagnostic.
        code: DiagnosticCode,
        /// What was wrong.
        message: String,
    },

    /// A cell or pad could not be bound to an entity.
    #[error("placement failed: {message}")]
    Binding {
        /// Code of the emitted diagnostic.
        code: DiagnosticCode,
        /// What was wrong.
        message: String,
    },

    /// An entity rejected its parameters, connections or bits.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// A toolchain invariant was broken.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl From<DeviceError> for PnrError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Entity(e) => PnrError::Entity(e),
            other => PnrError::Internal(InternalError::new(other.to_string())),
        }
    }
}

impl PnrError {
    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            PnrError::Structural { code, .. } | PnrError::Binding { code, .. } => *code,
            PnrError::Entity(e) => entity_code(e),
            PnrError::Internal(_) => codes::E302,
        }
    }
}

fn entity_code(err: &EntityError) -> DiagnosticCode {
    match err {
        EntityError::Drc { .. } => codes::E301,
        EntityError::Unimplemented { .. } => codes::E401,
        EntityError::UnknownPort { .. } => codes::E102,
        EntityError::Encoding { .. } | EntityError::BitOutOfRange { .. } => codes::E302,
    }
}

/// Emits a structural error and returns it.
pub(crate) fn structural(
    sink: &DiagnosticSink,
    code: DiagnosticCode,
    message: impl Into<String>,
    location: Location,
) -> PnrError {
    let message = message.into();
    sink.emit(Diagnostic::error(code, message.clone(), location));
    PnrError::Structural { code, message }
}

/// Emits a binding error and returns it.
pub(crate) fn binding(
    sink: &DiagnosticSink,
    code: DiagnosticCode,
    message: impl Into<String>,
    location: Location,
    note: Option<String>,
) -> PnrError {
    let message = message.into();
    let mut diag = Diagnostic::error(code, message.clone(), location);
    if let Some(note) = note {
        diag = diag.with_note(note);
    }
    sink.emit(diag);
    PnrError::Binding { code, message }
}

/// Emits an entity failure, attributed to `location`, and returns it.
pub(crate) fn entity_failure(
    sink: &DiagnosticSink,
    err: impl Into<PnrError>,
    location: Location,
) -> PnrError {
    let err = err.into();
    let mut diag = Diagnostic::error(err.code(), err.to_string(), location);
    if let PnrError::Entity(EntityError::Unimplemented { part, .. }) = &err {
        diag = diag.with_help(format!("remove the cell or target a part other than {part}"));
    }
    sink.emit(diag);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpar_device::Part;

    #[test]
    fn entity_errors_map_to_codes() {
        let drc: PnrError = EntityError::drc("PGA0", "bad gain").into();
        assert_eq!(drc.code(), codes::E301);
        let unimpl: PnrError = EntityError::Unimplemented {
            entity: "DAC0".into(),
            part: Part::Slg46140,
        }
        .into();
        assert_eq!(unimpl.code(), codes::E401);
    }

    #[test]
    fn helpers_emit_one_error() {
        let sink = DiagnosticSink::new();
        let err = binding(
            &sink,
            codes::E206,
            "pin 3 requested twice",
            Location::Cell("b".into()),
            Some("first requested by `a`".into()),
        );
        assert!(matches!(err, PnrError::Binding { .. }));
        assert_eq!(err.code(), codes::E206);
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::E206);
        assert_eq!(diags[0].notes.len(), 1);

        let err = entity_failure(
            &sink,
            EntityError::drc("LUT2_0", "INIT too wide"),
            Location::None,
        );
        assert_eq!(err.to_string(), "LUT2_0: INIT too wide");
        assert_eq!(sink.error_count(), 2);
    }
}
