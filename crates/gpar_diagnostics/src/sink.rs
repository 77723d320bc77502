//! The shared collector every compile stage reports into.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Collected {
    items: Vec<Diagnostic>,
    errors: usize,
}

/// Collects diagnostics from the netlist loader, the device and PAR.
///
/// Stages report through `&self`, so one sink can be borrowed by every stage
/// of a compile at once. The error tally is kept apart from the list and
/// survives [`take_all`](Self::take_all): a drained sink still knows the
/// compile failed.
#[derive(Default)]
pub struct DiagnosticSink {
    collected: Mutex<Collected>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn collected(&self) -> MutexGuard<'_, Collected> {
        self.collected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records `diag`.
    pub fn emit(&self, diag: Diagnostic) {
        let mut collected = self.collected();
        if diag.severity.is_error() {
            collected.errors += 1;
        }
        collected.items.push(diag);
    }

    /// Whether any error was ever emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Errors emitted since the sink was created.
    pub fn error_count(&self) -> usize {
        self.collected().errors
    }

    /// Warnings currently held.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.collected()
            .items
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Drains the held diagnostics in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.collected().items)
    }

    /// Copies the held diagnostics without draining them.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.collected().items.clone()
    }
}
