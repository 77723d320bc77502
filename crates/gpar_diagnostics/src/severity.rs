//! How serious a diagnostic is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity, ordered so that `Error` compares greatest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Placement and utilization reports.
    Info,
    /// Something was ignored or could not be recovered; the output is still written.
    Warning,
    /// The compile fails and no bitstream is written.
    Error,
}

impl Severity {
    /// Whether this stops the compile.
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_of_a_batch() {
        let batch = [Severity::Warning, Severity::Info, Severity::Error, Severity::Warning];
        assert_eq!(batch.iter().max(), Some(&Severity::Error));
        assert_eq!(batch[..2].iter().max(), Some(&Severity::Warning));
    }

    #[test]
    fn only_errors_stop_the_compile() {
        let stops: Vec<bool> = [Severity::Info, Severity::Warning, Severity::Error]
            .into_iter()
            .map(Severity::is_error)
            .collect();
        assert_eq!(stops, [false, false, true]);
    }

    #[test]
    fn lowercase_names() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Info.to_string(), "info");
    }
}
