//! Errors that mean gpar itself is broken.

use std::fmt::Display;

/// A broken invariant inside the compiler, such as a placed cell whose
/// entity is missing from the device. Problems with the user's design are
/// reported as diagnostics instead.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// What went wrong.
    pub message: String,
}

impl InternalError {
    /// Creates an error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A lookup that placement guaranteed would succeed came back empty.
    pub fn vanished(what: impl Display) -> Self {
        Self::new(format!("{what} vanished after placement"))
    }
}
