//! Error types for entities and the device model.

use crate::part::Part;
use std::path::PathBuf;

/// Errors from the bit array and its text form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitstreamError {
    /// A read or write fell outside the bitstream.
    #[error("bit {index} is outside the {len}-bit bitstream")]
    OutOfRange {
        /// The requested bit.
        index: usize,
        /// The bitstream length.
        len: usize,
    },

    /// The text holds the wrong number of bits.
    #[error("expected {expected} bits, found {found}")]
    Length {
        /// Bits the part needs.
        expected: usize,
        /// Bits in the text.
        found: usize,
    },

    /// A line of the text form could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
}

/// The failure channel of every entity operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    /// A parameter or connection violates a hardware rule.
    #[error("{entity}: {message}")]
    Drc {
        /// Entity description (e.g. `DAC0`).
        entity: String,
        /// The violated rule.
        message: String,
    },

    /// State that cannot be expressed in bits, or bits that decode to no state.
    #[error("{entity}: cannot encode: {message}")]
    Encoding {
        /// Entity description.
        entity: String,
        /// What could not be encoded.
        message: String,
    },

    /// The primitive exists but its encoding is not known for this part.
    #[error("{entity}: not implemented for {part}")]
    Unimplemented {
        /// Entity description.
        entity: String,
        /// The part in question.
        part: Part,
    },

    /// A port name that the entity does not have.
    #[error("{entity} has no port '{port}'")]
    UnknownPort {
        /// Entity description.
        entity: String,
        /// The requested port.
        port: String,
    },

    /// A register address fell outside the bitstream.
    #[error("bit {index} is outside the {len}-bit bitstream")]
    BitOutOfRange {
        /// The requested bit.
        index: usize,
        /// The bitstream length.
        len: usize,
    },
}

impl EntityError {
    /// Shorthand for a [`Drc`](EntityError::Drc) error.
    pub fn drc(entity: impl Into<String>, message: impl Into<String>) -> Self {
        EntityError::Drc {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`Encoding`](EntityError::Encoding) error.
    pub fn encoding(entity: impl Into<String>, message: impl Into<String>) -> Self {
        EntityError::Encoding {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

impl From<BitstreamError> for EntityError {
    fn from(err: BitstreamError) -> Self {
        match err {
            BitstreamError::OutOfRange { index, len } => EntityError::BitOutOfRange { index, len },
            other => EntityError::encoding("bitstream", other.to_string()),
        }
    }
}

/// Errors from whole-device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// An entity refused to save or load.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// The bitstream text was malformed.
    #[error("invalid bitstream: {0}")]
    Bitstream(#[from] BitstreamError),

    /// Reading or writing the bitstream file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
