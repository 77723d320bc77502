//! Stable diagnostic codes such as `E206` or `W501`.
//!
//! The letter gives the severity class. The hundreds digit names the stage
//! that raised it: 1 netlist structure, 2 binding, 3 design rules,
//! 4 unsupported features, 5 device warnings, 6 progress.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity class of a code, shown as its leading letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// `E`: the compile fails.
    Error,
    /// `W`: reported, compile continues.
    Warning,
    /// `I`: progress only.
    Info,
}

impl Category {
    /// The leading letter.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Info => 'I',
        }
    }
}

/// A diagnostic code: class letter plus three digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Class letter.
    pub category: Category,
    /// Number within the class; the hundreds digit is the stage.
    pub number: u16,
}

impl DiagnosticCode {
    /// Builds a code; usable in `const` items.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// The stage digit (`2` for `E206`).
    pub fn stage(self) -> u16 {
        self.number / 100
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
