//! Constant bits as they appear in a synthesized netlist.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A port or connection bit tied to a constant instead of a numbered net.
///
/// Yosys writes these as the strings `"0"`, `"1"`, `"x"` and `"z"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Logic {
    /// Tied low.
    Zero,
    /// Tied high.
    One,
    /// Don't-care.
    X,
    /// Left floating.
    Z,
}

impl Logic {
    /// Reads one bit character; case-insensitive for `x` and `z`.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c.to_ascii_lowercase() {
            '0' => Logic::Zero,
            '1' => Logic::One,
            'x' => Logic::X,
            'z' => Logic::Z,
            _ => return None,
        })
    }

    /// `Some` for the two driven levels.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Logic::Zero => Some(false),
            Logic::One => Some(true),
            Logic::X | Logic::Z => None,
        }
    }

    /// The power rail the bit is tied to in hardware. Don't-care and
    /// floating bits go to ground.
    pub fn tie_level(self) -> bool {
        self == Logic::One
    }
}

/// The string is not a single bit character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not one of 0, 1, x, z")]
pub struct NotABit(pub String);

impl FromStr for Logic {
    type Err = NotABit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
        .ok_or_else(|| NotABit(s.to_string()))
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Logic::Zero => "0",
            Logic::One => "1",
            Logic::X => "x",
            Logic::Z => "z",
        })
    }
}
