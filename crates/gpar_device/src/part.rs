//! The closed set of supported parts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported device part.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Part {
    /// Two routing matrices, 20 pins, PGA and cross-connections.
    #[serde(rename = "SLG46620")]
    Slg46620,
    /// One routing matrix, 14 pins.
    #[serde(rename = "SLG46140")]
    Slg46140,
}

impl Part {
    /// Every supported part.
    pub const ALL: [Part; 2] = [Part::Slg46620, Part::Slg46140];

    /// The part's marketing name.
    pub fn name(self) -> &'static str {
        match self {
            Part::Slg46620 => "SLG46620",
            Part::Slg46140 => "SLG46140",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for part names that are not in [`Part::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported part '{0}' (expected SLG46620 or SLG46140)")]
pub struct UnknownPart(pub String);

impl FromStr for Part {
    type Err = UnknownPart;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Package suffixes such as `V` are accepted.
        let upper = s.trim().to_ascii_uppercase();
        Part::ALL
            .into_iter()
            .find(|p| upper.starts_with(p.name()))
            .ok_or_else(|| UnknownPart(s.to_string()))
    }
}
