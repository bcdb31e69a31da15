use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The market sector a commodity belongs to.
///
/// Variants are declared alphabetically so the derived `Ord` matches the
/// ordering of the rendered summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Agriculture,
    Energy,
    Livestock,
    Metals,
}

impl Sector {
    pub const ALL: [Sector; 4] = [
        Sector::Agriculture,
        Sector::Energy,
        Sector::Livestock,
        Sector::Metals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sector::Agriculture => "Agriculture",
            Sector::Energy => "Energy",
            Sector::Livestock => "Livestock",
            Sector::Metals => "Metals",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::ALL
            .into_iter()
            .find(|sector| sector.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownSector(s.to_string()))
    }
}
