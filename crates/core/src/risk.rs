//! Magnitude to risk tier classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk tier. Variants are declared lowest first so `Ord` follows severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// Lower tier edges are inclusive. Anything that fails every comparison,
    /// NaN included, is `Low`.
    pub fn classify(magnitude: f64) -> Self {
        if magnitude >= 6.0 {
            Self::Critical
        } else if magnitude >= 4.5 {
            Self::High
        } else if magnitude >= 2.5 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
