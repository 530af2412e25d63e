use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert severity tier, derived from the alert's free-text description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

const SEVERE_KEYWORDS: [&str; 4] = ["extreme", "emergency", "severe", "warning"];
const MODERATE_KEYWORDS: [&str; 3] = ["watch", "advisory", "moderate"];

impl Severity {
    /// Case-insensitive substring match, checked in priority order; the
    /// first matching tier wins, with no combination logic.
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();
        if SEVERE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Severity::Severe
        } else if MODERATE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
