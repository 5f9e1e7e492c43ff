//! Keyword triage of free text into coarse urgency tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Keywords that put a text in the High tier.
const HIGH_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "severe",
    "infection",
    "rapidly",
    "bleeding",
    "fever",
];

/// Keywords that put a text in the Medium tier.
const MEDIUM_KEYWORDS: &[&str] = &["moderate", "monitor", "worsen", "weeks"];

/// Coarse triage bucket. Not a medical assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// Classify `text` by case-insensitive keyword scan.
///
/// Tiers are checked High, then Medium; the first tier with a matching
/// keyword wins and Low is the default.
pub fn classify_risk(text: &str) -> RiskLevel {
    let lower = text.to_lowercase();
    let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if contains_any(HIGH_KEYWORDS) {
        RiskLevel::High
    } else if contains_any(MEDIUM_KEYWORDS) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_keywords() {
        for text in [
            "This is an EMERGENCY",
            "urgent care advised",
            "Severe swelling",
            "signs of infection",
            "spreading rapidly",
            "Bleeding mole",
            "with a fever",
        ] {
            assert_eq!(classify_risk(text), RiskLevel::High, "{text}");
        }
    }

    #[test]
    fn test_medium_keywords() {
        for text in [
            "Moderate redness",
            "monitor the area",
            "if symptoms worsen",
            "no change after two weeks",
        ] {
            assert_eq!(classify_risk(text), RiskLevel::Medium, "{text}");
        }
    }

    #[test]
    fn test_default_low() {
        assert_eq!(classify_risk("Keep the skin moisturized."), RiskLevel::Low);
        assert_eq!(classify_risk(""), RiskLevel::Low);
    }

    #[test]
    fn test_high_takes_precedence_over_medium() {
        assert_eq!(classify_risk("monitor for emergency signs"), RiskLevel::High);
        assert_eq!(
            classify_risk("Moderate; see a doctor within weeks, sooner if fever"),
            RiskLevel::High
        );
    }

    #[test]
    fn test_medium_takes_precedence_over_low() {
        assert_eq!(
            classify_risk("Usually harmless, but monitor it"),
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_substring_match() {
        // "worsening" contains "worsen"
        assert_eq!(classify_risk("See a clinician if worsening"), RiskLevel::Medium);
    }

    #[test]
    fn test_parse_risk_level() {
        assert_eq!("HIGH".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(" medium ".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
        assert!("critical".parse::<RiskLevel>().is_err());
        assert_eq!(RiskLevel::Low.to_string(), "Low");
    }
}
