use serde::{Deserialize, Serialize};

use crate::risk::{classify_risk, RiskLevel};

/// Analysis record produced from a single model answer.
///
/// `condition` and `explanation` are always present (possibly empty),
/// `causes` and `steps` are always lists, and `doctor` is either a
/// non-empty string or `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub condition: String,
    pub explanation: String,
    pub causes: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
}

impl NormalizedResult {
    /// True when nothing could be extracted from the model answer.
    pub fn is_empty(&self) -> bool {
        self.condition.is_empty()
            && self.explanation.is_empty()
            && self.causes.is_empty()
            && self.steps.is_empty()
            && self.doctor.is_none()
    }

    /// The text the risk tier is derived from: the doctor guidance, or the
    /// explanation when no guidance was given.
    pub fn triage_text(&self) -> &str {
        self.doctor.as_deref().unwrap_or(&self.explanation)
    }

    /// Fill in `risk` from [`triage_text`](Self::triage_text) unless the
    /// model already stated a tier.
    pub fn with_risk(mut self) -> Self {
        if self.risk.is_none() {
            self.risk = Some(classify_risk(self.triage_text()));
        }
        self
    }
}
