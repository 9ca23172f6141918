use serde::{Deserialize, Serialize};

use super::enums::{RecommendedAction, Severity};

/// A matched dangerous pattern. Produced by the classifier, never entered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagSymptom {
    /// Display name of the pattern.
    pub symptom: String,
    /// The pattern's own severity, not the triggering symptom's.
    pub severity: Severity,
    pub description: String,
    pub recommended_action: RecommendedAction,
    /// Catalog key of the rule that fired.
    pub pattern_key: String,
    /// Symptoms that satisfied the rule, in input order.
    pub triggered_by: Vec<String>,
}

impl RedFlagSymptom {
    /// Ranking used when two flags compete for the same display name.
    pub(crate) fn urgency(&self) -> (RecommendedAction, Severity) {
        (self.recommended_action, self.severity)
    }
}
