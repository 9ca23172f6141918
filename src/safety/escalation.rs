//! Severity escalation between two symptom snapshots.
//!
//! Only the worst symptom of each snapshot is compared. A new mild symptom
//! next to an existing critical one is not an escalation.

use serde::{Deserialize, Serialize};

use crate::models::{Severity, Symptom};

/// What changed between the previous and the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationAssessment {
    pub previous_peak: Severity,
    pub current_peak: Severity,
    pub escalated: bool,
}

/// Worst severity in a snapshot; `none` for an empty one.
pub fn peak_severity(symptoms: &[Symptom]) -> Severity {
    symptoms
        .iter()
        .map(|s| s.severity)
        .max()
        .unwrap_or(Severity::None)
}

pub fn assess_escalation(current: &[Symptom], previous: &[Symptom]) -> EscalationAssessment {
    let previous_peak = peak_severity(previous);
    let current_peak = peak_severity(current);
    let escalated = current_peak.rank() > previous_peak.rank();

    if escalated {
        tracing::warn!(
            previous_peak = %previous_peak,
            current_peak = %current_peak,
            "Symptom severity escalated"
        );
    }

    EscalationAssessment {
        previous_peak,
        current_peak,
        escalated,
    }
}

/// True when the current snapshot's worst symptom outranks the previous one's.
pub fn detect_escalation(current: &[Symptom], previous: &[Symptom]) -> bool {
    assess_escalation(current, previous).escalated
}
