//! Symptom safety: red-flag classification and severity escalation.
//!
//! Two independent, pure checks:
//! 1. Classifier: symptom snapshot against the versioned red-flag catalog
//! 2. Escalation: worst severity now versus worst severity before

pub mod catalog;
pub mod classifier;
pub mod escalation;

pub use catalog::{RedFlagCatalog, RedFlagPattern, RedFlagTrigger, SymptomClause};
pub use classifier::{classify_red_flags, detect_red_flags, most_urgent_action};
pub use escalation::{assess_escalation, detect_escalation, peak_severity, EscalationAssessment};
