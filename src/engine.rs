//! One pass over everything the app hands the engine.
//!
//! The three components stay independent; this only runs them side by side
//! on the same inputs so a caller gets a single result to render or forward
//! to its audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compliance::{detect_issues, generate_report, ComplianceIssue, ComplianceReport};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{RecommendedAction, RedFlagSymptom};
use crate::safety::{
    assess_escalation, classify_red_flags, most_urgent_action, EscalationAssessment,
    RedFlagCatalog,
};
use crate::store::EngineInputs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub catalog_version: String,
    pub red_flags: Vec<RedFlagSymptom>,
    pub most_urgent_action: Option<RecommendedAction>,
    pub escalation: EscalationAssessment,
    pub report: ComplianceReport,
    pub issues: Vec<String>,
    pub issue_details: Vec<ComplianceIssue>,
}

/// Classify, check escalation, score and list issues, all stamped at `now`.
pub fn evaluate(
    inputs: EngineInputs,
    catalog: &RedFlagCatalog,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<Evaluation, EngineError> {
    config.validate()?;

    let red_flags = classify_red_flags(&inputs.symptoms, catalog)?;
    let escalation = assess_escalation(&inputs.symptoms, &inputs.previous_symptoms);
    let report = generate_report(inputs.compliance, config, now)?;
    let issue_details = detect_issues(&report, now, config.disclaimer_window());

    tracing::info!(
        red_flags = red_flags.len(),
        escalated = escalation.escalated,
        compliance_score = report.compliance_score,
        issues = issue_details.len(),
        "Safety evaluation complete"
    );

    Ok(Evaluation {
        catalog_version: catalog.version().to_string(),
        most_urgent_action: most_urgent_action(&red_flags),
        red_flags,
        escalation,
        report,
        issues: issue_details.iter().map(ToString::to_string).collect(),
        issue_details,
    })
}
