//! Compliance score: 100 minus fixed deductions per negative event, clamped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DeductionWeights, EngineConfig};
use crate::error::EngineError;
use crate::models::{
    AiResponse, DisclaimerView, EthicalMetric, PrivacyEvent, RedFlagEvent, Severity,
};

pub const MAX_SCORE: u8 = 100;

/// The event lists a report is computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplianceInputs {
    pub disclaimer_views: Vec<DisclaimerView>,
    pub red_flag_events: Vec<RedFlagEvent>,
    pub privacy_events: Vec<PrivacyEvent>,
    pub ethical_metrics: Vec<EthicalMetric>,
}

impl ComplianceInputs {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.disclaimer_views
            .iter()
            .try_for_each(DisclaimerView::validate)?;
        self.red_flag_events
            .iter()
            .try_for_each(RedFlagEvent::validate)?;
        self.privacy_events
            .iter()
            .try_for_each(PrivacyEvent::validate)?;
        self.ethical_metrics
            .iter()
            .try_for_each(EthicalMetric::validate)
    }
}

/// Which scoring rule removed points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionRule {
    UnacknowledgedDisclaimer,
    InappropriateResponse,
    MissingCriticalResponse,
    UnconsentedShare,
}

/// Points one rule removed, and how many events triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deduction {
    pub rule: DeductionRule,
    pub occurrences: usize,
    pub points: u64,
}

/// Snapshot of compliance at one instant. Recomputed, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub disclaimer_views: Vec<DisclaimerView>,
    pub red_flag_events: Vec<RedFlagEvent>,
    pub privacy_events: Vec<PrivacyEvent>,
    pub ethical_metrics: Vec<EthicalMetric>,
    pub compliance_score: u8,
    pub deductions: Vec<Deduction>,
    pub last_updated: DateTime<Utc>,
}

/// Per-rule deductions, omitting rules nothing triggered.
pub fn score_breakdown(
    disclaimer_views: &[DisclaimerView],
    red_flag_events: &[RedFlagEvent],
    privacy_events: &[PrivacyEvent],
    weights: &DeductionWeights,
) -> Vec<Deduction> {
    let counts = [
        (
            DeductionRule::UnacknowledgedDisclaimer,
            disclaimer_views.iter().filter(|d| !d.acknowledged).count(),
            weights.unacknowledged_disclaimer,
        ),
        (
            DeductionRule::InappropriateResponse,
            red_flag_events
                .iter()
                .filter(|e| e.ai_response == AiResponse::Inappropriate)
                .count(),
            weights.inappropriate_response,
        ),
        (
            DeductionRule::MissingCriticalResponse,
            red_flag_events
                .iter()
                .filter(|e| {
                    e.severity == Severity::Critical && e.ai_response == AiResponse::Missing
                })
                .count(),
            weights.missing_critical_response,
        ),
        (
            DeductionRule::UnconsentedShare,
            privacy_events
                .iter()
                .filter(|e| e.is_unconsented_share())
                .count(),
            weights.unconsented_share,
        ),
    ];

    counts
        .into_iter()
        .filter(|(_, occurrences, _)| *occurrences > 0)
        .map(|(rule, occurrences, weight)| Deduction {
            rule,
            occurrences,
            points: (occurrences as u64).saturating_mul(u64::from(weight)),
        })
        .collect()
}

/// Clamp 100 minus the total into `[0, 100]`.
pub fn score_from_deductions(deductions: &[Deduction]) -> u8 {
    let total = deductions
        .iter()
        .fold(0u64, |acc, d| acc.saturating_add(d.points));
    u64::from(MAX_SCORE).saturating_sub(total) as u8
}

/// Score with the default weights.
pub fn calculate_compliance_score(
    disclaimer_views: &[DisclaimerView],
    red_flag_events: &[RedFlagEvent],
    privacy_events: &[PrivacyEvent],
) -> u8 {
    score_from_deductions(&score_breakdown(
        disclaimer_views,
        red_flag_events,
        privacy_events,
        &DeductionWeights::default(),
    ))
}

/// Bundle the inputs with a freshly computed score stamped at `now`.
pub fn generate_report(
    inputs: ComplianceInputs,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<ComplianceReport, EngineError> {
    inputs.validate()?;

    let deductions = score_breakdown(
        &inputs.disclaimer_views,
        &inputs.red_flag_events,
        &inputs.privacy_events,
        &config.deductions,
    );
    let compliance_score = score_from_deductions(&deductions);

    tracing::debug!(
        disclaimers = inputs.disclaimer_views.len(),
        red_flag_events = inputs.red_flag_events.len(),
        privacy_events = inputs.privacy_events.len(),
        ethical_metrics = inputs.ethical_metrics.len(),
        compliance_score,
        "Compliance report generated"
    );

    Ok(ComplianceReport {
        disclaimer_views: inputs.disclaimer_views,
        red_flag_events: inputs.red_flag_events,
        privacy_events: inputs.privacy_events,
        ethical_metrics: inputs.ethical_metrics,
        compliance_score,
        deductions,
        last_updated: now,
    })
}
