use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::{
    AiResponse, DataSensitivity, DisclaimerType, EthicalMetricKind, PrivacyAction, Severity,
    UserAction,
};
use crate::error::EngineError;

/// A user was shown a legal or medical notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclaimerView {
    pub id: String,
    pub disclaimer_type: DisclaimerType,
    pub acknowledged: bool,
    /// Milliseconds the notice was on screen.
    pub time_spent: i64,
    pub timestamp: DateTime<Utc>,
}

impl DisclaimerView {
    pub fn validate(&self) -> Result<(), EngineError> {
        require_id("DisclaimerView", &self.id)?;
        if self.time_spent < 0 {
            return Err(EngineError::OutOfRange {
                record: "DisclaimerView".into(),
                field: "timeSpent".into(),
                value: self.time_spent.to_string(),
            });
        }
        Ok(())
    }
}

/// A red flag was surfaced; records what the user did and how the app answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagEvent {
    pub id: String,
    /// Display name of the surfaced flag.
    pub red_flag: String,
    pub severity: Severity,
    pub user_action: UserAction,
    pub ai_response: AiResponse,
    pub timestamp: DateTime<Utc>,
}

impl RedFlagEvent {
    pub fn validate(&self) -> Result<(), EngineError> {
        require_id("RedFlagEvent", &self.id)?;
        if self.red_flag.trim().is_empty() {
            return Err(EngineError::missing("RedFlagEvent", "redFlag"));
        }
        Ok(())
    }

    /// Critical flag that got no response or the wrong one.
    pub fn is_unanswered_critical(&self) -> bool {
        self.severity == Severity::Critical
            && matches!(
                self.ai_response,
                AiResponse::Missing | AiResponse::Inappropriate
            )
    }
}

/// A data-handling action taken by the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyEvent {
    pub id: String,
    pub action: PrivacyAction,
    pub data_type: DataSensitivity,
    #[serde(default)]
    pub details: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl PrivacyEvent {
    pub fn validate(&self) -> Result<(), EngineError> {
        require_id("PrivacyEvent", &self.id)
    }

    /// True when `details.consent` holds a truthy value.
    pub fn has_consent(&self) -> bool {
        self.details.get("consent").is_some_and(is_truthy)
    }

    /// Data left the device without the user saying yes.
    pub fn is_unconsented_share(&self) -> bool {
        self.action == PrivacyAction::DataShared && !self.has_consent()
    }
}

/// A periodic ethics self-check carried in the full report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthicalMetric {
    pub id: String,
    pub metric: EthicalMetricKind,
    /// 0.0 ..= 1.0
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl EthicalMetric {
    pub fn validate(&self) -> Result<(), EngineError> {
        require_id("EthicalMetric", &self.id)?;
        if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
            return Err(EngineError::OutOfRange {
                record: "EthicalMetric".into(),
                field: "score".into(),
                value: self.score.to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) fn require_id(record: &str, id: &str) -> Result<(), EngineError> {
    if id.trim().is_empty() {
        return Err(EngineError::missing(record, "id"));
    }
    Ok(())
}

/// Truthiness as the surrounding app evaluates a loosely typed flag.
///
/// `null`, `false`, `0` and `""` are falsy; everything else is truthy,
/// including empty arrays and objects.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
