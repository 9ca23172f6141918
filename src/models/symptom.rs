use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Severity, SymptomCategory};
use super::events::require_id;
use crate::error::EngineError;

/// A single reported health observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    /// Opaque identifier assigned by the host app.
    pub id: String,
    pub name: String,
    pub severity: Severity,
    pub category: SymptomCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Symptom {
    /// New symptom with a fresh id and no notes.
    pub fn new(
        name: impl Into<String>,
        severity: Severity,
        category: SymptomCategory,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            severity,
            category,
            notes: None,
            timestamp,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        require_id("Symptom", &self.id)?;
        if self.name.trim().is_empty() {
            return Err(EngineError::missing("Symptom", "name"));
        }
        Ok(())
    }
}

/// Validate a whole snapshot, failing on the first bad record.
pub fn validate_symptoms(symptoms: &[Symptom]) -> Result<(), EngineError> {
    symptoms.iter().try_for_each(Symptom::validate)
}
