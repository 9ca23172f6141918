//! Record store seam: the app's key-value storage, seen from the engine.
//!
//! The app persists each record list as a JSON array under a fixed key. The
//! engine only ever reads; a missing key is an empty list.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compliance::ComplianceInputs;
use crate::error::EngineError;
use crate::models::{validate_symptoms, Symptom};

/// Logical record types, one per storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Symptoms,
    PreviousSymptoms,
    DisclaimerViews,
    RedFlagEvents,
    PrivacyEvents,
    EthicalMetrics,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        Self::Symptoms,
        Self::PreviousSymptoms,
        Self::DisclaimerViews,
        Self::RedFlagEvents,
        Self::PrivacyEvents,
        Self::EthicalMetrics,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Symptoms => "symptoms",
            Self::PreviousSymptoms => "previous_symptoms",
            Self::DisclaimerViews => "disclaimer_views",
            Self::RedFlagEvents => "red_flag_events",
            Self::PrivacyEvents => "privacy_events",
            Self::EthicalMetrics => "ethical_metrics",
        }
    }
}

/// Read access to the app's key-value store.
pub trait RecordStore: Send + Sync {
    /// Raw JSON stored under `kind`, if any.
    fn get(&self, kind: RecordKind) -> Result<Option<String>, EngineError>;
}

/// In-memory store, used by the CLI and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<RecordKind, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: RecordKind, json: impl Into<String>) {
        self.entries.insert(kind, json.into());
    }

    /// Build from one JSON object holding every list under its storage key.
    /// Unknown keys are ignored; known keys must hold arrays.
    pub fn from_snapshot_json(json: &str) -> Result<Self, EngineError> {
        let Value::Object(map) = serde_json::from_str::<Value>(json)? else {
            return Err(EngineError::Store("snapshot must be a JSON object".into()));
        };

        let mut store = Self::new();
        for kind in RecordKind::ALL {
            match map.get(kind.key()) {
                None | Some(Value::Null) => {}
                Some(value @ Value::Array(_)) => store.insert(kind, value.to_string()),
                Some(_) => {
                    return Err(EngineError::Store(format!(
                        "'{}' must be an array",
                        kind.key()
                    )))
                }
            }
        }
        Ok(store)
    }

    pub fn from_snapshot_path(path: &Path) -> Result<Self, EngineError> {
        Self::from_snapshot_json(&std::fs::read_to_string(path)?)
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, kind: RecordKind) -> Result<Option<String>, EngineError> {
        Ok(self.entries.get(&kind).cloned())
    }
}

/// Everything the engine reads in one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineInputs {
    pub symptoms: Vec<Symptom>,
    pub previous_symptoms: Vec<Symptom>,
    pub compliance: ComplianceInputs,
}

impl EngineInputs {
    /// Load and validate every list. Fails on the first malformed record.
    pub fn load(store: &dyn RecordStore) -> Result<Self, EngineError> {
        let inputs = Self {
            symptoms: load_list(store, RecordKind::Symptoms)?,
            previous_symptoms: load_list(store, RecordKind::PreviousSymptoms)?,
            compliance: ComplianceInputs {
                disclaimer_views: load_list(store, RecordKind::DisclaimerViews)?,
                red_flag_events: load_list(store, RecordKind::RedFlagEvents)?,
                privacy_events: load_list(store, RecordKind::PrivacyEvents)?,
                ethical_metrics: load_list(store, RecordKind::EthicalMetrics)?,
            },
        };

        validate_symptoms(&inputs.symptoms)?;
        validate_symptoms(&inputs.previous_symptoms)?;
        inputs.compliance.validate()?;

        tracing::debug!(
            symptoms = inputs.symptoms.len(),
            previous_symptoms = inputs.previous_symptoms.len(),
            disclaimers = inputs.compliance.disclaimer_views.len(),
            red_flag_events = inputs.compliance.red_flag_events.len(),
            privacy_events = inputs.compliance.privacy_events.len(),
            "Engine inputs loaded"
        );
        Ok(inputs)
    }
}

fn load_list<T: DeserializeOwned>(
    store: &dyn RecordStore,
    kind: RecordKind,
) -> Result<Vec<T>, EngineError> {
    match store.get(kind)? {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| {
            tracing::warn!(key = kind.key(), error = %e, "Malformed records in store");
            EngineError::Json(e)
        }),
    }
}
