//! Red-flag catalog: the versioned rule table the classifier runs.
//!
//! Patterns are data. A deployment can ship its own catalog as JSON; the
//! built-in one mirrors the canonical warning signs for the app.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::CATALOG_VERSION;
use crate::error::EngineError;
use crate::models::{RecommendedAction, Severity, SymptomCategory};

/// A versioned, ordered set of red-flag patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlagCatalog {
    version: String,
    patterns: Vec<RedFlagPattern>,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlagPattern {
    /// Stable identifier. Never shown to users.
    pub key: String,
    /// Display name.
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub recommended_action: RecommendedAction,
    /// `None` marks a reference-only entry that never fires on its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<RedFlagTrigger>,
}

/// When a pattern fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RedFlagTrigger {
    /// A single symptom with exactly this category and severity.
    CategoryAtSeverity {
        category: SymptomCategory,
        severity: Severity,
    },
    /// A single symptom at exactly this severity, any category.
    /// The flag is named after the symptom.
    SeverityAnyCategory { severity: Severity },
    /// Every clause is satisfied by at least one symptom in the set.
    CoOccurrence { clauses: Vec<SymptomClause> },
}

/// Predicate over one symptom, used by co-occurrence rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomClause {
    /// Case-insensitive substring of the symptom name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SymptomCategory>,
    #[serde(default)]
    pub min_severity: Severity,
}

impl SymptomClause {
    fn is_vacuous(&self) -> bool {
        self.name_contains.is_none()
            && self.category.is_none()
            && self.min_severity == Severity::None
    }
}

impl RedFlagCatalog {
    /// Build and validate a catalog.
    pub fn new(
        version: impl Into<String>,
        patterns: Vec<RedFlagPattern>,
    ) -> Result<Self, EngineError> {
        let catalog = Self {
            version: version.into(),
            patterns,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        tracing::debug!(
            version = %catalog.version,
            patterns = catalog.patterns.len(),
            "Red-flag catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Patterns in definition order.
    pub fn patterns(&self) -> &[RedFlagPattern] {
        &self.patterns
    }

    pub fn get(&self, key: &str) -> Option<&RedFlagPattern> {
        self.patterns.iter().find(|p| p.key == key)
    }

    /// Entries that can fire.
    pub fn active_patterns(&self) -> impl Iterator<Item = &RedFlagPattern> {
        self.patterns.iter().filter(|p| p.trigger.is_some())
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.version.trim().is_empty() {
            return Err(EngineError::InvalidCatalog("version is empty".into()));
        }

        let mut seen = HashSet::new();
        for pattern in &self.patterns {
            if pattern.key.trim().is_empty() {
                return Err(EngineError::InvalidCatalog("pattern with empty key".into()));
            }
            if !seen.insert(pattern.key.as_str()) {
                return Err(EngineError::InvalidCatalog(format!(
                    "duplicate pattern key '{}'",
                    pattern.key
                )));
            }
            if pattern.name.trim().is_empty() {
                return Err(EngineError::InvalidCatalog(format!(
                    "pattern '{}' has an empty name",
                    pattern.key
                )));
            }
            if let Some(RedFlagTrigger::CoOccurrence { clauses }) = &pattern.trigger {
                if clauses.is_empty() {
                    return Err(EngineError::InvalidCatalog(format!(
                        "pattern '{}' has no co-occurrence clauses",
                        pattern.key
                    )));
                }
                for clause in clauses {
                    if clause
                        .name_contains
                        .as_deref()
                        .is_some_and(|kw| kw.trim().is_empty())
                    {
                        return Err(EngineError::InvalidCatalog(format!(
                            "pattern '{}' has an empty keyword",
                            pattern.key
                        )));
                    }
                    // A clause with no constraint matches any symptom at all.
                    if clause.is_vacuous() {
                        return Err(EngineError::InvalidCatalog(format!(
                            "pattern '{}' has an unconstrained clause",
                            pattern.key
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        Self {
            version: CATALOG_VERSION.into(),
            patterns: builtin_patterns(),
        }
    }
}

impl Default for RedFlagCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ── Built-in patterns ───────────────────────────────────────

pub const SEVERE_BLEEDING: &str = "severe_bleeding";
pub const SEVERE_PELVIC_PAIN: &str = "severe_pelvic_pain";
pub const FEVER_WITH_PELVIC_PAIN: &str = "fever_with_pelvic_pain";
pub const DIZZINESS_FAINTING: &str = "dizziness_fainting";
pub const CHEST_PAIN: &str = "chest_pain";
pub const PERSISTENT_NAUSEA: &str = "persistent_nausea";
pub const CRITICAL_SYMPTOM: &str = "critical_symptom";

fn pattern(
    key: &str,
    name: &str,
    severity: Severity,
    recommended_action: RecommendedAction,
    description: &str,
    trigger: Option<RedFlagTrigger>,
) -> RedFlagPattern {
    RedFlagPattern {
        key: key.into(),
        name: name.into(),
        severity,
        description: description.into(),
        recommended_action,
        trigger,
    }
}

fn builtin_patterns() -> Vec<RedFlagPattern> {
    vec![
        pattern(
            SEVERE_BLEEDING,
            "Severe Bleeding",
            Severity::Critical,
            RecommendedAction::Emergency,
            "Soaking through a pad or tampon every hour, or passing large clots, \
             can signal dangerous blood loss.",
            Some(RedFlagTrigger::CategoryAtSeverity {
                category: SymptomCategory::Bleeding,
                severity: Severity::Severe,
            }),
        ),
        pattern(
            SEVERE_PELVIC_PAIN,
            "Severe Pelvic Pain",
            Severity::Severe,
            RecommendedAction::Urgent,
            "Sudden or severe pelvic pain can indicate ovarian torsion, \
             ectopic pregnancy or a ruptured cyst.",
            Some(RedFlagTrigger::CategoryAtSeverity {
                category: SymptomCategory::Pain,
                severity: Severity::Severe,
            }),
        ),
        pattern(
            FEVER_WITH_PELVIC_PAIN,
            "Fever with Pelvic Pain",
            Severity::Severe,
            RecommendedAction::Urgent,
            "Fever together with pelvic pain may indicate an infection such as \
             pelvic inflammatory disease.",
            Some(RedFlagTrigger::CoOccurrence {
                clauses: vec![
                    SymptomClause {
                        name_contains: Some("fever".into()),
                        category: None,
                        min_severity: Severity::None,
                    },
                    SymptomClause {
                        name_contains: None,
                        category: Some(SymptomCategory::Pain),
                        min_severity: Severity::Mild,
                    },
                ],
            }),
        ),
        pattern(
            DIZZINESS_FAINTING,
            "Dizziness or Fainting",
            Severity::Severe,
            RecommendedAction::Urgent,
            "Fainting or severe dizziness can be a sign of significant blood loss \
             or low blood pressure.",
            None,
        ),
        pattern(
            CHEST_PAIN,
            "Chest Pain",
            Severity::Critical,
            RecommendedAction::Emergency,
            "Chest pain or difficulty breathing needs immediate evaluation.",
            None,
        ),
        pattern(
            PERSISTENT_NAUSEA,
            "Persistent Nausea/Vomiting",
            Severity::Moderate,
            RecommendedAction::Consult,
            "Being unable to keep fluids down for more than a day risks dehydration.",
            None,
        ),
        pattern(
            CRITICAL_SYMPTOM,
            "Critical Symptom",
            Severity::Critical,
            RecommendedAction::Emergency,
            "A symptom reported at critical severity needs immediate medical attention.",
            Some(RedFlagTrigger::SeverityAnyCategory {
                severity: Severity::Critical,
            }),
        ),
    ]
}
