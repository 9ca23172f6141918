//! Red-flag classifier: runs the catalog against a symptom snapshot.
//!
//! Every active catalog entry is evaluated independently; results are
//! collapsed so no two flags share a display name.

use std::collections::HashMap;

use super::catalog::{RedFlagCatalog, RedFlagPattern, RedFlagTrigger, SymptomClause};
use crate::error::EngineError;
use crate::models::{validate_symptoms, RecommendedAction, RedFlagSymptom, Symptom};

/// One firing of a trigger.
struct TriggerHit<'a> {
    /// Overrides the pattern name (synthesized flags).
    display_name: Option<&'a str>,
    symptom_ids: Vec<String>,
}

/// Classify a snapshot against the built-in catalog.
pub fn detect_red_flags(symptoms: &[Symptom]) -> Result<Vec<RedFlagSymptom>, EngineError> {
    classify_red_flags(symptoms, &RedFlagCatalog::builtin())
}

/// Classify a snapshot against `catalog`.
///
/// Output follows catalog order. A display-name collision keeps the more
/// urgent flag and folds the other's triggering symptoms into it.
pub fn classify_red_flags(
    symptoms: &[Symptom],
    catalog: &RedFlagCatalog,
) -> Result<Vec<RedFlagSymptom>, EngineError> {
    validate_symptoms(symptoms)?;

    let mut flags: Vec<RedFlagSymptom> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for pattern in catalog.active_patterns() {
        let Some(trigger) = &pattern.trigger else {
            continue;
        };
        for hit in trigger.evaluate(symptoms) {
            let flag = build_flag(pattern, hit);
            merge_flag(&mut flags, &mut index_by_name, flag);
        }
    }

    order_triggers_by_input(&mut flags, symptoms);

    let emergencies = flags
        .iter()
        .filter(|f| f.recommended_action == RecommendedAction::Emergency)
        .count();
    if emergencies > 0 {
        let keys: Vec<&str> = flags.iter().map(|f| f.pattern_key.as_str()).collect();
        tracing::warn!(
            emergencies,
            pattern_keys = ?keys,
            catalog_version = catalog.version(),
            "Emergency red flag triggered"
        );
    }
    tracing::debug!(
        symptoms = symptoms.len(),
        flags = flags.len(),
        catalog_version = catalog.version(),
        "Red-flag classification complete"
    );

    Ok(flags)
}

/// Highest recommended action among `flags`.
pub fn most_urgent_action(flags: &[RedFlagSymptom]) -> Option<RecommendedAction> {
    flags.iter().map(|f| f.recommended_action).max()
}

fn build_flag(pattern: &RedFlagPattern, hit: TriggerHit<'_>) -> RedFlagSymptom {
    RedFlagSymptom {
        symptom: hit
            .display_name
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| pattern.name.clone()),
        severity: pattern.severity,
        description: pattern.description.clone(),
        recommended_action: pattern.recommended_action,
        pattern_key: pattern.key.clone(),
        triggered_by: hit.symptom_ids,
    }
}

fn merge_flag(
    flags: &mut Vec<RedFlagSymptom>,
    index_by_name: &mut HashMap<String, usize>,
    flag: RedFlagSymptom,
) {
    let name_key = flag.symptom.to_lowercase();
    match index_by_name.get(&name_key).copied() {
        None => {
            index_by_name.insert(name_key, flags.len());
            flags.push(flag);
        }
        Some(idx) => {
            let existing = &mut flags[idx];
            let mut absorbed = if flag.urgency() > existing.urgency() {
                tracing::debug!(
                    kept = %flag.pattern_key,
                    replaced = %existing.pattern_key,
                    "Red-flag name collision, keeping more urgent pattern"
                );
                std::mem::replace(existing, flag).triggered_by
            } else {
                flag.triggered_by
            };
            absorbed.retain(|id| !existing.triggered_by.contains(id));
            existing.triggered_by.extend(absorbed);
        }
    }
}

fn order_triggers_by_input(flags: &mut [RedFlagSymptom], symptoms: &[Symptom]) {
    let position: HashMap<&str, usize> = symptoms
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();
    for flag in flags {
        flag.triggered_by
            .sort_by_key(|id| position.get(id.as_str()).copied().unwrap_or(usize::MAX));
        flag.triggered_by.dedup();
    }
}

// ── Trigger evaluation ──────────────────────────────────────

impl RedFlagTrigger {
    fn evaluate<'a>(&self, symptoms: &'a [Symptom]) -> Vec<TriggerHit<'a>> {
        match self {
            Self::CategoryAtSeverity { category, severity } => {
                let ids: Vec<String> = symptoms
                    .iter()
                    .filter(|s| s.category == *category && s.severity == *severity)
                    .map(|s| s.id.clone())
                    .collect();
                if ids.is_empty() {
                    vec![]
                } else {
                    vec![TriggerHit {
                        display_name: None,
                        symptom_ids: ids,
                    }]
                }
            }
            Self::SeverityAnyCategory { severity } => symptoms
                .iter()
                .filter(|s| s.severity == *severity)
                .map(|s| TriggerHit {
                    display_name: Some(s.name.as_str()),
                    symptom_ids: vec![s.id.clone()],
                })
                .collect(),
            Self::CoOccurrence { clauses } => {
                let mut ids = Vec::new();
                for clause in clauses {
                    let matching: Vec<String> = symptoms
                        .iter()
                        .filter(|s| clause.matches(s))
                        .map(|s| s.id.clone())
                        .collect();
                    if matching.is_empty() {
                        return vec![];
                    }
                    ids.extend(matching);
                }
                vec![TriggerHit {
                    display_name: None,
                    symptom_ids: ids,
                }]
            }
        }
    }
}

impl SymptomClause {
    fn matches(&self, symptom: &Symptom) -> bool {
        let name_ok = self.name_contains.as_deref().map_or(true, |kw| {
            symptom.name.to_lowercase().contains(&kw.to_lowercase())
        });
        let category_ok = self.category.map_or(true, |c| symptom.category == c);
        name_ok && category_ok && symptom.severity >= self.min_severity
    }
}
