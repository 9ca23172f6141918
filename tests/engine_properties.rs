use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use serde_json::{json, Map};
use symptom_safety::compliance::{calculate_compliance_score, check_compliance_issues};
use symptom_safety::models::*;
use symptom_safety::safety::{detect_escalation, detect_red_flags};
use symptom_safety::{generate_report, ComplianceInputs, EngineConfig};
use uuid::Uuid;

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn severity() -> impl Strategy<Value = Severity> {
    prop::sample::select(Severity::ALL.to_vec())
}

fn category() -> impl Strategy<Value = SymptomCategory> {
    prop::sample::select(SymptomCategory::ALL.to_vec())
}

fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{3,12}",
        Just("fever".to_string()),
        Just("Fever 102F".to_string()),
        Just("cramps".to_string()),
    ]
}

fn symptom() -> impl Strategy<Value = Symptom> {
    (name(), severity(), category())
        .prop_map(|(name, severity, category)| Symptom::new(name, severity, category, t0()))
}

fn symptoms() -> impl Strategy<Value = Vec<Symptom>> {
    prop::collection::vec(symptom(), 0..12)
}

fn below_critical() -> impl Strategy<Value = Severity> {
    prop::sample::select(vec![
        Severity::None,
        Severity::Mild,
        Severity::Moderate,
        Severity::Severe,
    ])
}

fn fever_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("fever".to_string()),
        Just("Fever 102F".to_string()),
        Just("low-grade FEVER".to_string()),
    ]
}

fn is_severe_bleeding_or_pain(severity: Severity, category: SymptomCategory) -> bool {
    severity == Severity::Severe
        && matches!(category, SymptomCategory::Bleeding | SymptomCategory::Pain)
}

/// Any pain at mild or worse, but no name containing "fever" (no 'e' at all).
fn pain_without_fever() -> impl Strategy<Value = Symptom> {
    ("[a-df-z]{3,10}", below_critical(), category())
        .prop_filter("no severe bleeding or pain", |(_, sev, cat)| {
            !is_severe_bleeding_or_pain(*sev, *cat)
        })
        .prop_map(|(name, severity, category)| Symptom::new(name, severity, category, t0()))
}

/// Fever at any severity, with pain entries only at `none`.
fn fever_without_pain() -> impl Strategy<Value = Symptom> {
    (prop_oneof![fever_name(), "[a-z]{3,10}"], below_critical(), category())
        .prop_filter("no pain at mild or worse", |(_, sev, cat)| {
            !is_severe_bleeding_or_pain(*sev, *cat)
                && !(*cat == SymptomCategory::Pain && *sev >= Severity::Mild)
        })
        .prop_map(|(name, severity, category)| Symptom::new(name, severity, category, t0()))
}

/// Snapshots that cannot satisfy any built-in trigger.
fn benign_snapshot() -> impl Strategy<Value = Vec<Symptom>> {
    prop_oneof![
        prop::collection::vec(pain_without_fever(), 0..12),
        prop::collection::vec(fever_without_pain(), 0..12),
    ]
}

fn disclaimer(acknowledged: bool) -> DisclaimerView {
    DisclaimerView {
        id: Uuid::new_v4().to_string(),
        disclaimer_type: DisclaimerType::Medical,
        acknowledged,
        time_spent: 500,
        timestamp: t0(),
    }
}

fn red_flag_event(severity: Severity, ai_response: AiResponse) -> RedFlagEvent {
    RedFlagEvent {
        id: Uuid::new_v4().to_string(),
        red_flag: "Severe Pelvic Pain".into(),
        severity,
        user_action: UserAction::Dismissed,
        ai_response,
        timestamp: t0(),
    }
}

fn share(consent: bool) -> PrivacyEvent {
    let mut details = Map::new();
    details.insert("consent".into(), json!(consent));
    PrivacyEvent {
        id: Uuid::new_v4().to_string(),
        action: PrivacyAction::DataShared,
        data_type: DataSensitivity::High,
        details,
        timestamp: t0(),
    }
}

// ── Red-flag classifier ─────────────────────────────────────

proptest! {
    #[test]
    fn benign_snapshots_raise_no_flags(list in benign_snapshot()) {
        let flags = detect_red_flags(&list).unwrap();
        prop_assert!(flags.is_empty(), "unexpected flags: {:?}", flags);
    }

    #[test]
    fn flag_names_are_unique(list in symptoms()) {
        let flags = detect_red_flags(&list).unwrap();
        let mut seen = std::collections::HashSet::new();
        for flag in &flags {
            prop_assert!(seen.insert(flag.symptom.clone()), "duplicate flag {}", flag.symptom);
        }
    }

    #[test]
    fn every_flag_cites_its_symptoms(list in symptoms()) {
        let ids: std::collections::HashSet<_> = list.iter().map(|s| s.id.as_str()).collect();
        for flag in detect_red_flags(&list).unwrap() {
            prop_assert!(!flag.triggered_by.is_empty());
            prop_assert!(flag.triggered_by.iter().all(|id| ids.contains(id.as_str())));
        }
    }

    #[test]
    fn every_critical_symptom_is_covered(list in symptoms()) {
        let flags = detect_red_flags(&list).unwrap();
        for s in list.iter().filter(|s| s.severity == Severity::Critical) {
            prop_assert!(flags.iter().any(|f| f.triggered_by.contains(&s.id)));
        }
    }
}

// ── Escalation detector ─────────────────────────────────────

proptest! {
    #[test]
    fn escalation_is_irreflexive(list in symptoms()) {
        prop_assert!(!detect_escalation(&list, &list));
    }

    #[test]
    fn anything_at_least_mild_escalates_from_empty(list in symptoms()) {
        let expected = list.iter().any(|s| s.severity >= Severity::Mild);
        prop_assert_eq!(detect_escalation(&list, &[]), expected);
    }

    #[test]
    fn escalation_is_antisymmetric(a in symptoms(), b in symptoms()) {
        prop_assert!(!(detect_escalation(&a, &b) && detect_escalation(&b, &a)));
    }
}

// ── Compliance scorer ───────────────────────────────────────

proptest! {
    #[test]
    fn score_stays_in_bounds(
        unacked in 0usize..40,
        inappropriate in 0usize..15,
        missing_critical in 0usize..10,
        unconsented in 0usize..8,
    ) {
        let views: Vec<_> = (0..unacked).map(|_| disclaimer(false)).collect();
        let mut events: Vec<_> = (0..inappropriate)
            .map(|_| red_flag_event(Severity::Severe, AiResponse::Inappropriate))
            .collect();
        events.extend(
            (0..missing_critical).map(|_| red_flag_event(Severity::Critical, AiResponse::Missing)),
        );
        let privacy: Vec<_> = (0..unconsented).map(|_| share(false)).collect();

        let score = calculate_compliance_score(&views, &events, &privacy);
        prop_assert!(score <= 100);
        let expected = 100i64
            - 5 * unacked as i64
            - 10 * inappropriate as i64
            - 15 * missing_critical as i64
            - 20 * unconsented as i64;
        prop_assert_eq!(i64::from(score), expected.clamp(0, 100));
    }

    #[test]
    fn adding_negative_events_never_raises_score(
        base_unacked in 0usize..10,
        base_acked in 0usize..10,
        extra in prop::collection::vec(0u8..4, 0..10),
    ) {
        let mut views: Vec<_> = (0..base_unacked).map(|_| disclaimer(false)).collect();
        views.extend((0..base_acked).map(|_| disclaimer(true)));
        let mut events = Vec::new();
        let mut privacy = vec![share(true)];

        let mut last = calculate_compliance_score(&views, &events, &privacy);
        for kind in extra {
            match kind {
                0 => views.push(disclaimer(false)),
                1 => events.push(red_flag_event(Severity::Moderate, AiResponse::Inappropriate)),
                2 => events.push(red_flag_event(Severity::Critical, AiResponse::Missing)),
                _ => privacy.push(share(false)),
            }
            let next = calculate_compliance_score(&views, &events, &privacy);
            prop_assert!(next <= last, "score rose from {} to {}", last, next);
            last = next;
        }
    }

    #[test]
    fn issue_list_never_exceeds_three(
        unacked in 0usize..5,
        critical_missing in 0usize..5,
        unconsented in 0usize..5,
    ) {
        let inputs = ComplianceInputs {
            disclaimer_views: (0..unacked).map(|_| disclaimer(false)).collect(),
            red_flag_events: (0..critical_missing)
                .map(|_| red_flag_event(Severity::Critical, AiResponse::Missing))
                .collect(),
            privacy_events: (0..unconsented).map(|_| share(false)).collect(),
            ethical_metrics: vec![],
        };
        let report = generate_report(inputs, &EngineConfig::default(), t0()).unwrap();
        let issues = check_compliance_issues(&report, t0() + Duration::hours(1), Duration::days(7));
        let expected = [unacked, critical_missing, unconsented].iter().filter(|n| **n > 0).count();
        prop_assert_eq!(issues.len(), expected);
    }
}

// ── Reference scenarios ─────────────────────────────────────

#[test]
fn severe_bleeding_scenario() {
    let flags = detect_red_flags(&[Symptom::new(
        "bleeding",
        Severity::Severe,
        SymptomCategory::Bleeding,
        t0(),
    )])
    .unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].symptom, "Severe Bleeding");
    assert_eq!(flags[0].recommended_action, RecommendedAction::Emergency);
}

#[test]
fn fever_with_painless_cramps_scenario() {
    let flags = detect_red_flags(&[
        Symptom::new("fever 102F", Severity::Severe, SymptomCategory::Other, t0()),
        Symptom::new("cramps", Severity::None, SymptomCategory::Pain, t0()),
    ])
    .unwrap();
    assert!(flags.is_empty());
}

#[test]
fn fever_with_cramps_scenario() {
    let flags = detect_red_flags(&[
        Symptom::new("fever 102F", Severity::Moderate, SymptomCategory::Other, t0()),
        Symptom::new("cramps", Severity::Mild, SymptomCategory::Pain, t0()),
    ])
    .unwrap();
    assert!(flags.iter().any(|f| f.symptom == "Fever with Pelvic Pain"));
}

#[test]
fn fifty_five_point_scenario() {
    let views: Vec<_> = (0..3).map(|_| disclaimer(false)).collect();
    let events = vec![red_flag_event(Severity::Moderate, AiResponse::Inappropriate)];
    let privacy = vec![share(false)];
    assert_eq!(calculate_compliance_score(&views, &events, &privacy), 55);
}

#[test]
fn clamp_at_zero_scenario() {
    let views: Vec<_> = (0..25).map(|_| disclaimer(false)).collect();
    assert_eq!(calculate_compliance_score(&views, &[], &[]), 0);
}
