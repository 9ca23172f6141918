//! Actionable warnings read off a compliance report, independent of the score.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::scorer::ComplianceReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplianceIssue {
    UnacknowledgedDisclaimers { count: usize, window_minutes: i64 },
    UnansweredCriticalFlags { count: usize },
    UnconsentedShares { count: usize },
}

impl fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnacknowledgedDisclaimers {
                count,
                window_minutes,
            } => write!(
                f,
                "{count} unacknowledged disclaimer(s) in the last {}",
                WindowSpan(*window_minutes)
            ),
            Self::UnansweredCriticalFlags { count } => write!(
                f,
                "{count} critical red flag(s) without an appropriate response"
            ),
            Self::UnconsentedShares { count } => write!(
                f,
                "{count} data sharing event(s) without explicit consent"
            ),
        }
    }
}

/// A lookback window in the largest whole unit that divides it.
struct WindowSpan(i64);

impl fmt::Display for WindowSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, unit) = match self.0 {
            m if m != 0 && m % (24 * 60) == 0 => (m / (24 * 60), "day"),
            m if m != 0 && m % 60 == 0 => (m / 60, "hour"),
            m => (m, "minute"),
        };
        let plural = if n == 1 { "" } else { "s" };
        write!(f, "{n} {unit}{plural}")
    }
}

/// Issues in fixed order: disclaimers, red flags, privacy.
///
/// Only disclaimers viewed less than `window` before `now` are counted.
pub fn detect_issues(
    report: &ComplianceReport,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<ComplianceIssue> {
    let mut issues = Vec::new();

    let recent_unacknowledged = report
        .disclaimer_views
        .iter()
        .filter(|d| !d.acknowledged && now - d.timestamp < window)
        .count();
    if recent_unacknowledged > 0 {
        issues.push(ComplianceIssue::UnacknowledgedDisclaimers {
            count: recent_unacknowledged,
            window_minutes: window.num_minutes(),
        });
    }

    let unanswered_critical = report
        .red_flag_events
        .iter()
        .filter(|e| e.is_unanswered_critical())
        .count();
    if unanswered_critical > 0 {
        issues.push(ComplianceIssue::UnansweredCriticalFlags {
            count: unanswered_critical,
        });
    }

    let unconsented = report
        .privacy_events
        .iter()
        .filter(|e| e.is_unconsented_share())
        .count();
    if unconsented > 0 {
        issues.push(ComplianceIssue::UnconsentedShares { count: unconsented });
    }

    if !issues.is_empty() {
        tracing::warn!(issues = ?issues, "Compliance issues detected");
    }

    issues
}

/// Human-readable form of [`detect_issues`].
pub fn check_compliance_issues(
    report: &ComplianceReport,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<String> {
    detect_issues(report, now, window)
        .iter()
        .map(ToString::to_string)
        .collect()
}
