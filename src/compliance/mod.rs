//! Compliance: how well the app behaved around disclaimers, red flags and privacy.
//!
//! The score and the issue list are separate reads of the same events. The
//! score counts everything ever recorded; issues only look at what is still
//! actionable.

pub mod issues;
pub mod scorer;

pub use issues::{check_compliance_issues, detect_issues, ComplianceIssue};
pub use scorer::{
    calculate_compliance_score, generate_report, score_breakdown, score_from_deductions,
    ComplianceInputs, ComplianceReport, Deduction, DeductionRule,
};
