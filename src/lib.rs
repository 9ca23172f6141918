//! Symptom safety & compliance engine.
//!
//! Pure, synchronous checks over records the app already holds:
//! red-flag classification, severity escalation, and a compliance score
//! with its issue list. The engine owns no state and reads no clock.

pub mod compliance;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod safety;
pub mod store; // Key-value store seam

#[cfg(test)]
mod health_log_audit;

pub use compliance::{
    calculate_compliance_score, check_compliance_issues, generate_report, ComplianceInputs,
    ComplianceIssue, ComplianceReport,
};
pub use config::EngineConfig;
pub use engine::{evaluate, Evaluation};
pub use error::EngineError;
pub use safety::{classify_red_flags, detect_escalation, detect_red_flags, RedFlagCatalog};
pub use store::{EngineInputs, MemoryStore, RecordKind, RecordStore};
