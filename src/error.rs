use thiserror::Error;

/// Every way the engine refuses its input.
///
/// The engine is total over well-formed records; anything here is a caller
/// contract violation and is reported before any partial result is computed.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Missing required field {field} on {record}")]
    MissingField { record: String, field: String },

    #[error("Value out of range for {field} on {record}: {value}")]
    OutOfRange {
        record: String,
        field: String,
        value: String,
    },

    #[error("Invalid red-flag catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub(crate) fn missing(record: &str, field: &str) -> Self {
        Self::MissingField {
            record: record.into(),
            field: field.into(),
        }
    }
}
