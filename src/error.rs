// 🚨 Error Taxonomy - one error type for every failure a chart can hit
//
// Validation  → caller sent something missing/malformed (never retried)
// Calendar    → the external calendar data could not answer
// Invariant   → a computed index left its table (logic defect, fail loudly)

use serde::Serialize;
use thiserror::Error;

use crate::calendar::CalendarError;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A missing or malformed input field, reported by its wire name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::new(field, "Required field is missing")
    }
}

// ============================================================================
// CHART ERROR
// ============================================================================

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("calendar provider failed: {0}")]
    CalendarProvider(#[from] CalendarError),

    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl ChartError {
    pub fn invariant(message: impl Into<String>) -> Self {
        ChartError::InternalInvariant(message.into())
    }

    /// Stable machine tag, used in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::Validation(_) => "validation",
            ChartError::CalendarProvider(_) => "calendar_provider",
            ChartError::InternalInvariant(_) => "internal_invariant",
        }
    }

    /// The input field or calendar boundary that caused the failure, if known.
    pub fn field(&self) -> Option<String> {
        match self {
            ChartError::Validation(e) => Some(e.field.clone()),
            ChartError::CalendarProvider(e) => e.boundary(),
            ChartError::InternalInvariant(_) => None,
        }
    }
}

pub type ChartResult<T> = std::result::Result<T, ChartError>;

// ============================================================================
// ERROR PAYLOAD
// ============================================================================

/// Structured error object returned by the CLI and HTTP boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ChartError> for ErrorPayload {
    fn from(err: &ChartError) -> Self {
        ErrorPayload {
            error: err.to_string(),
            kind: err.kind(),
            field: err.field(),
        }
    }
}
