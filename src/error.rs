//! Error types for Store Builder.

use crate::wizard::step::Step;

/// Top-level error type for the wizard.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Validation error: {0}")]
    Validation(FieldError),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Store creation failed: {0}")]
    Creation(String),

    #[error("Step error: {0}")]
    Step(#[from] StepError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Step-machine errors. These indicate a programmer error: an event was fed
/// to a step whose input contract does not accept it.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Step {step} does not accept event {event}")]
    UnexpectedEvent { step: Step, event: &'static str },
}

/// Errors from the external storefront API collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    /// The server rejected the operation. The message is surfaced to the
    /// user verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// A field-scoped validation error, reported inline at the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, WizardError>;
