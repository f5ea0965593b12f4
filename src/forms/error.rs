//! Composition errors for the form engine.
//!
//! These describe a form that was wired together incorrectly. Field-level
//! validation failures are never reported through this type; they live in
//! [`FieldErrors`](super::state::FieldErrors) on the form state.

use thiserror::Error;

/// Errors raised when a form, a step list or a field binding is composed incorrectly
#[derive(Debug, Error)]
pub enum FormError {
    /// A field binding was resolved with no single-step or multi-step form available
    #[error("Field must be used inside a SchemaForm or a MultiStepForm")]
    OutsideForm,

    /// A step hook was resolved with no multi-step form available
    #[error("Step navigation must be used inside a MultiStepForm")]
    OutsideStepForm,

    /// A multi-step form was declared without any steps
    #[error("A multi-step form needs at least one step")]
    NoSteps,

    /// A step lists a field the schema does not declare
    #[error("Step '{step}' references unknown field '{field}'")]
    UnknownStepField { step: String, field: String },

    /// Two steps share the same identifier
    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),

    /// Two fields at the same level share a name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// A field's pattern is not a valid regular expression
    #[error("Invalid pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}
