//! Form engine: schema-driven forms, the multi-step wizard built on them,
//! and the field binding that links inputs to either flavor.

pub mod binding;
pub mod error;
pub mod form;
pub mod path;
pub mod schema;
pub mod state;
pub mod steps;
pub mod values;

pub use binding::{resolve_step_form, FieldBinding, FieldId, FormProviders};
pub use error::FormError;
pub use form::{FormApi, FormOptions, SchemaForm, SubmitAttempt, SubmitHandler, SubmitOutcome};
pub use path::{FieldPath, PathSegment};
pub use schema::{Constraint, FieldKind, FieldSchema, FormSchema, StringFormat, Transform};
pub use state::{FieldErrors, FormState, RevalidateMode, ValidationMode};
pub use steps::{MultiStepForm, StepCursor, StepDefinition, StepProgress, StepStatus};
pub use values::FormValues;
