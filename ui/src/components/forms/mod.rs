//! Leptos bindings for the spark form engine
//!
//! A page owns its form in an `RwSignal` and hands it to [`SchemaFormView`]
//! or [`WizardForm`]. Inputs placed anywhere below find that form through
//! context, preferring a single-step form over an enclosing wizard.

pub mod auth_rows;
pub mod context;
pub mod field;
pub mod multi_step;
pub mod progress;
pub mod schema_form;

pub use auth_rows::AuthRowsField;
pub use field::{CheckboxField, SelectField, TextField};
pub use multi_step::{StepPanel, WizardForm};
pub use schema_form::SchemaFormView;
