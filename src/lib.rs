//! # Spark - Multi-Step Form Engine
//!
//! Spark drives schema-validated forms, either as a single page or as a
//! wizard split into steps, and the small value transforms the registration
//! flows need on submit.
//!
//! ## Features
//!
//! - **Schema validation**: presence, shape and transform checks keyed by field path
//! - **Wizards**: step navigation, per-step validation and progress reporting
//! - **Field binding**: inputs find their owning form without knowing its flavor
//! - **Definitions**: wizards loaded from JSON, YAML or TOML files
//!
//! ## Quick Start
//!
//! ```rust
//! use spark::forms::{FormError, FormOptions};
//! use spark::wizards;
//!
//! # fn main() -> Result<(), FormError> {
//! let wizard = &wizards::builtin()[0];
//! let mut form = wizard.build(FormOptions::default())?;
//! form.form_mut().set_value("name", serde_json::json!("crawler"));
//! form.form_mut().set_value("category", serde_json::json!("research"));
//! assert!(form.validate_and_next());
//! assert_eq!(form.current_step(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - **forms**: the engine (schema, state, single and multi-step forms, binding)
//! - **wizards**: built-in wizard definitions and their submit payloads
//! - **config**: settings and wizard definition files (native only)
//! - **runner**: drives a wizard end to end from a values file (native only)

pub mod forms;
pub mod store;
pub mod transform;
pub mod wizards;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod runner;
