//! Schema-driven single-step form

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::path::FieldPath;
use super::schema::FormSchema;
use super::state::{FieldErrors, FormState, RevalidateMode, ValidationMode};
use super::values::FormValues;

/// Construction options shared by single-step and multi-step forms
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Initial values, layered over the schema's own field defaults
    pub defaults: FormValues,
    pub mode: ValidationMode,
    pub revalidate_mode: RevalidateMode,
}

impl FormOptions {
    pub fn with_defaults(mut self, defaults: FormValues) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_revalidate_mode(mut self, mode: RevalidateMode) -> Self {
        self.revalidate_mode = mode;
        self
    }
}

/// Result of the synchronous half of a submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// Not on the last step; the form moved forward instead of submitting
    Advanced { step: usize },
    /// Validation failed; errors are on the form state
    Invalid,
    /// Validation passed; the form is now submitting these values
    Ready(FormValues),
}

/// Result of a complete submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Advanced { step: usize },
    Invalid,
    Submitted,
}

/// Caller-supplied submit logic, run with validated values.
///
/// The handler gets the form back so it can attach errors reported by the
/// backend (and, for multi-step forms, navigate to the step that owns them).
#[async_trait(?Send)]
pub trait SubmitHandler<F> {
    type Error;

    async fn submit(&self, values: FormValues, form: &mut F) -> Result<(), Self::Error>;
}

/// Field-level API that bound inputs use, whichever form flavor owns them
pub trait FormApi {
    fn schema(&self) -> &FormSchema;
    fn values(&self) -> &FormValues;
    fn state(&self) -> &FormState;
    fn set_value(&mut self, path: &str, value: Value);
    fn blur(&mut self, path: &str);
    fn trigger(&mut self, names: &[&str]) -> bool;
    fn set_error(&mut self, path: &str, message: &str);
    fn clear_error(&mut self, path: &str);
    fn clear_errors(&mut self);
}

/// A form bound to one schema and one values object
#[derive(Debug, Clone)]
pub struct SchemaForm {
    schema: FormSchema,
    defaults: FormValues,
    values: FormValues,
    state: FormState,
    mode: ValidationMode,
    revalidate_mode: RevalidateMode,
}

impl SchemaForm {
    pub fn new(schema: FormSchema, options: FormOptions) -> Self {
        let mut defaults = schema.default_values();
        defaults.merge(&options.defaults);
        Self {
            schema,
            values: defaults.clone(),
            defaults,
            state: FormState::default(),
            mode: options.mode,
            revalidate_mode: options.revalidate_mode,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }

    pub fn defaults(&self) -> &FormValues {
        &self.defaults
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    pub fn error(&self, path: &str) -> Option<&str> {
        self.state.errors.get(path)
    }

    /// Write one field (or a nested row cell) and re-validate it if the mode asks for it.
    ///
    /// Paths that cannot be written (bad index, index past the end of the
    /// rows) are ignored.
    pub fn set_value(&mut self, path: &str, value: Value) {
        let parsed = FieldPath::parse(path);
        let Some(root) = parsed.root_name().map(str::to_string) else {
            return;
        };
        if !parsed.set(self.values.as_map_mut(), value) {
            debug!(path, "Ignoring write to an unreachable path");
            return;
        }

        if self.values.as_map().get(&root) == self.defaults.as_map().get(&root) {
            self.state.dirty.remove(&root);
        } else {
            self.state.dirty.insert(root.clone());
        }

        if self.validates_on_change(&root) {
            self.validate_field(&root);
        }
    }

    /// Mark a field touched (input lost focus)
    pub fn blur(&mut self, path: &str) {
        let Some(root) = FieldPath::parse(path).root_name().map(str::to_string) else {
            return;
        };
        self.state.touched.insert(root.clone());

        let validate = if self.state.is_submitted {
            self.revalidate_mode == RevalidateMode::OnBlur
        } else {
            matches!(
                self.mode,
                ValidationMode::OnBlur | ValidationMode::OnTouched | ValidationMode::All
            )
        };
        if validate {
            self.validate_field(&root);
        }
    }

    fn validates_on_change(&self, root: &str) -> bool {
        if self.state.is_submitted {
            return self.revalidate_mode == RevalidateMode::OnChange;
        }
        match self.mode {
            ValidationMode::OnChange | ValidationMode::All => true,
            ValidationMode::OnTouched => self.state.touched.contains(root),
            ValidationMode::OnSubmit | ValidationMode::OnBlur => false,
        }
    }

    /// Re-run validation for one top-level field, replacing its previous errors
    fn validate_field(&mut self, root: &str) {
        self.state.errors.clear_field(root);
        let errors = self.schema.validate_fields(&[root], &self.values);
        self.state.errors.extend(errors);
    }

    /// Validate the named fields now; true when all of them pass.
    ///
    /// A nested path such as `secrets[0].key` validates its whole top-level
    /// field (`secrets`).
    pub fn trigger(&mut self, names: &[&str]) -> bool {
        let mut roots: Vec<String> = Vec::new();
        for name in names {
            if let Some(root) = FieldPath::parse(name).root_name() {
                if !roots.iter().any(|r| r == root) {
                    roots.push(root.to_string());
                }
            }
        }
        for root in &roots {
            self.validate_field(root);
        }
        roots.iter().all(|root| !self.state.errors.has_field(root))
    }

    /// Attach a custom error, e.g. a conflict reported by the backend
    pub fn set_error(&mut self, path: &str, message: &str) {
        self.state.errors.insert(path, message);
    }

    pub fn clear_error(&mut self, path: &str) {
        self.state.errors.remove(path);
    }

    pub fn clear_errors(&mut self) {
        self.state.errors.clear();
    }

    /// Restore defaults and forget all errors, touched/dirty marks and submit history
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
        self.state = FormState::default();
    }

    /// Validate everything and, on success, enter the submitting state.
    ///
    /// Pair with [`finish_submit`](Self::finish_submit) when the submit work
    /// runs outside this call (e.g. spawned on the browser event loop).
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        self.state.is_submitted = true;
        self.state.is_submit_successful = false;
        self.state.submit_count += 1;

        match self.schema.validate(&self.values) {
            Ok(validated) => {
                self.state.errors.clear();
                self.state.focus = None;
                self.state.is_submitting = true;
                SubmitAttempt::Ready(validated)
            }
            Err(errors) => {
                self.state.focus = self
                    .schema
                    .fields()
                    .iter()
                    .find_map(|f| errors.first_under(&f.name))
                    .map(str::to_string);
                debug!(errors = errors.len(), "Form submit blocked by validation");
                self.state.errors = errors;
                SubmitAttempt::Invalid
            }
        }
    }

    /// Leave the submitting state
    pub fn finish_submit(&mut self, succeeded: bool) {
        self.state.is_submitting = false;
        self.state.is_submit_successful = succeeded;
    }

    /// Validate and, when valid, hand the values to `handler`.
    ///
    /// A handler error resets the submitting flag and is returned as-is.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<SubmitOutcome, H::Error>
    where
        H: SubmitHandler<SchemaForm> + ?Sized,
    {
        let values = match self.begin_submit() {
            SubmitAttempt::Ready(values) => values,
            SubmitAttempt::Invalid => return Ok(SubmitOutcome::Invalid),
            SubmitAttempt::Advanced { step } => return Ok(SubmitOutcome::Advanced { step }),
        };
        let result = handler.submit(values, self).await;
        self.finish_submit(result.is_ok());
        result.map(|()| SubmitOutcome::Submitted)
    }
}

impl FormApi for SchemaForm {
    fn schema(&self) -> &FormSchema {
        SchemaForm::schema(self)
    }

    fn values(&self) -> &FormValues {
        SchemaForm::values(self)
    }

    fn state(&self) -> &FormState {
        SchemaForm::state(self)
    }

    fn set_value(&mut self, path: &str, value: Value) {
        SchemaForm::set_value(self, path, value)
    }

    fn blur(&mut self, path: &str) {
        SchemaForm::blur(self, path)
    }

    fn trigger(&mut self, names: &[&str]) -> bool {
        SchemaForm::trigger(self, names)
    }

    fn set_error(&mut self, path: &str, message: &str) {
        SchemaForm::set_error(self, path, message)
    }

    fn clear_error(&mut self, path: &str) {
        SchemaForm::clear_error(self, path)
    }

    fn clear_errors(&mut self) {
        SchemaForm::clear_errors(self)
    }
}
