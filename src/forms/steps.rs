//! Multi-step form engine.
//!
//! Several pages share one [`SchemaForm`]: one schema, one values object.
//! The engine owns a step cursor that always stays within `0..total_steps`.
//! Navigating never resets values. Submitting from any step but the last
//! moves forward instead, and the caller's handler only runs from the last
//! step once the whole schema validates.
//!
//! [`next`](MultiStepForm::next) does not validate. Callers either trigger
//! the current step's fields themselves first or use
//! [`validate_and_next`](MultiStepForm::validate_and_next).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

use super::error::FormError;
use super::form::{
    FormApi, FormOptions, SchemaForm, SubmitAttempt, SubmitHandler, SubmitOutcome,
};
use super::path::FieldPath;
use super::schema::FormSchema;
use super::state::FormState;
use super::values::FormValues;

/// One page of a multi-step form and the fields it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level schema fields validated before leaving this step
    #[serde(default)]
    pub fields: Vec<String>,
}

impl StepDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(String::as_str).collect()
    }
}

/// Active step index, clamped to `0..total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
    current: usize,
    total: usize,
}

impl StepCursor {
    /// A cursor at step 0; `total` must be at least 1
    fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.total
    }

    fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    fn go_to(&mut self, step: usize) -> bool {
        if step >= self.total || step == self.current {
            return false;
        }
        self.current = step;
        true
    }
}

/// Position of a step relative to the cursor, for progress indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Complete,
    Current,
    Upcoming,
}

/// One entry of a progress indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub status: StepStatus,
}

/// Several pages sharing one schema-driven form
#[derive(Debug, Clone)]
pub struct MultiStepForm {
    form: SchemaForm,
    steps: Vec<StepDefinition>,
    cursor: StepCursor,
}

impl MultiStepForm {
    /// Build the engine. The step count is fixed from `steps` for the lifetime of the form.
    pub fn new(
        schema: FormSchema,
        steps: Vec<StepDefinition>,
        options: FormOptions,
    ) -> Result<Self, FormError> {
        if steps.is_empty() {
            return Err(FormError::NoSteps);
        }
        let mut ids = HashSet::new();
        for step in &steps {
            if !ids.insert(step.id.as_str()) {
                return Err(FormError::DuplicateStep(step.id.clone()));
            }
            if let Some(field) = step.fields.iter().find(|f| !schema.contains(f)) {
                return Err(FormError::UnknownStepField {
                    step: step.id.clone(),
                    field: field.clone(),
                });
            }
        }

        let cursor = StepCursor::new(steps.len());
        Ok(Self {
            form: SchemaForm::new(schema, options),
            steps,
            cursor,
        })
    }

    /// The underlying form (field read/write, validation, error state)
    pub fn form(&self) -> &SchemaForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SchemaForm {
        &mut self.form
    }

    pub fn cursor(&self) -> StepCursor {
        self.cursor
    }

    pub fn current_step(&self) -> usize {
        self.cursor.current()
    }

    pub fn total_steps(&self) -> usize {
        self.cursor.total()
    }

    pub fn is_first_step(&self) -> bool {
        self.cursor.is_first()
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor.is_last()
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn current_step_definition(&self) -> &StepDefinition {
        &self.steps[self.cursor.current()]
    }

    /// Index of the step that owns a top-level field (or a path under it)
    pub fn step_of_field(&self, path: &str) -> Option<usize> {
        let parsed = FieldPath::parse(path);
        let root = parsed.root_name()?;
        self.steps
            .iter()
            .position(|s| s.fields.iter().any(|f| f == root))
    }

    /// Move forward one step; a no-op on the last step
    pub fn next(&mut self) -> bool {
        let moved = self.cursor.next();
        if moved {
            debug!(step = self.cursor.current(), "Advanced to next step");
        }
        moved
    }

    /// Move back one step; a no-op on the first step
    pub fn prev(&mut self) -> bool {
        let moved = self.cursor.prev();
        if moved {
            debug!(step = self.cursor.current(), "Returned to previous step");
        }
        moved
    }

    /// Jump to `step`; out-of-range indices are ignored
    pub fn go_to_step(&mut self, step: usize) -> bool {
        let moved = self.cursor.go_to(step);
        if moved {
            debug!(step, "Jumped to step");
        }
        moved
    }

    /// Attach an error to a field and show the step that owns it
    pub fn set_step_error(&mut self, path: &str, message: &str) {
        if let Some(step) = self.step_of_field(path) {
            self.go_to_step(step);
        }
        self.form.set_error(path, message);
    }

    /// Validate the fields declared by one step
    pub fn validate_step(&mut self, step: usize) -> bool {
        let Some(def) = self.steps.get(step) else {
            return false;
        };
        let names = def.field_names();
        self.form.trigger(&names)
    }

    /// Validate the current step and advance only if it passes.
    ///
    /// Returns whether the cursor moved. On the last step nothing moves even
    /// when the step is valid.
    pub fn validate_and_next(&mut self) -> bool {
        if !self.validate_step(self.cursor.current()) {
            debug!(step = self.cursor.current(), "Step validation failed");
            return false;
        }
        self.next()
    }

    /// Synchronous half of a submit.
    ///
    /// Before the last step this is `next()`. On the last step the whole
    /// schema is validated and, when it passes, the form enters the
    /// submitting state with the validated values.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        if !self.cursor.is_last() {
            self.next();
            return SubmitAttempt::Advanced {
                step: self.cursor.current(),
            };
        }
        self.form.begin_submit()
    }

    pub fn finish_submit(&mut self, succeeded: bool) {
        self.form.finish_submit(succeeded);
    }

    /// Submit from the current step, running `handler` only from the last step
    /// with fully validated values.
    pub async fn submit<H>(&mut self, handler: &H) -> Result<SubmitOutcome, H::Error>
    where
        H: SubmitHandler<MultiStepForm> + ?Sized,
    {
        let values = match self.begin_submit() {
            SubmitAttempt::Ready(values) => values,
            SubmitAttempt::Invalid => return Ok(SubmitOutcome::Invalid),
            SubmitAttempt::Advanced { step } => return Ok(SubmitOutcome::Advanced { step }),
        };
        let result = handler.submit(values, self).await;
        self.finish_submit(result.is_ok());
        if result.is_ok() {
            info!("Multi-step form submitted");
        } else {
            debug!(step = self.cursor.current(), "Submit handler failed");
        }
        result.map(|()| SubmitOutcome::Submitted)
    }

    /// Step list with each step's position relative to the cursor
    pub fn progress(&self) -> Vec<StepProgress> {
        let current = self.cursor.current();
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| StepProgress {
                index,
                id: step.id.clone(),
                title: step.title.clone(),
                status: match index.cmp(&current) {
                    std::cmp::Ordering::Less => StepStatus::Complete,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Upcoming,
                },
            })
            .collect()
    }
}

impl FormApi for MultiStepForm {
    fn schema(&self) -> &FormSchema {
        self.form.schema()
    }

    fn values(&self) -> &FormValues {
        self.form.values()
    }

    fn state(&self) -> &FormState {
        self.form.state()
    }

    fn set_value(&mut self, path: &str, value: Value) {
        self.form.set_value(path, value)
    }

    fn blur(&mut self, path: &str) {
        self.form.blur(path)
    }

    fn trigger(&mut self, names: &[&str]) -> bool {
        self.form.trigger(names)
    }

    fn set_error(&mut self, path: &str, message: &str) {
        self.form.set_error(path, message)
    }

    fn clear_error(&mut self, path: &str) {
        self.form.clear_error(path)
    }

    fn clear_errors(&mut self) {
        self.form.clear_errors()
    }
}
