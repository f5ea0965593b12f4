//! Field binding: connects one input to the form that owns it.
//!
//! An input does not know whether it lives in a single-step or a multi-step
//! form. It asks a [`FormProviders`] chain, which prefers the nearest
//! single-step form, falls back to a multi-step form and fails otherwise.
//! The chain is generic over what a "provider" is, so the same rule serves
//! plain references here and reactive handles in the UI crate.

use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::FormError;
use super::form::FormApi;
use super::path::FieldPath;
use super::schema::FieldSchema;

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique id for a mounted input
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldId(u64);

impl FieldId {
    pub fn generate() -> Self {
        Self(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spark-field-{}", self.0)
    }
}

/// Candidate owners for a field, tried in order
#[derive(Debug)]
pub struct FormProviders<P> {
    single: Option<P>,
    multi: Option<P>,
}

impl<P> Default for FormProviders<P> {
    fn default() -> Self {
        Self {
            single: None,
            multi: None,
        }
    }
}

impl<P> FormProviders<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(mut self, provider: Option<P>) -> Self {
        self.single = provider;
        self
    }

    pub fn multi(mut self, provider: Option<P>) -> Self {
        self.multi = provider;
        self
    }

    /// Owning form for a field: single-step first, then multi-step
    pub fn resolve(self) -> Result<P, FormError> {
        self.single.or(self.multi).ok_or(FormError::OutsideForm)
    }
}

/// Owning multi-step form for step navigation
pub fn resolve_step_form<P>(provider: Option<P>) -> Result<P, FormError> {
    provider.ok_or(FormError::OutsideStepForm)
}

/// Read-side view of one input: id, field name, owning form and disabled flag
pub struct FieldBinding<'a> {
    id: FieldId,
    name: Option<String>,
    form: &'a dyn FormApi,
    disabled: bool,
}

impl<'a> FieldBinding<'a> {
    pub fn new(id: FieldId, name: Option<&str>, form: &'a dyn FormApi, disabled: bool) -> Self {
        Self {
            id,
            name: name.map(str::to_string),
            form,
            disabled,
        }
    }

    /// Bind against the first available provider
    pub fn resolve(
        id: FieldId,
        name: Option<&str>,
        providers: FormProviders<&'a dyn FormApi>,
        disabled: bool,
    ) -> Result<Self, FormError> {
        let form = providers.resolve()?;
        Ok(Self::new(id, name, form, disabled))
    }

    pub fn id(&self) -> &FieldId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn form(&self) -> &'a dyn FormApi {
        self.form
    }

    /// Explicitly disabled, or the owning form is submitting
    pub fn disabled(&self) -> bool {
        self.disabled || self.form.state().is_submitting()
    }

    pub fn schema(&self) -> Option<&'a FieldSchema> {
        let form: &'a dyn FormApi = self.form;
        let name = self.name.as_deref()?;
        form.schema().field_for_path(&FieldPath::parse(name))
    }

    pub fn value(&self) -> Option<&'a Value> {
        let form: &'a dyn FormApi = self.form;
        form.values().get(self.name.as_deref()?)
    }

    pub fn error(&self) -> Option<&'a str> {
        let form: &'a dyn FormApi = self.form;
        form.state().error(self.name.as_deref()?)
    }

    /// Schema label, or one generated from the field name
    pub fn label(&self) -> String {
        match (self.schema(), self.name.as_deref()) {
            (Some(field), _) => field.display_label(),
            (None, Some(name)) => crate::transform::generate_label(name),
            (None, None) => String::new(),
        }
    }

    pub fn is_required(&self) -> bool {
        self.schema().is_some_and(|f| f.required)
    }
}
