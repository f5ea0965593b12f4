//! Form contexts and the lookup inputs use to find their owner.

use leptos::prelude::*;
use spark::forms::{resolve_step_form, FormApi, FormProviders, MultiStepForm, SchemaForm};

/// Provided by [`super::SchemaFormView`]
#[derive(Clone, Copy)]
pub struct SchemaFormContext(pub RwSignal<SchemaForm>);

/// Provided by [`super::WizardForm`]
#[derive(Clone, Copy)]
pub struct MultiStepContext(pub RwSignal<MultiStepForm>);

/// Whichever form owns the current input
#[derive(Clone, Copy)]
pub enum FormHandle {
    Single(RwSignal<SchemaForm>),
    Multi(RwSignal<MultiStepForm>),
}

impl FormHandle {
    /// Read through the shared field API (tracks the signal)
    pub fn with<R>(&self, f: impl FnOnce(&dyn FormApi) -> R) -> R {
        match self {
            FormHandle::Single(form) => form.with(|form| f(form)),
            FormHandle::Multi(form) => form.with(|form| f(form)),
        }
    }

    pub fn with_untracked<R>(&self, f: impl FnOnce(&dyn FormApi) -> R) -> R {
        match self {
            FormHandle::Single(form) => form.with_untracked(|form| f(form)),
            FormHandle::Multi(form) => form.with_untracked(|form| f(form)),
        }
    }

    pub fn update(&self, f: impl FnOnce(&mut dyn FormApi)) {
        match self {
            FormHandle::Single(form) => form.update(|form| f(form)),
            FormHandle::Multi(form) => form.update(|form| f(form)),
        }
    }
}

/// Owning form of the calling component: nearest single-step form, else the wizard.
///
/// Panics when used outside any form.
pub fn use_form_handle() -> FormHandle {
    FormProviders::new()
        .single(use_context::<SchemaFormContext>().map(|c| FormHandle::Single(c.0)))
        .multi(use_context::<MultiStepContext>().map(|c| FormHandle::Multi(c.0)))
        .resolve()
        .unwrap_or_else(|e| panic!("{}", e))
}

/// Enclosing wizard, for step navigation. Panics outside a wizard.
pub fn use_multi_step() -> RwSignal<MultiStepForm> {
    resolve_step_form(use_context::<MultiStepContext>().map(|c| c.0))
        .unwrap_or_else(|e| panic!("{}", e))
}
