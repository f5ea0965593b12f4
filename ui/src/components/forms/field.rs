//! Bound inputs. Each one resolves its owning form on mount and reads
//! value, error and disabled state through a [`FieldBinding`].

use leptos::prelude::*;
use serde_json::Value;
use spark::forms::{FieldBinding, FieldId};
use spark::transform::generate_label;

use super::context::{use_form_handle, FormHandle};

const INPUT_CLASS: &str = "w-full px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500 disabled:bg-gray-100";

/// One input attached to one field of the owning form
#[derive(Clone)]
pub(super) struct Bound {
    handle: FormHandle,
    id: FieldId,
    name: String,
    disabled: bool,
}

impl Bound {
    pub(super) fn new(name: String, disabled: bool) -> Self {
        Self {
            handle: use_form_handle(),
            id: FieldId::generate(),
            name,
            disabled,
        }
    }

    pub(super) fn handle(&self) -> FormHandle {
        self.handle
    }

    pub(super) fn dom_id(&self) -> String {
        self.id.to_string()
    }

    pub(super) fn read<R>(&self, f: impl FnOnce(&FieldBinding<'_>) -> R) -> R {
        self.handle
            .with(|form| f(&FieldBinding::new(self.id.clone(), Some(&self.name), form, self.disabled)))
    }

    pub(super) fn read_untracked<R>(&self, f: impl FnOnce(&FieldBinding<'_>) -> R) -> R {
        self.handle.with_untracked(|form| {
            f(&FieldBinding::new(self.id.clone(), Some(&self.name), form, self.disabled))
        })
    }

    pub(super) fn text(&self) -> String {
        self.read(|b| match b.value() {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
    }

    pub(super) fn error(&self) -> Option<String> {
        self.read(|b| b.error().map(str::to_string))
    }

    pub(super) fn is_disabled(&self) -> bool {
        self.read(|b| b.disabled())
    }

    pub(super) fn write(&self, value: Value) {
        let name = self.name.clone();
        self.handle.update(move |form| form.set_value(&name, value));
    }

    pub(super) fn blur(&self) {
        let name = self.name.clone();
        self.handle.update(move |form| form.blur(&name));
    }
}

/// Label, help text and inline error around an input
#[component]
fn FieldShell(
    id: String,
    label: String,
    required: bool,
    help: Option<String>,
    error: Signal<Option<String>>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="mb-4">
            <label for=id class="block text-sm font-medium text-gray-700 mb-1">
                {label}
                {required.then(|| view! { <span class="text-red-500 ml-0.5">"*"</span> })}
            </label>
            {children()}
            {help.map(|h| view! { <p class="mt-1 text-xs text-gray-500">{h}</p> })}
            {move || error.get().map(|e| view! { <p class="mt-1 text-sm text-red-600">{e}</p> })}
        </div>
    }
}

/// Single-line or multi-line text input
#[component]
pub fn TextField(
    #[prop(into)] name: String,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional, into)] input_type: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] help: Option<String>,
    #[prop(optional)] multiline: bool,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    let bound = Bound::new(name, disabled);
    let (schema_label, required) = bound.read_untracked(|b| (b.label(), b.is_required()));
    let id = bound.dom_id();

    let error = {
        let bound = bound.clone();
        Signal::derive(move || bound.error())
    };
    let value = {
        let bound = bound.clone();
        move || bound.text()
    };
    let is_disabled = {
        let bound = bound.clone();
        move || bound.is_disabled()
    };
    let on_input = {
        let bound = bound.clone();
        move |ev: leptos::ev::Event| bound.write(Value::String(event_target_value(&ev)))
    };
    let on_blur = move |_: leptos::ev::FocusEvent| bound.blur();

    let input = if multiline {
        view! {
            <textarea
                id=id.clone()
                rows="6"
                class=format!("{} font-mono", INPUT_CLASS)
                placeholder=placeholder.unwrap_or_default()
                prop:value=value
                disabled=is_disabled
                on:input=on_input
                on:blur=on_blur
            ></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                id=id.clone()
                type=input_type.unwrap_or_else(|| "text".to_string())
                class=INPUT_CLASS
                placeholder=placeholder.unwrap_or_default()
                prop:value=value
                disabled=is_disabled
                on:input=on_input
                on:blur=on_blur
            />
        }
        .into_any()
    };

    view! {
        <FieldShell id=id label=label.unwrap_or(schema_label) required=required help=help error=error>
            {input}
        </FieldShell>
    }
}

/// Dropdown. Without explicit options, the field's allowed values are offered.
#[component]
pub fn SelectField(
    #[prop(into)] name: String,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional)] options: Vec<(String, String)>,
    #[prop(optional, into)] help: Option<String>,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    let bound = Bound::new(name, disabled);
    let (schema_label, required, allowed) = bound.read_untracked(|b| {
        let allowed = b.schema().map(|f| f.one_of.clone()).unwrap_or_default();
        (b.label(), b.is_required(), allowed)
    });
    let options = if options.is_empty() {
        allowed
            .into_iter()
            .map(|v| {
                let label = generate_label(&v);
                (v, label)
            })
            .collect()
    } else {
        options
    };
    let id = bound.dom_id();

    let error = {
        let bound = bound.clone();
        Signal::derive(move || bound.error())
    };
    let current = {
        let bound = bound.clone();
        move || bound.text()
    };
    let is_disabled = {
        let bound = bound.clone();
        move || bound.is_disabled()
    };
    let on_change = {
        let bound = bound.clone();
        move |ev: leptos::ev::Event| bound.write(Value::String(event_target_value(&ev)))
    };
    let on_blur = move |_: leptos::ev::FocusEvent| bound.blur();

    view! {
        <FieldShell id=id.clone() label=label.unwrap_or(schema_label) required=required help=help error=error>
            <select
                id=id
                class=INPUT_CLASS
                prop:value=current
                disabled=is_disabled
                on:change=on_change
                on:blur=on_blur
            >
                <option value="">"Select..."</option>
                {options
                    .into_iter()
                    .map(|(value, text)| view! { <option value=value>{text}</option> })
                    .collect::<Vec<_>>()}
            </select>
        </FieldShell>
    }
}

/// Boolean field as a checkbox
#[component]
pub fn CheckboxField(
    #[prop(into)] name: String,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    let bound = Bound::new(name, disabled);
    let schema_label = bound.read_untracked(|b| b.label());
    let id = bound.dom_id();

    let checked = {
        let bound = bound.clone();
        move || bound.read(|b| b.value().and_then(Value::as_bool).unwrap_or(false))
    };
    let error = {
        let bound = bound.clone();
        move || bound.error()
    };
    let is_disabled = {
        let bound = bound.clone();
        move || bound.is_disabled()
    };
    let on_change =
        move |ev: leptos::ev::Event| bound.write(Value::Bool(event_target_checked(&ev)));

    view! {
        <div class="mb-4">
            <label for=id.clone() class="inline-flex items-center gap-2 text-sm text-gray-700">
                <input
                    id=id.clone()
                    type="checkbox"
                    class="rounded border-gray-300"
                    prop:checked=checked
                    disabled=is_disabled
                    on:change=on_change
                />
                {label.unwrap_or(schema_label)}
            </label>
            {move || error().map(|e| view! { <p class="mt-1 text-sm text-red-600">{e}</p> })}
        </div>
    }
}
