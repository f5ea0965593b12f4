//! Editable key/value rows for credentials, headers and secrets.

use leptos::prelude::*;
use serde_json::{json, Value};
use spark::forms::FieldPath;
use spark::transform::auth_entries_from_value;

use super::field::Bound;

const CELL_CLASS: &str = "w-full px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500 disabled:bg-gray-100";

/// Array field of `{key, value}` rows
#[component]
pub fn AuthRowsField(
    #[prop(into)] name: String,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional)] secret_values: bool,
    #[prop(optional)] disabled: bool,
) -> impl IntoView {
    let bound = Bound::new(name.clone(), disabled);
    let handle = bound.handle();
    let title = label.unwrap_or_else(|| bound.read_untracked(|b| b.label()));

    let rows_of = {
        let name = name.clone();
        move || handle.with(|form| auth_entries_from_value(form.values().get(&name)))
    };
    let row_count = {
        let rows_of = rows_of.clone();
        Memo::new(move |_| rows_of().len())
    };

    let add_row = {
        let rows_of = rows_of.clone();
        let bound = bound.clone();
        move |_: leptos::ev::MouseEvent| {
            let mut rows = rows_of();
            rows.push(Default::default());
            bound.write(json!(rows));
        }
    };

    let remove_row = {
        let bound = bound.clone();
        move |index: usize| {
            let mut rows = rows_of();
            if index < rows.len() {
                rows.remove(index);
                bound.write(json!(rows));
            }
        }
    };

    let error = {
        let bound = bound.clone();
        move || bound.error()
    };
    let is_disabled = {
        let bound = bound.clone();
        move || bound.is_disabled()
    };

    view! {
        <div class="mb-4">
            <div class="flex justify-between items-center mb-2">
                <span class="block text-sm font-medium text-gray-700">{title}</span>
                <button
                    type="button"
                    class="px-3 py-1 text-sm bg-gray-100 text-gray-700 rounded hover:bg-gray-200 disabled:opacity-50"
                    disabled=is_disabled.clone()
                    on:click=add_row
                >
                    "+ Add"
                </button>
            </div>
            {move || (row_count.get() == 0).then(|| view! {
                <p class="text-sm text-gray-400 italic">"No entries"</p>
            })}
            <div class="space-y-2">
                {
                    let name = name.clone();
                    let remove_row = remove_row.clone();
                    let is_disabled = is_disabled.clone();
                    move || {
                        (0..row_count.get())
                            .map(|index| {
                                let remove_row = remove_row.clone();
                                view! {
                                    <AuthRow
                                        name=name.clone()
                                        index=index
                                        secret_value=secret_values
                                        disabled=disabled
                                        on_remove=Callback::new(move |_| remove_row(index))
                                        remove_disabled=Signal::derive(is_disabled.clone())
                                    />
                                }
                            })
                            .collect::<Vec<_>>()
                    }
                }
            </div>
            {move || error().map(|e| view! { <p class="mt-1 text-sm text-red-600">{e}</p> })}
        </div>
    }
}

#[component]
fn AuthRow(
    name: String,
    index: usize,
    secret_value: bool,
    disabled: bool,
    on_remove: Callback<()>,
    remove_disabled: Signal<bool>,
) -> impl IntoView {
    let key_path = FieldPath::parse(&name).push_index(index).push_property("key").to_string();
    let value_path = FieldPath::parse(&name).push_index(index).push_property("value").to_string();

    view! {
        <div class="flex items-start gap-2">
            <div class="flex-1">
                <RowCell path=key_path placeholder="KEY" mono=true disabled=disabled />
            </div>
            <div class="flex-1">
                <RowCell
                    path=value_path
                    placeholder="value"
                    input_type=if secret_value { "password" } else { "text" }
                    disabled=disabled
                />
            </div>
            <button
                type="button"
                class="px-2 py-2 text-sm text-red-600 hover:text-red-800 disabled:opacity-50"
                title="Remove"
                disabled=move || remove_disabled.get()
                on:click=move |_| on_remove.run(())
            >
                "✕"
            </button>
        </div>
    }
}

/// One cell of a row, bound to `name[index].key` or `name[index].value`
#[component]
fn RowCell(
    path: String,
    placeholder: &'static str,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] mono: bool,
    disabled: bool,
) -> impl IntoView {
    let bound = Bound::new(path, disabled);
    let id = bound.dom_id();

    let value = {
        let bound = bound.clone();
        move || bound.text()
    };
    let error = {
        let bound = bound.clone();
        move || bound.error()
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

    view! {
        <input
            id=id
            type=input_type.unwrap_or("text")
            class=if mono { format!("{} font-mono", CELL_CLASS) } else { CELL_CLASS.to_string() }
            placeholder=placeholder
            prop:value=value
            disabled=is_disabled
            on:input=on_input
            on:blur=on_blur
        />
        {move || error().map(|e| view! { <p class="mt-1 text-xs text-red-600">{e}</p> })}
    }
}
