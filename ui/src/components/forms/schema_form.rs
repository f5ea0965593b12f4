use leptos::prelude::*;
use spark::forms::{FormValues, SchemaForm, SubmitAttempt};

use super::context::SchemaFormContext;

/// Single-step form. Inputs inside bind to `form`; `on_submit` receives the
/// validated values and must call `finish_submit` when its request settles.
#[component]
pub fn SchemaFormView(
    form: RwSignal<SchemaForm>,
    on_submit: Callback<FormValues>,
    #[prop(optional, into)] submit_label: Option<String>,
    #[prop(optional, into)] can_submit: Option<Signal<bool>>,
    children: Children,
) -> impl IntoView {
    provide_context(SchemaFormContext(form));

    let handle_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Some(SubmitAttempt::Ready(values)) = form.try_update(|f| f.begin_submit()) {
            on_submit.run(values);
        }
    };

    let submitting = move || form.with(|f| f.state().is_submitting());
    let blocked = move || submitting() || can_submit.is_some_and(|allowed| !allowed.get());
    let label = submit_label.unwrap_or_else(|| "Save".to_string());

    view! {
        <form on:submit=handle_submit class="bg-white rounded-lg shadow p-6">
            {children()}
            <div class="flex justify-end pt-4 border-t mt-4">
                <button
                    type="submit"
                    class="px-4 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50"
                    disabled=blocked
                >
                    {move || if submitting() { "Saving...".to_string() } else { label.clone() }}
                </button>
            </div>
        </form>
    }
}
