use leptos::prelude::*;
use spark::forms::{FormValues, MultiStepForm, SubmitAttempt};

use super::context::{use_multi_step, MultiStepContext};
use super::progress::WizardProgress;

/// Multi-step form shell: progress header, step panels and navigation.
///
/// `Next` validates the current step first unless `validate_on_next` is off.
/// On the last step the form submits; `on_submit` gets the validated values
/// and must call `finish_submit` once its request settles.
#[component]
pub fn WizardForm(
    form: RwSignal<MultiStepForm>,
    on_submit: Callback<FormValues>,
    #[prop(default = true)] validate_on_next: bool,
    #[prop(optional, into)] submit_label: Option<String>,
    children: Children,
) -> impl IntoView {
    provide_context(MultiStepContext(form));

    let advance = move || {
        form.update(|f| {
            if validate_on_next {
                f.validate_and_next();
            } else {
                f.next();
            }
        });
    };

    let handle_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if !form.with_untracked(|f| f.is_last_step()) {
            advance();
            return;
        }
        if let Some(SubmitAttempt::Ready(values)) = form.try_update(|f| f.begin_submit()) {
            on_submit.run(values);
        }
    };

    let is_first = move || form.with(|f| f.is_first_step());
    let is_last = move || form.with(|f| f.is_last_step());
    let submitting = move || form.with(|f| f.form().state().is_submitting());
    let label = submit_label.unwrap_or_else(|| "Submit".to_string());

    view! {
        <form on:submit=handle_submit class="bg-white rounded-lg shadow p-6">
            <WizardProgress />
            {children()}
            <div class="flex justify-between pt-4 border-t mt-4">
                <button
                    type="button"
                    class="px-4 py-2 text-sm bg-gray-100 text-gray-700 rounded hover:bg-gray-200 disabled:opacity-50"
                    disabled=move || is_first() || submitting()
                    on:click=move |_| {
                        form.update(|f| {
                            f.prev();
                        });
                    }
                >
                    "Back"
                </button>
                <Show
                    when=is_last
                    fallback=move || view! {
                        <button
                            type="button"
                            class="px-4 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700"
                            on:click=move |_| advance()
                        >
                            "Next"
                        </button>
                    }
                >
                    <button
                        type="submit"
                        class="px-4 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50"
                        disabled=submitting
                    >
                        {
                            let label = label.clone();
                            move || if submitting() { "Submitting...".to_string() } else { label.clone() }
                        }
                    </button>
                </Show>
            </div>
        </form>
    }
}

/// Content of one step; rendered only while that step is current
#[component]
pub fn StepPanel(index: usize, children: ChildrenFn) -> impl IntoView {
    let form = use_multi_step();
    let active = move || form.with(|f| f.current_step() == index);

    view! {
        <Show when=active>
            <div class="py-2">{children()}</div>
        </Show>
    }
}
