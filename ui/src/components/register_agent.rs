//! Worker agent registration wizard

use crate::api;
use crate::components::forms::{AuthRowsField, SelectField, StepPanel, TextField, WizardForm};
use crate::components::notice::{Notice, NoticeBanner};
use leptos::prelude::*;
use leptos_router::components::A;
use serde_json::json;
use spark::forms::{FormOptions, FormValues, MultiStepForm};
use spark::store::{AgentSelection, SelectionStore};
use spark::wizards::worker_agent::{self, WorkerAgentRegistration};

fn new_wizard() -> MultiStepForm {
    worker_agent::definition()
        .build(FormOptions::default())
        .unwrap_or_else(|e| panic!("{}", e))
}

#[component]
pub fn RegisterAgent() -> impl IntoView {
    let store = expect_context::<RwSignal<SelectionStore>>();
    let form = RwSignal::new(new_wizard());
    let notice = Notice::new();
    let (categories, set_categories) = signal(Vec::<String>::new());

    Effect::new(move |_| {
        wasm_bindgen_futures::spawn_local(async move {
            match api::list_categories().await {
                Ok(list) => set_categories.set(list),
                Err(e) => log::warn!("Failed to load categories: {}", e),
            }
        });
    });

    let on_submit = Callback::new(move |values: FormValues| {
        notice.clear();
        let registration = match WorkerAgentRegistration::from_values(&values) {
            Ok(registration) => registration,
            Err(e) => {
                form.update(|f| {
                    if let Some(field) = e.field() {
                        f.set_step_error(field, &e.to_string());
                    }
                    f.finish_submit(false);
                });
                return;
            }
        };

        wasm_bindgen_futures::spawn_local(async move {
            match api::register_worker_agent(&registration).await {
                Ok(agent) => {
                    log::info!("Registered worker agent {}", agent.name);
                    notice.success(format!("Agent '{}' registered", agent.name));
                    store.update(|s| {
                        s.select_agent(AgentSelection {
                            id: agent.id,
                            name: agent.name,
                        })
                    });
                    form.set(new_wizard());
                }
                Err(e) if e.is_conflict() => {
                    let field = e.field.clone().unwrap_or_else(|| "name".to_string());
                    form.update(|f| {
                        f.set_step_error(&field, &e.message);
                        f.finish_submit(false);
                    });
                }
                Err(e) => {
                    form.update(|f| f.finish_submit(false));
                    notice.error(e.to_string());
                }
            }
        });
    });

    view! {
        <div class="p-6 max-w-3xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"Register Worker Agent"</h2>

            <NoticeBanner notice=notice />

            {move || store.with(|s| s.selected_agent().cloned()).map(|agent| {
                let href = format!("/agents/{}/secrets", urlencoding::encode(&agent.name));
                view! {
                    <div class="mb-4 text-sm text-gray-600">
                        "Last registered: " {agent.name} " · "
                        <A href=href attr:class="text-blue-600 hover:underline">"Manage secrets"</A>
                    </div>
                }
            })}

            <WizardForm form=form on_submit=on_submit submit_label="Register">
                <StepPanel index=0>
                    <TextField name="name" placeholder="my-agent" />
                    <TextField name="description" multiline=true />
                    <CategoryPicker categories=categories set_categories=set_categories />
                </StepPanel>
                <StepPanel index=1>
                    <TextField name="endpoint" input_type="url" placeholder="https://" />
                    <TextField
                        name="payload"
                        multiline=true
                        help="JSON describing the input the agent accepts"
                    />
                </StepPanel>
                <StepPanel index=2>
                    <AuthRowsField name="secrets" secret_values=true />
                </StepPanel>
            </WizardForm>
        </div>
    }
}

/// Category select plus an inline "new category" entry backed by the selection store
#[component]
fn CategoryPicker(
    categories: ReadSignal<Vec<String>>,
    set_categories: WriteSignal<Vec<String>>,
) -> impl IntoView {
    let store = expect_context::<RwSignal<SelectionStore>>();
    let form = crate::components::forms::context::use_multi_step();
    let (adding, set_adding) = signal(false);

    let close = move || {
        store.update(|s| s.set_new_category_name(String::new()));
        set_adding.set(false);
    };

    let add_category = move |_| {
        let Some(name) = store.with(|s| s.pending_category().map(str::to_string)) else {
            return;
        };
        set_categories.update(|list| {
            if !list.contains(&name) {
                list.push(name.clone());
            }
        });
        form.update(|f| f.form_mut().set_value("category", json!(name)));
        close();
    };

    view! {
        {move || {
            let options = categories.get().into_iter().map(|c| (c.clone(), c)).collect::<Vec<_>>();
            view! { <SelectField name="category" options=options /> }
        }}
        <Show
            when=move || adding.get()
            fallback=move || view! {
                <button
                    type="button"
                    class="-mt-2 mb-4 text-sm text-blue-600 hover:underline"
                    on:click=move |_| set_adding.set(true)
                >
                    "+ New category"
                </button>
            }
        >
            <div class="flex gap-2 mb-4">
                <input
                    type="text"
                    class="flex-1 px-3 py-2 text-sm border rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500"
                    placeholder="Category name"
                    prop:value=move || store.with(|s| s.new_category_name().to_string())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        store.update(|s| s.set_new_category_name(value));
                    }
                />
                <button
                    type="button"
                    class="px-3 py-2 text-sm bg-blue-600 text-white rounded hover:bg-blue-700 disabled:opacity-50"
                    disabled=move || store.with(|s| s.pending_category().is_none())
                    on:click=add_category
                >
                    "Add"
                </button>
                <button
                    type="button"
                    class="px-3 py-2 text-sm bg-gray-100 text-gray-700 rounded hover:bg-gray-200"
                    on:click=move |_| close()
                >
                    "Cancel"
                </button>
            </div>
        </Show>
    }
}
