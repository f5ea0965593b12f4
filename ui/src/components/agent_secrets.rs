//! Secret editor for one registered agent

use crate::api;
use crate::components::forms::{AuthRowsField, SchemaFormView};
use crate::components::notice::{Notice, NoticeBanner};
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use spark::forms::{FormValues, SchemaForm};
use spark::store::SelectionStore;
use spark::transform::AuthMap;
use spark::wizards::secrets::{self, SecretsUpdate};

fn new_editor(existing: &AuthMap) -> SchemaForm {
    secrets::form_for(existing).unwrap_or_else(|e| panic!("{}", e))
}

#[component]
pub fn AgentSecrets() -> impl IntoView {
    let params = use_params_map();
    let agent = move || params.read().get("name").unwrap_or_default();
    let store = expect_context::<RwSignal<SelectionStore>>();

    let original = RwSignal::new(AuthMap::new());
    let form = RwSignal::new(new_editor(&AuthMap::new()));
    let (loaded, set_loaded) = signal(false);
    let notice = Notice::new();

    // the selection only lives as long as this page
    on_cleanup(move || store.update(|s| s.reset()));

    Effect::new(move |_| {
        let name = agent();
        if name.is_empty() {
            return;
        }
        wasm_bindgen_futures::spawn_local(async move {
            match api::get_agent_secrets(&name).await {
                Ok(existing) => {
                    form.set(new_editor(&existing));
                    original.set(existing);
                    set_loaded.set(true);
                }
                Err(e) => notice.error(format!("Failed to load secrets: {}", e)),
            }
        });
    });

    let changed = Signal::derive(move || {
        original.with(|existing| form.with(|f| secrets::has_changes(existing, f.values())))
    });

    let on_submit = Callback::new(move |values: FormValues| {
        notice.clear();
        let update = match SecretsUpdate::from_values(&values) {
            Ok(update) => update,
            Err(e) => {
                form.update(|f| {
                    if let Some(field) = e.field() {
                        f.set_error(field, &e.to_string());
                    }
                    f.finish_submit(false);
                });
                return;
            }
        };
        let name = agent();
        wasm_bindgen_futures::spawn_local(async move {
            match api::update_agent_secrets(&name, &update).await {
                Ok(()) => {
                    form.set(new_editor(&update.secrets));
                    original.set(update.secrets);
                    notice.success("Secrets saved".to_string());
                }
                Err(e) => {
                    form.update(|f| {
                        if let Some(field) = e.field.as_deref() {
                            f.set_error(field, &e.message);
                        }
                        f.finish_submit(false);
                    });
                    notice.error(e.to_string());
                }
            }
        });
    });

    let title = move || {
        store
            .with(|s| s.selected_agent().map(|a| a.name.clone()))
            .unwrap_or_else(agent)
    };

    view! {
        <div class="p-6 max-w-3xl mx-auto">
            <div class="flex items-center gap-4 mb-6">
                <A href="/agents/register" attr:class="text-gray-500 hover:text-gray-700">"←"</A>
                <h2 class="text-2xl font-bold">"Secrets: " {title}</h2>
            </div>

            <NoticeBanner notice=notice />

            <Show
                when=move || loaded.get()
                fallback=|| view! { <div class="text-gray-500">"Loading secrets..."</div> }
            >
                <SchemaFormView form=form on_submit=on_submit can_submit=changed>
                    <p class="text-sm text-gray-500 mb-4">
                        "Variable names are stored upper-case. Rows with an empty name are ignored."
                    </p>
                    <AuthRowsField name="secrets" secret_values=true />
                </SchemaFormView>
            </Show>
        </div>
    }
}
