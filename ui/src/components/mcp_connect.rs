use crate::api;
use crate::components::forms::{
    AuthRowsField, CheckboxField, SelectField, StepPanel, TextField, WizardForm,
};
use crate::components::notice::{Notice, NoticeBanner};
use leptos::prelude::*;
use spark::forms::{FormOptions, FormValues, MultiStepForm};
use spark::wizards::mcp_connection::{self, McpConnectionRequest};

fn new_wizard() -> MultiStepForm {
    mcp_connection::definition()
        .build(FormOptions::default())
        .unwrap_or_else(|e| panic!("{}", e))
}

/// Connect a remote MCP server
#[component]
pub fn McpConnect() -> impl IntoView {
    let form = RwSignal::new(new_wizard());
    let notice = Notice::new();

    let auth_type = move || {
        form.with(|f| {
            f.form()
                .values()
                .get_str("auth_type")
                .unwrap_or_default()
                .to_string()
        })
    };

    let on_submit = Callback::new(move |values: FormValues| {
        notice.clear();
        let request = match McpConnectionRequest::from_values(&values) {
            Ok(request) => request,
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
            match api::create_mcp_connection(&request).await {
                Ok(connection) => {
                    notice.success(format!("Connected to '{}'", connection.name));
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

    let transports = vec![
        ("streamable_http".to_string(), "Streamable HTTP".to_string()),
        ("sse".to_string(), "Server-Sent Events".to_string()),
    ];

    view! {
        <div class="p-6 max-w-3xl mx-auto">
            <h2 class="text-2xl font-bold mb-6">"Connect MCP Server"</h2>

            <NoticeBanner notice=notice />

            <WizardForm form=form on_submit=on_submit submit_label="Connect">
                <StepPanel index=0>
                    <TextField name="name" placeholder="github" />
                    <TextField name="url" input_type="url" placeholder="https://" />
                    <SelectField name="transport" options=transports.clone() />
                </StepPanel>
                <StepPanel index=1>
                    <SelectField name="auth_type" />
                    <Show when=move || auth_type() == "api_key">
                        <TextField name="api_key" input_type="password" />
                    </Show>
                    <Show when=move || auth_type() == "oauth">
                        <TextField name="client_id" />
                        <TextField name="client_secret" input_type="password" />
                    </Show>
                    <AuthRowsField name="headers" label="Extra Headers" />
                    <CheckboxField name="enabled" />
                </StepPanel>
            </WizardForm>
        </div>
    }
}
