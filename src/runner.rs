//! Headless wizard run: feed values into a wizard, walk its steps and submit
//! without talking to any backend.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use tracing::{debug, info};

use crate::config::{ApiSettings, FormSettings};
use crate::forms::{
    FieldErrors, FormApi, FormOptions, FormProviders, FormValues, MultiStepForm, SubmitHandler,
    SubmitOutcome,
};
use crate::wizards::{self, PayloadError, WizardDefinition};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunReport {
    /// `url` is where the payload would be posted, for wizards that declare an endpoint
    Submitted {
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        payload: Value,
    },
    /// Validation stopped the wizard on `step`
    Invalid {
        step: usize,
        step_id: String,
        errors: FieldErrors,
    },
    /// Values were valid but the payload could not be built from them
    Rejected {
        step: usize,
        field: String,
        message: String,
    },
}

pub struct Runner {
    options: FormOptions,
    validate_on_next: bool,
    base_url: String,
}

impl Runner {
    pub fn new(forms: &FormSettings, api: &ApiSettings) -> Self {
        Self {
            options: forms.options(),
            validate_on_next: forms.validate_on_next,
            base_url: api.base_url.clone(),
        }
    }

    pub async fn run(
        &self,
        wizard: &WizardDefinition,
        values: &FormValues,
    ) -> Result<RunReport, anyhow::Error> {
        let mut form = wizard.build(self.options.clone())?;
        fill(&mut form, values)?;

        while !form.is_last_step() {
            if self.validate_on_next {
                if !form.validate_and_next() {
                    return Ok(invalid_report(&form, form.current_step()));
                }
            } else {
                form.next();
            }
        }

        let handler = DryRun::new(&wizard.name);
        match form.submit(&handler).await {
            Ok(SubmitOutcome::Submitted) => {
                let url = wizard.request_url(&self.base_url);
                info!(wizard = %wizard.name, url = ?url, "Wizard run submitted");
                let payload = handler.payload.take().unwrap_or(Value::Null);
                Ok(RunReport::Submitted { url, payload })
            }
            Ok(SubmitOutcome::Invalid) => {
                let step = form
                    .state()
                    .focus()
                    .and_then(|field| form.step_of_field(field))
                    .unwrap_or_else(|| form.current_step());
                Ok(invalid_report(&form, step))
            }
            Ok(SubmitOutcome::Advanced { step }) => {
                anyhow::bail!("Wizard '{}' advanced to step {} instead of submitting", wizard.name, step)
            }
            Err(e) => match e.field() {
                Some(field) => Ok(RunReport::Rejected {
                    step: form.current_step(),
                    field: field.to_string(),
                    message: e.to_string(),
                }),
                None => Err(e.into()),
            },
        }
    }
}

/// Write each top-level value through the field API of the owning form
fn fill(form: &mut MultiStepForm, values: &FormValues) -> Result<(), anyhow::Error> {
    let target: &mut dyn FormApi = FormProviders::new().multi(Some(form as &mut dyn FormApi)).resolve()?;
    for (name, value) in values.as_map() {
        target.set_value(name, value.clone());
    }
    Ok(())
}

fn invalid_report(form: &MultiStepForm, step: usize) -> RunReport {
    debug!(step, "Wizard run stopped by validation");
    RunReport::Invalid {
        step,
        step_id: form
            .steps()
            .get(step)
            .map(|s| s.id.clone())
            .unwrap_or_default(),
        errors: form.state().errors().clone(),
    }
}

/// Builds the payload instead of sending it. Payload problems tied to a field
/// are put on the form at the step that owns the field.
struct DryRun {
    wizard: String,
    payload: RefCell<Option<Value>>,
}

impl DryRun {
    fn new(wizard: &str) -> Self {
        Self {
            wizard: wizard.to_string(),
            payload: RefCell::new(None),
        }
    }
}

#[async_trait(?Send)]
impl SubmitHandler<MultiStepForm> for DryRun {
    type Error = PayloadError;

    async fn submit(&self, values: FormValues, form: &mut MultiStepForm) -> Result<(), Self::Error> {
        match wizards::build_payload(&self.wizard, &values) {
            Ok(payload) => {
                self.payload.replace(Some(payload));
                Ok(())
            }
            Err(e) => {
                if let Some(field) = e.field() {
                    form.set_step_error(field, &e.to_string());
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{RevalidateMode, ValidationMode};
    use crate::wizards::{mcp_connection, worker_agent};
    use serde_json::json;

    fn runner(validate_on_next: bool) -> Runner {
        let forms = FormSettings {
            mode: ValidationMode::OnSubmit,
            revalidate_mode: RevalidateMode::OnChange,
            validate_on_next,
        };
        let api = ApiSettings {
            base_url: "http://registry.local/api/".to_string(),
        };
        Runner::new(&forms, &api)
    }

    fn agent_values() -> FormValues {
        FormValues::new()
            .with("name", json!("crawler"))
            .with("category", json!("research"))
            .with("endpoint", json!("https://agents.local/crawl"))
            .with("payload", json!(r#"{"url": "string"}"#))
            .with("secrets", json!([{ "key": "token", "value": "t" }]))
    }

    #[tokio::test]
    async fn test_run_submits_payload() {
        let report = runner(true)
            .run(&worker_agent::definition(), &agent_values())
            .await
            .unwrap();
        let RunReport::Submitted { url, payload } = report else {
            panic!("expected submitted, got {:?}", report);
        };
        assert_eq!(url.as_deref(), Some("http://registry.local/api/worker-agents"));
        assert_eq!(payload["secrets"], json!({ "TOKEN": "t" }));
    }

    #[tokio::test]
    async fn test_file_wizard_without_endpoint_has_no_url() {
        let wizard = WizardDefinition {
            endpoint: None,
            ..worker_agent::definition()
        };
        let report = runner(true).run(&wizard, &agent_values()).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], json!("submitted"));
        assert!(json.get("url").is_none());
    }

    #[tokio::test]
    async fn test_run_stops_on_invalid_step() {
        let values = agent_values().with("endpoint", json!("not a url"));
        let report = runner(true)
            .run(&worker_agent::definition(), &values)
            .await
            .unwrap();
        match report {
            RunReport::Invalid { step, step_id, errors } => {
                assert_eq!(step, 1);
                assert_eq!(step_id, "structure");
                assert!(errors.get("endpoint").is_some());
            }
            other => panic!("expected invalid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ungated_run_reports_first_invalid_step() {
        let values = agent_values().with("name", json!(""));
        let report = runner(false)
            .run(&worker_agent::definition(), &values)
            .await
            .unwrap();
        assert!(matches!(report, RunReport::Invalid { step: 0, .. }));
    }

    #[tokio::test]
    async fn test_payload_rule_is_rejected_on_owning_step() {
        let values = FormValues::new()
            .with("name", json!("github"))
            .with("url", json!("https://mcp.example.com"))
            .with("auth_type", json!("api_key"));
        let report = runner(true)
            .run(&mcp_connection::definition(), &values)
            .await
            .unwrap();
        match report {
            RunReport::Rejected { step, field, .. } => {
                assert_eq!(step, 1);
                assert_eq!(field, "api_key");
            }
            other => panic!("expected rejected, got {:?}", other),
        }
    }
}
