use async_trait::async_trait;
use serde_json::json;
use spark::forms::{
    FormApi, FormOptions, FormValues, MultiStepForm, SubmitHandler, SubmitOutcome,
};
use spark::transform::{auth_array_to_object, AuthEntry};
use spark::wizards::worker_agent::{self, WorkerAgentRegistration};
use std::cell::RefCell;

/// Backend stand-in that answers 409 for names it already knows
struct Registry {
    taken: Vec<String>,
    registered: RefCell<Vec<WorkerAgentRegistration>>,
}

#[derive(Debug, PartialEq)]
enum RegistryError {
    Conflict,
}

#[async_trait(?Send)]
impl SubmitHandler<MultiStepForm> for Registry {
    type Error = RegistryError;

    async fn submit(&self, values: FormValues, form: &mut MultiStepForm) -> Result<(), Self::Error> {
        let registration = WorkerAgentRegistration::from_values(&values).expect("valid payload");
        if self.taken.contains(&registration.name) {
            form.go_to_step(0);
            form.set_error("name", "An agent with this name already exists");
            return Err(RegistryError::Conflict);
        }
        self.registered.borrow_mut().push(registration);
        Ok(())
    }
}

fn wizard() -> MultiStepForm {
    worker_agent::definition()
        .build(FormOptions::default())
        .expect("built-in wizard")
}

fn fill_basic_info(form: &mut MultiStepForm) {
    form.set_value("name", json!("crawler"));
    form.set_value("category", json!("research"));
}

fn fill_structure(form: &mut MultiStepForm) {
    form.set_value("endpoint", json!("https://agents.local/crawl"));
    form.set_value("payload", json!(r#"{"url": "string"}"#));
}

#[test]
fn test_next_blocked_by_required_field() {
    let mut form = wizard();
    form.set_value("category", json!("research"));

    assert!(!form.validate_and_next());
    assert_eq!(form.current_step(), 0);
    assert_eq!(form.state().error("name"), Some("Agent Name is required"));

    form.set_value("name", json!("crawler"));
    assert!(form.validate_and_next());
    assert_eq!(form.current_step(), 1);
}

#[tokio::test]
async fn test_conflict_returns_to_first_step() {
    let mut form = wizard();
    fill_basic_info(&mut form);
    assert!(form.validate_and_next());
    fill_structure(&mut form);
    assert!(form.validate_and_next());
    assert!(form.is_last_step());

    let registry = Registry {
        taken: vec!["crawler".to_string()],
        registered: RefCell::new(Vec::new()),
    };
    let result = form.submit(&registry).await;

    assert_eq!(result, Err(RegistryError::Conflict));
    assert_eq!(form.current_step(), 0);
    assert_eq!(
        form.state().error("name"),
        Some("An agent with this name already exists")
    );
    assert!(!form.state().is_submitting());
    assert!(!form.state().is_submit_successful());
    assert!(registry.registered.borrow().is_empty());

    // rename and walk forward again
    form.set_value("name", json!("crawler-2"));
    assert!(form.validate_and_next());
    assert!(form.validate_and_next());
    let outcome = form.submit(&registry).await;
    assert_eq!(outcome, Ok(SubmitOutcome::Submitted));
    assert_eq!(registry.registered.borrow()[0].name, "crawler-2");
    assert!(form.state().is_submit_successful());
}

#[tokio::test]
async fn test_submit_before_last_step_advances() {
    let mut form = wizard();
    let registry = Registry {
        taken: Vec::new(),
        registered: RefCell::new(Vec::new()),
    };

    let outcome = form.submit(&registry).await;
    assert_eq!(outcome, Ok(SubmitOutcome::Advanced { step: 1 }));
    assert!(registry.registered.borrow().is_empty());
}

#[test]
fn test_blank_secret_rows_are_dropped() {
    let rows = vec![AuthEntry::new("API_KEY", "x"), AuthEntry::new("", "y")];
    let map = auth_array_to_object(&rows);
    assert_eq!(serde_json::Value::Object(map), json!({ "API_KEY": "x" }));
}

#[tokio::test]
async fn test_blank_secret_row_does_not_block_registration() {
    let mut form = wizard();
    fill_basic_info(&mut form);
    assert!(form.validate_and_next());
    fill_structure(&mut form);
    assert!(form.validate_and_next());

    form.set_value(
        "secrets",
        json!([{ "key": "api_key", "value": "x" }, { "key": "", "value": "y" }]),
    );
    let registry = Registry {
        taken: Vec::new(),
        registered: RefCell::new(Vec::new()),
    };

    assert_eq!(form.submit(&registry).await, Ok(SubmitOutcome::Submitted));
    let registered = registry.registered.borrow();
    assert_eq!(
        serde_json::Value::Object(registered[0].secrets.clone()),
        json!({ "API_KEY": "x" })
    );
}
