use spark::config::Settings;
use spark::forms::ValidationMode;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_wizard_definitions() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    fs::create_dir_all(root.join("config/wizards"))?;

    let spark_toml = r#"
[api]
base_url = "https://api.example.com"

[forms]
mode = "on_change"
validate_on_next = false
"#;
    fs::write(root.join("spark.toml"), spark_toml)?;

    let feedback_json = r#"
{
    "name": "feedback",
    "title": "Send Feedback",
    "endpoint": "/feedback",
    "fields": [
        { "name": "email", "type": "string", "required": true, "format": "email" },
        { "name": "message", "type": "string", "required": true, "max_length": 2000 }
    ],
    "steps": [
        { "id": "contact", "title": "Contact", "fields": ["email"] },
        { "id": "message", "title": "Message", "fields": ["message"] }
    ]
}
"#;
    fs::write(root.join("config/wizards/feedback.json"), feedback_json)?;

    let onboarding_yaml = r#"
name: onboarding
title: Onboarding
fields:
  - { name: team, type: string, required: true, one_of: [core, infra] }
  - { name: seats, type: number, min: 1 }
steps:
  - { id: team, title: Team, fields: [team, seats] }
"#;
    fs::write(root.join("config/wizards/onboarding.yaml"), onboarding_yaml)?;

    let survey_toml = r#"
name = "survey"
title = "Survey"

[[fields]]
name = "happy"
type = "boolean"

[[steps]]
id = "only"
title = "Only"
fields = ["happy"]
"#;
    fs::write(root.join("config/wizards/survey.toml"), survey_toml)?;

    let settings = Settings::from_root(root)?;

    assert_eq!(settings.api.base_url, "https://api.example.com");
    assert_eq!(settings.forms.mode, ValidationMode::OnChange);
    assert!(!settings.forms.validate_on_next);

    assert_eq!(settings.wizards.len(), 3);
    let feedback = settings.wizard("feedback").expect("feedback wizard");
    assert_eq!(feedback.steps.len(), 2);
    assert_eq!(
        feedback.request_url(&settings.api.base_url).as_deref(),
        Some("https://api.example.com/feedback")
    );
    let onboarding = settings.wizard("onboarding").expect("onboarding wizard");
    assert_eq!(onboarding.fields[0].one_of, vec!["core", "infra"]);
    assert!(settings.wizard("survey").is_some());

    // built-ins come first
    let names: Vec<String> = settings.all_wizards().into_iter().map(|w| w.name).collect();
    assert_eq!(&names[..2], &["worker_agent", "mcp_connection"]);

    Ok(())
}

#[test]
fn test_invalid_wizard_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/wizards"))?;

    let broken = r#"
name: broken
title: Broken
fields:
  - { name: code, type: string, pattern: "([a-z" }
steps:
  - { id: one, title: One, fields: [code, ghost] }
"#;
    fs::write(root.join("config/wizards/broken.yaml"), broken)?;

    let err = Settings::from_root(root).unwrap_err().to_string();
    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("ghost"));
    assert!(err.contains("wizards.broken.fields.code.pattern"));

    Ok(())
}

#[test]
fn test_duplicate_builtin_name_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/wizards"))?;

    let clash = r#"{
        "name": "worker_agent",
        "title": "Shadow",
        "fields": [{ "name": "x", "type": "string" }],
        "steps": [{ "id": "s", "title": "S", "fields": ["x"] }]
    }"#;
    fs::write(root.join("config/wizards/clash.json"), clash)?;

    let err = Settings::from_root(root).unwrap_err().to_string();
    assert!(err.contains("Duplicate entry: wizard 'worker_agent'"));

    Ok(())
}

#[test]
fn test_custom_wizards_dir() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("forms"))?;

    fs::write(root.join("spark.toml"), "wizards_dir = \"forms\"\n")?;
    fs::write(
        root.join("forms/single.yml"),
        "name: single\ntitle: Single\nfields:\n  - { name: a, type: string }\nsteps:\n  - { id: a, title: A, fields: [a] }\n",
    )?;

    let settings = Settings::from_root(root)?;
    assert!(settings.wizard("single").is_some());

    Ok(())
}
