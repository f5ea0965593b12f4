use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

use crate::config::{ApiSettings, Settings};
use crate::forms::{FieldSchema, FormOptions};
use crate::wizards::WizardDefinition;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cross-reference error: {0}")]
    CrossReference(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_api(&settings.api) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_wizards(&settings.all_wizards()) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_api(api: &ApiSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if api.base_url.is_empty() {
            errors.push(ValidationError::MissingField("api.base_url".to_string()));
        } else if !(api.base_url.starts_with("http://") || api.base_url.starts_with("https://")) {
            errors.push(ValidationError::InvalidValue {
                field: "api.base_url".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Check a set of wizards, including names clashing across them
    pub fn validate_wizards(wizards: &[WizardDefinition]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut names = HashSet::new();

        for wizard in wizards {
            if wizard.name.is_empty() {
                errors.push(ValidationError::MissingField("wizard.name".to_string()));
            } else if !names.insert(wizard.name.as_str()) {
                errors.push(ValidationError::Duplicate(format!("wizard '{}'", wizard.name)));
            }
            errors.extend(Self::validate_wizard(wizard));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_wizard(wizard: &WizardDefinition) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let prefix = format!("wizards.{}", wizard.name);

        if wizard.steps.is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: format!("{}.steps", prefix),
                reason: "At least one step is required".to_string(),
            });
        }

        Self::validate_fields(&wizard.fields, &format!("{}.fields", prefix), &mut errors);
        let field_names: HashSet<&str> = wizard.fields.iter().map(|f| f.name.as_str()).collect();

        let mut step_ids = HashSet::new();
        for step in &wizard.steps {
            if !step_ids.insert(step.id.as_str()) {
                errors.push(ValidationError::Duplicate(format!(
                    "step '{}' in wizard '{}'",
                    step.id, wizard.name
                )));
            }
            for name in &step.fields {
                if !field_names.contains(name.as_str()) {
                    errors.push(ValidationError::CrossReference(format!(
                        "Step '{}' of wizard '{}' references unknown field '{}'",
                        step.id, wizard.name, name
                    )));
                }
            }
        }

        if !wizard.steps.is_empty() {
            for name in wizard.unassigned_fields() {
                errors.push(ValidationError::CrossReference(format!(
                    "Field '{}' of wizard '{}' is not placed on any step",
                    name, wizard.name
                )));
            }
        }

        // Anything the checks above missed still has to surface before the wizard is used
        if errors.is_empty() {
            if let Err(e) = wizard.build(FormOptions::default()) {
                errors.push(ValidationError::InvalidValue {
                    field: prefix,
                    reason: e.to_string(),
                });
            }
        }

        errors
    }

    /// Duplicate names and invalid patterns, one level at a time down into array items
    fn validate_fields(fields: &[FieldSchema], path: &str, errors: &mut Vec<ValidationError>) {
        let mut names = HashSet::new();
        for field in fields {
            let field_path = format!("{}.{}", path, field.name);
            if !names.insert(field.name.as_str()) {
                errors.push(ValidationError::Duplicate(format!("field '{}'", field_path)));
            }
            if let Some(pattern) = &field.pattern {
                if let Err(e) = Regex::new(pattern) {
                    errors.push(ValidationError::InvalidValue {
                        field: format!("{}.pattern", field_path),
                        reason: e.to_string(),
                    });
                }
            }
            Self::validate_fields(&field.items, &format!("{}.items", field_path), errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::StepDefinition;
    use crate::wizards;

    fn wizard(fields: Vec<FieldSchema>, steps: Vec<StepDefinition>) -> WizardDefinition {
        WizardDefinition {
            name: "custom".to_string(),
            title: "Custom".to_string(),
            description: None,
            endpoint: None,
            fields,
            steps,
        }
    }

    #[test]
    fn test_builtins_are_valid() {
        assert!(ConfigValidator::validate_wizards(&wizards::builtin()).is_ok());
    }

    #[test]
    fn test_one_error_per_problem() {
        let broken = wizard(
            vec![
                FieldSchema::string("a").pattern("(unclosed"),
                FieldSchema::string("a"),
            ],
            vec![StepDefinition::new("one", "One").with_fields(["a", "missing"])],
        );
        let errors = ConfigValidator::validate_wizards(&[broken]).unwrap_err();
        assert_eq!(errors.len(), 3, "{:?}", errors);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Duplicate(_))));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::CrossReference(_))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidValue { field, .. } if field.ends_with("a.pattern"))));
    }

    #[test]
    fn test_duplicate_item_names_are_rejected() {
        let rows = wizard(
            vec![FieldSchema::array(
                "rows",
                vec![FieldSchema::string("k"), FieldSchema::string("k")],
            )],
            vec![StepDefinition::new("one", "One").with_fields(["rows"])],
        );
        assert!(rows.build(FormOptions::default()).is_err());

        let errors = ConfigValidator::validate_wizards(&[rows]).unwrap_err();
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(
            matches!(&errors[0], ValidationError::Duplicate(d) if d.contains("rows.items.k")),
            "{:?}",
            errors
        );
    }

    #[test]
    fn test_invalid_item_pattern_is_reported_once() {
        let rows = wizard(
            vec![FieldSchema::array(
                "rows",
                vec![FieldSchema::string("k").pattern("[")],
            )],
            vec![StepDefinition::new("one", "One").with_fields(["rows"])],
        );
        let errors = ConfigValidator::validate_wizards(&[rows]).unwrap_err();
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidValue { field, .. } if field == "wizards.custom.fields.rows.items.k.pattern"
        ));
    }

    #[test]
    fn test_empty_steps() {
        let errors =
            ConfigValidator::validate_wizards(&[wizard(vec![FieldSchema::string("a")], vec![])])
                .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("At least one step"));
    }

    #[test]
    fn test_name_clash_with_builtin() {
        let mut all = wizards::builtin();
        let mut clash = wizard(
            vec![FieldSchema::string("a")],
            vec![StepDefinition::new("one", "One").with_fields(["a"])],
        );
        clash.name = wizards::worker_agent::NAME.to_string();
        all.push(clash);

        let errors = ConfigValidator::validate_wizards(&all).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ValidationError::Duplicate(d) if d.contains("worker_agent")));
    }

    #[test]
    fn test_invalid_base_url() {
        let api = ApiSettings {
            base_url: "localhost:8000".to_string(),
        };
        assert!(ConfigValidator::validate_api(&api).is_err());
    }
}
