//! Declarative form schema and its constraint pipeline.
//!
//! Every field is checked in the same order: presence, then shape (type and
//! per-type constraints, rows of array fields included), then transform. A
//! transform only runs on a value that passed the first two stages, and the
//! transformed value is what ends up in the validated output.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use super::error::FormError;
use super::path::{FieldPath, PathSegment};
use super::state::FieldErrors;
use super::values::FormValues;
use crate::transform::generate_label;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});

/// Semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Array of objects described by the field's `items`
    Array,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            FieldKind::String => "text value",
            FieldKind::Number => "number",
            FieldKind::Boolean => "yes/no value",
            FieldKind::Array => "list",
        }
    }
}

/// Well-known string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    Email,
    Url,
    /// The string must parse as JSON
    Json,
}

/// Rewrites applied to a valid string value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    Trim,
    Uppercase,
    Lowercase,
}

impl Transform {
    pub fn apply(self, input: &str) -> String {
        match self {
            Transform::Trim => input.trim().to_string(),
            Transform::Uppercase => input.to_uppercase(),
            Transform::Lowercase => input.to_lowercase(),
        }
    }
}

/// Constraint identifiers, used to override default messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Required,
    Type,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    OneOf,
    Min,
    Max,
    MinItems,
}

/// Description of one field and its constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,
    /// Allowed values for a string field (rendered as a select)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    /// Row fields of an array field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FieldSchema>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<Constraint, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldSchema {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            required: false,
            min_length: None,
            max_length: None,
            pattern: None,
            format: None,
            one_of: Vec::new(),
            min: None,
            max: None,
            min_items: None,
            transform: None,
            items: Vec::new(),
            messages: BTreeMap::new(),
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Array of objects whose rows are described by `items`
    pub fn array(name: impl Into<String>, items: Vec<FieldSchema>) -> Self {
        let mut field = Self::new(name, FieldKind::Array);
        field.items = items;
        field
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn one_of<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn min(mut self, n: f64) -> Self {
        self.min = Some(n);
        self
    }

    pub fn max(mut self, n: f64) -> Self {
        self.max = Some(n);
        self
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Override the message reported when `constraint` fails
    pub fn message(mut self, constraint: Constraint, message: impl Into<String>) -> Self {
        self.messages.insert(constraint, message.into());
        self
    }

    /// Label shown next to the input; generated from the name when unset
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| generate_label(&self.name))
    }

    fn message_for(&self, constraint: Constraint, default: impl FnOnce(&str) -> String) -> String {
        self.messages
            .get(&constraint)
            .cloned()
            .unwrap_or_else(|| default(self.display_label().as_str()))
    }
}

enum Checked {
    Valid(Option<Value>),
    Invalid,
}

/// Immutable schema for one form instance. Patterns are compiled up front.
#[derive(Debug, Clone)]
pub struct FormSchema {
    fields: Vec<FieldSchema>,
    patterns: HashMap<String, Regex>,
}

impl FormSchema {
    /// Build a schema, rejecting duplicate names and invalid patterns
    pub fn new(fields: Vec<FieldSchema>) -> Result<Self, FormError> {
        let mut patterns = HashMap::new();
        compile_fields(&fields, &mut patterns)?;
        Ok(Self { fields, patterns })
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Top-level field by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Field description for a path, descending into array rows
    pub fn field_for_path(&self, path: &FieldPath) -> Option<&FieldSchema> {
        let mut scope: &[FieldSchema] = &self.fields;
        let mut found = None;
        for seg in path.segments() {
            match seg {
                PathSegment::Property(name) => {
                    let field = scope.iter().find(|f| &f.name == name)?;
                    scope = &field.items;
                    found = Some(field);
                }
                PathSegment::Index(_) => {
                    if found.map(|f| f.kind) != Some(FieldKind::Array) {
                        return None;
                    }
                }
                PathSegment::Invalid(_) => return None,
            }
        }
        found
    }

    /// Defaults declared on the fields themselves
    pub fn default_values(&self) -> FormValues {
        let mut values = FormValues::new();
        for field in &self.fields {
            if let Some(default) = &field.default {
                values.set(&field.name, default.clone());
            }
        }
        values
    }

    /// Validate every field.
    ///
    /// On success the returned values carry transformed field values; keys the
    /// schema does not describe pass through untouched.
    pub fn validate(&self, values: &FormValues) -> Result<FormValues, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut output = values.clone();
        for field in &self.fields {
            let path = FieldPath::root().push_property(&field.name);
            if let Checked::Valid(Some(value)) =
                self.check(field, values.as_map().get(&field.name), &path, &mut errors)
            {
                output.set(&field.name, value);
            }
        }
        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }

    /// Validate a subset of top-level fields; names the schema does not know are ignored
    pub fn validate_fields(&self, names: &[&str], values: &FormValues) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for name in names {
            if let Some(field) = self.field(name) {
                let path = FieldPath::root().push_property(&field.name);
                self.check(field, values.as_map().get(&field.name), &path, &mut errors);
            }
        }
        errors
    }

    fn check(
        &self,
        field: &FieldSchema,
        value: Option<&Value>,
        path: &FieldPath,
        errors: &mut FieldErrors,
    ) -> Checked {
        // presence
        let Some(present) = value.filter(|v| !is_blank(v)) else {
            if field.required {
                errors.insert(
                    path.to_string(),
                    field.message_for(Constraint::Required, |label| format!("{} is required", label)),
                );
                return Checked::Invalid;
            }
            return Checked::Valid(value.cloned());
        };

        // shape
        let shaped = match field.kind {
            FieldKind::String => self.check_string(field, present),
            FieldKind::Number => check_number(field, present),
            FieldKind::Boolean => match present {
                Value::Bool(_) => Ok(present.clone()),
                _ => Err(type_message(field)),
            },
            FieldKind::Array => return self.check_array(field, present, path, errors),
        };

        match shaped {
            Ok(value) => Checked::Valid(Some(apply_transform(field, value))),
            Err(message) => {
                errors.insert(path.to_string(), message);
                Checked::Invalid
            }
        }
    }

    fn check_string(&self, field: &FieldSchema, value: &Value) -> Result<Value, String> {
        let Some(s) = value.as_str() else {
            return Err(type_message(field));
        };
        let len = s.chars().count();

        if let Some(min) = field.min_length {
            if len < min {
                return Err(field.message_for(Constraint::MinLength, |label| {
                    format!("{} must be at least {} characters", label, min)
                }));
            }
        }
        if let Some(max) = field.max_length {
            if len > max {
                return Err(field.message_for(Constraint::MaxLength, |label| {
                    format!("{} must be at most {} characters", label, max)
                }));
            }
        }
        if let Some(pattern) = &field.pattern {
            if let Some(re) = self.patterns.get(pattern) {
                if !re.is_match(s) {
                    return Err(field.message_for(Constraint::Pattern, |label| {
                        format!("{} has an invalid format", label)
                    }));
                }
            }
        }
        if let Some(format) = field.format {
            let ok = match format {
                StringFormat::Email => EMAIL_RE.is_match(s),
                StringFormat::Url => URL_RE.is_match(s),
                StringFormat::Json => serde_json::from_str::<Value>(s).is_ok(),
            };
            if !ok {
                return Err(field.message_for(Constraint::Format, |label| match format {
                    StringFormat::Email => format!("{} must be a valid email address", label),
                    StringFormat::Url => format!("{} must be a valid URL", label),
                    StringFormat::Json => format!("{} must be valid JSON", label),
                }));
            }
        }
        if !field.one_of.is_empty() && !field.one_of.iter().any(|o| o == s) {
            return Err(field.message_for(Constraint::OneOf, |label| {
                format!("{} must be one of: {}", label, field.one_of.join(", "))
            }));
        }
        Ok(value.clone())
    }

    fn check_array(
        &self,
        field: &FieldSchema,
        value: &Value,
        path: &FieldPath,
        errors: &mut FieldErrors,
    ) -> Checked {
        let Some(rows) = value.as_array() else {
            errors.insert(path.to_string(), type_message(field));
            return Checked::Invalid;
        };
        if let Some(min) = field.min_items {
            if rows.len() < min {
                errors.insert(
                    path.to_string(),
                    field.message_for(Constraint::MinItems, |label| {
                        format!("{} must contain at least {} items", label, min)
                    }),
                );
                return Checked::Invalid;
            }
        }

        let mut valid = true;
        let mut output = Vec::with_capacity(rows.len());
        for (idx, row) in rows.iter().enumerate() {
            let row_path = path.push_index(idx);
            let Some(obj) = row.as_object() else {
                errors.insert(row_path.to_string(), type_message(field));
                valid = false;
                continue;
            };
            let mut out_row: Map<String, Value> = obj.clone();
            for item in &field.items {
                let item_path = row_path.push_property(&item.name);
                match self.check(item, obj.get(&item.name), &item_path, errors) {
                    Checked::Valid(Some(v)) => {
                        out_row.insert(item.name.clone(), v);
                    }
                    Checked::Valid(None) => {}
                    Checked::Invalid => valid = false,
                }
            }
            output.push(Value::Object(out_row));
        }

        if valid {
            Checked::Valid(Some(Value::Array(output)))
        } else {
            Checked::Invalid
        }
    }
}

fn compile_fields(
    fields: &[FieldSchema],
    patterns: &mut HashMap<String, Regex>,
) -> Result<(), FormError> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(FormError::DuplicateField(field.name.clone()));
        }
        if let Some(pattern) = &field.pattern {
            if !patterns.contains_key(pattern) {
                let re = Regex::new(pattern).map_err(|source| FormError::InvalidPattern {
                    field: field.name.clone(),
                    source,
                })?;
                patterns.insert(pattern.clone(), re);
            }
        }
        compile_fields(&field.items, patterns)?;
    }
    Ok(())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn check_number(field: &FieldSchema, value: &Value) -> Result<Value, String> {
    let Some(n) = value.as_f64() else {
        return Err(type_message(field));
    };
    if let Some(min) = field.min {
        if n < min {
            return Err(field.message_for(Constraint::Min, |label| {
                format!("{} must be at least {}", label, min)
            }));
        }
    }
    if let Some(max) = field.max {
        if n > max {
            return Err(field.message_for(Constraint::Max, |label| {
                format!("{} must be at most {}", label, max)
            }));
        }
    }
    Ok(value.clone())
}

fn type_message(field: &FieldSchema) -> String {
    field.message_for(Constraint::Type, |label| {
        format!("{} must be a {}", label, field.kind.describe())
    })
}

fn apply_transform(field: &FieldSchema, value: Value) -> Value {
    match (field.transform, &value) {
        (Some(t), Value::String(s)) => Value::String(t.apply(s)),
        _ => value,
    }
}
