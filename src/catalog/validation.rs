//! Schema checks for configuration documents.
//!
//! Every document is checked as a raw YAML value before it is turned into
//! model types: required keys must be present and each field must have its
//! declared type (text, or text-or-number for identifiers and sizes). Values
//! themselves are not judged, so `name: ""` or `customer_id: 0` pass. All
//! problems of a document are collected so one reload reports them at once.

use serde_yaml::{Mapping, Value};
use std::fmt;

use super::model::{value_kind, Section, SupplierDirectory};

/// A single invalid field in a configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `[3].acme.name`
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn missing(field: &str) -> Self {
        Self::new(field, "is required")
    }

    pub fn wrong_type(field: &str, expected: &str, found: &Value) -> Self {
        Self::new(
            field,
            format!("must be {}, found {}", expected, value_kind(found)),
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Ok if nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

/// Schema of one document of a configuration stream.
pub trait Validator {
    /// Check a raw document against the record schema.
    fn validate(document: &Value) -> Result<(), ValidationErrors>;
}

const TEXT: &str = "a string";
const TEXT_OR_NUMBER: &str = "a string or number";

fn is_text(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

fn is_text_or_number(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_))
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Check `key` of `record`; absent keys are an error only when `required`.
fn validate_field(
    record: &Mapping,
    path: &str,
    key: &str,
    required: bool,
    expected: (&str, fn(&Value) -> bool),
    errors: &mut ValidationErrors,
) {
    let field = child(path, key);
    match record.get(key) {
        Some(value) if !(expected.1)(value) => {
            errors.add(ValidationError::wrong_type(&field, expected.0, value))
        }
        Some(_) => {}
        None if required => errors.add(ValidationError::missing(&field)),
        None => {}
    }
}

fn as_mapping<'a>(
    value: &'a Value,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Mapping> {
    let mapping = value.as_mapping();
    if mapping.is_none() {
        errors.add(ValidationError::wrong_type(field, "a mapping", value));
    }
    mapping
}

/// Keys of the mapping that are strings, paired with their values.
fn text_keys<'a>(
    mapping: &'a Mapping,
    path: &str,
    errors: &mut ValidationErrors,
) -> Vec<(&'a str, &'a Value)> {
    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        match key.as_str() {
            Some(key) => entries.push((key, value)),
            None => errors.add(ValidationError::wrong_type(
                &child(path, "<key>"),
                TEXT,
                key,
            )),
        }
    }
    entries
}

fn validate_article(value: &Value, path: &str, errors: &mut ValidationErrors) {
    let Some(article) = as_mapping(value, path, errors) else {
        return;
    };
    validate_field(article, path, "name", true, (TEXT, is_text), errors);
    for key in ["id", "size"] {
        validate_field(article, path, key, false, (TEXT_OR_NUMBER, is_text_or_number), errors);
    }
}

fn validate_article_choice(value: &Value, path: &str, errors: &mut ValidationErrors) {
    let Some(choice) = as_mapping(value, path, errors) else {
        return;
    };
    for (key, value) in text_keys(choice, path, errors) {
        if key == "hint" {
            validate_field(choice, path, "hint", false, (TEXT, is_text), errors);
        } else {
            validate_article(value, &child(path, key), errors);
        }
    }
}

fn validate_supplier_info(value: &Value, path: &str, errors: &mut ValidationErrors) {
    let Some(info) = as_mapping(value, path, errors) else {
        return;
    };
    validate_field(info, path, "customer_id", true, (TEXT_OR_NUMBER, is_text_or_number), errors);
    for key in ["name", "tax_id", "from_address", "from_name", "from_phone"] {
        validate_field(info, path, key, true, (TEXT, is_text), errors);
    }
}

impl Validator for Section {
    fn validate(document: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match document.as_sequence() {
            Some(choices) => {
                for (i, choice) in choices.iter().enumerate() {
                    validate_article_choice(choice, &format!("[{}]", i), &mut errors);
                }
            }
            None => errors.add(ValidationError::wrong_type("<document>", "a list", document)),
        }
        errors.into_result()
    }
}

impl Validator for SupplierDirectory {
    fn validate(document: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(directory) = as_mapping(document, "<document>", &mut errors) {
            for (supplier, info) in text_keys(directory, "", &mut errors) {
                validate_supplier_info(info, supplier, &mut errors);
            }
        }
        errors.into_result()
    }
}
