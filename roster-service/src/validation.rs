// Form validation rules for user records
// Pure checks: no network, no session state.

use crate::models::{Field, NewUser};

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex")
});

/// Per-field validation messages. Empty means the candidate is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    /// Set or clear the message for one field
    pub fn set(&mut self, field: Field, message: Option<String>) {
        match message {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Validate every field of a candidate user
pub fn validate(candidate: &NewUser) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for field in Field::ALL {
        errors.set(field, validate_field(field, candidate.get(field)));
    }
    errors
}

/// Validate a single field value, returning its message if a rule is violated
pub fn validate_field(field: Field, value: &str) -> Option<String> {
    let trimmed = value.trim();
    match field {
        Field::Name if trimmed.is_empty() => Some("Name is required".to_string()),
        Field::Email if trimmed.is_empty() => Some("Email is required".to_string()),
        Field::Email if !EMAIL_PATTERN.is_match(value) => Some("Email is invalid".to_string()),
        Field::Phone if trimmed.is_empty() => Some("Phone is required".to_string()),
        _ => None,
    }
}
