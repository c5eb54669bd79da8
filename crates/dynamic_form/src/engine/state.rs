//! Mutable runtime state of the active form.
//!
//! - `FormState`  : entered values keyed by field name
//! - `ErrorState` : one validation error per field, recomputed on every submit

use std::collections::HashMap;

use super::FieldError;

/// Current user-entered values keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormState {
    values: HashMap<String, String>,
}

impl FormState {
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// Validation errors of the last submission attempt.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorState {
    errors: HashMap<String, FieldError>,
}

impl ErrorState {
    pub fn get(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Human readable message for `name`, if it failed validation.
    pub fn message(&self, name: &str) -> Option<String> {
        self.errors.get(name).map(ToString::to_string)
    }

    pub fn insert(&mut self, name: impl Into<String>, error: FieldError) {
        self.errors.insert(name.into(), error);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.errors.contains_key(name)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}
