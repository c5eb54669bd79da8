use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, info};

use super::{validate_field, ErrorState, FieldError, FormState, Progress};
use crate::schema::{FieldDescriptor, FieldKind, SchemaRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown field `{name}` for form type `{form_type}`")]
    UnknownField { name: String, form_type: String },
}

/// Accepted values of a successful submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub form_type: String,
    /// Field name to value in schema order. Number fields are JSON numbers,
    /// absent optional fields are `null`.
    pub values: JsonMap<String, JsonValue>,
    pub progress: Progress,
}

/// Result of [`FormEngine::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Every field passed; this is the success signal.
    Accepted(Submission),
    /// At least one field failed; details are in [`FormEngine::errors`].
    Rejected { error_count: usize, progress: Progress },
    /// The active schema has no fields; nothing was validated.
    NoFields,
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

/// Holds the active form type, its values, the last validation errors and
/// the last progress. The four mutators are the only way to change them.
#[derive(Debug, Clone)]
pub struct FormEngine {
    registry: Arc<SchemaRegistry>,
    form_type: String,
    values: FormState,
    errors: ErrorState,
    progress: Option<Progress>,
}

impl Default for FormEngine {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin())
    }
}

impl FormEngine {
    /// Start with no form type selected.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            form_type: String::new(),
            values: FormState::default(),
            errors: ErrorState::default(),
            progress: None,
        }
    }

    // --- Mutators --------------------------------------------------------------------------

    /// Activate the schema for `id` and reset values, errors and progress.
    ///
    /// Unknown identifiers are accepted and yield an empty field list.
    pub fn select_form_type(&mut self, id: impl Into<String>) {
        self.form_type = id.into();
        self.values.clear();
        self.errors.clear();
        self.progress = None;
        debug!(
            form_type = %self.form_type,
            fields = self.fields().len(),
            "form type selected"
        );
    }

    /// Merge one value into the form state. No validation happens here.
    pub fn set_field_value(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), EngineError> {
        if self.field(name).is_none() {
            return Err(EngineError::UnknownField {
                name: name.to_string(),
                form_type: self.form_type.clone(),
            });
        }
        self.values.set_value(name, value);
        Ok(())
    }

    /// Validate every field in schema order and recompute errors and progress.
    pub fn submit(&mut self) -> SubmitOutcome {
        let registry = Arc::clone(&self.registry);
        let fields = registry.lookup(&self.form_type);
        if fields.is_empty() {
            debug!(form_type = %self.form_type, "submit ignored, no fields");
            return SubmitOutcome::NoFields;
        }

        self.errors.clear();
        let mut valid = 0usize;
        for field in fields {
            match validate_field(field, self.values.get_value(&field.name)) {
                Ok(()) => valid += 1,
                Err(err) => self.errors.insert(field.name.clone(), err),
            }
        }

        // fields is non-empty, so from_counts always yields a value
        let progress = Progress::from_counts(valid, fields.len()).unwrap_or_default();
        self.progress = Some(progress);

        if self.errors.is_empty() {
            info!(form_type = %self.form_type, "form submitted");
            SubmitOutcome::Accepted(Submission {
                form_type: self.form_type.clone(),
                values: self.submission_values(fields),
                progress,
            })
        } else {
            debug!(
                form_type = %self.form_type,
                errors = self.errors.len(),
                %progress,
                "submission rejected"
            );
            SubmitOutcome::Rejected {
                error_count: self.errors.len(),
                progress,
            }
        }
    }

    fn submission_values(&self, fields: &[FieldDescriptor]) -> JsonMap<String, JsonValue> {
        let mut map = JsonMap::new();
        for field in fields {
            let value = match self.values.get_value(&field.name) {
                None | Some("") => JsonValue::Null,
                Some(v) if matches!(field.kind, FieldKind::Number) => number_value(v),
                Some(v) => JsonValue::String(v.to_string()),
            };
            map.insert(field.name.clone(), value);
        }
        map
    }

    // --- Accessors -------------------------------------------------------------------------

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Active form-type identifier; empty while nothing is selected.
    pub fn form_type(&self) -> &str {
        &self.form_type
    }

    pub fn form_label(&self) -> Option<&str> {
        self.registry
            .form_type(&self.form_type)
            .map(|form_type| form_type.label.as_str())
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        self.registry.lookup(&self.form_type)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields().iter().find(|f| f.name == name)
    }

    pub fn has_fields(&self) -> bool {
        !self.fields().is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get_value(name)
    }

    pub fn values(&self) -> &FormState {
        &self.values
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.errors.get(name)
    }

    /// Errors paired with their fields, in schema order.
    pub fn error_entries(&self) -> Vec<(&FieldDescriptor, &FieldError)> {
        self.fields()
            .iter()
            .filter_map(|field| self.errors.get(&field.name).map(|err| (field, err)))
            .collect()
    }

    /// Progress of the last submit for the current form type.
    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    pub fn has_submitted(&self) -> bool {
        self.progress.is_some()
    }
}

/// JSON form of a number field. Values that passed `is_numeric` always
/// yield a number; anything else becomes `null`.
fn number_value(raw: &str) -> JsonValue {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return JsonValue::from(n);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(JsonNumber::from_f64)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}
