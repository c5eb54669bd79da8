//! Field descriptors: the declarative half of a form.
//!
//! A `FieldDescriptor` names one input, says which kind of control renders it
//! and whether a value is mandatory. Descriptors are immutable once a
//! `SchemaRegistry` has been built.
//!
//! ```ignore
//! use dynamic_form::schema::{FieldDescriptor, FieldKind};
//!
//! let age = FieldDescriptor::new("age", "Age", FieldKind::Number).required();
//! ```

use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of input control backing a field.
///
/// Notes:
/// - Text / Number / Password / Date render as single-line editors
/// - Password is only obfuscated visually; the value is kept plain in state
/// - Date is free text; the editor shows a `YYYY-MM-DD` hint
/// - Dropdown cycles through `options` with Left/Right
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(tag = "type", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Password,
    Date,
    Dropdown { options: Vec<String> },
}

impl FieldKind {
    /// Selectable options; empty for every kind but `Dropdown`.
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Dropdown { options } => options,
            _ => &[],
        }
    }

    pub fn is_dropdown(&self) -> bool {
        matches!(self, FieldKind::Dropdown { .. })
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique key within its schema; also the key in `FormState`.
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    /// Create an optional field.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
        }
    }

    /// Mark the field as mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Shorthand for a dropdown field with the given options.
    pub fn dropdown<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            label,
            FieldKind::Dropdown {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    /// Return true if this field uses a textual editor when focused.
    pub fn is_textual(&self) -> bool {
        !self.kind.is_dropdown()
    }

    /// Placeholder shown while a dropdown has no selection.
    pub fn placeholder(&self) -> Option<String> {
        self.kind
            .is_dropdown()
            .then(|| format!("Select {}", self.label))
    }

    /// Hint rendered next to empty editors.
    pub fn input_hint(&self) -> Option<&'static str> {
        match self.kind {
            FieldKind::Date => Some("YYYY-MM-DD"),
            _ => None,
        }
    }
}
