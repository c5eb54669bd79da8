use std::sync::Arc;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::{FieldDescriptor, FieldKind};

/// A schema together with its selector label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormType {
    pub id: String,
    pub label: String,
    pub fields: Vec<FieldDescriptor>,
}

impl FormType {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Immutable mapping from form-type identifier to its ordered field list.
///
/// Entries keep insertion order, which is also the order of the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    form_types: Vec<FormType>,
}

lazy_static! {
    static ref BUILTIN: Arc<SchemaRegistry> = Arc::new(SchemaRegistry::new(vec![
        FormType::new(
            "userInfo",
            "User Information",
            vec![
                FieldDescriptor::new("firstName", "First Name", FieldKind::Text).required(),
                FieldDescriptor::new("lastName", "Last Name", FieldKind::Text).required(),
                FieldDescriptor::new("age", "Age", FieldKind::Number).required(),
            ],
        ),
        FormType::new(
            "addressInfo",
            "Address Information",
            vec![
                FieldDescriptor::new("street", "Street", FieldKind::Text).required(),
                FieldDescriptor::new("city", "City", FieldKind::Text).required(),
                FieldDescriptor::dropdown("state", "State", ["California", "Texas", "New York"])
                    .required(),
                FieldDescriptor::new("zipCode", "Zip Code", FieldKind::Text).required(),
            ],
        ),
        FormType::new(
            "paymentInfo",
            "Payment Information",
            vec![
                FieldDescriptor::new("cardNumber", "Card Number", FieldKind::Text).required(),
                FieldDescriptor::new("expiryDate", "Expiry Date", FieldKind::Date).required(),
                FieldDescriptor::new("cvv", "CVV", FieldKind::Password).required(),
                FieldDescriptor::new("cardholderName", "Cardholder Name", FieldKind::Text)
                    .required(),
            ],
        ),
    ]));
}

impl SchemaRegistry {
    pub fn new(form_types: Vec<FormType>) -> Self {
        Self { form_types }
    }

    /// The process-wide table of built-in form types, built on first use.
    pub fn builtin() -> Arc<SchemaRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Ordered field list for `id`; empty for unknown or empty identifiers.
    pub fn lookup(&self, id: &str) -> &[FieldDescriptor] {
        self.form_type(id)
            .map(|form_type| form_type.fields.as_slice())
            .unwrap_or(&[])
    }

    pub fn form_type(&self, id: &str) -> Option<&FormType> {
        if id.is_empty() {
            return None;
        }
        self.form_types.iter().find(|form_type| form_type.id == id)
    }

    pub fn form_types(&self) -> &[FormType] {
        &self.form_types
    }

    pub fn contains(&self, id: &str) -> bool {
        self.form_type(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.form_types.iter().map(|form_type| form_type.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.form_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.form_types.is_empty()
    }
}
