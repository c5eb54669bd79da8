use serde::{Deserialize, Serialize};
use strum::Display;

/// Generic popup outcomes interpreted by the central loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum UiOutcome {
    RequestClose,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    Update,
    /// Activate a form type; the empty string is the selector placeholder.
    SelectFormType(String),
    /// Live edit of one field value.
    SetFieldValue { name: String, value: String },
    Submit,
    ShowAlert { title: String, message: String },
    ClosePopup,
    UiOutcome(UiOutcome),
}
