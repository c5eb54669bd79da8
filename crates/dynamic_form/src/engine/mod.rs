//! Form engine: active schema, entered values, validation and progress.
//!
//! - `state.rs`      : `FormState` / `ErrorState` maps
//! - `validation.rs` : `FieldError` and the per-field rules
//! - `progress.rs`   : `Progress` percentage
//! - `form.rs`       : `FormEngine`, the owner of all of the above

mod form;
mod progress;
mod state;
mod validation;

pub use form::{EngineError, FormEngine, SubmitOutcome, Submission};
pub use progress::Progress;
pub use state::{ErrorState, FormState};
pub use validation::{is_numeric, validate_field, FieldError};
