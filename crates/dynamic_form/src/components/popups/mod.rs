//! Modal popups drawn above the form page.

pub mod alert;

pub use alert::AlertPopup;
pub use crate::components::popup::{centered_rect_fixed, draw_popup_frame};
