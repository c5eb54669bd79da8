//! The form page: selector, schema-driven fields, submit and progress.
//!
//! - `page.rs`   : focus, editing and key handling; owns the `FormEngine`
//! - `render.rs` : layout and drawing

mod page;
mod render;

pub use page::{format_value, Focus, FormPage, SUCCESS_MESSAGE, SUCCESS_TITLE};
pub use render::{compute_scrollbar_thumb, render_form_page, FormRenderMetrics, FOOTER, HEADER};
