mod content_form;
mod result_panel;

pub use content_form::content_form;
pub use result_panel::{result_color, result_panel};
