pub mod handlers;
pub mod pdf;

pub use pdf::{encode_pdf, RenderError};
