//! Output module - document assembly and PDF generation

mod pdf;

pub use pdf::{assemble, wrap_document};
