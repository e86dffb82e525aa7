//! Invoice rendering and generation

pub mod format;
mod renderer;
mod service;

pub use renderer::InvoiceRenderer;
pub use service::InvoiceService;
