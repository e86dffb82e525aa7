//! # grocer-pdf
//!
//! PDF output layer - low-level document capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW a document is written:
//! - Page content (text, rules) on top of `pdf-writer`
//! - WinAnsi encoding for the standard Type1 fonts
//! - Reading drawn text back with `lopdf`
//!
//! Business logic (WHAT goes on the page) stays in application code:
//! - Invoice layout → grocer-invoice
//!
//! ## Example
//!
//! ```ignore
//! use grocer_pdf::{Font, PdfDocument, PdfPage};
//!
//! let mut page = PdfPage::a4();
//! page.text(50.0, 790.0, Font::HelveticaBold, 18.0, "Fresh Grocer");
//! page.hline(50.0, 545.0, 780.0, 0.75);
//! page.text(330.0, 760.0, Font::Helvetica, 10.0, "TOTAL: 24.00 €");
//!
//! let mut doc = PdfDocument::new().with_title("Invoice #42");
//! doc.add_page(page);
//! let bytes = doc.build()?;
//! ```

mod document;
mod encoding;
mod error;
mod font;
mod inspect;

// Re-exports
pub use document::{A4_HEIGHT, A4_WIDTH, PdfDocument, PdfPage};
pub use encoding::{encode_win_ansi, is_win_ansi, truncate_chars};
pub use error::{PdfError, PdfResult};
pub use font::Font;
pub use inspect::shown_text;
