//! Read back the text drawn into a document
//!
//! Used to check and preview rendered documents without a viewer. Only
//! single-byte WinAnsi strings shown with `Tj` are understood, which is
//! everything [`PdfPage`] draws.
//!
//! [`PdfPage`]: crate::PdfPage

use lopdf::content::Content;
use lopdf::{Document, Object};

use crate::error::PdfResult;

/// Strings shown by text operators, page by page in drawing order
pub fn shown_text(pdf: &[u8]) -> PdfResult<Vec<String>> {
    let doc = Document::load_mem(pdf)?;
    let mut result = Vec::new();

    for page_id in doc.get_pages().into_values() {
        let content = Content::decode(&doc.get_page_content(page_id)?)?;
        for op in content.operations {
            if op.operator != "Tj" {
                continue;
            }
            if let Some(Object::String(bytes, _)) = op.operands.first() {
                let (text, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
                result.push(text.into_owned());
            }
        }
    }

    Ok(result)
}
