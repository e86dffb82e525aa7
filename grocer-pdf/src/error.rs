//! Error types for the PDF library

use thiserror::Error;

/// PDF error types
#[derive(Debug, Error)]
pub enum PdfError {
    /// IO error while writing the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document has no pages
    #[error("Document has no pages")]
    EmptyDocument,

    /// Document could not be read back
    #[error("Parse error: {0}")]
    Parse(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type PdfResult<T> = Result<T, PdfError>;
