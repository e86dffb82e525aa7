//! PDF document builder
//!
//! Thin layer over `pdf-writer`: pages collect content operators through
//! a fluent API, and the document assigns object ids and registers the
//! built-in fonts when it is serialized.

use std::io::Write;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::{debug, instrument};

use crate::encoding::encode_win_ansi;
use crate::error::{PdfError, PdfResult};
use crate::font::Font;

/// A4 width in points
pub const A4_WIDTH: f32 = 595.0;
/// A4 height in points
pub const A4_HEIGHT: f32 = 842.0;

const PRODUCER: &str = "grocer-pdf";

/// Single page content builder
///
/// Coordinates are PDF user space: origin bottom-left, y grows upwards.
/// Content placed outside the media box is written as-is and simply not
/// visible.
pub struct PdfPage {
    content: Content,
}

impl PdfPage {
    /// Create an A4 portrait page
    pub fn a4() -> Self {
        Self {
            content: Content::new(),
        }
    }

    // === Text Output ===

    /// Draw text with its baseline starting at (x, y)
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, s: &str) -> &mut Self {
        let encoded = encode_win_ansi(s);
        self.content
            .begin_text()
            .set_font(Name(font.resource_name().as_bytes()), size)
            .next_line(x, y)
            .show(Str(&encoded))
            .end_text();
        self
    }

    // === Separators ===

    /// Draw a horizontal rule from x1 to x2 at height y
    pub fn hline(&mut self, x1: f32, x2: f32, y: f32, thickness: f32) -> &mut Self {
        self.content
            .set_line_width(thickness)
            .move_to(x1, y)
            .line_to(x2, y)
            .stroke();
        self
    }
}

impl Default for PdfPage {
    fn default() -> Self {
        Self::a4()
    }
}

/// PDF document
///
/// Pages are frozen into content streams as they are added. The document
/// uses the two built-in Helvetica fonts only, so nothing needs embedding.
/// No creation date or document id is written: the same pages always
/// produce the same bytes.
pub struct PdfDocument {
    title: Option<String>,
    pages: Vec<Vec<u8>>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self {
            title: None,
            pages: Vec::new(),
        }
    }

    /// Set the document title (Info dictionary)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_page(&mut self, page: PdfPage) -> &mut Self {
        self.pages.push(page.content.finish());
        self
    }

    /// Build the complete document into a byte buffer
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn build(&self) -> PdfResult<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(PdfError::EmptyDocument);
        }

        let mut next_id = 1;
        let mut alloc = || {
            let id = Ref::new(next_id);
            next_id += 1;
            id
        };

        let catalog_id = alloc();
        let tree_id = alloc();
        let info_id = alloc();
        let font_ids: Vec<(Font, Ref)> = Font::ALL.iter().map(|&f| (f, alloc())).collect();
        let page_ids: Vec<(Ref, Ref)> = self.pages.iter().map(|_| (alloc(), alloc())).collect();

        let mut pdf = Pdf::new();
        pdf.set_version(1, 4);
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|&(page_id, _)| page_id))
            .count(page_ids.len() as i32);

        {
            let mut info = pdf.document_info(info_id);
            info.producer(TextStr(PRODUCER));
            if let Some(title) = &self.title {
                info.title(TextStr(title));
            }
            info.finish();
        }

        for &(font, id) in &font_ids {
            pdf.type1_font(id)
                .base_font(Name(font.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (content, &(page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(0.0, 0.0, A4_WIDTH, A4_HEIGHT));
            page.parent(tree_id);
            page.contents(content_id);
            {
                let mut resources = page.resources();
                let mut fonts = resources.fonts();
                for &(font, id) in &font_ids {
                    fonts.pair(Name(font.resource_name().as_bytes()), id);
                }
            }
            page.finish();

            pdf.stream(content_id, content);
        }

        let bytes = pdf.finish();
        debug!(bytes = bytes.len(), "pdf written");
        Ok(bytes)
    }

    /// Serialize the document into `out`
    ///
    /// Returns the number of bytes written. On error the sink may hold a
    /// truncated document; callers that need all-or-nothing output should
    /// use [`PdfDocument::build`] or a temporary file.
    pub fn write_to<W: Write>(&self, mut out: W) -> PdfResult<usize> {
        let bytes = self.build()?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(bytes.len())
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shown_text;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn sample_doc() -> PdfDocument {
        let mut page = PdfPage::a4();
        page.text(50.0, 790.0, Font::HelveticaBold, 18.0, "Fresh Grocer")
            .hline(50.0, 545.0, 780.0, 0.75)
            .text(330.0, 760.0, Font::Helvetica, 10.0, "TOTAL: 24.00 €");
        let mut doc = PdfDocument::new().with_title("Invoice #42");
        doc.add_page(page);
        doc
    }

    #[test]
    fn test_document_structure() {
        let data = sample_doc().build().unwrap();

        assert!(data.starts_with(b"%PDF-1.4"));
        assert!(contains(&data, b"/BaseFont /Helvetica"));
        assert!(contains(&data, b"/BaseFont /Helvetica-Bold"));
        assert!(contains(&data, b"/WinAnsiEncoding"));
        assert!(contains(&data, b"/Title (Invoice #42)"));
        assert!(!contains(&data, b"/CreationDate"));
    }

    #[test]
    fn test_text_reads_back_in_order() {
        let data = sample_doc().build().unwrap();
        assert_eq!(
            shown_text(&data).unwrap(),
            vec!["Fresh Grocer", "TOTAL: 24.00 €"]
        );
    }

    #[test]
    fn test_output_is_deterministic() {
        assert_eq!(sample_doc().build().unwrap(), sample_doc().build().unwrap());
    }

    #[test]
    fn test_empty_document_rejected() {
        let doc = PdfDocument::new();
        assert!(matches!(doc.build(), Err(PdfError::EmptyDocument)));
    }

    #[test]
    fn test_write_to_matches_build() {
        let doc = sample_doc();
        let mut buf = Vec::new();
        let written = doc.write_to(&mut buf).unwrap();

        assert_eq!(written, buf.len());
        assert_eq!(buf, doc.build().unwrap());
    }

    #[test]
    fn test_write_error_propagates() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let result = sample_doc().write_to(FailingWriter);
        assert!(matches!(result, Err(PdfError::Io(_))));
    }

    #[test]
    fn test_multiple_pages() {
        let mut first = PdfPage::a4();
        first.text(50.0, 790.0, Font::Helvetica, 10.0, "one");
        let mut second = PdfPage::a4();
        second.text(50.0, 790.0, Font::Helvetica, 10.0, "two");

        let mut doc = PdfDocument::new();
        doc.add_page(first).add_page(second);
        let data = doc.build().unwrap();

        assert!(contains(&data, b"/Count 2"));
        assert_eq!(shown_text(&data).unwrap(), vec!["one", "two"]);
    }
}
