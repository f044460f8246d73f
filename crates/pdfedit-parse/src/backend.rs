//! Document backend trait.
//!
//! Defines the [`EditBackend`] trait: the operations the editing engine
//! needs from a PDF library. The lopdf implementation lives in
//! [`crate::lopdf_backend`]; tests can plug in an in-memory one.

use pdfedit_core::{BBox, Color, EditError, Point, StandardFont, TextSpan};

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The whole page as a box.
    pub fn bbox(&self) -> BBox {
        BBox::new(0.0, 0.0, self.width, self.height)
    }
}

/// A run of text to draw on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Baseline start in top-left origin coordinates.
    pub origin: Point,
    pub text: String,
    pub font: StandardFont,
    pub size: f64,
    pub color: Color,
}

/// Trait abstracting the document operations used by the editor.
///
/// # Associated Types
///
/// - `Document`: The parsed, mutable document.
/// - `Page`: A handle to a single page within a document.
/// - `Error`: Backend-specific error type, convertible to [`EditError`].
///
/// # Usage
///
/// ```ignore
/// let mut doc = MyBackend::open(pdf_bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// let spans = MyBackend::text_spans(&doc, &page)?;
/// MyBackend::erase(&mut doc, &page, &spans[0].bbox, Color::white())?;
/// let bytes = MyBackend::save(&mut doc)?;
/// ```
pub trait EditBackend {
    /// The parsed document type.
    type Document;

    /// A handle to a single page within a document.
    type Page;

    /// Backend-specific error type, convertible to [`EditError`].
    type Error: std::error::Error + Into<EditError>;

    /// Parse PDF bytes into an editable document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid PDF or the document
    /// is encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Return the number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// Access a page by 0-based index.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Width and height of the page.
    fn page_size(doc: &Self::Document, page: &Self::Page) -> Result<PageSize, Self::Error>;

    /// Text spans currently on the page, including earlier edits.
    fn text_spans(doc: &Self::Document, page: &Self::Page) -> Result<Vec<TextSpan>, Self::Error>;

    /// Remove the text under `rect` and paint it with `background`.
    ///
    /// Erasing an area that holds no text only repaints it.
    fn erase(
        doc: &mut Self::Document,
        page: &Self::Page,
        rect: &BBox,
        background: Color,
    ) -> Result<(), Self::Error>;

    /// Draw a run of text on top of the page.
    fn draw_text(
        doc: &mut Self::Document,
        page: &Self::Page,
        run: &TextRun,
    ) -> Result<(), Self::Error>;

    /// Serialize the edited document.
    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_bbox() {
        let size = PageSize::new(612.0, 792.0);
        assert_eq!(size.bbox(), BBox::new(0.0, 0.0, 612.0, 792.0));
    }
}
