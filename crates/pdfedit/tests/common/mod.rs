//! In-memory backend and page builders shared by the integration tests.
#![allow(dead_code)]

use pdfedit::{
    BBox, Color, EditBackend, EditError, PageSize, Point, StandardFont, TextRun, TextSpan,
};

/// Backend whose pages are plain span lists.
pub struct MemoryBackend;

#[derive(Debug, Clone)]
pub struct MemoryPage {
    pub size: PageSize,
    pub spans: Vec<TextSpan>,
    /// Every rectangle passed to `erase`, in call order.
    pub erased: Vec<BBox>,
    /// Every run passed to `draw_text`, in call order.
    pub drawn: Vec<TextRun>,
}

impl MemoryPage {
    pub fn letter(spans: Vec<TextSpan>) -> Self {
        Self {
            size: PageSize::new(612.0, 792.0),
            spans,
            erased: Vec::new(),
            drawn: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pub pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }
}

/// Helvetica span whose box is `size` tall and as wide as the text.
pub fn span(text: &str, x0: f64, top: f64, size: f64) -> TextSpan {
    let width = StandardFont::Helvetica.measure(text, size);
    TextSpan::new(text, BBox::new(x0, top, x0 + width, top + size), "Helvetica", size)
}

/// Span drawn from a run, with a box sized like the lopdf backend's.
fn span_from_run(run: &TextRun) -> TextSpan {
    let x1 = run.origin.x + run.font.measure(&run.text, run.size);
    let bbox = BBox::new(
        run.origin.x,
        run.origin.y - 0.8 * run.size,
        x1,
        run.origin.y + 0.2 * run.size,
    );
    TextSpan::new(run.text.clone(), bbox, run.font.base_font(), run.size)
        .with_origin(Point::new(run.origin.x, run.origin.y))
        .with_color(run.color)
}

fn page_mut(doc: &mut MemoryDocument, index: usize) -> Result<&mut MemoryPage, EditError> {
    doc.pages
        .get_mut(index)
        .ok_or_else(|| EditError::Other(format!("no page {index}")))
}

impl EditBackend for MemoryBackend {
    type Document = MemoryDocument;
    type Page = usize;
    type Error = EditError;

    fn open(_bytes: &[u8]) -> Result<MemoryDocument, EditError> {
        Err(EditError::ParseError("memory documents are built, not parsed".into()))
    }

    fn page_count(doc: &MemoryDocument) -> usize {
        doc.pages.len()
    }

    fn get_page(doc: &MemoryDocument, index: usize) -> Result<usize, EditError> {
        if index < doc.pages.len() {
            Ok(index)
        } else {
            Err(EditError::Other(format!("no page {index}")))
        }
    }

    fn page_size(doc: &MemoryDocument, page: &usize) -> Result<PageSize, EditError> {
        Ok(doc.pages[*page].size)
    }

    fn text_spans(doc: &MemoryDocument, page: &usize) -> Result<Vec<TextSpan>, EditError> {
        Ok(doc.pages[*page].spans.clone())
    }

    fn erase(
        doc: &mut MemoryDocument,
        page: &usize,
        rect: &BBox,
        _background: Color,
    ) -> Result<(), EditError> {
        let page = page_mut(doc, *page)?;
        page.spans.retain(|s| !rect.holds_center_of(&s.bbox));
        page.erased.push(*rect);
        Ok(())
    }

    fn draw_text(doc: &mut MemoryDocument, page: &usize, run: &TextRun) -> Result<(), EditError> {
        let page = page_mut(doc, *page)?;
        page.spans.push(span_from_run(run));
        page.drawn.push(run.clone());
        Ok(())
    }

    fn save(doc: &mut MemoryDocument) -> Result<Vec<u8>, EditError> {
        let text = doc
            .pages
            .iter()
            .map(|p| {
                p.spans
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text.into_bytes())
    }
}
