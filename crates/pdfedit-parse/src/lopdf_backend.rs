//! lopdf-based document backend.
//!
//! Implements [`EditBackend`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate. Edited pages keep their operation list in memory; new content
//! streams are only written on [`EditBackend::save`].

use std::borrow::Cow;
use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use pdfedit_core::{BBox, Color, EditError, StandardFont, TextSpan};

use crate::backend::{EditBackend, PageSize, TextRun};
use crate::content_edit;
use crate::error::BackendError;
use crate::interpreter::{Interpreter, PageFrame};

/// A parsed, editable PDF document backed by lopdf.
pub struct LopdfDocument {
    /// The underlying lopdf document.
    inner: lopdf::Document,
    /// Cached ordered list of page ObjectIds (indexed by 0-based page number).
    page_ids: Vec<ObjectId>,
    /// Rewritten operation lists for pages touched so far.
    edited: HashMap<ObjectId, Vec<Operation>>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Whether the page has pending edits.
    pub fn is_edited(&self, page: &LopdfPage) -> bool {
        self.edited.contains_key(&page.object_id)
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .field("edited_pages", &self.edited.len())
            .finish_non_exhaustive()
    }
}

/// A reference to a single page within a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    /// The lopdf object ID for this page.
    pub object_id: ObjectId,
    /// The 0-based page index.
    pub index: usize,
}

/// The lopdf-based document backend.
///
/// # Example
///
/// ```ignore
/// use pdfedit_parse::{EditBackend, LopdfBackend};
///
/// let mut doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// let spans = LopdfBackend::text_spans(&doc, &page)?;
/// ```
pub struct LopdfBackend;

/// Extract a [`BBox`] from a lopdf array of 4 numbers `[x0, y0, x1, y1]`.
fn extract_bbox_from_array(array: &[Object]) -> Result<BBox, BackendError> {
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    let x0 = object_to_f64(&array[0])?;
    let y0 = object_to_f64(&array[1])?;
    let x1 = object_to_f64(&array[2])?;
    let y1 = object_to_f64(&array[3])?;
    Ok(BBox::new(x0, y0, x1, y1))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &Object) -> Result<f64, BackendError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Resolve a potentially indirect object reference.
pub(crate) fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

fn media_box(doc: &lopdf::Document, page_id: ObjectId) -> Result<BBox, BackendError> {
    let obj = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
    let array = resolve_object(doc, obj)
        .as_array()
        .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
    extract_bbox_from_array(array)
}

/// The page's `/Font` resource dictionary, if any.
fn font_resources(
    doc: &lopdf::Document,
    page_id: ObjectId,
) -> Result<Option<&Dictionary>, BackendError> {
    let Some(resources) = resolve_inherited(doc, page_id, b"Resources")? else {
        return Ok(None);
    };
    let resources = resolve_object(doc, resources)
        .as_dict()
        .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()))?;
    Ok(resources
        .get(b"Font")
        .ok()
        .and_then(|fonts| resolve_object(doc, fonts).as_dict().ok()))
}

/// Get the content stream bytes from a page dictionary.
///
/// Handles both single stream references and arrays of stream references.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let contents_obj = match page_dict.get(b"Contents") {
        Ok(obj) => obj,
        Err(_) => return Ok(Vec::new()),
    };

    match resolve_object(doc, contents_obj) {
        Object::Stream(stream) => decode_content_stream(stream),
        Object::Array(arr) => {
            let mut content = Vec::new();
            for item in arr {
                let stream = resolve_object(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_content_stream(stream)?;
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// Decode a content stream, decompressing if needed.
fn decode_content_stream(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

fn decode_page_operations(
    doc: &lopdf::Document,
    page_id: ObjectId,
) -> Result<Vec<Operation>, BackendError> {
    let page_dict = doc
        .get_object(page_id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
    let bytes = get_page_content_bytes(doc, page_dict)?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    Content::decode(&bytes)
        .map(|content| content.operations)
        .map_err(|e| BackendError::Content(format!("failed to decode content stream: {e}")))
}

fn page_operations(
    doc: &LopdfDocument,
    page_id: ObjectId,
) -> Result<Cow<'_, [Operation]>, BackendError> {
    match doc.edited.get(&page_id) {
        Some(ops) => Ok(Cow::Borrowed(ops.as_slice())),
        None => decode_page_operations(&doc.inner, page_id).map(Cow::Owned),
    }
}

/// Take the page's operations for rewriting; untouched pages are wrapped
/// in `q ... Q` first.
fn take_operations(
    doc: &mut LopdfDocument,
    page_id: ObjectId,
) -> Result<Vec<Operation>, BackendError> {
    match doc.edited.remove(&page_id) {
        Some(ops) => Ok(ops),
        None => decode_page_operations(&doc.inner, page_id).map(content_edit::isolate),
    }
}

/// Register a standard-14 font on the page and return its resource name.
///
/// Inherited or shared resources are copied onto the page so other pages
/// are left untouched.
fn ensure_font(
    doc: &mut lopdf::Document,
    page_id: ObjectId,
    font: StandardFont,
) -> Result<String, BackendError> {
    let name = format!("PE_{}", font.short_name());

    let mut resources = match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => resolve_object(doc, obj)
            .as_dict()
            .cloned()
            .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()))?,
        None => Dictionary::new(),
    };
    let mut fonts = resources
        .get(b"Font")
        .ok()
        .and_then(|o| resolve_object(doc, o).as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);

    if !fonts.has(name.as_bytes()) {
        let mut font_dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
        };
        if font.uses_win_ansi() {
            font_dict.set("Encoding", "WinAnsiEncoding");
        }
        let font_id = doc.add_object(font_dict);
        fonts.set(name.clone(), font_id);
    }
    resources.set("Font", fonts);

    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| BackendError::Font(format!("cannot update page resources: {e}")))?
        .set("Resources", resources);
    Ok(name)
}

impl EditBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(EditError::EncryptedDocument));
        }

        // get_pages returns BTreeMap<u32, ObjectId> with 1-based keys
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(pages = page_ids.len(), "opened document");

        Ok(LopdfDocument {
            inner,
            page_ids,
            edited: HashMap::new(),
        })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        if index >= doc.page_ids.len() {
            return Err(BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                doc.page_ids.len()
            )));
        }
        Ok(LopdfPage {
            object_id: doc.page_ids[index],
            index,
        })
    }

    fn page_size(doc: &Self::Document, page: &Self::Page) -> Result<PageSize, Self::Error> {
        let media = media_box(&doc.inner, page.object_id)?;
        Ok(PageSize::new(media.width().abs(), media.height().abs()))
    }

    fn text_spans(doc: &Self::Document, page: &Self::Page) -> Result<Vec<TextSpan>, Self::Error> {
        let frame = PageFrame::from_media_box(&media_box(&doc.inner, page.object_id)?);
        let operations = page_operations(doc, page.object_id)?;
        let fonts = font_resources(&doc.inner, page.object_id)?;
        let shown = Interpreter::new(&doc.inner, fonts, frame).run(&operations);
        Ok(shown.into_iter().map(|s| s.span).collect())
    }

    fn erase(
        doc: &mut Self::Document,
        page: &Self::Page,
        rect: &BBox,
        background: Color,
    ) -> Result<(), Self::Error> {
        let frame = PageFrame::from_media_box(&media_box(&doc.inner, page.object_id)?);
        let mut operations = take_operations(doc, page.object_id)?;
        let fonts = font_resources(&doc.inner, page.object_id)?;
        let shown = Interpreter::new(&doc.inner, fonts, frame).run(&operations);

        let blanked = content_edit::blank_text(&mut operations, &shown, rect);
        operations.extend(content_edit::fill_rect(&frame, rect, background));

        #[cfg(feature = "tracing")]
        tracing::debug!(page = page.index, blanked, ?rect, "erased text");
        #[cfg(not(feature = "tracing"))]
        let _ = blanked;

        doc.edited.insert(page.object_id, operations);
        Ok(())
    }

    fn draw_text(
        doc: &mut Self::Document,
        page: &Self::Page,
        run: &TextRun,
    ) -> Result<(), Self::Error> {
        let frame = PageFrame::from_media_box(&media_box(&doc.inner, page.object_id)?);
        let resource = ensure_font(&mut doc.inner, page.object_id, run.font)?;
        let mut operations = take_operations(doc, page.object_id)?;
        operations.extend(content_edit::draw_text(&frame, &resource, run));

        #[cfg(feature = "tracing")]
        tracing::trace!(page = page.index, text = %run.text, font = %resource, "drew text");

        doc.edited.insert(page.object_id, operations);
        Ok(())
    }

    fn save(doc: &mut Self::Document) -> Result<Vec<u8>, Self::Error> {
        for (page_id, operations) in &doc.edited {
            let bytes = Content {
                operations: operations.clone(),
            }
            .encode()
            .map_err(|e| BackendError::Content(format!("failed to encode content stream: {e}")))?;
            let stream_id = doc.inner.add_object(Stream::new(dictionary! {}, bytes));
            doc.inner
                .get_object_mut(*page_id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| BackendError::Write(format!("cannot update page contents: {e}")))?
                .set("Contents", stream_id);
        }
        doc.inner.prune_objects();

        let mut buf = Vec::new();
        doc.inner
            .save_to(&mut buf)
            .map_err(|e| BackendError::Write(format!("failed to save PDF: {e}")))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(bytes = buf.len(), edited = doc.edited.len(), "saved document");

        Ok(buf)
    }
}
