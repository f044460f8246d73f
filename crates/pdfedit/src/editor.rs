//! Top-level API for opening a document and running replacements on it.

use std::collections::HashSet;
use std::path::Path;
use std::time::{Duration, Instant};

use pdfedit_core::{
    BBox, EditError, EditOptions, EditWarning, EditWarningCode, Line, LineLocator, PageFilter, PageTextIndex,
    PhraseLocation, SearchMatcher, phrase_regex, rect_key,
};
use pdfedit_parse::{EditBackend, LopdfBackend};
use regex::{NoExpand, Regex};
use tracing::{debug, info, warn};

use crate::job::{EditReport, ReplacementJob, Selector};
use crate::mutator::{PageMutator, backend_err};

/// An open, editable document.
///
/// Every mutation takes `&mut self`, so one editor runs one job at a time.
///
/// ```ignore
/// let mut editor = Editor::open_file("letter.pdf", None)?;
/// let report = editor.replace_phrase("Dear Sir", "Dear Madam", true, &PageFilter::All)?;
/// std::fs::write("letter-edited.pdf", editor.save()?)?;
/// ```
pub struct Editor<B: EditBackend = LopdfBackend> {
    doc: B::Document,
    options: EditOptions,
    page_count: usize,
}

impl Editor<LopdfBackend> {
    /// Open a document from bytes with the lopdf backend.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::EncryptedDocument`] for encrypted files and
    /// [`EditError::ParseError`] if the bytes are not a valid PDF.
    pub fn open(bytes: &[u8], options: Option<EditOptions>) -> Result<Self, EditError> {
        Self::open_with(bytes, options)
    }

    /// Read and open a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::DocumentNotFound`] if the file does not exist.
    pub fn open_file(
        path: impl AsRef<Path>,
        options: Option<EditOptions>,
    ) -> Result<Self, EditError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EditError::DocumentNotFound(path.display().to_string()),
            _ => EditError::IoError(e.to_string()),
        })?;
        Self::open(&bytes, options)
    }
}

impl<B: EditBackend> Editor<B> {
    /// Open a document with any backend.
    pub fn open_with(bytes: &[u8], options: Option<EditOptions>) -> Result<Self, EditError> {
        let doc = B::open(bytes).map_err(backend_err)?;
        Ok(Self::from_document(doc, options))
    }

    /// Wrap an already opened document.
    pub fn from_document(doc: B::Document, options: Option<EditOptions>) -> Self {
        let page_count = B::page_count(&doc);
        Self {
            doc,
            options: options.unwrap_or_default(),
            page_count,
        }
    }

    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn document(&self) -> &B::Document {
        &self.doc
    }

    pub fn into_document(self) -> B::Document {
        self.doc
    }

    fn check_page(&self, page: usize) -> Result<(), EditError> {
        if page >= self.page_count {
            return Err(EditError::InvalidPageRange(format!(
                "page {} exceeds document page count ({})",
                page + 1,
                self.page_count
            )));
        }
        Ok(())
    }

    /// Spans and lines of one page (0-based).
    pub fn page_index(&self, page: usize) -> Result<PageTextIndex, EditError> {
        self.check_page(page)?;
        let handle = B::get_page(&self.doc, page).map_err(backend_err)?;
        let size = B::page_size(&self.doc, &handle).map_err(backend_err)?;
        let spans = B::text_spans(&self.doc, &handle).map_err(backend_err)?;
        Ok(PageTextIndex::build(spans, size.width, size.height, &self.options))
    }

    pub fn page_lines(&self, page: usize) -> Result<Vec<Line>, EditError> {
        Ok(self.page_index(page)?.lines().to_vec())
    }

    /// Page text rebuilt from its lines, one per row.
    pub fn page_text(&self, page: usize) -> Result<String, EditError> {
        Ok(self.page_index(page)?.text())
    }

    /// Text of every page, separated by blank lines.
    pub fn extract_text(&self) -> Result<String, EditError> {
        let pages = (0..self.page_count)
            .map(|p| self.page_text(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pages.join("\n\n"))
    }

    /// Whether any page carries visible text. Scanned documents without an
    /// OCR layer return `false`.
    pub fn has_selectable_text(&self) -> Result<bool, EditError> {
        for page in 0..self.page_count {
            if self.page_index(page)?.has_text() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Rectangles `phrase` occupies on a page, in reading order.
    pub fn find(
        &self,
        page: usize,
        phrase: &str,
        case_sensitive: bool,
    ) -> Result<Vec<BBox>, EditError> {
        let index = self.page_index(page)?;
        Ok(SearchMatcher::new(&index, &self.options).find(phrase, case_sensitive))
    }

    /// Run a job built with [`ReplacementJob`].
    pub fn run(&mut self, job: &ReplacementJob) -> Result<EditReport, EditError> {
        match &job.selector {
            Selector::Phrase(phrase) => self.replace_phrase_within(
                phrase,
                &job.replacement_text,
                job.case_sensitive,
                &job.page_filter,
                job.time_budget.map(|budget| (Instant::now(), budget)),
            ),
            Selector::Region { page, rect } => {
                self.rephrase_region(*page, rect, &job.replacement_text)
            }
        }
    }

    /// Replace `phrase` on every selected page.
    ///
    /// # Errors
    ///
    /// Only fatal problems are errors: a page filter naming missing pages,
    /// or a backend failure reading a page. Matches that cannot be placed
    /// or redrawn become warnings in the report.
    pub fn replace_phrase(
        &mut self,
        phrase: &str,
        replacement: &str,
        case_sensitive: bool,
        pages: &PageFilter,
    ) -> Result<EditReport, EditError> {
        self.replace_phrase_within(phrase, replacement, case_sensitive, pages, None)
    }

    fn replace_phrase_within(
        &mut self,
        phrase: &str,
        replacement: &str,
        case_sensitive: bool,
        pages: &PageFilter,
        deadline: Option<(Instant, Duration)>,
    ) -> Result<EditReport, EditError> {
        let pages = pages.resolve(self.page_count)?;
        let mut report = EditReport::default();
        let Some(pattern) = phrase_regex(phrase, case_sensitive) else {
            return Ok(report);
        };

        for page in pages {
            if let Some((started, budget)) = deadline {
                if started.elapsed() >= budget {
                    let description = format!(
                        "time budget of {:.1}s exhausted before page {}; remaining pages left unchanged",
                        budget.as_secs_f64(),
                        page + 1
                    );
                    warn!("{description}");
                    report.warnings.push(EditWarning::on_page(
                        EditWarningCode::TimedOut,
                        description,
                        page,
                    ));
                    break;
                }
            }
            let page_report = self.replace_on_page(page, phrase, &pattern, replacement, case_sensitive)?;
            debug!(page, replacements = page_report.replacement_count, "page done");
            report.merge(page_report);
        }

        info!(
            phrase,
            replacements = report.replacement_count,
            warnings = report.warnings.len(),
            "replace finished"
        );
        Ok(report)
    }

    fn replace_on_page(
        &mut self,
        page: usize,
        phrase: &str,
        pattern: &Regex,
        replacement: &str,
        case_sensitive: bool,
    ) -> Result<EditReport, EditError> {
        let mut mutator = PageMutator::<B>::new(&mut self.doc, page, &self.options)?;
        let index = mutator.index()?;
        let matcher = SearchMatcher::new(&index, &self.options);
        let mut count = 0u32;

        if phrase.split_whitespace().count() >= 2 {
            match matcher.locate_phrase(phrase, case_sensitive) {
                PhraseLocation::Absent => {}
                PhraseLocation::Unlocated => mutator.warn(
                    EditWarningCode::NoMatchFound,
                    format!("could not locate the boundaries of \"{phrase}\""),
                ),
                PhraseLocation::Found(rect) => {
                    let lines: Vec<Line> = LineLocator::locate_all(index.lines(), &rect)
                        .into_iter()
                        .cloned()
                        .collect();
                    match lines.as_slice() {
                        [] => mutator.warn(
                            EditWarningCode::LineDetectionFailed,
                            format!("no line found under the match for \"{phrase}\""),
                        ),
                        [line] => {
                            let (new_text, n) = replace_counted(pattern, &line.text, replacement, None);
                            if n == 0 {
                                mutator.warn(
                                    EditWarningCode::NoMatchFound,
                                    format!("\"{phrase}\" not found in line \"{}\"", line.text),
                                );
                            } else if let Err(e) = mutator.reflow_line(line, &new_text) {
                                mutator.warn(EditWarningCode::Other, format!("could not redraw line: {e}"));
                            } else {
                                count += n;
                            }
                        }
                        group => {
                            let merged = group
                                .iter()
                                .map(|l| l.text.as_str())
                                .collect::<Vec<_>>()
                                .join(" ");
                            let (new_text, n) = replace_counted(pattern, &merged, replacement, Some(1));
                            if n == 0 {
                                mutator.warn(
                                    EditWarningCode::NoMatchFound,
                                    format!("\"{phrase}\" not found in the matched lines"),
                                );
                            } else if let Err(e) = mutator.reflow_lines(group, &new_text) {
                                mutator.warn(EditWarningCode::Other, format!("could not redraw lines: {e}"));
                            } else {
                                count += n;
                            }
                        }
                    }
                }
            }
        } else {
            let mut done = HashSet::new();
            for found in matcher.occurrences(phrase, case_sensitive).iter().rev() {
                let line = LineLocator::locate_nearest(index.lines(), &found.bbox, |l| {
                    pattern.is_match(&l.text)
                });
                let Some(line) = line else {
                    mutator.warn(
                        EditWarningCode::LineDetectionFailed,
                        format!("no line containing \"{}\" found under the match; left unchanged", found.text),
                    );
                    continue;
                };
                if !done.insert(rect_key(&line.bbox)) {
                    continue;
                }
                let (new_text, n) = replace_counted(pattern, &line.text, replacement, None);
                if n == 0 {
                    mutator.warn(
                        EditWarningCode::NoMatchFound,
                        format!("\"{phrase}\" not found in line \"{}\"", line.text),
                    );
                    continue;
                }
                match mutator.reflow_line(line, &new_text) {
                    Ok(()) => count += n,
                    Err(e) => mutator.warn(
                        EditWarningCode::Other,
                        format!("could not redraw line \"{}\": {e}", line.text),
                    ),
                }
            }
        }

        Ok(EditReport {
            replacement_count: count,
            warnings: mutator.into_warnings(),
        })
    }

    /// Replace whatever lies under `rect` on `page` with `replacement`,
    /// rebuilding the page so that longer text pushes later content down.
    pub fn rephrase_region(
        &mut self,
        page: usize,
        rect: &BBox,
        replacement: &str,
    ) -> Result<EditReport, EditError> {
        self.check_page(page)?;
        let mut mutator = PageMutator::<B>::new(&mut self.doc, page, &self.options)?;
        let plan = mutator.rebuild_page(rect, replacement)?;
        info!(
            page,
            removed = plan.in_selection.len(),
            shifted = plan.below.len(),
            extra = plan.extra_vertical_space,
            "region rebuilt"
        );
        Ok(EditReport {
            replacement_count: 1,
            warnings: mutator.into_warnings(),
        })
    }

    /// Serialize the document with every edit applied.
    pub fn save(&mut self) -> Result<Vec<u8>, EditError> {
        B::save(&mut self.doc).map_err(Into::into)
    }
}

/// Replace up to `limit` matches (all when `None`), returning the new text
/// and how many were replaced. `replacement` is inserted literally.
fn replace_counted(
    pattern: &Regex,
    text: &str,
    replacement: &str,
    limit: Option<usize>,
) -> (String, u32) {
    let found = pattern.find_iter(text).count();
    let n = limit.map_or(found, |limit| found.min(limit));
    if n == 0 {
        return (text.to_string(), 0);
    }
    let replaced = pattern.replacen(text, n, NoExpand(replacement));
    (replaced.into_owned(), n as u32)
}
