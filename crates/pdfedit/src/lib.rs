//! pdfedit: replace text in PDF documents while keeping their layout.
//!
//! The facade ties the backend-independent algorithms in `pdfedit-core` to
//! the lopdf backend in `pdfedit-parse`.
//!
//! # Architecture
//!
//! - **pdfedit-core**: Geometry, spans, lines, search, wrapping and shift plans
//! - **pdfedit-parse**: Content stream interpretation and the lopdf backend
//! - **pdfedit** (this crate): [`Editor`], page mutations and job running
//!
//! ```ignore
//! let job = ReplacementJob::phrase("Hello", "Hi");
//! let outcome = pdfedit::replace(&bytes, &job, &EditOptions::default())?;
//! std::fs::write("out.pdf", &outcome.output)?;
//! ```

mod editor;
mod job;
mod mutator;

pub use editor::Editor;
pub use job::{EditReport, ReplaceOutcome, ReplacementJob, Selector};
pub use mutator::{MutationStage, PageMutator};

pub use pdfedit_core::{
    Alignment, BBox, Color, EditError, EditOptions, EditWarning, EditWarningCode, FontInfo,
    Line, OverlapPolicy, PageFilter, PageTextIndex, Point, ShiftPlan, StandardFont, TextSpan,
    parse_page_range,
};
pub use pdfedit_parse::{EditBackend, LopdfBackend, PageSize, TextRun};

pub use pdfedit_core;
pub use pdfedit_parse;

/// Open `bytes`, run one job and return the rewritten document.
///
/// # Errors
///
/// Fails when the document cannot be opened or saved, or when the job
/// names pages the document does not have.
pub fn replace(
    bytes: &[u8],
    job: &ReplacementJob,
    options: &EditOptions,
) -> Result<ReplaceOutcome, EditError> {
    let mut editor = Editor::open(bytes, Some(options.clone()))?;
    let report = editor.run(job)?;
    let output = editor.save()?;
    Ok(ReplaceOutcome::new(output, report))
}
