//! pdfedit-core: Backend-independent data types and algorithms.
//!
//! This crate holds everything the editing engine needs that does not
//! touch PDF bytes: page geometry, spans and reconstructed lines, font-name
//! canonicalization with standard-14 metrics, phrase search, word wrapping,
//! and the shift plan used when a selection is rebuilt.

pub mod color;
pub mod error;
pub mod font;
pub mod geometry;
pub mod lines;
pub mod metrics;
pub mod options;
pub mod page_range;
pub mod reflow;
pub mod search;
pub mod shift;
pub mod text;

pub use color::Color;
pub use error::{EditError, EditWarning, EditWarningCode};
pub use font::{
    ALL_STANDARD_FONTS, DEFAULT_FONT_SIZE, FontFamily, FontInfo, FontResolver, StandardFont,
};
pub use geometry::{BBox, Ctm, Point};
pub use lines::{LineLocator, PageTextIndex, classify_alignment, group_lines};
pub use metrics::FontMetrics;
pub use options::{EditOptions, OverlapPolicy};
pub use page_range::{PageFilter, parse_page_range};
pub use reflow::{TextReflower, wrap_to_chars};
pub use search::{
    GlyphText, PhraseLocation, SearchMatcher, TextMatch, normalize_text, phrase_regex, rect_key,
};
pub use shift::ShiftPlan;
pub use text::{Alignment, Line, TextSpan};
