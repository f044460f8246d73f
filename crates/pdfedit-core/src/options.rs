//! Tunables for locating, wrapping and redrawing text.

use crate::color::Color;
use crate::font::DEFAULT_FONT_SIZE;

/// What to do with spans that only partly overlap a rebuilt selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapPolicy {
    /// Drop every span that intersects the selection.
    #[default]
    Discard,
    /// Keep spans whose overlap covers less than half of their own area.
    Preserve,
}

/// Options shared by every editing operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditOptions {
    /// A line whose center lies left of this fraction of the page width is left-aligned (default: 0.35).
    pub left_threshold: f64,
    /// A line whose center lies right of this fraction is right-aligned (default: 0.65).
    pub right_threshold: f64,
    /// Extra margin erased left of a line before it is redrawn (default: 5.0).
    pub redaction_margin: f64,
    /// Padding added around a combined multi-word match (default: 2.0).
    pub search_padding: f64,
    /// Number of leading/trailing words used to anchor long phrases (default: 4).
    pub anchor_words: usize,
    /// Anchor size retried when the first attempt finds nothing (default: 2).
    pub fallback_anchor_words: usize,
    /// How far above the first anchor the last anchor may start (default: 5.0).
    pub anchor_vertical_slack: f64,
    /// Line height as a multiple of font size when rebuilding a page (default: 1.3).
    pub rebuild_line_height: f64,
    /// Line height as a multiple of font size when reflowing a phrase (default: 1.2).
    pub phrase_line_height: f64,
    /// Size used when no span supplies one (default: 11.0).
    pub default_font_size: f64,
    /// Redrawn text below `page_height - overflow_margin` is reported (default: 20.0).
    pub overflow_margin: f64,
    /// Maximum vertical midpoint distance for spans on one line (default: 3.0).
    pub line_tolerance: f64,
    /// Color painted over erased areas (default: white).
    pub background: Color,
    /// Handling of partly selected spans in a page rebuild (default: discard).
    pub overlap_policy: OverlapPolicy,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            left_threshold: 0.35,
            right_threshold: 0.65,
            redaction_margin: 5.0,
            search_padding: 2.0,
            anchor_words: 4,
            fallback_anchor_words: 2,
            anchor_vertical_slack: 5.0,
            rebuild_line_height: 1.3,
            phrase_line_height: 1.2,
            default_font_size: DEFAULT_FONT_SIZE,
            overflow_margin: 20.0,
            line_tolerance: 3.0,
            background: Color::white(),
            overlap_policy: OverlapPolicy::Discard,
        }
    }
}
