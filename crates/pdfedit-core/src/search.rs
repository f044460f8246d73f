//! Text search with position: find phrases on a page and return the
//! rectangles they occupy.
//!
//! Span boxes are split into per-character boxes in proportion to the
//! standard-14 widths of each span's resolved font, so a match inside a
//! long span gets a tight box of its own.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::font::FontResolver;
use crate::geometry::BBox;
use crate::lines::{PageTextIndex, needs_separator};
use crate::options::EditOptions;
use crate::text::{Line, TextSpan};

/// A single match with its bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextMatch {
    /// The matched text as it appears on the page.
    pub text: String,
    /// Union of the boxes of the matched characters.
    pub bbox: BBox,
}

/// Page text flattened into one string with a box per character.
///
/// Lines are joined with a single space whose box is empty, so phrases may
/// run across a line break without the break inflating match boxes.
#[derive(Debug, Clone, Default)]
pub struct GlyphText {
    text: String,
    /// Character index for every byte of `text`.
    byte_to_glyph: Vec<usize>,
    boxes: Vec<Option<BBox>>,
}

impl GlyphText {
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut glyphs = GlyphText::default();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                glyphs.push(' ', None);
            }
            let mut line_text = String::new();
            let mut prev: Option<&TextSpan> = None;
            for span in &line.spans {
                if let Some(p) = prev {
                    if needs_separator(p, span, &line_text) {
                        let gap = BBox::new(
                            p.bbox.x1,
                            p.bbox.top.min(span.bbox.top),
                            span.bbox.x0,
                            p.bbox.bottom.max(span.bbox.bottom),
                        );
                        glyphs.push(' ', Some(gap));
                        line_text.push(' ');
                    }
                }
                for (ch, bbox) in span.text.chars().zip(span_glyph_boxes(span)) {
                    glyphs.push(ch, Some(bbox));
                }
                line_text.push_str(&span.text);
                prev = Some(span);
            }
        }
        glyphs
    }

    fn push(&mut self, ch: char, bbox: Option<BBox>) {
        let index = self.boxes.len();
        self.text.push(ch);
        self.byte_to_glyph
            .extend(std::iter::repeat_n(index, ch.len_utf8()));
        self.boxes.push(bbox);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Every non-overlapping match of `pattern`, in reading order.
    pub fn find_all(&self, pattern: &Regex) -> Vec<TextMatch> {
        pattern
            .find_iter(&self.text)
            .filter_map(|m| {
                if m.start() == m.end() {
                    return None;
                }
                let first = self.byte_to_glyph[m.start()];
                let last = self.byte_to_glyph[m.end() - 1];
                let bbox = self.boxes[first..=last]
                    .iter()
                    .flatten()
                    .copied()
                    .reduce(|a, b| a.union(&b))?;
                Some(TextMatch {
                    text: m.as_str().to_string(),
                    bbox,
                })
            })
            .collect()
    }
}

/// Split a span's box into one box per character.
pub fn span_glyph_boxes(span: &TextSpan) -> Vec<BBox> {
    let metrics = FontResolver::resolve_span(span).standard_font().metrics();
    let widths: Vec<f64> = span
        .text
        .chars()
        .map(|c| f64::from(metrics.glyph_width(c)))
        .collect();
    let total: f64 = widths.iter().sum();
    let count = widths.len().max(1) as f64;
    let span_width = span.bbox.width();

    let mut x = span.bbox.x0;
    widths
        .iter()
        .map(|w| {
            let share = if total > 0.0 { w / total } else { 1.0 / count };
            let dx = share * span_width;
            let bbox = BBox::new(x, span.bbox.top, x + dx, span.bbox.bottom);
            x += dx;
            bbox
        })
        .collect()
}

/// Regex for a phrase whose words may be separated by any run of whitespace.
///
/// Returns `None` for a phrase with no words.
pub fn phrase_regex(phrase: &str, case_sensitive: bool) -> Option<Regex> {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return None;
    }
    let body = words.join(r"\s+");
    let pattern = if case_sensitive {
        body
    } else {
        format!("(?i){body}")
    };
    Regex::new(&pattern).ok()
}

/// NFKC-normalize and collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfkc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rounded rectangle used to recognise a line that was already edited.
pub fn rect_key(bbox: &BBox) -> (i64, i64, i64, i64) {
    let r = |v: f64| (v * 100.0).round() as i64;
    (r(bbox.x0), r(bbox.top), r(bbox.x1), r(bbox.bottom))
}

/// Outcome of locating a multi-word phrase on one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PhraseLocation {
    /// The page text does not contain the phrase.
    Absent,
    /// The phrase is on the page but its anchors could not be placed.
    Unlocated,
    /// Combined, padded rectangle from the first anchor to the last.
    Found(BBox),
}

/// Finds phrases on one indexed page.
#[derive(Debug)]
pub struct SearchMatcher<'a> {
    index: &'a PageTextIndex,
    options: &'a EditOptions,
    glyphs: GlyphText,
}

impl<'a> SearchMatcher<'a> {
    pub fn new(index: &'a PageTextIndex, options: &'a EditOptions) -> Self {
        Self {
            index,
            options,
            glyphs: GlyphText::from_lines(index.lines()),
        }
    }

    pub fn index(&self) -> &PageTextIndex {
        self.index
    }

    /// Candidate rectangles for `phrase`, in reading order.
    ///
    /// A single word yields one rectangle per occurrence. Longer phrases
    /// yield at most one combined rectangle.
    pub fn find(&self, phrase: &str, case_sensitive: bool) -> Vec<BBox> {
        if phrase.split_whitespace().count() >= 2 {
            match self.locate_phrase(phrase, case_sensitive) {
                PhraseLocation::Found(bbox) => vec![bbox],
                PhraseLocation::Absent | PhraseLocation::Unlocated => Vec::new(),
            }
        } else {
            self.occurrences(phrase, case_sensitive)
                .into_iter()
                .map(|m| m.bbox)
                .collect()
        }
    }

    /// Every occurrence of `phrase` with its box.
    pub fn occurrences(&self, phrase: &str, case_sensitive: bool) -> Vec<TextMatch> {
        match phrase_regex(phrase, case_sensitive) {
            Some(re) => self.glyphs.find_all(&re),
            None => Vec::new(),
        }
    }

    /// Whether the page's normalized text contains the normalized phrase.
    pub fn contains(&self, phrase: &str, case_sensitive: bool) -> bool {
        let needle = normalize_text(phrase);
        if needle.is_empty() {
            return false;
        }
        let haystack = normalize_text(self.glyphs.as_str());
        if case_sensitive {
            haystack.contains(&needle)
        } else {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
    }

    /// Locate a multi-word phrase by its leading and trailing words.
    pub fn locate_phrase(&self, phrase: &str, case_sensitive: bool) -> PhraseLocation {
        if !self.contains(phrase, case_sensitive) {
            return PhraseLocation::Absent;
        }
        let words: Vec<&str> = phrase.split_whitespace().collect();

        let mut anchors = None;
        for n in [self.options.anchor_words, self.options.fallback_anchor_words] {
            let n = n.clamp(1, words.len());
            let first = self.occurrences(&words[..n].join(" "), case_sensitive);
            let last = self.occurrences(&words[words.len() - n..].join(" "), case_sensitive);
            if !first.is_empty() && !last.is_empty() {
                anchors = Some((first, last));
                break;
            }
        }
        let Some((first_matches, last_matches)) = anchors else {
            return PhraseLocation::Unlocated;
        };

        let first = first_matches[0].bbox;
        let last = last_matches
            .iter()
            .map(|m| m.bbox)
            .find(|b| b.top >= first.top - self.options.anchor_vertical_slack)
            .unwrap_or(last_matches[0].bbox);

        let pad = self.options.search_padding;
        PhraseLocation::Found(BBox::new(
            first.x0.min(last.x0) - pad,
            first.top - pad,
            first.x1.max(last.x1) + pad,
            last.bottom + pad,
        ))
    }
}
