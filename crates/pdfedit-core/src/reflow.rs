//! Word wrapping for replacement text.

use crate::font::FontInfo;

/// Characters per line assumed when the font gives no usable measurement.
const FALLBACK_CHARS_PER_LINE: usize = 60;

/// Wraps replacement text to a target width.
///
/// The width budget is converted into a character budget using the width
/// of `"x"` in the target font, then words are packed greedily.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReflower;

impl TextReflower {
    /// How many average characters fit in `available_width`. Never zero.
    pub fn chars_per_line(font: &FontInfo, available_width: f64) -> usize {
        let char_width = font.measure("x");
        if char_width <= 0.0 || !available_width.is_finite() {
            return FALLBACK_CHARS_PER_LINE;
        }
        ((available_width / char_width).floor() as usize).max(1)
    }

    /// Wrap `text` to `available_width`. Empty or blank text gives no lines.
    pub fn wrap(text: &str, font: &FontInfo, available_width: f64) -> Vec<String> {
        wrap_to_chars(text, Self::chars_per_line(font, available_width))
    }
}

/// Greedy word packing against a character budget.
///
/// Words on the first line are charged their length plus one separator.
/// A word that starts a later line is charged its length only, and each
/// word after it its length plus one. A word longer than the budget is
/// placed alone on its own line.
pub fn wrap_to_chars(text: &str, chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let cost = word.chars().count() + 1;
        if current_len + cost <= chars_per_line {
            current.push(word);
            current_len += cost;
        } else {
            if !current.is_empty() {
                lines.push(current.join(" "));
            }
            current = vec![word];
            current_len = cost - 1;
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }
    lines
}
