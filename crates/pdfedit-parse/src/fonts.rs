//! Font resources as seen by the interpreter: decoding string bytes to text
//! and measuring glyph advances.

use std::collections::HashMap;

use encoding_rs::WINDOWS_1252;
use pdfedit_core::StandardFont;

use crate::lopdf_backend::{object_to_f64, resolve_object};
use crate::to_unicode::ToUnicode;

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_WIDTH: f64 = 600.0;

/// One decoded character code.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub text: String,
    /// Advance in glyph space (1/1000 em).
    pub width: f64,
    /// Single-byte code 32, which also receives word spacing.
    pub is_word_space: bool,
}

/// A font resource loaded from a page's `/Font` dictionary.
#[derive(Debug, Clone)]
pub struct PageFont {
    /// `/BaseFont`, including any subset prefix.
    pub base_font: String,
    /// Ascent and descent in glyph space.
    pub ascent: f64,
    pub descent: f64,
    two_byte: bool,
    first_char: u32,
    widths: Vec<f64>,
    cid_widths: HashMap<u32, f64>,
    default_width: f64,
    standard: Option<StandardFont>,
    to_unicode: Option<ToUnicode>,
}

impl PageFont {
    /// Stand-in for a font the page references but does not define.
    pub fn missing(resource_name: &str) -> Self {
        Self::simple(resource_name.to_string(), None)
    }

    fn simple(base_font: String, standard: Option<StandardFont>) -> Self {
        let (ascent, descent) = match standard {
            Some(font) => {
                let m = font.metrics();
                (f64::from(m.ascent), f64::from(m.descent))
            }
            None => (DEFAULT_ASCENT, DEFAULT_DESCENT),
        };
        Self {
            base_font,
            ascent,
            descent,
            two_byte: false,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: DEFAULT_WIDTH,
            standard,
            to_unicode: None,
        }
    }

    pub fn load(doc: &lopdf::Document, dict: &lopdf::Dictionary) -> Self {
        let base_font = name_entry(dict, b"BaseFont").unwrap_or_default();
        let stripped = base_font
            .split_once('+')
            .map_or(base_font.as_str(), |(_, rest)| rest);
        let mut font = Self::simple(base_font.clone(), StandardFont::from_base_font(stripped));

        let is_type0 = name_entry(dict, b"Subtype").as_deref() == Some("Type0");
        if is_type0 {
            font.two_byte = true;
            font.default_width = 1000.0;
            if let Some(descendant) = descendant_font(doc, dict) {
                if let Ok(dw) = descendant.get(b"DW").and_then(|o| Ok(resolve_object(doc, o))) {
                    font.default_width = object_to_f64(dw).unwrap_or(1000.0);
                }
                if let Ok(w) = descendant.get(b"W") {
                    if let Ok(items) = resolve_object(doc, w).as_array() {
                        font.cid_widths = parse_cid_widths(doc, items);
                    }
                }
                font.apply_descriptor(doc, descendant);
            }
        } else {
            font.first_char = dict
                .get(b"FirstChar")
                .ok()
                .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
                .map_or(0, |v| v.max(0.0) as u32);
            if let Ok(w) = dict.get(b"Widths") {
                if let Ok(items) = resolve_object(doc, w).as_array() {
                    font.widths = items
                        .iter()
                        .map(|o| object_to_f64(resolve_object(doc, o)).unwrap_or(0.0))
                        .collect();
                }
            }
            font.apply_descriptor(doc, dict);
        }

        if let Ok(obj) = dict.get(b"ToUnicode") {
            if let Ok(stream) = resolve_object(doc, obj).as_stream() {
                let data = stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone());
                font.to_unicode = ToUnicode::parse(&data).ok().filter(|c| !c.is_empty());
            }
        }
        font
    }

    fn apply_descriptor(&mut self, doc: &lopdf::Document, dict: &lopdf::Dictionary) {
        let Some(descriptor) = dict
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| resolve_object(doc, o).as_dict().ok())
        else {
            return;
        };
        let number = |key: &[u8]| {
            descriptor
                .get(key)
                .ok()
                .and_then(|o| object_to_f64(resolve_object(doc, o)).ok())
        };
        if let Some(ascent) = number(b"Ascent").filter(|a| *a > 0.0) {
            self.ascent = ascent;
        }
        if let Some(descent) = number(b"Descent").filter(|d| *d < 0.0) {
            self.descent = descent;
        }
    }

    pub fn is_two_byte(&self) -> bool {
        self.two_byte
    }

    /// Split string bytes into glyphs.
    pub fn glyphs(&self, bytes: &[u8]) -> Vec<Glyph> {
        if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| {
                    let code = pair
                        .iter()
                        .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
                    let text = self
                        .unicode(code)
                        .unwrap_or_else(|| "\u{FFFD}".to_string());
                    Glyph {
                        width: self.cid_widths.get(&code).copied().unwrap_or(self.default_width),
                        text,
                        is_word_space: false,
                    }
                })
                .collect()
        } else {
            bytes
                .iter()
                .map(|&b| {
                    let code = u32::from(b);
                    let text = self.unicode(code).unwrap_or_else(|| decode_win_ansi(b));
                    Glyph {
                        width: self.simple_width(code, &text),
                        text,
                        is_word_space: b == b' ',
                    }
                })
                .collect()
        }
    }

    fn unicode(&self, code: u32) -> Option<String> {
        self.to_unicode
            .as_ref()
            .and_then(|cmap| cmap.lookup(code))
            .map(str::to_string)
    }

    fn simple_width(&self, code: u32, text: &str) -> f64 {
        if let Some(w) = code
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
        {
            return *w;
        }
        match (self.standard, text.chars().next()) {
            (Some(font), Some(ch)) => f64::from(font.metrics().glyph_width(ch)),
            _ => self.default_width,
        }
    }
}

fn name_entry(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

fn descendant_font<'a>(
    doc: &'a lopdf::Document,
    dict: &'a lopdf::Dictionary,
) -> Option<&'a lopdf::Dictionary> {
    let array = resolve_object(doc, dict.get(b"DescendantFonts").ok()?)
        .as_array()
        .ok()?;
    resolve_object(doc, array.first()?).as_dict().ok()
}

/// Parse a CIDFont `/W` array: `c [w1 w2 ...]` and `c_first c_last w` forms.
fn parse_cid_widths(doc: &lopdf::Document, items: &[lopdf::Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let number = |o: &lopdf::Object| object_to_f64(resolve_object(doc, o)).ok();
    let mut i = 0;
    while i + 1 < items.len() {
        let Some(first) = number(&items[i]) else {
            i += 1;
            continue;
        };
        let first = first as u32;
        match resolve_object(doc, &items[i + 1]) {
            lopdf::Object::Array(list) => {
                for (offset, w) in list.iter().enumerate() {
                    if let Some(w) = number(w) {
                        widths.insert(first + offset as u32, w);
                    }
                }
                i += 2;
            }
            other => {
                let (Some(last), Some(w)) = (object_to_f64(other).ok(), items.get(i + 2).and_then(number))
                else {
                    break;
                };
                for cid in first..=(last as u32).min(first.saturating_add(0xFFFF)) {
                    widths.insert(cid, w);
                }
                i += 3;
            }
        }
    }
    widths
}

/// WinAnsi is Windows-1252 for every defined code.
pub fn decode_win_ansi(byte: u8) -> String {
    let bytes = [byte];
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
    text.into_owned()
}

/// Encode text for a WinAnsi font. Characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
        if unmappable || bytes.len() != 1 {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, dictionary};

    #[test]
    fn win_ansi_round_trip() {
        assert_eq!(decode_win_ansi(b'A'), "A");
        assert_eq!(decode_win_ansi(0x80), "€");
        assert_eq!(decode_win_ansi(0xE9), "é");
        assert_eq!(encode_win_ansi("Café €5"), b"Caf\xE9 \x805".to_vec());
    }

    #[test]
    fn unmappable_characters_become_question_marks() {
        assert_eq!(encode_win_ansi("a\u{4E2D}b"), b"a?b".to_vec());
    }

    #[test]
    fn standard_font_widths_without_widths_array() {
        let doc = lopdf::Document::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        let font = PageFont::load(&doc, &dict);
        let glyphs = font.glyphs(b"Hi ");
        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[0].text, "H");
        assert_eq!(glyphs[0].width, 722.0);
        assert_eq!(glyphs[1].width, 222.0);
        assert!(glyphs[2].is_word_space);
        assert_eq!(font.ascent, 718.0);
    }

    #[test]
    fn explicit_widths_win() {
        let doc = lopdf::Document::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "ABCDEF+Arial",
            "FirstChar" => 65,
            "Widths" => vec![Object::Integer(700), Object::Integer(650)],
        };
        let font = PageFont::load(&doc, &dict);
        let glyphs = font.glyphs(b"ABC");
        assert_eq!(glyphs[0].width, 700.0);
        assert_eq!(glyphs[1].width, 650.0);
        assert_eq!(glyphs[2].width, DEFAULT_WIDTH);
        assert_eq!(font.ascent, DEFAULT_ASCENT);
    }

    #[test]
    fn type0_uses_two_byte_codes_and_cmap() {
        let mut doc = lopdf::Document::with_version("1.5");
        let cmap = lopdf::Stream::new(
            dictionary! {},
            b"beginbfchar <0001> <0048> <0002> <0069> endbfchar".to_vec(),
        );
        let cmap_id = doc.add_object(cmap);
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "XYZ+NotoSans",
            "ToUnicode" => cmap_id,
            "DescendantFonts" => vec![Object::Dictionary(dictionary! {
                "DW" => 500,
                "W" => vec![Object::Integer(1), Object::Array(vec![Object::Integer(640)])],
            })],
        };
        let font = PageFont::load(&doc, &dict);
        assert!(font.is_two_byte());
        let glyphs = font.glyphs(&[0, 1, 0, 2]);
        let text: String = glyphs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(text, "Hi");
        assert_eq!(glyphs[0].width, 640.0);
        assert_eq!(glyphs[1].width, 500.0);
    }

    #[test]
    fn cid_width_ranges() {
        let doc = lopdf::Document::with_version("1.5");
        let items = vec![
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(300),
            Object::Integer(20),
            Object::Array(vec![Object::Integer(1), Object::Integer(2)]),
        ];
        let widths = parse_cid_widths(&doc, &items);
        assert_eq!(widths.get(&11), Some(&300.0));
        assert_eq!(widths.get(&21), Some(&2.0));
        assert_eq!(widths.get(&13), None);
    }
}
