//! Font-name canonicalization.
//!
//! Embedded font names are noisy (`ABCDEF+TimesNewRomanPS-BoldItalicMT`,
//! `Arial,Bold`, `CourierNewPSMT`). [`FontResolver`] reduces them to a
//! [`FontFamily`] plus bold/italic flags, and [`FontInfo::standard_font`]
//! picks the standard-14 face used to redraw replacement text.

use std::fmt;

use crate::color::Color;
use crate::text::TextSpan;

/// Font size assumed when nothing better is known.
pub const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Coarse font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFamily {
    Serif,
    #[default]
    Sans,
    Mono,
    Symbol,
    Dingbats,
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontFamily::Serif => "serif",
            FontFamily::Sans => "sans",
            FontFamily::Mono => "mono",
            FontFamily::Symbol => "symbol",
            FontFamily::Dingbats => "dingbats",
        };
        f.write_str(name)
    }
}

/// Visual font properties of a span or line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontInfo {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
    /// Size in points.
    pub size: f64,
    pub color: Color,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            family: FontFamily::Sans,
            bold: false,
            italic: false,
            size: DEFAULT_FONT_SIZE,
            color: Color::black(),
        }
    }
}

impl FontInfo {
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// The standard-14 face that draws this family and style.
    pub fn standard_font(&self) -> StandardFont {
        StandardFont::select(self.family, self.bold, self.italic)
    }

    /// Width of `text` in this font.
    pub fn measure(&self, text: &str) -> f64 {
        self.standard_font().measure(text, self.size)
    }
}

/// The fourteen fonts every PDF viewer must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardFont {
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
    Symbol,
    ZapfDingbats,
}

impl StandardFont {
    pub fn select(family: FontFamily, bold: bool, italic: bool) -> Self {
        use StandardFont::*;
        match (family, bold, italic) {
            (FontFamily::Serif, false, false) => TimesRoman,
            (FontFamily::Serif, true, false) => TimesBold,
            (FontFamily::Serif, false, true) => TimesItalic,
            (FontFamily::Serif, true, true) => TimesBoldItalic,
            (FontFamily::Sans, false, false) => Helvetica,
            (FontFamily::Sans, true, false) => HelveticaBold,
            (FontFamily::Sans, false, true) => HelveticaOblique,
            (FontFamily::Sans, true, true) => HelveticaBoldOblique,
            (FontFamily::Mono, false, false) => Courier,
            (FontFamily::Mono, true, false) => CourierBold,
            (FontFamily::Mono, false, true) => CourierOblique,
            (FontFamily::Mono, true, true) => CourierBoldOblique,
            (FontFamily::Symbol, _, _) => Symbol,
            (FontFamily::Dingbats, _, _) => ZapfDingbats,
        }
    }

    /// PostScript name written into `/BaseFont`.
    pub fn base_font(self) -> &'static str {
        use StandardFont::*;
        match self {
            TimesRoman => "Times-Roman",
            TimesBold => "Times-Bold",
            TimesItalic => "Times-Italic",
            TimesBoldItalic => "Times-BoldItalic",
            Helvetica => "Helvetica",
            HelveticaBold => "Helvetica-Bold",
            HelveticaOblique => "Helvetica-Oblique",
            HelveticaBoldOblique => "Helvetica-BoldOblique",
            Courier => "Courier",
            CourierBold => "Courier-Bold",
            CourierOblique => "Courier-Oblique",
            CourierBoldOblique => "Courier-BoldOblique",
            Symbol => "Symbol",
            ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Four-letter resource id, e.g. `hebo` for Helvetica-Bold.
    pub fn short_name(self) -> &'static str {
        use StandardFont::*;
        match self {
            TimesRoman => "tiro",
            TimesBold => "tibo",
            TimesItalic => "tiit",
            TimesBoldItalic => "tibi",
            Helvetica => "helv",
            HelveticaBold => "hebo",
            HelveticaOblique => "heit",
            HelveticaBoldOblique => "hebi",
            Courier => "cour",
            CourierBold => "cobo",
            CourierOblique => "coit",
            CourierBoldOblique => "cobi",
            Symbol => "symb",
            ZapfDingbats => "zadb",
        }
    }

    /// Symbol and ZapfDingbats use their own built-in encodings.
    pub fn uses_win_ansi(self) -> bool {
        !matches!(self, StandardFont::Symbol | StandardFont::ZapfDingbats)
    }

    /// Inverse of [`base_font`](Self::base_font).
    pub fn from_base_font(name: &str) -> Option<Self> {
        ALL_STANDARD_FONTS
            .iter()
            .copied()
            .find(|f| f.base_font() == name)
    }
}

pub const ALL_STANDARD_FONTS: [StandardFont; 14] = [
    StandardFont::TimesRoman,
    StandardFont::TimesBold,
    StandardFont::TimesItalic,
    StandardFont::TimesBoldItalic,
    StandardFont::Helvetica,
    StandardFont::HelveticaBold,
    StandardFont::HelveticaOblique,
    StandardFont::HelveticaBoldOblique,
    StandardFont::Courier,
    StandardFont::CourierBold,
    StandardFont::CourierOblique,
    StandardFont::CourierBoldOblique,
    StandardFont::Symbol,
    StandardFont::ZapfDingbats,
];

const BOLD_MARKERS: [&str; 4] = ["bold", "bd", "heavy", "black"];
const ITALIC_MARKERS: [&str; 4] = ["italic", "it", "oblique", "slant"];

/// Maps raw PDF font names to [`FontInfo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FontResolver;

impl FontResolver {
    /// Canonicalize a raw font name. Unknown names resolve to regular sans.
    pub fn resolve(raw_font_name: &str) -> FontInfo {
        let name = Self::normalize(raw_font_name);
        let bold = BOLD_MARKERS.iter().any(|m| name.contains(m));
        let italic = ITALIC_MARKERS.iter().any(|m| name.contains(m));
        FontInfo {
            family: Self::family(&name),
            bold,
            italic,
            ..FontInfo::default()
        }
    }

    /// Resolve a span's font, carrying its size and fill color.
    pub fn resolve_span(span: &TextSpan) -> FontInfo {
        let size = if span.size > 0.0 {
            span.size
        } else {
            DEFAULT_FONT_SIZE
        };
        Self::resolve(&span.font_name)
            .with_size(size)
            .with_color(span.color)
    }

    /// Strip a subset tag, lowercase, drop hyphens, spaces and commas.
    pub fn normalize(raw_font_name: &str) -> String {
        let base = match raw_font_name.split_once('+') {
            Some((_, rest)) => rest,
            None => raw_font_name,
        };
        base.chars()
            .filter(|c| !matches!(c, '-' | ' ' | ','))
            .flat_map(char::to_lowercase)
            .collect()
    }

    fn family(normalized: &str) -> FontFamily {
        let has = |needles: &[&str]| needles.iter().any(|n| normalized.contains(n));
        if has(&["times", "serif", "roman"]) {
            FontFamily::Serif
        } else if has(&["helvetica", "arial"]) {
            FontFamily::Sans
        } else if has(&["courier", "mono"]) {
            FontFamily::Mono
        } else if has(&["symbol"]) {
            FontFamily::Symbol
        } else if has(&["zapf", "dingbat"]) {
            FontFamily::Dingbats
        } else {
            FontFamily::Sans
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_prefixed_times_bold_italic() {
        let info = FontResolver::resolve("ABCDEF+TimesNewRoman-BoldItalic");
        assert_eq!(info.family, FontFamily::Serif);
        assert!(info.bold);
        assert!(info.italic);
        assert_eq!(info.standard_font(), StandardFont::TimesBoldItalic);
    }

    #[test]
    fn arial_maps_to_sans() {
        let info = FontResolver::resolve("Arial,Bold");
        assert_eq!(info.family, FontFamily::Sans);
        assert!(info.bold);
        assert!(!info.italic);
        assert_eq!(info.standard_font().short_name(), "hebo");
    }

    #[test]
    fn courier_oblique() {
        let info = FontResolver::resolve("CourierNewPS-ObliqueMT");
        assert_eq!(info.family, FontFamily::Mono);
        assert!(info.italic);
        assert_eq!(info.standard_font(), StandardFont::CourierOblique);
    }

    #[test]
    fn serif_and_sans_keywords_win_over_mono() {
        assert_eq!(FontResolver::resolve("HelveticaMonospaced").family, FontFamily::Sans);
        assert_eq!(FontResolver::resolve("TimesMono").family, FontFamily::Serif);
        assert_eq!(FontResolver::resolve("DejaVuSansMono").family, FontFamily::Mono);
        assert_eq!(FontResolver::resolve("Courier").family, FontFamily::Mono);
    }

    #[test]
    fn heavy_and_black_count_as_bold() {
        assert!(FontResolver::resolve("Helvetica-Heavy").bold);
        assert!(FontResolver::resolve("Arial Black").bold);
        assert!(FontResolver::resolve("Times-Bd").bold);
    }

    #[test]
    fn symbol_and_dingbats() {
        assert_eq!(FontResolver::resolve("Symbol").family, FontFamily::Symbol);
        assert_eq!(
            FontResolver::resolve("ZapfDingbats").family,
            FontFamily::Dingbats
        );
        assert_eq!(
            FontInfo {
                family: FontFamily::Symbol,
                bold: true,
                ..FontInfo::default()
            }
            .standard_font(),
            StandardFont::Symbol
        );
    }

    #[test]
    fn unknown_font_defaults_to_regular_sans() {
        let info = FontResolver::resolve("F1");
        assert_eq!(info, FontInfo::default());
        assert_eq!(info.standard_font(), StandardFont::Helvetica);
        assert_eq!(info.size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn empty_name_is_safe() {
        assert_eq!(FontResolver::resolve("").family, FontFamily::Sans);
        assert_eq!(FontResolver::resolve("+").family, FontFamily::Sans);
    }

    #[test]
    fn normalize_strips_prefix_and_separators() {
        assert_eq!(
            FontResolver::normalize("XYZABC+Times New-Roman"),
            "timesnewroman"
        );
    }

    #[test]
    fn base_font_round_trip() {
        for font in ALL_STANDARD_FONTS {
            assert_eq!(StandardFont::from_base_font(font.base_font()), Some(font));
        }
        assert_eq!(StandardFont::from_base_font("Arial"), None);
    }

    #[test]
    fn short_names_are_unique() {
        let mut names: Vec<_> = ALL_STANDARD_FONTS.iter().map(|f| f.short_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 14);
    }

    #[test]
    fn span_resolution_keeps_size_and_color() {
        let span = TextSpan::new(
            "Hi",
            crate::geometry::BBox::new(0.0, 0.0, 10.0, 12.0),
            "Times-Bold",
            14.0,
        )
        .with_color(Color::from_packed(0xFF0000));
        let info = FontResolver::resolve_span(&span);
        assert_eq!(info.size, 14.0);
        assert_eq!(info.color, Color::new(1.0, 0.0, 0.0));
        assert_eq!(info.standard_font(), StandardFont::TimesBold);
    }
}
