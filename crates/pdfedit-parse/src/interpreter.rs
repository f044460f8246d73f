//! Content stream interpreter.
//!
//! Walks decoded content stream operations, tracking the graphics and text
//! state, and records one [`ShownText`] per text-showing operator. The
//! records keep the operator's index so the editor can later rewrite it.

use std::collections::HashMap;

use lopdf::content::Operation;
use lopdf::{Dictionary, Document, Object};
use pdfedit_core::{BBox, Color, Ctm, Point, TextSpan};

use crate::fonts::PageFont;
use crate::lopdf_backend::{object_to_f64, resolve_object};
use crate::text_state::{TextParams, TextState};

/// TJ adjustments more negative than this read as a word break.
const SPACE_ADJUSTMENT: f64 = -250.0;

/// Text shown by one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    /// Index of the operator in the interpreted operation list.
    pub op_index: usize,
    pub span: TextSpan,
    /// Total horizontal advance in unscaled text space units.
    pub advance: f64,
    pub font_size: f64,
    /// Horizontal scaling as a fraction.
    pub h_scale: f64,
}

/// Maps PDF user space onto top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub left: f64,
    pub top: f64,
}

impl PageFrame {
    /// Frame for a `[llx lly urx ury]` media box.
    pub fn from_media_box(media_box: &BBox) -> Self {
        Self {
            left: media_box.x0.min(media_box.x1),
            top: media_box.top.max(media_box.bottom),
        }
    }

    pub fn to_page(&self, x: f64, y: f64) -> Point {
        Point::new(x - self.left, self.top - y)
    }

    pub fn to_user(&self, point: Point) -> (f64, f64) {
        (point.x + self.left, self.top - point.y)
    }
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Ctm,
    fill: Color,
    text: TextParams,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Ctm::identity(),
            fill: Color::black(),
            text: TextParams::default(),
        }
    }
}

enum ShowItem<'o> {
    Bytes(&'o [u8]),
    Adjust(f64),
}

/// Interprets one page's operations against its `/Font` resources.
pub struct Interpreter<'a> {
    doc: &'a Document,
    font_resources: Option<&'a Dictionary>,
    frame: PageFrame,
    fonts: HashMap<String, PageFont>,
}

impl<'a> Interpreter<'a> {
    pub fn new(doc: &'a Document, font_resources: Option<&'a Dictionary>, frame: PageFrame) -> Self {
        Self {
            doc,
            font_resources,
            frame,
            fonts: HashMap::new(),
        }
    }

    pub fn run(&mut self, operations: &[Operation]) -> Vec<ShownText> {
        let mut shown = Vec::new();
        let mut gstate = GraphicsState::default();
        let mut stack: Vec<GraphicsState> = Vec::new();
        let mut tstate = TextState::new();

        for (op_index, op) in operations.iter().enumerate() {
            let operands = op.operands.as_slice();
            match op.operator.as_str() {
                "q" => {
                    gstate.text = tstate.params.clone();
                    stack.push(gstate.clone());
                }
                "Q" => {
                    if let Some(saved) = stack.pop() {
                        tstate.params = saved.text.clone();
                        gstate = saved;
                    }
                }
                "cm" => {
                    if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                        gstate.ctm = Ctm::new(a, b, c, d, e, f).concat(&gstate.ctm);
                    }
                }

                "g" => {
                    if let Some([level]) = numbers::<1>(operands) {
                        gstate.fill = Color::gray(level);
                    }
                }
                "rg" => {
                    if let Some([r, g, b]) = numbers::<3>(operands) {
                        gstate.fill = Color::new(r, g, b);
                    }
                }
                "k" => {
                    if let Some([c, m, y, k]) = numbers::<4>(operands) {
                        gstate.fill = Color::from_cmyk(c, m, y, k);
                    }
                }
                "sc" | "scn" => {
                    let components: Vec<f64> = operands
                        .iter()
                        .filter_map(|o| object_to_f64(o).ok())
                        .collect();
                    gstate.fill = match components.as_slice() {
                        [level] => Color::gray(*level),
                        [r, g, b] => Color::new(*r, *g, *b),
                        [c, m, y, k] => Color::from_cmyk(*c, *m, *y, *k),
                        _ => gstate.fill,
                    };
                }

                "BT" => tstate.begin_text(),
                "ET" => tstate.end_text(),
                "Tf" => {
                    if let (Some(name), Some(size)) = (
                        operands.first().and_then(|o| o.as_name().ok()),
                        operands.get(1).and_then(|o| object_to_f64(o).ok()),
                    ) {
                        tstate.params.font_resource = String::from_utf8_lossy(name).into_owned();
                        tstate.params.font_size = size;
                    }
                }
                "Tm" => {
                    if let Some([a, b, c, d, e, f]) = numbers::<6>(operands) {
                        tstate.set_text_matrix(Ctm::new(a, b, c, d, e, f));
                    }
                }
                "Td" => {
                    if let Some([tx, ty]) = numbers::<2>(operands) {
                        tstate.move_text_position(tx, ty);
                    }
                }
                "TD" => {
                    if let Some([tx, ty]) = numbers::<2>(operands) {
                        tstate.move_text_position_and_set_leading(tx, ty);
                    }
                }
                "T*" => tstate.move_to_next_line(),
                "TL" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.params.leading = v;
                    }
                }
                "Tc" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.params.char_spacing = v;
                    }
                }
                "Tw" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.params.word_spacing = v;
                    }
                }
                "Tz" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.params.h_scaling = v;
                    }
                }
                "Ts" => {
                    if let Some([v]) = numbers::<1>(operands) {
                        tstate.params.rise = v;
                    }
                }
                "Tr" => {
                    if let Some(mode) = operands.first().and_then(|o| o.as_i64().ok()) {
                        tstate.params.render_mode = mode;
                    }
                }

                "Tj" => {
                    let items: Vec<ShowItem<'_>> = string_bytes(operands.first())
                        .map(ShowItem::Bytes)
                        .into_iter()
                        .collect();
                    self.show(op_index, &items, &mut tstate, &gstate, &mut shown);
                }
                "TJ" => {
                    let items = operands
                        .first()
                        .and_then(|o| o.as_array().ok())
                        .map(|array| {
                            array
                                .iter()
                                .filter_map(|item| match item {
                                    Object::String(bytes, _) => Some(ShowItem::Bytes(bytes)),
                                    other => object_to_f64(other).ok().map(ShowItem::Adjust),
                                })
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default();
                    self.show(op_index, &items, &mut tstate, &gstate, &mut shown);
                }
                "'" => {
                    tstate.move_to_next_line();
                    let items: Vec<ShowItem<'_>> = string_bytes(operands.first())
                        .map(ShowItem::Bytes)
                        .into_iter()
                        .collect();
                    self.show(op_index, &items, &mut tstate, &gstate, &mut shown);
                }
                "\"" => {
                    if let Some([aw, ac]) = numbers::<2>(operands) {
                        tstate.params.word_spacing = aw;
                        tstate.params.char_spacing = ac;
                    }
                    tstate.move_to_next_line();
                    let items: Vec<ShowItem<'_>> = string_bytes(operands.get(2))
                        .map(ShowItem::Bytes)
                        .into_iter()
                        .collect();
                    self.show(op_index, &items, &mut tstate, &gstate, &mut shown);
                }
                // Form XObjects and everything else have no effect on text.
                _ => {}
            }
        }
        shown
    }

    fn font(&mut self, resource: &str) -> &PageFont {
        let doc = self.doc;
        let resources = self.font_resources;
        self.fonts.entry(resource.to_string()).or_insert_with(|| {
            resources
                .and_then(|fonts| fonts.get(resource.as_bytes()).ok())
                .and_then(|obj| resolve_object(doc, obj).as_dict().ok())
                .map_or_else(|| PageFont::missing(resource), |dict| PageFont::load(doc, dict))
        })
    }

    fn show(
        &mut self,
        op_index: usize,
        items: &[ShowItem<'_>],
        tstate: &mut TextState,
        gstate: &GraphicsState,
        shown: &mut Vec<ShownText>,
    ) {
        if !tstate.in_text_object() {
            return;
        }
        let params = tstate.params.clone();
        let h_scale = tstate.h_scale();
        let start = *tstate.text_matrix();
        let font = self.font(&params.font_resource).clone();

        let mut text = String::new();
        let mut advance = 0.0;
        for item in items {
            match item {
                ShowItem::Bytes(bytes) => {
                    for glyph in font.glyphs(bytes) {
                        let spacing = params.char_spacing
                            + if glyph.is_word_space { params.word_spacing } else { 0.0 };
                        advance += (glyph.width / 1000.0 * params.font_size + spacing) * h_scale;
                        text.push_str(&glyph.text);
                    }
                }
                ShowItem::Adjust(n) => {
                    advance -= n / 1000.0 * params.font_size * h_scale;
                    if *n < SPACE_ADJUSTMENT && !text.is_empty() && !text.ends_with(' ') {
                        text.push(' ');
                    }
                }
            }
        }
        tstate.advance(advance);

        if text.is_empty() {
            return;
        }

        let to_user = start.concat(&gstate.ctm);
        let low = params.rise + font.descent / 1000.0 * params.font_size;
        let high = params.rise + font.ascent / 1000.0 * params.font_size;
        let corners = [(0.0, low), (advance, low), (0.0, high), (advance, high)]
            .map(|(x, y)| {
                let (ux, uy) = to_user.transform_point(x, y);
                self.frame.to_page(ux, uy)
            });
        let bbox = corners.iter().skip(1).fold(
            BBox::new(corners[0].x, corners[0].y, corners[0].x, corners[0].y),
            |acc, p| BBox::new(acc.x0.min(p.x), acc.top.min(p.y), acc.x1.max(p.x), acc.bottom.max(p.y)),
        );
        let (ox, oy) = to_user.transform_point(0.0, params.rise);
        let size = params.font_size * to_user.vertical_scale();
        let font_name = if font.base_font.is_empty() {
            params.font_resource.clone()
        } else {
            font.base_font.clone()
        };

        shown.push(ShownText {
            op_index,
            span: TextSpan::new(text, bbox, font_name, size)
                .with_color(gstate.fill)
                .with_origin(self.frame.to_page(ox, oy)),
            advance,
            font_size: params.font_size,
            h_scale,
        });
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f64; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(operands) {
        *slot = object_to_f64(obj).ok()?;
    }
    Some(out)
}

fn string_bytes(obj: Option<&Object>) -> Option<&[u8]> {
    match obj {
        Some(Object::String(bytes, _)) => Some(bytes.as_slice()),
        _ => None,
    }
}
