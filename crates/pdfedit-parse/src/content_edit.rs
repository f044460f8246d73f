//! Rewriting operation lists: blanking shown text, painting rectangles and
//! appending new text runs.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use pdfedit_core::{BBox, Color};

use crate::backend::TextRun;
use crate::fonts::encode_win_ansi;
use crate::interpreter::{PageFrame, ShownText};

/// Wrap existing page content in `q ... Q` so appended operators start
/// from the default graphics state.
pub fn isolate(operations: Vec<Operation>) -> Vec<Operation> {
    let mut out = Vec::with_capacity(operations.len() + 2);
    out.push(Operation::new("q", vec![]));
    out.extend(operations);
    out.push(Operation::new("Q", vec![]));
    out
}

/// Replace every text-showing operator whose span has its vertical center
/// inside `rect` (and overlaps it horizontally) with a glyph-less `TJ` of
/// the same advance, so text drawn later in the same text object stays in
/// place. Returns the number of operators blanked.
///
/// Spans that merely graze the rectangle, such as the descenders of the
/// line above under tight leading, are left alone.
pub fn blank_text(operations: &mut Vec<Operation>, shown: &[ShownText], rect: &BBox) -> usize {
    let mut targets: Vec<&ShownText> = shown
        .iter()
        .filter(|s| rect.holds_center_of(&s.span.bbox))
        .collect();
    targets.sort_by(|a, b| b.op_index.cmp(&a.op_index));
    targets.dedup_by_key(|s| s.op_index);

    for target in &targets {
        let Some(original) = operations.get(target.op_index) else {
            continue;
        };
        let scale = target.font_size * target.h_scale;
        let adjustment = if scale.abs() > f64::EPSILON {
            -target.advance * 1000.0 / scale
        } else {
            0.0
        };
        let blank = Operation::new("TJ", vec![Object::Array(vec![Object::from(adjustment)])]);

        let replacement = match original.operator.as_str() {
            "'" => vec![Operation::new("T*", vec![]), blank],
            "\"" => {
                let aw = original.operands.first().cloned().unwrap_or(Object::Integer(0));
                let ac = original.operands.get(1).cloned().unwrap_or(Object::Integer(0));
                vec![
                    Operation::new("Tw", vec![aw]),
                    Operation::new("Tc", vec![ac]),
                    Operation::new("T*", vec![]),
                    blank,
                ]
            }
            _ => vec![blank],
        };
        operations.splice(target.op_index..=target.op_index, replacement);
    }
    targets.len()
}

/// `q r g b rg x y w h re f Q` for a rectangle in page coordinates.
pub fn fill_rect(frame: &PageFrame, rect: &BBox, color: Color) -> Vec<Operation> {
    let (x, y) = frame.to_user(pdfedit_core::Point::new(rect.x0, rect.bottom));
    vec![
        Operation::new("q", vec![]),
        rgb_fill(color),
        Operation::new(
            "re",
            vec![
                Object::from(x),
                Object::from(y),
                Object::from(rect.width()),
                Object::from(rect.height()),
            ],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

/// A self-contained text object drawing `run` with the font registered
/// under `font_resource`.
pub fn draw_text(frame: &PageFrame, font_resource: &str, run: &TextRun) -> Vec<Operation> {
    let (x, y) = frame.to_user(run.origin);
    vec![
        Operation::new("q", vec![]),
        rgb_fill(run.color),
        Operation::new("BT", vec![]),
        Operation::new("Tr", vec![Object::Integer(0)]),
        Operation::new(
            "Tf",
            vec![Object::Name(font_resource.as_bytes().to_vec()), Object::from(run.size)],
        ),
        Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::from(x),
                Object::from(y),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn rgb_fill(color: Color) -> Operation {
    Operation::new(
        "rg",
        vec![Object::from(color.r), Object::from(color.g), Object::from(color.b)],
    )
}
