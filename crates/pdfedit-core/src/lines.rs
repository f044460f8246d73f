//! Line reconstruction and lookup.
//!
//! [`PageTextIndex`] groups a page's spans into visual [`Line`]s;
//! [`LineLocator`] maps a target rectangle back to the line it falls on.

use crate::font::FontResolver;
use crate::geometry::BBox;
use crate::options::EditOptions;
use crate::text::{Alignment, Line, TextSpan};

/// Read-only view of one page's text: its spans and the lines built from them.
#[derive(Debug, Clone)]
pub struct PageTextIndex {
    page_width: f64,
    page_height: f64,
    spans: Vec<TextSpan>,
    lines: Vec<Line>,
}

impl PageTextIndex {
    pub fn build(spans: Vec<TextSpan>, page_width: f64, page_height: f64, options: &EditOptions) -> Self {
        let lines = group_lines(&spans, page_width, options);
        Self {
            page_width,
            page_height,
            spans,
            lines,
        }
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Spans in content-stream order.
    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    /// Lines top to bottom.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Whether any span has visible text.
    pub fn has_text(&self) -> bool {
        self.spans.iter().any(|s| !s.is_blank())
    }

    /// Line texts joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn locate(&self, target: &BBox) -> Option<&Line> {
        LineLocator::locate(&self.lines, target)
    }
}

/// Cluster spans into lines by vertical midpoint.
///
/// Spans whose midpoints are within `options.line_tolerance` of a line's
/// midpoint join that line. Blank spans only ever join an existing line.
pub fn group_lines(spans: &[TextSpan], page_width: f64, options: &EditOptions) -> Vec<Line> {
    let mut sorted: Vec<&TextSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then(a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    // Visible spans first so that blank ones never seed a line.
    sorted.sort_by_key(|s| s.is_blank());

    let mut groups: Vec<(BBox, Vec<&TextSpan>)> = Vec::new();
    for span in sorted {
        let mid_y = span.bbox.center().y;
        let found = groups
            .iter_mut()
            .find(|(bbox, _)| (mid_y - bbox.center().y).abs() <= options.line_tolerance);
        match found {
            Some((bbox, members)) => {
                *bbox = bbox.union(&span.bbox);
                members.push(span);
            }
            None if !span.is_blank() => groups.push((span.bbox, vec![span])),
            None => {}
        }
    }

    let mut lines: Vec<Line> = groups
        .into_iter()
        .filter_map(|(bbox, mut members)| {
            members.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            let first = members.iter().find(|s| !s.is_blank())?;
            let font = FontResolver::resolve_span(first);
            let baseline_y = first.origin.y;
            Some(Line {
                bbox,
                text: join_span_texts(&members),
                font,
                alignment: classify_alignment(&bbox, page_width, options),
                baseline_y,
                spans: members.into_iter().cloned().collect(),
            })
        })
        .collect();

    lines.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));
    lines
}

fn join_span_texts(spans: &[&TextSpan]) -> String {
    let mut text = String::new();
    let mut prev: Option<&TextSpan> = None;
    for span in spans {
        if let Some(p) = prev {
            if needs_separator(p, span, &text) {
                text.push(' ');
            }
        }
        text.push_str(&span.text);
        prev = Some(span);
    }
    text
}

/// A space goes between two spans when they are visibly apart and
/// neither side already ends or starts with whitespace.
pub(crate) fn needs_separator(prev: &TextSpan, next: &TextSpan, text_so_far: &str) -> bool {
    let gap = next.bbox.x0 - prev.bbox.x1;
    let boundary_space =
        text_so_far.ends_with(char::is_whitespace) || next.text.starts_with(char::is_whitespace);
    gap > 0.1 * prev.size && !boundary_space
}

/// Classify a line by where its center falls across the page.
///
/// Cut points are exclusive: a center exactly on a threshold is centered.
pub fn classify_alignment(bbox: &BBox, page_width: f64, options: &EditOptions) -> Alignment {
    let center = bbox.center().x;
    if center < options.left_threshold * page_width {
        Alignment::Left
    } else if center > options.right_threshold * page_width {
        Alignment::Right
    } else {
        Alignment::Center
    }
}

/// Finds the line a target rectangle belongs to.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineLocator;

impl LineLocator {
    /// First line (top to bottom) whose box intersects or contains `target`.
    pub fn locate<'a>(lines: &'a [Line], target: &BBox) -> Option<&'a Line> {
        lines.iter().find(|l| Self::hits(l, target))
    }

    /// Every line touched by `target`, top to bottom.
    pub fn locate_all<'a>(lines: &'a [Line], target: &BBox) -> Vec<&'a Line> {
        lines.iter().filter(|l| Self::hits(l, target)).collect()
    }

    /// Among the lines touched by `target` that satisfy `accept`, the one
    /// whose box holds `target`'s vertical center, else the one whose center
    /// is nearest.
    pub fn locate_nearest<'a>(
        lines: &'a [Line],
        target: &BBox,
        accept: impl Fn(&Line) -> bool,
    ) -> Option<&'a Line> {
        let middle = target.center().y;
        let distance = |l: &Line| {
            let inside = l.bbox.top <= middle && middle <= l.bbox.bottom;
            (!inside, (l.bbox.center().y - middle).abs())
        };
        lines
            .iter()
            .filter(|l| Self::hits(l, target) && accept(l))
            .min_by(|a, b| {
                let (a_out, a_dist) = distance(a);
                let (b_out, b_dist) = distance(b);
                a_out.cmp(&b_out).then(a_dist.total_cmp(&b_dist))
            })
    }

    fn hits(line: &Line, target: &BBox) -> bool {
        line.bbox.intersects(target) || line.bbox.contains(target)
    }
}
