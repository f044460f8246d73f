//! Cascading vertical shift for whole-page rebuilds.

use crate::geometry::BBox;
use crate::options::{EditOptions, OverlapPolicy};
use crate::text::TextSpan;

/// How a page's spans are redistributed around a replaced selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftPlan {
    /// Spans whose center lies above the selection; redrawn unchanged.
    pub above: Vec<TextSpan>,
    /// Spans removed together with the selection.
    pub in_selection: Vec<TextSpan>,
    /// Everything else, in original order; redrawn `extra_vertical_space` lower.
    pub below: Vec<TextSpan>,
    /// Always `>= 0`.
    pub extra_vertical_space: f64,
}

impl ShiftPlan {
    /// Partition `spans` around `selection` and size the shift for
    /// `replacement_lines` lines of text at `line_height`.
    ///
    /// Blank spans are dropped; they have nothing to redraw.
    pub fn new(
        spans: &[TextSpan],
        selection: &BBox,
        replacement_lines: usize,
        line_height: f64,
        options: &EditOptions,
    ) -> Self {
        let mut above = Vec::new();
        let mut in_selection = Vec::new();
        let mut below = Vec::new();

        for span in spans.iter().filter(|s| !s.is_blank()) {
            if Self::is_selected(span, selection, options.overlap_policy) {
                in_selection.push(span.clone());
            } else if span.bbox.center().y < selection.top {
                above.push(span.clone());
            } else {
                below.push(span.clone());
            }
        }

        let needed = replacement_lines as f64 * line_height;
        Self {
            above,
            in_selection,
            below,
            extra_vertical_space: (needed - selection.height()).max(0.0),
        }
    }

    fn is_selected(span: &TextSpan, selection: &BBox, policy: OverlapPolicy) -> bool {
        match (policy, span.bbox.intersection(selection)) {
            (_, None) => false,
            (OverlapPolicy::Discard, Some(_)) => true,
            (OverlapPolicy::Preserve, Some(overlap)) => {
                let own = span.bbox.area();
                own <= 0.0 || overlap.area() * 2.0 >= own
            }
        }
    }

    /// Below spans moved down by the extra space, order preserved.
    pub fn shifted_below(&self) -> Vec<TextSpan> {
        self.below
            .iter()
            .map(|s| s.shifted(self.extra_vertical_space))
            .collect()
    }
}
