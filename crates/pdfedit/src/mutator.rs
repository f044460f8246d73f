//! Page rewrites: erase text, then draw its replacement.
//!
//! Three modes are supported:
//!
//! - **Line reflow** redraws one line in place, aligned as before.
//! - **Page rebuild** clears the page and redraws every span, pushing the
//!   content below a selection down to make room for longer text.
//! - **Line group reflow** rewraps a phrase that runs across several lines
//!   into the width those lines occupied.

use pdfedit_core::{
    Alignment, BBox, EditError, EditOptions, EditWarning, EditWarningCode, FontInfo,
    FontResolver, Line, PageTextIndex, Point, ShiftPlan, TextReflower, TextSpan,
};
use pdfedit_parse::{EditBackend, PageSize, TextRun};
use tracing::{debug, warn};

/// How far a rewrite got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    /// Nothing touched yet.
    Idle,
    /// Target line(s) identified.
    Located,
    /// Page spans read and grouped.
    Indexed,
    /// Spans split around the selection.
    Partitioned,
    /// Old text erased from the target area.
    Redacted,
    /// The whole page erased.
    Cleared,
    /// Replacement line(s) drawn.
    Reinserted,
    /// Every span and the replacement drawn.
    Rebuilt,
}

/// Rewrites text on one page of a document.
pub struct PageMutator<'a, B: EditBackend> {
    doc: &'a mut B::Document,
    page: B::Page,
    page_index: usize,
    size: PageSize,
    options: &'a EditOptions,
    stage: MutationStage,
    warnings: Vec<EditWarning>,
}

pub(crate) fn backend_err<E: Into<EditError>>(err: E) -> EditError {
    err.into()
}

impl<'a, B: EditBackend> PageMutator<'a, B> {
    pub fn new(
        doc: &'a mut B::Document,
        page_index: usize,
        options: &'a EditOptions,
    ) -> Result<Self, EditError> {
        let page = B::get_page(&*doc, page_index).map_err(backend_err)?;
        let size = B::page_size(&*doc, &page).map_err(backend_err)?;
        Ok(Self {
            doc,
            page,
            page_index,
            size,
            options,
            stage: MutationStage::Idle,
            warnings: Vec::new(),
        })
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.size
    }

    pub fn stage(&self) -> MutationStage {
        self.stage
    }

    pub fn warnings(&self) -> &[EditWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<EditWarning> {
        self.warnings
    }

    /// Record a warning against this page.
    pub fn warn(&mut self, code: EditWarningCode, description: impl Into<String>) {
        let warning = EditWarning::on_page(code, description, self.page_index);
        warn!(page = self.page_index, code = %warning.code, "{}", warning.description);
        self.warnings.push(warning);
    }

    /// Current spans grouped into lines.
    pub fn index(&self) -> Result<PageTextIndex, EditError> {
        let spans = B::text_spans(&*self.doc, &self.page).map_err(backend_err)?;
        Ok(PageTextIndex::build(
            spans,
            self.size.width,
            self.size.height,
            self.options,
        ))
    }

    fn draw(&mut self, origin: Point, text: &str, font: &FontInfo) -> Result<(), EditError> {
        let run = TextRun {
            origin,
            text: text.to_string(),
            font: font.standard_font(),
            size: font.size,
            color: font.color,
        };
        B::draw_text(&mut *self.doc, &self.page, &run).map_err(backend_err)
    }

    fn redraw_span(&mut self, span: &TextSpan) -> Result<(), EditError> {
        let font = FontResolver::resolve_span(span);
        self.draw(span.origin, &span.text, &font)
    }

    /// Erase `line` and draw `new_text` on its baseline.
    ///
    /// The erased band runs from `x0 - margin` to the mirrored position on
    /// the right, widened when needed to cover the whole line. Blank
    /// `new_text` leaves the line empty.
    pub fn reflow_line(&mut self, line: &Line, new_text: &str) -> Result<(), EditError> {
        self.stage = MutationStage::Located;
        let width = self.size.width;
        let margin = self.options.redaction_margin;
        let left = line.bbox.x0 - margin;
        let band = BBox::new(
            left.min(width - left),
            line.bbox.top,
            (width - left).max(line.bbox.x1 + margin),
            line.bbox.bottom,
        );

        B::erase(&mut *self.doc, &self.page, &band, self.options.background).map_err(backend_err)?;
        self.stage = MutationStage::Redacted;
        debug!(page = self.page_index, line = %line.text, "erased line");

        if new_text.trim().is_empty() {
            self.stage = MutationStage::Reinserted;
            return Ok(());
        }

        let text_width = line.font.measure(new_text);
        let x = match line.alignment {
            Alignment::Left => line.bbox.x0,
            Alignment::Right => width - text_width - line.bbox.x0,
            Alignment::Center => (width - text_width) / 2.0,
        };
        if text_width > band.width() || x < 0.0 || x + text_width > width {
            self.warn(
                EditWarningCode::Overflow,
                format!(
                    "text \"{new_text}\" ({text_width:.0}pt) does not fit the {:.0}pt erased line",
                    band.width()
                ),
            );
        }

        self.draw(Point::new(x, line.baseline_y), new_text, &line.font)?;
        self.stage = MutationStage::Reinserted;
        debug!(page = self.page_index, x, y = line.baseline_y, alignment = %line.alignment, "redrew line");
        Ok(())
    }

    /// Replace everything under `selection` with `replacement` and redraw
    /// the page, shifting content below the selection down when the new
    /// text needs more height.
    pub fn rebuild_page(
        &mut self,
        selection: &BBox,
        replacement: &str,
    ) -> Result<ShiftPlan, EditError> {
        let index = self.index()?;
        self.stage = MutationStage::Indexed;

        let font = index
            .spans()
            .iter()
            .find(|s| !s.is_blank() && s.bbox.intersects(selection))
            .map(FontResolver::resolve_span)
            .unwrap_or_else(|| FontInfo::default().with_size(self.options.default_font_size));
        let line_height = font.size * self.options.rebuild_line_height;
        let wrapped = TextReflower::wrap(replacement, &font, selection.width());

        let plan = ShiftPlan::new(
            index.spans(),
            selection,
            wrapped.len(),
            line_height,
            self.options,
        );
        self.stage = MutationStage::Partitioned;
        debug!(
            page = self.page_index,
            above = plan.above.len(),
            removed = plan.in_selection.len(),
            below = plan.below.len(),
            extra = plan.extra_vertical_space,
            "partitioned page"
        );
        if plan.extra_vertical_space > 0.0 {
            self.warn(
                EditWarningCode::ContentShifted,
                format!(
                    "content below selection shifted down by {:.0}pt",
                    plan.extra_vertical_space
                ),
            );
        }

        B::erase(&mut *self.doc, &self.page, &self.size.bbox(), self.options.background)
            .map_err(backend_err)?;
        self.stage = MutationStage::Cleared;

        let limit = self.size.height - self.options.overflow_margin;
        let mut overflowing = 0usize;

        for span in &plan.above {
            self.redraw_span(span)?;
        }

        let mut y = selection.top + font.size;
        for text in &wrapped {
            if y > limit {
                overflowing += 1;
            }
            self.draw(Point::new(selection.x0, y), text, &font)?;
            y += line_height;
        }

        for span in plan.shifted_below() {
            if span.origin.y > limit {
                overflowing += 1;
            }
            self.redraw_span(&span)?;
        }

        if overflowing > 0 {
            self.warn(
                EditWarningCode::Overflow,
                format!("{overflowing} text run(s) pushed past the bottom of the page"),
            );
        }
        self.stage = MutationStage::Rebuilt;
        Ok(plan)
    }

    /// Erase `lines` and wrap `new_text` into their combined width,
    /// starting at the first line's left edge and baseline.
    pub fn reflow_lines(&mut self, lines: &[Line], new_text: &str) -> Result<(), EditError> {
        let Some(first) = lines.first() else {
            return Ok(());
        };
        self.stage = MutationStage::Located;
        let area = lines
            .iter()
            .fold(first.bbox, |acc, line| acc.union(&line.bbox));

        for line in lines {
            B::erase(&mut *self.doc, &self.page, &line.bbox, self.options.background)
                .map_err(backend_err)?;
        }
        self.stage = MutationStage::Redacted;

        let font = first.font;
        let wrapped = TextReflower::wrap(new_text, &font, area.width());
        let line_height = font.size * self.options.phrase_line_height;
        let mut y = first.baseline_y;
        for text in &wrapped {
            self.draw(Point::new(first.bbox.x0, y), text, &font)?;
            y += line_height;
        }

        if wrapped.len() > lines.len() {
            self.warn(
                EditWarningCode::Overflow,
                format!(
                    "replacement needs {} lines where {} were erased",
                    wrapped.len(),
                    lines.len()
                ),
            );
        }
        self.stage = MutationStage::Reinserted;
        debug!(page = self.page_index, erased = lines.len(), drawn = wrapped.len(), "reflowed lines");
        Ok(())
    }
}
