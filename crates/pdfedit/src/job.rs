//! Replacement jobs and their results.

use std::time::Duration;

use pdfedit_core::{BBox, EditWarning, PageFilter};

/// What a job replaces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selector {
    /// Every occurrence of a phrase on the selected pages.
    Phrase(String),
    /// A caller-drawn rectangle on one page, in top-left origin points.
    Region { page: usize, rect: BBox },
}

/// One find-and-replace or region rewrite.
///
/// ```ignore
/// let job = ReplacementJob::phrase("Hello", "Hi")
///     .case_sensitive(false)
///     .pages(PageFilter::parse("1-3", page_count)?);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplacementJob {
    pub selector: Selector,
    pub replacement_text: String,
    /// Ignored for region selectors.
    pub case_sensitive: bool,
    /// Ignored for region selectors, which name their page.
    pub page_filter: PageFilter,
    /// Checked before each page starts.
    pub time_budget: Option<Duration>,
}

impl ReplacementJob {
    /// Case-sensitive phrase replacement on every page.
    pub fn phrase(phrase: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            selector: Selector::Phrase(phrase.into()),
            replacement_text: replacement.into(),
            case_sensitive: true,
            page_filter: PageFilter::All,
            time_budget: None,
        }
    }

    /// Rewrite the text inside `rect` on `page` (0-based).
    pub fn region(page: usize, rect: BBox, replacement: impl Into<String>) -> Self {
        Self {
            selector: Selector::Region { page, rect },
            replacement_text: replacement.into(),
            case_sensitive: true,
            page_filter: PageFilter::All,
            time_budget: None,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn pages(mut self, filter: PageFilter) -> Self {
        self.page_filter = filter;
        self
    }

    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Replacement count and warnings gathered while running a job.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditReport {
    pub replacement_count: u32,
    pub warnings: Vec<EditWarning>,
}

impl EditReport {
    pub(crate) fn merge(&mut self, other: EditReport) {
        self.replacement_count += other.replacement_count;
        self.warnings.extend(other.warnings);
    }
}

/// Result of [`crate::replace`]: the rewritten document plus its report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceOutcome {
    pub output: Vec<u8>,
    pub replacement_count: u32,
    pub warnings: Vec<EditWarning>,
}

impl ReplaceOutcome {
    pub(crate) fn new(output: Vec<u8>, report: EditReport) -> Self {
        Self {
            output,
            replacement_count: report.replacement_count,
            warnings: report.warnings,
        }
    }

    /// Warnings rendered for display.
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfedit_core::EditWarningCode;

    #[test]
    fn phrase_job_defaults() {
        let job = ReplacementJob::phrase("Hello", "Hi");
        assert_eq!(job.selector, Selector::Phrase("Hello".to_string()));
        assert!(job.case_sensitive);
        assert_eq!(job.page_filter, PageFilter::All);
        assert_eq!(job.time_budget, None);
    }

    #[test]
    fn builder_overrides() {
        let job = ReplacementJob::region(2, BBox::new(0.0, 0.0, 10.0, 10.0), "x")
            .case_sensitive(false)
            .time_budget(Duration::from_secs(3));
        assert!(matches!(job.selector, Selector::Region { page: 2, .. }));
        assert!(!job.case_sensitive);
        assert_eq!(job.time_budget, Some(Duration::from_secs(3)));
    }

    #[test]
    fn reports_merge() {
        let mut total = EditReport::default();
        total.merge(EditReport {
            replacement_count: 2,
            warnings: vec![EditWarning::on_page(EditWarningCode::Overflow, "too long", 0)],
        });
        total.merge(EditReport {
            replacement_count: 1,
            warnings: Vec::new(),
        });
        assert_eq!(total.replacement_count, 3);
        assert_eq!(total.warnings.len(), 1);

        let outcome = ReplaceOutcome::new(Vec::new(), total);
        assert_eq!(outcome.warning_messages(), vec!["[OVERFLOW] too long (page 1)"]);
    }
}
