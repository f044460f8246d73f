//! Page selection for editing jobs.

use std::collections::BTreeSet;

use crate::error::EditError;

/// Which pages a job touches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageFilter {
    #[default]
    All,
    /// 0-based page indices.
    Pages(BTreeSet<usize>),
}

impl PageFilter {
    /// Filter from 1-based page numbers, as typed by a user.
    pub fn from_page_numbers(numbers: impl IntoIterator<Item = usize>) -> Result<Self, EditError> {
        let mut pages = BTreeSet::new();
        for n in numbers {
            if n == 0 {
                return Err(EditError::InvalidPageRange(
                    "page 0 is invalid (pages start at 1)".to_string(),
                ));
            }
            pages.insert(n - 1);
        }
        Ok(PageFilter::Pages(pages))
    }

    /// Parse `"1-3,5"`. An empty or blank string selects every page.
    pub fn parse(input: &str, page_count: usize) -> Result<Self, EditError> {
        if input.trim().is_empty() {
            return Ok(PageFilter::All);
        }
        let pages = parse_page_range(input, page_count)?;
        Ok(PageFilter::Pages(pages.into_iter().collect()))
    }

    /// Resolve against a document, rejecting indices past the last page.
    pub fn resolve(&self, page_count: usize) -> Result<Vec<usize>, EditError> {
        match self {
            PageFilter::All => Ok((0..page_count).collect()),
            PageFilter::Pages(pages) => {
                if let Some(&bad) = pages.iter().find(|&&p| p >= page_count) {
                    return Err(EditError::InvalidPageRange(format!(
                        "page {} exceeds document page count ({page_count})",
                        bad + 1
                    )));
                }
                Ok(pages.iter().copied().collect())
            }
        }
    }
}

/// Parse a page range string like "1,3-5" into a sorted list of 0-indexed page numbers.
///
/// Input is 1-indexed (user-facing). Output is 0-indexed.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, EditError> {
    let invalid = |msg: String| EditError::InvalidPageRange(msg);
    let parse_number = |s: &str| -> Result<usize, EditError> {
        let n: usize = s
            .trim()
            .parse()
            .map_err(|_| invalid(format!("invalid page number: '{}'", s.trim())))?;
        if n == 0 {
            return Err(invalid("page 0 is invalid (pages start at 1)".to_string()));
        }
        if n > page_count {
            return Err(invalid(format!(
                "page {n} exceeds document page count ({page_count})"
            )));
        }
        Ok(n)
    };

    let mut pages = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (parse_number(start)?, parse_number(end)?);
                if start > end {
                    return Err(invalid(format!("descending range: '{part}'")));
                }
                pages.extend((start..=end).map(|p| p - 1));
            }
            None => pages.push(parse_number(part)? - 1),
        }
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}
