//! End-to-end editing behavior against an in-memory backend.

mod common;

use std::collections::BTreeSet;
use std::time::Duration;

use common::{MemoryBackend, MemoryDocument, MemoryPage, span};
use pdfedit::{
    BBox, EditError, EditOptions, EditWarningCode, Editor, MutationStage, PageFilter,
    PageMutator, ReplacementJob, StandardFont,
};

fn editor(pages: Vec<MemoryPage>) -> Editor<MemoryBackend> {
    Editor::from_document(MemoryDocument::new(pages), None)
}

fn has_warning(warnings: &[pdfedit::EditWarning], code: EditWarningCode) -> bool {
    warnings.iter().any(|w| w.code == code)
}

#[test]
fn single_word_replaced_everywhere_on_its_line() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span(
        "Hello World. Hello World.",
        72.0,
        100.0,
        12.0,
    )])]);

    let report = ed
        .replace_phrase("Hello", "Hi", true, &PageFilter::All)
        .unwrap();

    assert_eq!(report.replacement_count, 2);
    assert!(report.warnings.is_empty());
    assert_eq!(ed.page_text(0).unwrap(), "Hi World. Hi World.");

    let page = &ed.document().pages[0];
    assert_eq!(page.drawn.len(), 1);
    assert_eq!(page.drawn[0].origin.x, 72.0);
    assert!((page.drawn[0].origin.y - 109.6).abs() < 1e-9);
    assert_eq!(page.drawn[0].font, StandardFont::Helvetica);
}

#[test]
fn case_insensitive_match() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span(
        "hello HELLO",
        72.0,
        100.0,
        12.0,
    )])]);

    let sensitive = ed
        .replace_phrase("Hello", "Hi", true, &PageFilter::All)
        .unwrap();
    assert_eq!(sensitive.replacement_count, 0);

    let insensitive = ed
        .replace_phrase("Hello", "Hi", false, &PageFilter::All)
        .unwrap();
    assert_eq!(insensitive.replacement_count, 2);
    assert_eq!(ed.page_text(0).unwrap(), "Hi Hi");
}

#[test]
fn missing_phrase_leaves_page_untouched() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Nothing here", 72.0, 100.0, 12.0)])]);
    let report = ed
        .replace_phrase("absent", "x", true, &PageFilter::All)
        .unwrap();
    assert_eq!(report.replacement_count, 0);
    assert!(report.warnings.is_empty());
    let page = &ed.document().pages[0];
    assert!(page.erased.is_empty());
    assert!(page.drawn.is_empty());
}

#[test]
fn page_filter_limits_replacement() {
    let mut ed = editor(vec![
        MemoryPage::letter(vec![span("Hello", 72.0, 100.0, 12.0)]),
        MemoryPage::letter(vec![span("Hello", 72.0, 100.0, 12.0)]),
    ]);
    let only_second = PageFilter::Pages(BTreeSet::from([1]));

    let report = ed.replace_phrase("Hello", "Hi", true, &only_second).unwrap();

    assert_eq!(report.replacement_count, 1);
    assert_eq!(ed.page_text(0).unwrap(), "Hello");
    assert_eq!(ed.page_text(1).unwrap(), "Hi");
}

#[test]
fn page_filter_past_last_page_is_fatal() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Hello", 72.0, 100.0, 12.0)])]);
    let err = ed
        .replace_phrase("Hello", "Hi", true, &PageFilter::Pages(BTreeSet::from([4])))
        .unwrap_err();
    assert!(matches!(err, EditError::InvalidPageRange(_)));
}

#[test]
fn multi_word_phrase_on_one_line() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span(
        "Say Hello World now",
        72.0,
        100.0,
        12.0,
    )])]);
    let report = ed
        .replace_phrase("Hello World", "Goodbye", true, &PageFilter::All)
        .unwrap();
    assert_eq!(report.replacement_count, 1);
    assert_eq!(ed.page_text(0).unwrap(), "Say Goodbye now");
}

#[test]
fn phrase_across_two_lines_is_rewrapped_once() {
    let mut ed = editor(vec![MemoryPage::letter(vec![
        span("The quick brown fox jumps", 72.0, 100.0, 12.0),
        span("over the lazy dog today", 72.0, 114.0, 12.0),
    ])]);

    let report = ed
        .replace_phrase("brown fox jumps over the lazy", "red cat", true, &PageFilter::All)
        .unwrap();

    assert_eq!(report.replacement_count, 1);
    assert!(!has_warning(&report.warnings, EditWarningCode::Overflow));
    let page = &ed.document().pages[0];
    assert_eq!(page.erased.len(), 2);
    let drawn: Vec<&str> = page.drawn.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(drawn.join(" "), "The quick red cat dog today");
    assert_eq!(page.drawn[0].origin.x, 72.0);
    assert!((page.drawn[0].origin.y - 109.6).abs() < 1e-9);
}

#[test]
fn matches_on_separate_lines_are_edited_bottom_up() {
    let mut ed = editor(vec![MemoryPage::letter(vec![
        span("Hello there", 72.0, 100.0, 12.0),
        span("Some filler", 72.0, 130.0, 12.0),
        span("Hello again", 72.0, 160.0, 12.0),
    ])]);

    let report = ed
        .replace_phrase("Hello", "Bye", true, &PageFilter::All)
        .unwrap();

    assert_eq!(report.replacement_count, 2);
    assert!(report.warnings.is_empty());
    let page = &ed.document().pages[0];
    let erased_tops: Vec<f64> = page.erased.iter().map(|r| r.top).collect();
    assert_eq!(erased_tops, vec![160.0, 100.0]);
    let drawn: Vec<&str> = page.drawn.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(drawn, vec!["Bye again", "Bye there"]);
    assert_eq!(ed.page_text(0).unwrap(), "Bye there\nSome filler\nBye again");
}

#[test]
fn tight_leading_edits_the_line_holding_the_match() {
    // 12pt boxes 10pt apart: the first line's box reaches into the second.
    let mut ed = editor(vec![MemoryPage::letter(vec![
        span("First line stays", 72.0, 100.0, 12.0),
        span("Second World", 72.0, 110.0, 12.0),
    ])]);

    let report = ed
        .replace_phrase("World", "Rust", true, &PageFilter::All)
        .unwrap();

    assert_eq!(report.replacement_count, 1);
    assert!(report.warnings.is_empty());
    let page = &ed.document().pages[0];
    assert_eq!(page.erased.len(), 1);
    assert_eq!(page.erased[0].top, 110.0);
    assert_eq!(ed.page_text(0).unwrap(), "First line stays\nSecond Rust");
}

#[test]
fn right_aligned_line_keeps_its_offset() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Total: 100", 480.0, 200.0, 12.0)])]);
    let line = ed.page_lines(0).unwrap().remove(0);
    assert_eq!(line.alignment, pdfedit::Alignment::Right);

    let report = ed
        .replace_phrase("100", "250", true, &PageFilter::All)
        .unwrap();

    assert_eq!(report.replacement_count, 1);
    let run = &ed.document().pages[0].drawn[0];
    let expected = 612.0 - StandardFont::Helvetica.measure("Total: 250", 12.0) - 480.0;
    assert!((run.origin.x - expected).abs() < 1e-9);
}

#[test]
fn centered_line_is_recentered() {
    let width = StandardFont::Helvetica.measure("Centered title", 12.0);
    let x0 = (612.0 - width) / 2.0;
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Centered title", x0, 60.0, 12.0)])]);

    ed.replace_phrase("Centered", "Short", true, &PageFilter::All)
        .unwrap();

    let run = &ed.document().pages[0].drawn[0];
    let new_width = StandardFont::Helvetica.measure("Short title", 12.0);
    assert!((run.origin.x - (612.0 - new_width) / 2.0).abs() < 1e-9);
}

#[test]
fn long_replacement_warns_about_overflow() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Short", 72.0, 100.0, 12.0)])]);
    let report = ed
        .replace_phrase("Short", &"W".repeat(60), true, &PageFilter::All)
        .unwrap();
    assert_eq!(report.replacement_count, 1);
    assert!(has_warning(&report.warnings, EditWarningCode::Overflow));
    assert_eq!(report.warnings[0].page, Some(0));
}

#[test]
fn blank_replacement_only_erases() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Remove", 72.0, 100.0, 12.0)])]);
    let report = ed
        .replace_phrase("Remove", "", true, &PageFilter::All)
        .unwrap();
    assert_eq!(report.replacement_count, 1);
    let page = &ed.document().pages[0];
    assert!(page.drawn.is_empty());
    assert_eq!(ed.page_text(0).unwrap(), "");
}

fn caption_page() -> MemoryPage {
    MemoryPage::letter(vec![
        span("Title", 50.0, 50.0, 14.0),
        span("Caption", 50.0, 100.0, 14.3),
        span("Body one", 50.0, 130.0, 14.0),
        span("Body two", 50.0, 150.0, 14.0),
    ])
}

#[test]
fn region_rewrite_pushes_later_content_down() {
    let mut ed = editor(vec![caption_page()]);
    let selection = BBox::new(50.0, 100.0, 200.0, 114.0);

    let report = ed
        .rephrase_region(0, &selection, "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii")
        .unwrap();

    assert_eq!(report.replacement_count, 1);
    let shifted = report
        .warnings
        .iter()
        .find(|w| w.code == EditWarningCode::ContentShifted)
        .unwrap();
    assert!(shifted.description.contains("shifted down by 42pt"));

    let page = &ed.document().pages[0];
    assert_eq!(page.erased, vec![BBox::new(0.0, 0.0, 612.0, 792.0)]);
    let drawn: Vec<&str> = page.drawn.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        drawn,
        vec![
            "Title",
            "aaaa bbbb cccc dddd",
            "eeee ffff gggg hhhh",
            "iiii",
            "Body one",
            "Body two",
        ]
    );

    // Wrapped lines start one font size below the selection top.
    assert!((page.drawn[1].origin.y - 114.3).abs() < 1e-9);
    assert!((page.drawn[2].origin.y - (114.3 + 14.3 * 1.3)).abs() < 1e-9);

    let body = page.spans.iter().find(|s| s.text == "Body one").unwrap();
    assert!((body.bbox.top - 171.77).abs() < 0.05);
    let title = page.spans.iter().find(|s| s.text == "Title").unwrap();
    assert!((title.bbox.top - 50.0).abs() < 1e-9);
}

#[test]
fn short_region_rewrite_shifts_nothing() {
    let mut ed = editor(vec![caption_page()]);
    let selection = BBox::new(50.0, 100.0, 200.0, 120.0);

    let report = ed.rephrase_region(0, &selection, "Short").unwrap();

    assert!(report.warnings.is_empty());
    let body = ed.document().pages[0]
        .spans
        .iter()
        .find(|s| s.text == "Body one")
        .unwrap()
        .clone();
    assert!((body.bbox.top - 130.0).abs() < 1e-9);
}

#[test]
fn region_rewrite_reports_content_pushed_off_the_page() {
    let mut page = caption_page();
    page.spans.push(span("Footer", 50.0, 760.0, 12.0));
    let mut ed = editor(vec![page]);

    let report = ed
        .rephrase_region(
            0,
            &BBox::new(50.0, 100.0, 200.0, 114.0),
            "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii",
        )
        .unwrap();

    assert!(has_warning(&report.warnings, EditWarningCode::Overflow));
    // The footer is still drawn.
    assert!(ed.document().pages[0].drawn.iter().any(|r| r.text == "Footer"));
}

#[test]
fn region_on_missing_page_is_fatal() {
    let mut ed = editor(vec![caption_page()]);
    let err = ed
        .rephrase_region(3, &BBox::new(0.0, 0.0, 10.0, 10.0), "x")
        .unwrap_err();
    assert!(matches!(err, EditError::InvalidPageRange(_)));
}

#[test]
fn exhausted_time_budget_stops_before_the_first_page() {
    let mut ed = editor(vec![MemoryPage::letter(vec![span("Hello", 72.0, 100.0, 12.0)])]);
    let job = ReplacementJob::phrase("Hello", "Hi").time_budget(Duration::ZERO);

    let report = ed.run(&job).unwrap();

    assert_eq!(report.replacement_count, 0);
    assert!(has_warning(&report.warnings, EditWarningCode::TimedOut));
    assert_eq!(ed.page_text(0).unwrap(), "Hello");
}

#[test]
fn region_job_runs_through_run() {
    let mut ed = editor(vec![caption_page()]);
    let job = ReplacementJob::region(0, BBox::new(50.0, 100.0, 200.0, 114.0), "New caption");
    let report = ed.run(&job).unwrap();
    assert_eq!(report.replacement_count, 1);
    assert!(
        ed.page_text(0)
            .unwrap()
            .lines()
            .any(|l| l == "New caption")
    );
}

#[test]
fn text_extraction_across_pages() {
    let ed = editor(vec![
        MemoryPage::letter(vec![
            span("World", 110.0, 100.0, 12.0),
            span("Hello", 72.0, 100.0, 12.0),
            span("Second line", 72.0, 130.0, 12.0),
        ]),
        MemoryPage::letter(vec![span("Page two", 72.0, 100.0, 12.0)]),
    ]);
    assert_eq!(
        ed.extract_text().unwrap(),
        "Hello World\nSecond line\n\nPage two"
    );
    assert!(ed.has_selectable_text().unwrap());
    assert_eq!(ed.find(0, "World", true).unwrap().len(), 1);
}

#[test]
fn blank_document_has_no_selectable_text() {
    let ed = editor(vec![MemoryPage::letter(vec![span("   ", 72.0, 100.0, 12.0)])]);
    assert!(!ed.has_selectable_text().unwrap());
}

#[test]
fn mutator_stages() {
    let mut doc = MemoryDocument::new(vec![caption_page()]);
    let options = EditOptions::default();

    let mut mutator = PageMutator::<MemoryBackend>::new(&mut doc, 0, &options).unwrap();
    assert_eq!(mutator.stage(), MutationStage::Idle);
    let line = mutator.index().unwrap().lines()[0].clone();
    mutator.reflow_line(&line, "Heading").unwrap();
    assert_eq!(mutator.stage(), MutationStage::Reinserted);

    mutator
        .rebuild_page(&BBox::new(50.0, 100.0, 200.0, 120.0), "Caption")
        .unwrap();
    assert_eq!(mutator.stage(), MutationStage::Rebuilt);
    assert!(mutator.warnings().is_empty());
}
