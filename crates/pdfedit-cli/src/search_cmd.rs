use std::path::Path;

use pdfedit::EditOptions;

use crate::cli::OutputFormat;
use crate::shared::{fail, open_editor, print_json, resolve_pages};

pub fn run(
    file: &Path,
    phrase: &str,
    ignore_case: bool,
    pages: Option<&str>,
    options: EditOptions,
    format: OutputFormat,
) -> Result<(), i32> {
    let editor = open_editor(file, options)?;
    let page_indices = resolve_pages(pages, editor.page_count())?;

    if format == OutputFormat::Text {
        println!("page\tx0\ttop\tx1\tbottom");
    }
    let mut found = Vec::new();
    for idx in page_indices {
        for bbox in editor.find(idx, phrase, !ignore_case).map_err(fail)? {
            match format {
                OutputFormat::Text => println!(
                    "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                    idx + 1,
                    bbox.x0,
                    bbox.top,
                    bbox.x1,
                    bbox.bottom,
                ),
                OutputFormat::Json => found.push(serde_json::json!({
                    "page": idx + 1,
                    "x0": bbox.x0,
                    "top": bbox.top,
                    "x1": bbox.x1,
                    "bottom": bbox.bottom,
                })),
            }
        }
    }

    match format {
        OutputFormat::Text => Ok(()),
        OutputFormat::Json => print_json(&found),
    }
}
