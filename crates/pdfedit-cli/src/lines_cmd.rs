use std::path::Path;

use pdfedit::EditOptions;

use crate::cli::OutputFormat;
use crate::shared::{fail, open_editor, print_json, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    options: EditOptions,
    format: OutputFormat,
) -> Result<(), i32> {
    let editor = open_editor(file, options)?;
    let page_indices = resolve_pages(pages, editor.page_count())?;

    if format == OutputFormat::Text {
        println!("page\tx0\ttop\tx1\tbottom\talign\tfont\tsize\ttext");
    }
    let mut rows = Vec::new();
    for idx in page_indices {
        let lines = editor.page_lines(idx).map_err(fail)?;
        for line in lines {
            let font = line.font.standard_font().base_font();
            match format {
                OutputFormat::Text => println!(
                    "{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}\t{}\t{}\t{:.1}\t{}",
                    idx + 1,
                    line.bbox.x0,
                    line.bbox.top,
                    line.bbox.x1,
                    line.bbox.bottom,
                    line.alignment,
                    font,
                    line.font.size,
                    line.text,
                ),
                OutputFormat::Json => rows.push(serde_json::json!({
                    "page": idx + 1,
                    "x0": line.bbox.x0,
                    "top": line.bbox.top,
                    "x1": line.bbox.x1,
                    "bottom": line.bbox.bottom,
                    "baseline": line.baseline_y,
                    "alignment": line.alignment.to_string(),
                    "font": font,
                    "size": line.font.size,
                    "text": line.text,
                })),
            }
        }
    }

    match format {
        OutputFormat::Text => Ok(()),
        OutputFormat::Json => print_json(&rows),
    }
}
