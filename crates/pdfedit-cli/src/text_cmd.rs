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

    for idx in page_indices {
        let text = editor.page_text(idx).map_err(fail)?;
        match format {
            OutputFormat::Text => {
                println!("--- Page {} ---", idx + 1);
                println!("{text}");
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "page": idx + 1,
                "text": text,
            }))?,
        }
    }
    Ok(())
}
