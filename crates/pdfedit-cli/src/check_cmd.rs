use std::path::Path;

use pdfedit::EditOptions;

use crate::cli::OutputFormat;
use crate::shared::{fail, open_editor, print_json};

pub fn run(file: &Path, options: EditOptions, format: OutputFormat) -> Result<(), i32> {
    let editor = open_editor(file, options)?;
    let selectable = editor.has_selectable_text().map_err(fail)?;
    match format {
        OutputFormat::Text => {
            if selectable {
                println!("{}: selectable text found", file.display());
            } else {
                println!("{}: no selectable text (scanned or image-only?)", file.display());
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "file": file.display().to_string(),
            "pages": editor.page_count(),
            "has_selectable_text": selectable,
        })),
    }
}
