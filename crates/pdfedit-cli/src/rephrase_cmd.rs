use std::path::Path;

use pdfedit::{BBox, EditOptions};

use crate::cli::OutputFormat;
use crate::replace_cmd::print_report;
use crate::shared::{fail, open_editor, write_output};

pub fn run(
    file: &Path,
    page: usize,
    rect: &BBox,
    replacement: &str,
    output: &Path,
    options: EditOptions,
    format: OutputFormat,
) -> Result<(), i32> {
    let Some(index) = page.checked_sub(1) else {
        return Err(fail("page 0 is invalid (pages start at 1)"));
    };
    let mut editor = open_editor(file, options)?;
    let report = editor
        .rephrase_region(index, rect, replacement)
        .map_err(fail)?;
    let bytes = editor.save().map_err(fail)?;
    write_output(output, &bytes)?;
    print_report(&report, output, format)
}
