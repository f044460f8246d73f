use std::path::Path;
use std::time::Duration;

use pdfedit::{EditOptions, EditReport, ReplacementJob};

use crate::cli::OutputFormat;
use crate::shared::{fail, open_editor, page_filter, print_json, write_output};

pub struct ReplaceArgs<'a> {
    pub file: &'a Path,
    pub find: &'a str,
    pub replacement: &'a str,
    pub ignore_case: bool,
    pub pages: Option<&'a str>,
    pub output: &'a Path,
    pub timeout: Option<u64>,
}

pub fn run(args: &ReplaceArgs<'_>, options: EditOptions, format: OutputFormat) -> Result<(), i32> {
    let mut editor = open_editor(args.file, options)?;
    let mut job = ReplacementJob::phrase(args.find, args.replacement)
        .case_sensitive(!args.ignore_case)
        .pages(page_filter(args.pages, editor.page_count())?);
    if let Some(secs) = args.timeout {
        job = job.time_budget(Duration::from_secs(secs));
    }

    let report = editor.run(&job).map_err(fail)?;
    let bytes = editor.save().map_err(fail)?;
    write_output(args.output, &bytes)?;
    print_report(&report, args.output, format)
}

/// Shared by `replace` and `rephrase`.
pub fn print_report(report: &EditReport, output: &Path, format: OutputFormat) -> Result<(), i32> {
    match format {
        OutputFormat::Text => {
            println!(
                "{} replacement(s) written to {}",
                report.replacement_count,
                output.display()
            );
            for warning in &report.warnings {
                eprintln!("warning: {warning}");
            }
            Ok(())
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "output": output.display().to_string(),
            "replacement_count": report.replacement_count,
            "warnings": report.warnings,
        })),
    }
}
