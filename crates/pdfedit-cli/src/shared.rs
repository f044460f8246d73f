use std::fmt::Display;
use std::path::Path;

use pdfedit::{BBox, EditOptions, Editor, PageFilter, parse_page_range};
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Print `Error: …` to stderr and return the failure exit code.
pub fn fail(err: impl Display) -> i32 {
    eprintln!("Error: {err}");
    1
}

/// Install a stderr logger at the level chosen by `-v` repeats.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging unavailable: {e}");
    }
}

/// Defaults, overridden by a JSON file when one is given.
pub fn load_options(config: Option<&Path>) -> Result<EditOptions, i32> {
    let Some(path) = config else {
        return Ok(EditOptions::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| fail(format!("cannot read config {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| fail(format!("invalid config {}: {e}", path.display())))
}

pub fn open_editor(file: &Path, options: EditOptions) -> Result<Editor, i32> {
    Editor::open_file(file, Some(options)).map_err(fail)
}

/// Resolve an optional page range string into 0-indexed page indices.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(fail),
        None => Ok((0..page_count).collect()),
    }
}

pub fn page_filter(pages: Option<&str>, page_count: usize) -> Result<PageFilter, i32> {
    PageFilter::parse(pages.unwrap_or(""), page_count).map_err(fail)
}

/// Parse `x0,top,x1,bottom`.
pub fn parse_rect(input: &str) -> Result<BBox, String> {
    let values = input
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid coordinate '{}'", v.trim()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        &[x0, top, x1, bottom] if x0 < x1 && top < bottom => Ok(BBox::new(x0, top, x1, bottom)),
        &[_, _, _, _] => Err("rectangle must have x0 < x1 and top < bottom".to_string()),
        _ => Err(format!(
            "expected 4 comma-separated numbers, got {}",
            values.len()
        )),
    }
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), i32> {
    std::fs::write(path, bytes).map_err(|e| fail(format!("cannot write {}: {e}", path.display())))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), i32> {
    let json = serde_json::to_string(value).map_err(fail)?;
    println!("{json}");
    Ok(())
}
