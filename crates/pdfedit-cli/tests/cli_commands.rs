//! Integration tests for the `pdfedit` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    Command::cargo_bin("pdfedit").unwrap()
}

/// One page, one Helvetica 12pt line per string, 14pt apart from (72, 700).
fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut content = String::from("BT /F1 12 Tf 72 700 Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("0 -14 Td\n");
        }
        content.push_str(&format!("({line}) Tj\n"));
    }
    content.push_str("ET");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        },
    });
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    });
    if let Ok(dict) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
        dict.set("Parent", Object::Reference(pages_id));
    }
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn temp_pdf(lines: &[&str]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&pdf_with_lines(lines)).unwrap();
    tmp
}

fn out_path(dir: &tempfile::TempDir) -> String {
    dir.path().join("out.pdf").to_str().unwrap().to_string()
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("replace"))
        .stdout(predicate::str::contains("rephrase"))
        .stdout(predicate::str::contains("lines"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn text_prints_lines() {
    let tmp = temp_pdf(&["Hello World", "Second line"]);
    cmd()
        .args(["text", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Page 1 ---"))
        .stdout(predicate::str::contains("Hello World\nSecond line"));
}

#[test]
fn replace_writes_edited_document() {
    let tmp = temp_pdf(&["Hello World"]);
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir);

    cmd()
        .args([
            "replace",
            tmp.path().to_str().unwrap(),
            "--find",
            "world",
            "--with",
            "There",
            "-i",
            "-o",
            &out,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 replacement(s) written to"));

    cmd()
        .args(["text", &out])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello There"));
}

#[test]
fn replace_json_report() {
    let tmp = temp_pdf(&["Hello World"]);
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir);

    let output = cmd()
        .args([
            "replace",
            tmp.path().to_str().unwrap(),
            "--find",
            "Absent",
            "--with",
            "x",
            "-o",
            &out,
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["replacement_count"], 0);
    assert_eq!(report["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn rephrase_rewrites_region() {
    let tmp = temp_pdf(&["Old heading", "Body text"]);
    let dir = tempfile::tempdir().unwrap();
    let out = out_path(&dir);

    cmd()
        .args([
            "rephrase",
            tmp.path().to_str().unwrap(),
            "--page",
            "1",
            "--rect",
            "70,80,200,95",
            "--with",
            "New heading",
            "-o",
            &out,
        ])
        .assert()
        .success();

    cmd()
        .args(["text", &out])
        .assert()
        .success()
        .stdout(predicate::str::contains("New heading"))
        .stdout(predicate::str::contains("Body text"))
        .stdout(predicate::str::contains("Old heading").not());
}

#[test]
fn lines_reports_alignment_and_font() {
    let tmp = temp_pdf(&["Hello World"]);
    cmd()
        .args(["lines", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("left\tHelvetica\t12.0\tHello World"));
}

#[test]
fn search_json_lists_rectangles() {
    let tmp = temp_pdf(&["Hello World"]);
    let output = cmd()
        .args(["search", tmp.path().to_str().unwrap(), "World", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let found: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["page"], 1);
    assert!(found[0]["x0"].as_f64().unwrap() > 72.0);
}

#[test]
fn check_detects_text() {
    let tmp = temp_pdf(&["Hello"]);
    cmd()
        .args(["check", tmp.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("selectable text found"));

    let blank = temp_pdf(&[]);
    cmd()
        .args(["check", blank.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("no selectable text"));
}

#[test]
fn config_file_overrides_options() {
    let tmp = temp_pdf(&["Hello World"]);
    let mut config = NamedTempFile::new().unwrap();
    config.write_all(br#"{"left_threshold": 0.1}"#).unwrap();

    cmd()
        .args([
            "lines",
            tmp.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("center\tHelvetica"));
}

#[test]
fn missing_file_is_an_error() {
    cmd()
        .args(["text", "/nonexistent/input.pdf"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: document not found"));
}

#[test]
fn page_out_of_range_is_an_error() {
    let tmp = temp_pdf(&["Hello"]);
    cmd()
        .args(["text", tmp.path().to_str().unwrap(), "--pages", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: invalid page range"));
}

#[test]
fn bad_config_is_an_error() {
    let tmp = temp_pdf(&["Hello"]);
    let mut config = NamedTempFile::new().unwrap();
    config.write_all(b"not json").unwrap();
    cmd()
        .args([
            "text",
            tmp.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: invalid config"));
}
