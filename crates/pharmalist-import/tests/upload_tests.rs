//! File-level import tests

use pharmalist_import::{load_file, sample_template, ImportError, Upload, SPREADSHEET_WARNING};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_spreadsheet_upload_is_a_warning() {
    let dir = TempDir::new().unwrap();
    // Never opened, so the file does not need to exist
    let upload = load_file(dir.path().join("targets.xlsx")).unwrap();
    assert_eq!(
        upload,
        Upload::Unsupported {
            warning: SPREADSHEET_WARNING.to_string()
        }
    );
}

#[test]
fn test_csv_upload_roundtrips_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("targets.csv");
    fs::write(&path, sample_template("Target Lists").unwrap()).unwrap();

    let Upload::Parsed(mut preview) = load_file(&path).unwrap() else {
        panic!("expected parsed upload");
    };
    assert_eq!(preview.len(), 5);

    preview.deselect([1, 3]);
    let names: Vec<_> = preview
        .into_selected()
        .into_iter()
        .filter_map(|row| row.get("name").and_then(|v| v.as_str()).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Dr. Rajesh Kumar", "Dr. Amit Patel", "Dr. Vikram Singh"]);
}

#[test]
fn test_missing_csv_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_file(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
}

#[test]
fn test_header_only_file_has_no_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "name,tier\n").unwrap();

    let Upload::Parsed(preview) = load_file(&path).unwrap() else {
        panic!("expected parsed upload");
    };
    assert!(preview.is_empty());
    assert_eq!(preview.headers().len(), 2);
}
