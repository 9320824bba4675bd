//! Pharmalist CSV Import
//!
//! Turns an uploaded file into rows a user can review before they are
//! appended to a list:
//!
//! - [`load_file`] guards against spreadsheet uploads and parses CSV
//! - [`ImportPreview`] tracks which rows are selected (all, initially)
//! - [`sample_template`] produces the reference CSV for a list type
//!
//! # Examples
//!
//! ```
//! use pharmalist_import::parse_csv;
//!
//! let csv = "name,specialty\nDr. A,Cardiology\n\nDr. B,Oncology\n";
//! let mut preview = parse_csv(csv.as_bytes()).unwrap();
//! preview.toggle(0);
//! assert_eq!(preview.selected_rows().len(), 1);
//! ```

#![warn(missing_docs)]

mod preview;
mod template;

pub use preview::{parse_csv, ImportPreview};
pub use template::{sample_template, SAMPLE_FILE_NAME};

use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Warning shown for spreadsheet uploads
pub const SPREADSHEET_WARNING: &str =
    "Excel files (.xls/.xlsx) are not supported yet. Please upload a CSV.";

/// Errors that can occur while importing
#[derive(Error, Debug)]
pub enum ImportError {
    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Two columns share a header name
    #[error("Duplicate column '{0}' in CSV header")]
    DuplicateHeader(String),

    /// Template buffer could not be finalized
    #[error("Template error: {0}")]
    Template(String),
}

/// Result of loading an uploaded file
#[derive(Debug, Clone, PartialEq)]
pub enum Upload {
    /// Parsed rows awaiting selection
    Parsed(ImportPreview),

    /// The file type is not accepted; nothing was parsed
    Unsupported {
        /// User-facing message
        warning: String,
    },
}

/// Warning for file names that look like spreadsheets, if any
pub fn unsupported_file_warning(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        Some(SPREADSHEET_WARNING)
    } else {
        None
    }
}

/// Load an uploaded file
///
/// Spreadsheets are reported as [`Upload::Unsupported`] without being opened.
///
/// # Errors
/// Returns error if the file cannot be read or is not valid CSV
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Upload, ImportError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(warning) = unsupported_file_warning(&name) {
        warn!(file = %name, "rejected spreadsheet upload");
        return Ok(Upload::Unsupported {
            warning: warning.to_string(),
        });
    }

    let preview = parse_csv(File::open(path)?)?;
    debug!(file = %name, rows = preview.len(), "parsed upload");
    Ok(Upload::Parsed(preview))
}
