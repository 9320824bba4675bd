//! Parsed rows and their selection state

use crate::ImportError;
use csv::{ReaderBuilder, Trim};
use pharmalist_domain::Attributes;
use serde_json::Value;
use std::io::Read;
use tracing::warn;

/// Rows parsed from one upload, with a selection flag per row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportPreview {
    headers: Vec<String>,
    rows: Vec<Attributes>,
    selected: Vec<bool>,
}

/// Parse CSV with a header row
///
/// Every record becomes one row keyed by header; all values are text. Blank
/// lines and records whose fields are all empty are skipped. Short records
/// simply lack the trailing keys; fields beyond the header are dropped.
///
/// # Errors
/// Returns error if the input is not valid UTF-8 CSV or two columns share
/// a header name
pub fn parse_csv<R: Read>(reader: R) -> Result<ImportPreview, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if let Some(duplicate) = headers
        .iter()
        .enumerate()
        .find(|(i, name)| headers[..*i].contains(name))
        .map(|(_, name)| name)
    {
        warn!(column = %duplicate, "rejecting CSV with duplicate header");
        return Err(ImportError::DuplicateHeader(duplicate.clone()));
    }
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if record.len() > headers.len() {
            warn!(
                line = record.position().map(|p| p.line()),
                extra = record.len() - headers.len(),
                "dropping fields without a header"
            );
        }
        let row: Attributes = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }

    let selected = vec![true; rows.len()];
    Ok(ImportPreview {
        headers,
        rows,
        selected,
    })
}

impl ImportPreview {
    /// Column names in file order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All parsed rows, selected or not
    pub fn rows(&self) -> &[Attributes] {
        &self.rows
    }

    /// Number of parsed rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was parsed
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether row `index` (0-based) is selected; out of range is `false`
    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Flip the selection of one row, returning its new state
    ///
    /// Out-of-range indexes are ignored and return `None`.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let flag = self.selected.get_mut(index)?;
        *flag = !*flag;
        Some(*flag)
    }

    /// Set the selection of one row; out-of-range indexes are ignored
    pub fn set_selected(&mut self, index: usize, selected: bool) {
        if let Some(flag) = self.selected.get_mut(index) {
            *flag = selected;
        }
    }

    /// Deselect several rows at once
    pub fn deselect(&mut self, indexes: impl IntoIterator<Item = usize>) {
        for index in indexes {
            self.set_selected(index, false);
        }
    }

    /// Select or deselect every row
    pub fn select_all(&mut self, selected: bool) {
        self.selected.iter_mut().for_each(|flag| *flag = selected);
    }

    /// Number of selected rows
    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    /// Selected rows in their original order
    pub fn selected_rows(&self) -> Vec<&Attributes> {
        self.rows
            .iter()
            .zip(&self.selected)
            .filter_map(|(row, selected)| selected.then_some(row))
            .collect()
    }

    /// Consume the preview, keeping only the selected rows
    pub fn into_selected(self) -> Vec<Attributes> {
        self.rows
            .into_iter()
            .zip(self.selected)
            .filter_map(|(row, selected)| selected.then_some(row))
            .collect()
    }
}
