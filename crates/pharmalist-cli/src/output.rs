//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pharmalist_domain::{DomainConfig, Item, ListDetail, ListSummary, ListVersion, WorkLog};
use pharmalist_import::ImportPreview;
use pharmalist_llm::QueryAnswer;
use serde::Serialize;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format list summaries.
    pub fn format_lists(&self, lists: &[ListSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(lists),
            OutputFormat::Quiet => Ok(join_ids(lists.iter().map(|l| l.id.to_string()))),
            OutputFormat::Table => {
                if lists.is_empty() {
                    return Ok(self.colorize("No lists found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Domain", "Type", "Title", "Requester", "Version", "Items"]);
                for list in lists {
                    builder.push_record([
                        list.id.to_string(),
                        list.category.to_string(),
                        list.list_type.clone().unwrap_or_default(),
                        list.purpose.clone(),
                        requester(&list.requester_name, &list.requester_role),
                        list.version_number.to_string(),
                        list.item_count.to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format one list; `items` is the snapshot to display.
    pub fn format_detail(&self, detail: &ListDetail, items: &[Item]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(detail),
            OutputFormat::Quiet => Ok(join_ids(items.iter().map(|i| i.id.to_string()))),
            OutputFormat::Table => {
                let summary = &detail.summary;
                let mut out = String::new();
                out.push_str(&self.colorize(&summary.purpose, "cyan"));
                out.push('\n');
                out.push_str(&format!(
                    "Domain: {}{}\n",
                    summary.category.config().display_name,
                    summary
                        .list_type
                        .as_deref()
                        .map(|t| format!(" / {}", t))
                        .unwrap_or_default()
                ));
                out.push_str(&format!(
                    "Requested by: {}\n",
                    requester(&summary.requester_name, &summary.requester_role)
                ));
                out.push_str(&format!(
                    "Version {} of {}, {} item(s) shown\n\n",
                    summary.version_number,
                    detail.versions.len(),
                    items.len()
                ));
                out.push_str(&self.items_table(items));
                Ok(out)
            }
        }
    }

    fn items_table(&self, items: &[Item]) -> String {
        if items.is_empty() {
            return self.colorize("No items.", "yellow");
        }

        // Columns in the order keys first appear
        let mut columns: Vec<&str> = Vec::new();
        for item in items {
            for key in item.attributes.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }

        let mut builder = Builder::default();
        builder.push_record(std::iter::once("#").chain(columns.iter().copied()));
        for (n, item) in items.iter().enumerate() {
            let cells = columns
                .iter()
                .map(|c| item.attributes.get(*c).map(cell).unwrap_or_default());
            builder.push_record(std::iter::once((n + 1).to_string()).chain(cells));
        }
        render(builder)
    }

    /// Format a version history.
    pub fn format_versions(&self, versions: &[ListVersion]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(versions),
            OutputFormat::Quiet => Ok(join_ids(versions.iter().map(|v| v.id.to_string()))),
            OutputFormat::Table => {
                if versions.is_empty() {
                    return Ok(self.colorize("No versions.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Version", "Added", "Removed", "Updated", "Items", "Rationale", "By"]);
                for v in versions {
                    builder.push_record([
                        v.version_number.to_string(),
                        v.changes_summary.added.to_string(),
                        v.changes_summary.removed.to_string(),
                        v.changes_summary.updated.to_string(),
                        v.snapshot_len.to_string(),
                        v.rationale.clone(),
                        v.updated_by.clone(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format work log entries.
    pub fn format_work_logs(&self, logs: &[WorkLog]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(logs),
            OutputFormat::Quiet => Ok(join_ids(logs.iter().map(|l| l.id.to_string()))),
            OutputFormat::Table => {
                if logs.is_empty() {
                    return Ok(self.colorize("No work log entries.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Action", "Version", "By", "Timestamp"]);
                for log in logs {
                    builder.push_record([
                        log.action.clone(),
                        log.version_number.map(|v| v.to_string()).unwrap_or_default(),
                        log.performed_by.clone(),
                        log.timestamp.to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format the domain registry.
    pub fn format_domains(&self, domains: &[DomainConfig]) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(domains),
            OutputFormat::Quiet => Ok(join_ids(domains.iter().map(|d| d.key.to_string()))),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Key", "Name", "List types"]);
                for d in domains {
                    builder.push_record([d.key.to_string(), d.display_name.to_string(), d.list_types.join("\n")]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format parsed CSV rows with their selection marks.
    pub fn format_preview(&self, preview: &ImportPreview) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(&preview.selected_rows()),
            OutputFormat::Quiet => Ok(preview.selected_count().to_string()),
            OutputFormat::Table => {
                if preview.is_empty() {
                    return Ok(self.colorize("No rows found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(
                    ["#", ""]
                        .into_iter()
                        .chain(preview.headers().iter().map(String::as_str)),
                );
                for (n, row) in preview.rows().iter().enumerate() {
                    let mark = if preview.is_selected(n) { "x" } else { " " };
                    let cells = preview
                        .headers()
                        .iter()
                        .map(|h| row.get(h).map(cell).unwrap_or_default());
                    builder.push_record(
                        [(n + 1).to_string(), mark.to_string()].into_iter().chain(cells),
                    );
                }
                let mut out = render(builder);
                out.push_str(&format!(
                    "\n{} of {} row(s) selected",
                    preview.selected_count(),
                    preview.len()
                ));
                Ok(out)
            }
        }
    }

    /// Format an answer with its sources.
    pub fn format_answer(&self, answer: &QueryAnswer) -> Result<String> {
        match self.format {
            OutputFormat::Json => json(answer),
            OutputFormat::Quiet => Ok(answer.answer.clone()),
            OutputFormat::Table => {
                let mut out = answer.answer.clone();
                if !answer.sources.is_empty() {
                    out.push_str(&format!(
                        "\n{}",
                        self.colorize(&format!("Sources: {}", answer.sources.join(", ")), "blue")
                    ));
                }
                Ok(out)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn join_ids(ids: impl Iterator<Item = String>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn requester(name: &str, role: &str) -> String {
    match (name.is_empty(), role.is_empty()) {
        (false, false) => format!("{} ({})", name, role),
        (false, true) => name.to_string(),
        (true, false) => role.to_string(),
        (true, true) => "-".to_string(),
    }
}

/// Attribute value as table text
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmalist_domain::seed::default_dataset;
    use pharmalist_domain::{registry, ListRecord};

    fn detail() -> ListDetail {
        let data = default_dataset();
        let record: ListRecord = data.lists[0].clone();
        let versions = data
            .versions
            .iter()
            .filter(|v| v.list_id == record.id)
            .cloned()
            .collect();
        ListDetail::new(record, versions)
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let detail = detail();
        let output = formatter.format_lists(&[detail.summary.clone()]).unwrap();
        assert!(output.contains("\"purpose\""));
        assert!(output.contains("\"version_number\""));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let detail = detail();
        let output = formatter.format_lists(&[detail.summary.clone()]).unwrap();
        assert_eq!(output, detail.summary.id.to_string());
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let detail = detail();
        let output = formatter.format_lists(&[detail.summary.clone()]).unwrap();
        assert!(output.contains("Title"));
        assert!(output.contains("Q3 Cardiology Target List"));
    }

    #[test]
    fn test_detail_table_has_attribute_columns() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let detail = detail();
        let output = formatter
            .format_detail(&detail, &detail.current_snapshot)
            .unwrap();
        assert!(output.contains("Customer / HCP"));
        assert!(output.contains("specialty"));
        assert!(output.contains("Cardiology"));
    }

    #[test]
    fn test_empty_lists() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_lists(&[]).unwrap();
        assert!(output.contains("No lists found"));
    }

    #[test]
    fn test_domains_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_domains(registry::all_domains()).unwrap();
        assert!(output.contains("Account / Institutional"));
        assert!(output.contains("Event Invitation Lists"));
    }

    #[test]
    fn test_answer_lists_sources() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let answer = QueryAnswer {
            answer: "One list.".to_string(),
            sources: vec!["Q3 Cardiology Target List".to_string()],
        };
        let output = formatter.format_answer(&answer).unwrap();
        assert_eq!(output, "One list.\nSources: Q3 Cardiology Target List");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
