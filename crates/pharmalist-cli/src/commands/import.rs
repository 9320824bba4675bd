//! CSV import and sample templates.

use super::Session;
use crate::cli::{ImportArgs, TemplateArgs};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pharmalist_domain::ItemBatch;
use pharmalist_import::{load_file, sample_template, ImportPreview, Upload, SAMPLE_FILE_NAME};
use std::fs;
use std::path::Path;

/// Parse a CSV file and leave out the given rows (1-based)
///
/// Returns `None` after printing the warning when the file is a
/// spreadsheet.
pub(crate) fn read_rows(path: &Path, skip: &[usize], formatter: &Formatter) -> Result<Option<ImportPreview>> {
    let mut preview = match load_file(path)? {
        Upload::Parsed(preview) => preview,
        Upload::Unsupported { warning } => {
            eprintln!("{}", formatter.warning(&warning));
            return Ok(None);
        }
    };

    if let Some(bad) = skip.iter().find(|n| **n == 0 || **n > preview.len()) {
        return Err(CliError::InvalidInput(format!(
            "Row {} is out of range (the file has {} row(s))",
            bad,
            preview.len()
        )));
    }
    preview.deselect(skip.iter().map(|n| n - 1));
    Ok(Some(preview))
}

/// Execute the import command.
pub async fn execute_import(args: ImportArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let Some(preview) = read_rows(&args.file, &args.skip, formatter)? else {
        return Ok(());
    };

    if args.dry_run {
        println!("{}", formatter.format_preview(&preview)?);
        return Ok(());
    }

    if preview.selected_count() == 0 {
        return Err(CliError::InvalidInput("No rows selected".to_string()));
    }

    let batch = ItemBatch {
        items: preview.into_selected(),
        updated_by: session.actor.clone(),
        rationale: args.rationale,
    };
    let outcome = session.service.add_items(args.id, batch).await?;

    if formatter.format() == OutputFormat::Quiet {
        println!("{}", outcome.version_number);
    } else {
        println!(
            "{}",
            formatter.success(&format!(
                "Added {} item(s), list is now at version {}",
                outcome.added, outcome.version_number
            ))
        );
    }
    Ok(())
}

/// Execute the template command.
pub async fn execute_template(args: TemplateArgs, formatter: &Formatter) -> Result<()> {
    let csv = sample_template(&args.list_type)?;

    match args.output {
        Some(path) => {
            let path = if path.is_dir() { path.join(SAMPLE_FILE_NAME) } else { path };
            fs::write(&path, csv)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote template to {}", path.display()))
            );
        }
        None => print!("{}", csv),
    }
    Ok(())
}
