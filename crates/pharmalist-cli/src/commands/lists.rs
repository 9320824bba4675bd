//! List commands: browse, create, change and delete lists.

use super::{confirm, import::read_rows, Session};
use crate::cli::{AddArgs, CreateArgs, DeleteArgs, ListsArgs, ResetArgs, ShowArgs, UpdateArgs};
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pharmalist_domain::{Attributes, ItemBatch, ListUpdate, NewList};
use serde_json::Value;

/// Rationale recorded for a single entry when none is given
const SINGLE_ENTRY_RATIONALE: &str = "Added single entry";

/// Execute the lists command.
pub async fn execute_lists(args: ListsArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let domain = if args.all {
        None
    } else {
        args.domain.or(session.domain)
    };

    let lists = session.service.list(domain).await?;
    println!("{}", formatter.format_lists(&lists)?);
    Ok(())
}

/// Execute the show command.
pub async fn execute_show(args: ShowArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let detail = session.service.get(args.id).await?;

    let items = match args.at_version {
        Some(n) => detail.snapshot_at(n).ok_or_else(|| {
            CliError::InvalidInput(format!("List {} has no version {}", args.id, n))
        })?,
        None => detail.current_snapshot.as_slice(),
    };

    println!("{}", formatter.format_detail(&detail, items)?);
    Ok(())
}

/// Execute the create command.
pub async fn execute_create(args: CreateArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let items = match &args.from {
        Some(path) => match read_rows(path, &args.skip, formatter)? {
            Some(preview) => preview.into_selected(),
            // Spreadsheet; the warning has been shown
            None => return Ok(()),
        },
        None => Vec::new(),
    };

    let new_list = NewList {
        category: args.category,
        purpose: args.purpose,
        requester_name: args
            .requester
            .or_else(|| session.actor.clone())
            .unwrap_or_default(),
        requester_role: args.role,
        list_type: args.list_type,
        items,
        created_by: session.actor.clone(),
    };

    let created = session.service.create(new_list).await?;
    if formatter.format() == OutputFormat::Quiet {
        println!("{}", created.id);
    } else {
        println!(
            "{}",
            formatter.success(&format!(
                "Created list '{}' ({}) with {} item(s)",
                created.purpose, created.id, created.item_count
            ))
        );
    }
    Ok(())
}

/// Execute the add command.
///
/// Fields with empty values are left out; at least one must remain.
pub async fn execute_add(args: AddArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let entry: Attributes = args
        .fields
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    if entry.is_empty() {
        return Err(CliError::InvalidInput(
            "Fill in at least one field".to_string(),
        ));
    }

    let batch = ItemBatch {
        items: vec![entry],
        updated_by: session.actor.clone(),
        rationale: Some(
            args.rationale
                .unwrap_or_else(|| SINGLE_ENTRY_RATIONALE.to_string()),
        ),
    };
    let outcome = session.service.add_items(args.id, batch).await?;

    if formatter.format() == OutputFormat::Quiet {
        println!("{}", outcome.version_number);
    } else {
        println!(
            "{}",
            formatter.success(&format!(
                "Entry added, list is now at version {}",
                outcome.version_number
            ))
        );
    }
    Ok(())
}

/// Execute the update command.
pub async fn execute_update(args: UpdateArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let update = ListUpdate {
        requester_name: args.requester,
        requester_role: args.role,
        purpose: args.purpose,
        category: args.category,
        list_type: args.list_type,
    };

    if update == ListUpdate::default() {
        return Err(CliError::InvalidInput("Nothing to update".to_string()));
    }

    let updated = session.service.update(args.id, update).await?;
    println!("{}", formatter.format_lists(std::slice::from_ref(&updated))?);
    Ok(())
}

/// Execute the delete command.
pub async fn execute_delete(args: DeleteArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    if !args.yes && !confirm(&format!("Delete list {} with its history?", args.id))? {
        println!("{}", formatter.info("Operation cancelled"));
        return Ok(());
    }

    if session.service.delete(args.id).await? {
        println!("{}", formatter.success(&format!("Deleted list {}", args.id)));
    } else {
        println!(
            "{}",
            formatter.warning(&format!("List {} does not exist", args.id))
        );
    }
    Ok(())
}

/// Execute the reset command.
pub async fn execute_reset(args: ResetArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    if !args.yes && !confirm("Discard all lists and restore the sample data?")? {
        println!("{}", formatter.info("Operation cancelled"));
        return Ok(());
    }

    let lists = session.service.reset().await?;
    println!(
        "{}",
        formatter.success(&format!("Restored {} sample list(s)", lists.len()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmalist_domain::{DomainKey, ListId};
    use pharmalist_sdk::{ListService, LocalService};
    use pharmalist_store::MemoryStore;
    use std::sync::Arc;

    fn session() -> Session {
        let mut session = Session::new(Arc::new(LocalService::new(MemoryStore::seeded())));
        session.actor = Some("Anita".to_string());
        session
    }

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    #[tokio::test]
    async fn test_create_uses_actor_as_requester() {
        let session = session();
        let args = CreateArgs {
            category: "Customer/HCP".to_string(),
            purpose: "Q4 List".to_string(),
            requester: None,
            role: "Brand Manager".to_string(),
            list_type: Some("Call Lists".to_string()),
            from: None,
            skip: Vec::new(),
        };
        execute_create(args, &session, &quiet()).await.unwrap();

        let lists = session.service.list(Some(DomainKey::Customer)).await.unwrap();
        let created = lists.iter().find(|l| l.purpose == "Q4 List").unwrap();
        assert_eq!(created.requester_name, "Anita");
        assert_eq!(created.version_number, 1);

        let versions = session.service.versions(created.id).await.unwrap();
        assert_eq!(versions[0].updated_by, "Anita");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_domain() {
        let args = CreateArgs {
            category: "Sales".to_string(),
            purpose: "Q4".to_string(),
            requester: None,
            role: String::new(),
            list_type: None,
            from: None,
            skip: Vec::new(),
        };
        let err = execute_create(args, &session(), &quiet()).await.unwrap_err();
        assert!(err.to_string().contains("Sales"));
    }

    #[tokio::test]
    async fn test_show_unknown_version() {
        let session = session();
        let id = session.service.list(None).await.unwrap()[0].id;

        let ok = ShowArgs { id, at_version: Some(1) };
        execute_show(ok, &session, &quiet()).await.unwrap();

        let missing = ShowArgs { id, at_version: Some(42) };
        let err = execute_show(missing, &session, &quiet()).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_add_single_entry() {
        let session = session();
        let target = session.service.list(None).await.unwrap()[0].clone();

        let args = AddArgs {
            id: target.id,
            fields: vec![
                ("name".to_string(), "Dr. Meera Iyer".to_string()),
                ("specialty".to_string(), "Oncology".to_string()),
                ("email".to_string(), String::new()),
            ],
            rationale: None,
        };
        execute_add(args, &session, &quiet()).await.unwrap();

        let detail = session.service.get(target.id).await.unwrap();
        assert_eq!(detail.summary.item_count, target.item_count + 1);
        assert_eq!(detail.summary.version_number, target.version_number + 1);

        let added = detail.current_snapshot.last().unwrap();
        assert_eq!(added.attribute("name"), Some("Dr. Meera Iyer"));
        assert_eq!(added.attribute("email"), None);

        let version = detail.versions.last().unwrap();
        assert_eq!(version.changes_summary.added, 1);
        assert_eq!(version.rationale, SINGLE_ENTRY_RATIONALE);
        assert_eq!(version.updated_by, "Anita");
    }

    #[tokio::test]
    async fn test_add_with_only_empty_fields_is_rejected() {
        let session = session();
        let target = session.service.list(None).await.unwrap()[0].clone();

        let args = AddArgs {
            id: target.id,
            fields: vec![("name".to_string(), String::new())],
            rationale: None,
        };
        let err = execute_add(args, &session, &quiet()).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));

        let after = session.service.get(target.id).await.unwrap();
        assert_eq!(after.summary.version_number, target.version_number);
    }

    #[tokio::test]
    async fn test_empty_update_is_rejected() {
        let session = session();
        let args = UpdateArgs {
            id: ListId::new(),
            purpose: None,
            requester: None,
            role: None,
            category: None,
            list_type: None,
        };
        let err = execute_update(args, &session, &quiet()).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_and_reset_without_prompt() {
        let session = session();
        let id = session.service.list(None).await.unwrap()[0].id;

        execute_delete(DeleteArgs { id, yes: true }, &session, &quiet())
            .await
            .unwrap();
        assert_eq!(session.service.list(None).await.unwrap().len(), 2);

        // Deleting again only warns
        execute_delete(DeleteArgs { id, yes: true }, &session, &quiet())
            .await
            .unwrap();

        execute_reset(ResetArgs { yes: true }, &session, &quiet())
            .await
            .unwrap();
        assert_eq!(session.service.list(None).await.unwrap().len(), 3);
    }
}
