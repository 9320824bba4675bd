//! Version history and work log commands.

use super::Session;
use crate::cli::{ListRef, LogArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pharmalist_domain::NewWorkLog;

/// Execute the versions command.
pub async fn execute_versions(args: ListRef, session: &Session, formatter: &Formatter) -> Result<()> {
    let versions = session.service.versions(args.id).await?;
    println!("{}", formatter.format_versions(&versions)?);
    Ok(())
}

/// Execute the worklogs command.
pub async fn execute_worklogs(args: ListRef, session: &Session, formatter: &Formatter) -> Result<()> {
    let logs = session.service.work_logs(args.id).await?;
    println!("{}", formatter.format_work_logs(&logs)?);
    Ok(())
}

/// Execute the log command.
pub async fn execute_log(args: LogArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    if args.action.trim().is_empty() {
        return Err(CliError::InvalidInput("Action cannot be empty".to_string()));
    }

    let entry = NewWorkLog {
        list_id: args.id,
        action: args.action,
        performed_by: session.actor.clone().unwrap_or_default(),
    };
    let log = session.service.add_work_log(entry).await?;
    println!(
        "{}",
        formatter.success(&format!("Logged '{}' by {}", log.action, log.performed_by))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use pharmalist_domain::{ListId, DEFAULT_ACTOR};
    use pharmalist_sdk::{ListService, LocalService};
    use pharmalist_store::MemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_log_without_actor_uses_default() {
        let session = Session::new(Arc::new(LocalService::new(MemoryStore::seeded())));
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let id = session.service.list(None).await.unwrap()[0].id;

        let args = LogArgs {
            id,
            action: "Shared with field team".to_string(),
        };
        execute_log(args, &session, &formatter).await.unwrap();

        let logs = session.service.work_logs(id).await.unwrap();
        let last = logs.last().unwrap();
        assert_eq!(last.action, "Shared with field team");
        assert_eq!(last.performed_by, DEFAULT_ACTOR);
    }

    #[tokio::test]
    async fn test_history_of_unknown_list_fails() {
        let session = Session::new(Arc::new(LocalService::new(MemoryStore::seeded())));
        let formatter = Formatter::new(OutputFormat::Table, false);

        let err = execute_versions(ListRef { id: ListId::new() }, &session, &formatter)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Sdk(ref e) if e.is_not_found()));
    }
}
