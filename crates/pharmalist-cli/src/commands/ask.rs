//! Ask command implementation.

use super::Session;
use crate::chat::{build_request, run_chat};
use crate::cli::AskArgs;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the ask command.
///
/// Without a question this starts an interactive conversation.
pub async fn execute_ask(args: AskArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let domain = args.domain.or(session.domain);
    let question = args.question.join(" ");

    if question.trim().is_empty() {
        return run_chat(session, domain, formatter).await;
    }

    let answer = session
        .service
        .ask(build_request(question.trim(), domain, &[]))
        .await?;
    println!("{}", formatter.format_answer(&answer)?);
    Ok(())
}
