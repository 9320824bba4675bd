//! Interactive conversation about the lists.

use crate::commands::Session;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use pharmalist_domain::DomainKey;
use pharmalist_llm::{ChatTurn, QueryRequest};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Build the request for one question.
pub(crate) fn build_request(question: &str, domain: Option<DomainKey>, history: &[ChatTurn]) -> QueryRequest {
    let request = QueryRequest::new(question).with_history(history.to_vec());
    match domain {
        Some(domain) => request.in_domain(domain),
        None => request,
    }
}

/// Run the conversation until `exit` or end of input.
pub async fn run_chat(session: &Session, domain: Option<DomainKey>, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.info("Ask about the lists. Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut domain = domain;
    let mut turns: Vec<ChatTurn> = Vec::new();

    loop {
        let prompt = match domain {
            Some(key) => format!("pharmalist [{}]> ", key),
            None => "pharmalist> ".to_string(),
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();

                match parse_chat_line(line) {
                    Ok(ChatCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ChatCommand::Help) => print_help(formatter),
                    Ok(ChatCommand::Clear) => {
                        turns.clear();
                        println!("{}", formatter.info("Conversation cleared"));
                    }
                    Ok(ChatCommand::Domain(key)) => {
                        domain = key;
                        match key {
                            Some(key) => println!("{}", formatter.info(&format!("Scoped to {}", key))),
                            None => println!("{}", formatter.info("Asking across all domains")),
                        }
                    }
                    Ok(ChatCommand::Ask(question)) => {
                        let request = build_request(&question, domain, &turns);
                        match session.service.ask(request).await {
                            Ok(answer) => {
                                println!("{}", formatter.format_answer(&answer)?);
                                turns.push(ChatTurn::user(question));
                                turns.push(ChatTurn::assistant(answer.answer));
                                trim_turns(&mut turns, session.history_size);
                            }
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                        }
                    }
                    Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();
    Ok(())
}

/// One line of input.
#[derive(Debug, PartialEq)]
enum ChatCommand {
    Exit,
    Help,
    Clear,
    /// `None` drops the scope
    Domain(Option<DomainKey>),
    Ask(String),
}

fn parse_chat_line(line: &str) -> Result<ChatCommand> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or_default();
    let rest = parts.next().map(str::trim).unwrap_or_default();

    match head {
        "exit" | "quit" | "q" if rest.is_empty() => Ok(ChatCommand::Exit),
        "help" | "?" if rest.is_empty() => Ok(ChatCommand::Help),
        "clear" if rest.is_empty() => Ok(ChatCommand::Clear),
        "domain" => match rest {
            "" | "all" => Ok(ChatCommand::Domain(None)),
            key => key
                .parse()
                .map(|k| ChatCommand::Domain(Some(k)))
                .map_err(CliError::InvalidInput),
        },
        _ => Ok(ChatCommand::Ask(line.to_string())),
    }
}

/// Keep only the newest `max` turns.
fn trim_turns(turns: &mut Vec<ChatTurn>, max: usize) {
    if turns.len() > max {
        let excess = turns.len() - max;
        turns.drain(..excess);
    }
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let dir = home.join(".pharmalist");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("chat_history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Anything else is sent as a question."));
    println!();
    println!("  domain <key>     - Scope questions to a domain");
    println!("  domain all       - Ask across all domains");
    println!("  clear            - Forget the conversation so far");
    println!("  help, ?          - Show this help");
    println!("  exit, quit, q    - Leave");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_line() {
        assert_eq!(parse_chat_line("exit").unwrap(), ChatCommand::Exit);
        assert_eq!(parse_chat_line("clear").unwrap(), ChatCommand::Clear);
        assert_eq!(
            parse_chat_line("domain Marketing").unwrap(),
            ChatCommand::Domain(Some(DomainKey::Marketing))
        );
        assert_eq!(parse_chat_line("domain all").unwrap(), ChatCommand::Domain(None));
        assert!(parse_chat_line("domain Sales").is_err());

        // Commands only match on their own
        assert_eq!(
            parse_chat_line("help me find call lists").unwrap(),
            ChatCommand::Ask("help me find call lists".to_string())
        );
    }

    #[test]
    fn test_trim_keeps_newest_turns() {
        let mut turns: Vec<_> = (0..6).map(|i| ChatTurn::user(i.to_string())).collect();
        trim_turns(&mut turns, 4);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].content, "2");
    }

    #[test]
    fn test_build_request_carries_scope_and_history() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let request = build_request("Which lists?", Some(DomainKey::Data), &history);

        assert_eq!(request.domain, Some(DomainKey::Data));
        assert_eq!(request.history, history);
        assert!(build_request("x", None, &[]).domain.is_none());
    }
}
