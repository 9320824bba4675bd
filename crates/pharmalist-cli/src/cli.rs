//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use pharmalist_domain::{DomainKey, ListId};
use std::path::PathBuf;

/// Pharmalist CLI - Manage pharma contact lists.
#[derive(Debug, Parser)]
#[command(name = "pharmalist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PHARMALIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Work offline against the list blob in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub local: Option<PathBuf>,

    /// Acting user recorded in versions and work logs
    #[arg(long, global = true)]
    pub by: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List contact lists
    Lists(ListsArgs),

    /// Show one list with its items
    Show(ShowArgs),

    /// Create a list
    Create(CreateArgs),

    /// Change list metadata
    Update(UpdateArgs),

    /// Append a single entry to a list
    Add(AddArgs),

    /// Append the rows of a CSV file to a list
    Import(ImportArgs),

    /// Write a sample CSV for a list type
    Template(TemplateArgs),

    /// Delete a list with its history
    Delete(DeleteArgs),

    /// Show the version history of a list
    Versions(ListRef),

    /// Show the work log of a list
    Worklogs(ListRef),

    /// Add a work log entry
    Log(LogArgs),

    /// Ask a question about the lists (interactive without a question)
    Ask(AskArgs),

    /// Discard everything and restore the sample lists
    Reset(ResetArgs),

    /// Show the domain registry
    Domains,

    /// Re-fetch lists periodically until interrupted
    Watch(WatchArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// A single list id.
#[derive(Debug, Parser)]
pub struct ListRef {
    /// List ID
    pub id: ListId,
}

/// Arguments for the lists command.
#[derive(Debug, Parser)]
pub struct ListsArgs {
    /// Only lists of this domain (key or legacy category)
    #[arg(short, long)]
    pub domain: Option<DomainKey>,

    /// Ignore the profile's default domain
    #[arg(long, conflicts_with = "domain")]
    pub all: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// List ID
    pub id: ListId,

    /// Show the items as they were at this version
    #[arg(long, value_name = "N")]
    pub at_version: Option<u32>,
}

/// Arguments for the create command.
#[derive(Debug, Parser)]
pub struct CreateArgs {
    /// Domain key or legacy category name
    pub category: String,

    /// Title / purpose of the list
    pub purpose: String,

    /// Requester name (defaults to the acting user)
    #[arg(long)]
    pub requester: Option<String>,

    /// Requester role
    #[arg(long, default_value = "")]
    pub role: String,

    /// List type within the domain
    #[arg(short = 't', long)]
    pub list_type: Option<String>,

    /// CSV file with the initial items
    #[arg(long, value_name = "CSV")]
    pub from: Option<PathBuf>,

    /// Row numbers of the CSV to leave out (1-based)
    #[arg(long, value_delimiter = ',', requires = "from")]
    pub skip: Vec<usize>,
}

/// Arguments for the update command.
#[derive(Debug, Parser)]
pub struct UpdateArgs {
    /// List ID
    pub id: ListId,

    /// New title / purpose
    #[arg(long)]
    pub purpose: Option<String>,

    /// New requester name
    #[arg(long)]
    pub requester: Option<String>,

    /// New requester role
    #[arg(long)]
    pub role: Option<String>,

    /// New domain key or legacy category
    #[arg(long)]
    pub category: Option<String>,

    /// New list type
    #[arg(short = 't', long)]
    pub list_type: Option<String>,
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// List ID
    pub id: ListId,

    /// Entry field as key=value (repeatable)
    #[arg(short = 'F', long = "field", value_name = "KEY=VALUE", value_parser = parse_field, required = true)]
    pub fields: Vec<(String, String)>,

    /// Why the entry is added
    #[arg(long)]
    pub rationale: Option<String>,
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("field name missing in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// List ID
    pub id: ListId,

    /// CSV file to import
    pub file: PathBuf,

    /// Row numbers to leave out (1-based, comma separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<usize>,

    /// Why the items are added
    #[arg(long)]
    pub rationale: Option<String>,

    /// Show the parsed rows without importing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the template command.
#[derive(Debug, Parser)]
pub struct TemplateArgs {
    /// List type the template is for
    #[arg(default_value = "Target Lists")]
    pub list_type: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// List ID
    pub id: ListId,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the log command.
#[derive(Debug, Parser)]
pub struct LogArgs {
    /// List ID
    pub id: ListId,

    /// What was done
    pub action: String,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// The question; omit to start a conversation
    #[arg(trailing_var_arg = true)]
    pub question: Vec<String>,

    /// Scope the question to a domain
    #[arg(short, long)]
    pub domain: Option<DomainKey>,
}

/// Arguments for the reset command.
#[derive(Debug, Parser)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the watch command.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    /// Only lists of this domain
    #[arg(short, long)]
    pub domain: Option<DomainKey>,

    /// Seconds between fetches (defaults to the configured poll interval)
    #[arg(short, long)]
    pub interval: Option<u64>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Server URL
        #[arg(short, long)]
        url: String,
        /// Acting user
        #[arg(long)]
        user: Option<String>,
        /// Default domain
        #[arg(short, long)]
        domain: Option<DomainKey>,
        /// Bearer token sent with every request
        #[arg(long)]
        token: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
