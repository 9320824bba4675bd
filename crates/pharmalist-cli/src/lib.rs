//! Pharmalist CLI library.
//!
//! Configuration profiles, command execution and output formatting for
//! the `pharmalist` binary. Commands run against a list server or, with
//! `--local`, against a blob on disk.

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
