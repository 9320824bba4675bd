//! Pharmalist CLI - Command-line interface for pharma contact lists.

use clap::Parser;
use pharmalist_cli::commands::{self, open_session};
use pharmalist_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> pharmalist_cli::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &formatter).await?;
        }
        Command::Domains => commands::execute_domains(&formatter).await?,
        Command::Template(args) => commands::execute_template(args, &formatter).await?,
        cmd => {
            let session = open_session(cli.local.as_deref(), cli.by, &config)?;

            match cmd {
                Command::Lists(args) => commands::execute_lists(args, &session, &formatter).await?,
                Command::Show(args) => commands::execute_show(args, &session, &formatter).await?,
                Command::Create(args) => commands::execute_create(args, &session, &formatter).await?,
                Command::Add(args) => commands::execute_add(args, &session, &formatter).await?,
                Command::Update(args) => commands::execute_update(args, &session, &formatter).await?,
                Command::Import(args) => commands::execute_import(args, &session, &formatter).await?,
                Command::Delete(args) => commands::execute_delete(args, &session, &formatter).await?,
                Command::Versions(args) => {
                    commands::execute_versions(args, &session, &formatter).await?
                }
                Command::Worklogs(args) => {
                    commands::execute_worklogs(args, &session, &formatter).await?
                }
                Command::Log(args) => commands::execute_log(args, &session, &formatter).await?,
                Command::Ask(args) => commands::execute_ask(args, &session, &formatter).await?,
                Command::Reset(args) => commands::execute_reset(args, &session, &formatter).await?,
                Command::Watch(args) => commands::execute_watch(args, &session, &formatter).await?,
                Command::Profile(_) | Command::Domains | Command::Template(_) => unreachable!(),
            }
        }
    }

    Ok(())
}
