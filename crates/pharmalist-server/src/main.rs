//! Pharmalist server binary
//!
//! Starts the HTTP API for contact lists.

use pharmalist_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        return Ok(());
    } else {
        eprintln!("Warning: No config file specified, using in-memory sample data");
        eprintln!("Usage: pharmalist-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_test_config()
    };

    start_server(config).await
}

fn print_help() {
    println!("Pharmalist Server - Contact list API");
    println!();
    println!("USAGE:");
    println!("    pharmalist-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    bind_address, bind_port     Listen address");
    println!("    [storage] backend           memory | blob | sqlite");
    println!("    [storage] path              Blob directory or database file");
    println!("    [storage] seed_on_start     Load sample lists into an empty store (default: true)");
    println!("    [llm] endpoint, model       Ollama answer provider (optional)");
    println!();
    println!("Set RUST_LOG to adjust log output (default: info).");
}
