// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Botforge - AI-generated Telegram bot lifecycle platform.
//!
//! This is the binary entry point for the Botforge server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};

/// Botforge - AI-generated Telegram bot lifecycle platform.
#[derive(Parser, Debug)]
#[command(name = "botforge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Botforge HTTP server.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match botforge_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            botforge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run(config).await {
                eprintln!("botforge serve: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match effective_config_toml(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("botforge config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("botforge: use --help for available commands");
        }
    }
}

/// Render the effective configuration as TOML with the API key redacted.
fn effective_config_toml(
    config: &botforge_config::BotforgeConfig,
) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.codegen.api_key.is_some() {
        shown.codegen.api_key = Some("<redacted>".to_string());
    }
    toml::to_string_pretty(&shown)
}
