// SPDX-FileCopyrightText: 2026 Huddle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Huddle - real-time chat core for the Huddle collaboration suite.
//!
//! This is the binary entry point for the Huddle gateway.

mod serve;

use clap::{Parser, Subcommand};

/// Huddle - real-time chat gateway.
#[derive(Parser, Debug)]
#[command(name = "huddle", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the chat gateway.
    Serve,
    /// Load the configuration, validate it, and print the result.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match huddle_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("{}", huddle_config::render_errors(&errors));
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("huddle: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("huddle: failed to render config: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
