//! Cedars Subscriptions CLI - catalog and credential management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with the built-in sample services
//! cedars-cli seed
//!
//! # Seed the catalog from a JSON file (array of service documents)
//! cedars-cli seed --file services.json
//!
//! # Set the shared admin password
//! cedars-cli admin set-password --password 'new-password'
//!
//! # Export the catalog report
//! cedars-cli report --out cedars_report.csv
//! ```
//!
//! The document store backend is selected by environment; see `cedars-store`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cedars-cli")]
#[command(author, version, about = "Cedars Subscriptions CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the services collection
    Seed {
        /// JSON file holding an array of service documents; omitted means
        /// the built-in sample catalog
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Manage the admin credential
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Export the catalog report as CSV
    Report {
        /// Output file
        #[arg(short, long, default_value = "cedars_report.csv")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Hash and store a new shared admin password
    SetPassword {
        /// The new password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { file } => commands::seed::run(file.as_deref()).await?,
        Commands::Admin { action } => match action {
            AdminAction::SetPassword { password } => {
                commands::admin::set_password(&password).await?;
            }
        },
        Commands::Report { out } => commands::report::run(&out).await?,
    }
    Ok(())
}
