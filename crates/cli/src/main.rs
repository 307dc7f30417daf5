//! Event Desk CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ed-cli migrate
//!
//! # Create an admin account
//! ed-cli admin create -e admin@example.com -p 'correct horse'
//!
//! # Create the admin or reset its password
//! ed-cli admin set-password -e admin@example.com -p 'battery staple'
//!
//! # Load the sample event catalog (or your own JSON file)
//! ed-cli seed events
//! ed-cli seed events --file events.json
//! ```
//!
//! All commands read `DATABASE_URL` (a `.env` file is honored).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ed-cli")]
#[command(author, version, about = "Event Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,
    },
    /// Create the admin account, or replace its password if it exists
    SetPassword {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert events by title
    Events {
        /// JSON array of events; the built-in sample catalog when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create { email, password } => {
                commands::admin::create(&email, &password).await?;
            }
            AdminAction::SetPassword { email, password } => {
                commands::admin::set_password(&email, &password).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Events { file } => {
                commands::seed::events(file.as_deref()).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_admin_create() {
        let cli = Cli::try_parse_from(["ed-cli", "admin", "create", "-e", "a@x.com", "-p", "p1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Admin {
                action: AdminAction::Create { .. }
            })
        ));
    }

    #[test]
    fn test_parse_seed_events_file() {
        let cli = Cli::try_parse_from(["ed-cli", "seed", "events", "--file", "events.json"]);
        match cli.map(|c| c.command) {
            Ok(Commands::Seed {
                target: SeedTarget::Events { file },
            }) => assert_eq!(file, Some(PathBuf::from("events.json"))),
            _ => panic!("expected seed events"),
        }
    }
}
