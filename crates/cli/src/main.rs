//! NexusSphere CLI - database migrations and site management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply site and session-store migrations
//! ns-cli migrate
//!
//! # Create a staff account
//! ns-cli user create --username alice --password 's3cret-pass' --staff
//!
//! # Load team, services, portfolio and blog content
//! ns-cli seed content.yaml
//!
//! # Show the latest contact form submissions
//! ns-cli contacts list --limit 20
//! ```
//!
//! Every command reads `SITE_DATABASE_URL` (or `DATABASE_URL`), loading a
//! `.env` file first if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ns-cli")]
#[command(author, version, about = "NexusSphere CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Load site content from a YAML file
    Seed {
        /// Path to the YAML file
        file: PathBuf,
    },
    /// Inspect contact form submissions
    Contacts {
        #[command(subcommand)]
        action: ContactsAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long)]
        email: Option<String>,

        /// Grant staff rights (may change any item)
        #[arg(long)]
        staff: bool,
    },
}

#[derive(Subcommand)]
enum ContactsAction {
    /// List the newest submissions
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
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
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                email,
                staff,
            } => {
                commands::user::create(&username, &password, email.as_deref(), staff).await?;
            }
        },
        Commands::Seed { file } => {
            commands::seed::run(&file).await?;
        }
        Commands::Contacts { action } => match action {
            ContactsAction::List { limit } => commands::contacts::list(limit).await?,
        },
    }
    Ok(())
}
