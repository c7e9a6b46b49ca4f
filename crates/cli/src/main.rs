//! Fitness diary CLI - database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! fd-cli migrate
//!
//! # Create a user and print their session token
//! fd-cli user create -n "Alice" -e alice@example.com
//!
//! # Load exercises into the catalog
//! fd-cli exercises import exercises.json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user with a fresh session token
//! - `exercises import` - Import catalog entries from a JSON file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fd-cli")]
#[command(author, version, about = "Fitness diary CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage the exercise catalog
    Exercises {
        #[command(subcommand)]
        action: ExercisesAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user and issue a session token
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum ExercisesAction {
    /// Import exercises from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
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
            UserAction::Create { name, email } => {
                commands::user::create(&name, &email).await?;
            }
        },
        Commands::Exercises { action } => match action {
            ExercisesAction::Import { file } => {
                commands::exercises::import(&file).await?;
            }
        },
    }
    Ok(())
}
