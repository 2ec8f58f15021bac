//! Lantern CLI - Database migrations, content checks and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply site and session-store migrations
//! lantern-cli migrate
//!
//! # Validate every post before deploying
//! lantern-cli content check
//! lantern-cli content check --dir path/to/posts
//!
//! # Print one post's metadata
//! lantern-cli content show hello-world
//!
//! # Create a reader account (password from LANTERN_NEW_USER_PASSWORD)
//! lantern-cli user create -e ada@example.com -n "Ada"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "lantern-cli")]
#[command(author, version, about = "Lantern CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect and validate post files
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Manage reader accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Parse every post and report the first invalid file
    Check {
        /// Post directory (defaults to `LANTERN_CONTENT_DIR`)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Show the metadata of one post
    Show {
        /// Post slug
        slug: String,

        /// Post directory (defaults to `LANTERN_CONTENT_DIR`)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new reader account
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Content { action } => match action {
            ContentAction::Check { dir } => commands::content::check(dir)?,
            ContentAction::Show { slug, dir } => commands::content::show(&slug, dir)?,
        },
        Commands::User { action } => match action {
            UserAction::Create { email, name } => {
                commands::user::create(&email, &name).await?;
            }
        },
    }
    Ok(())
}
