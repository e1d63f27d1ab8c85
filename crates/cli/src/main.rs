//! SimCard CLI - schema setup and user management.
//!
//! # Usage
//!
//! ```bash
//! # Apply the schema and create the seed admin user
//! simcard-cli init
//!
//! # Create a user
//! simcard-cli user create -u clerk -p 's3cret' -r viewer
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "simcard-cli")]
#[command(author, version, about = "SimCard inventory CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the database schema and create the seed user
    Init,
    /// Manage API users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (stored as an Argon2id hash)
        #[arg(short, long)]
        password: String,

        /// Role (`admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                role,
            } => commands::user::create(&username, &password, &role).await?,
        },
    }
    Ok(())
}
