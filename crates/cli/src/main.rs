//! School Admin CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sa-cli migrate
//!
//! # Create a school admin account
//! sa-cli account create --username ada --email ada@example.com --password '...' \
//!     --first-name Ada --last-name Lovelace --phone-number 5551234567 --address "1 Rd"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sa-cli")]
#[command(author, version, about = "School Admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage school admin accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create a school admin account
    Create {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Digits only, at most 10
        #[arg(long)]
        phone_number: String,

        #[arg(long)]
        address: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::Create {
                username,
                email,
                password,
                first_name,
                last_name,
                phone_number,
                address,
            } => {
                let form = commands::account::form(
                    username,
                    email,
                    password,
                    first_name,
                    last_name,
                    phone_number,
                    address,
                );
                commands::account::create(form).await?;
            }
        },
    }
    Ok(())
}
