use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod init;
pub mod migrate;
pub mod models;
pub mod serve;
pub mod session;

use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Create the database and its tables
    Init {},
    /// Migrate the db schema
    Migrate {},
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Issue a session token for a user, creating the user if needed
    Session {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        /// Days until the token expires. Defaults to
        /// CHATTER_SESSION_TTL_DAYS.
        #[arg(long)]
        ttl_days: Option<i64>,
    },
    /// List Gemini models available to the configured API key
    Models {
        /// Include models that can't generate chat responses
        #[arg(long, action, default_value = "false")]
        all: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// A `--ttl-days` flag wins over the configured session lifetime
fn session_ttl(ttl_days: Option<i64>) -> Result<chrono::Duration> {
    match ttl_days {
        Some(days) => Ok(chrono::Duration::days(days)),
        None => AppConfig::session_ttl_from_env(),
    }
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    let db_path = AppConfig::db_path_from_env();

    // Handle each sub command
    match args.command {
        Some(Command::Init {}) => {
            init::run(&db_path).await?;
        }
        Some(Command::Migrate {}) => {
            migrate::run(&db_path).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Session {
            email,
            name,
            ttl_days,
        }) => {
            let ttl = session_ttl(ttl_days)?;
            session::run(&email, name.as_deref(), ttl, &db_path).await?;
        }
        Some(Command::Models { all }) => {
            models::run(all).await?;
        }
        None => {}
    }

    Ok(())
}
