mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "Calendar tools for the huddle conferencing client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to a CalDAV server and remember the session
    Auth {
        /// CalDAV server URL (often the calendar home)
        #[arg(long)]
        server_url: String,

        /// Account username
        #[arg(long)]
        username: String,

        /// Account password (falls back to $HUDDLE_CALDAV_PASSWORD)
        #[arg(long)]
        password: Option<String>,
    },
    /// List the calendars of the signed-in account
    Calendars,
    /// List events around now
    Events {
        /// Day offset the window starts at (default -14)
        #[arg(long)]
        from_days: Option<i64>,

        /// Day offset the window ends at (default 28)
        #[arg(long)]
        to_days: Option<i64>,
    },
    /// Write a meeting link into a calendar event
    Link {
        /// Event UID
        event_id: String,

        /// Calendar id (as printed by `huddle calendars`)
        calendar_id: String,

        /// Meeting URL to attach
        meeting_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth {
            server_url,
            username,
            password,
        } => commands::auth::run(server_url, username, password).await,
        Commands::Calendars => commands::calendars::run().await,
        Commands::Events { from_days, to_days } => commands::events::run(from_days, to_days).await,
        Commands::Link {
            event_id,
            calendar_id,
            meeting_url,
        } => commands::link::run(&event_id, &calendar_id, &meeting_url).await,
    }
}
