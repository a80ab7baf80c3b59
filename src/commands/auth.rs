use anyhow::{Context, Result};
use huddle_core::{CalendarProvider, Credentials};
use huddle_provider_caldav::{CalDavProvider, LibdavBackend};

pub async fn run(server_url: String, username: String, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => std::env::var("HUDDLE_CALDAV_PASSWORD")
            .context("Pass --password or set HUDDLE_CALDAV_PASSWORD")?,
    };

    let provider = CalDavProvider::with_persisted_session(LibdavBackend::new());

    println!("Signing in to {server_url}...");

    let calendars = provider
        .sign_in(Some(Credentials::new(server_url, username, password)))
        .await?;

    println!("Signed in as: {}\n", provider.current_email());
    println!("Found {} calendar(s):\n", calendars.len());

    for calendar in &calendars {
        println!("  {}  ({})", calendar.name(), calendar.id);
    }

    println!("\nRun `huddle events` to list upcoming events.");

    Ok(())
}
