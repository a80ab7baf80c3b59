use anyhow::Result;
use huddle_core::CalendarProvider;
use huddle_provider_caldav::{CalDavProvider, LibdavBackend};

pub async fn run() -> Result<()> {
    let provider = CalDavProvider::with_persisted_session(LibdavBackend::new());

    // Re-validates the saved session against the server
    let calendars = provider.sign_in(None).await?;

    println!("Signed in as: {}\n", provider.current_email());

    for calendar in &calendars {
        match &calendar.color {
            Some(color) => println!("  {}  {}  ({})", calendar.name(), color, calendar.id),
            None => println!("  {}  ({})", calendar.name(), calendar.id),
        }
    }

    Ok(())
}
