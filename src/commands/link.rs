use anyhow::Result;
use huddle_core::CalendarProvider;
use huddle_provider_caldav::{CalDavProvider, LibdavBackend};

pub async fn run(event_id: &str, calendar_id: &str, meeting_url: &str) -> Result<()> {
    let provider = CalDavProvider::with_persisted_session(LibdavBackend::new());
    provider.sign_in(None).await?;

    let location = provider
        .update_calendar_event(event_id, calendar_id, meeting_url)
        .await?;

    println!("Meeting link saved to the event: {location}");

    Ok(())
}
