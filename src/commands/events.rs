use anyhow::Result;
use huddle_core::CalendarProvider;
use huddle_provider_caldav::{CalDavProvider, LibdavBackend};

pub async fn run(from_days: Option<i64>, to_days: Option<i64>) -> Result<()> {
    let provider = CalDavProvider::with_persisted_session(LibdavBackend::new());
    provider.sign_in(None).await?;

    let mut entries = provider.calendar_entries(from_days, to_days).await?;

    if entries.is_empty() {
        println!("No events in the selected window.");
        return Ok(());
    }

    entries.sort_by_key(|e| e.start);

    for entry in &entries {
        println!(
            "{}  {}",
            entry.start.format("%Y-%m-%d %H:%M"),
            entry.title
        );
        if let Some(location) = &entry.location {
            println!("    where: {location}");
        }
        if let Some(url) = &entry.url {
            println!("    join:  {url}");
        }
        println!("    uid: {}  calendar: {}", entry.id, entry.calendar_id);
    }

    Ok(())
}
