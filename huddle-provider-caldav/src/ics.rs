//! ICS handling for CalDAV resources.
//!
//! Normalizes raw VEVENT data into `CalendarEntry` records using the
//! icalendar crate's parser, and patches DESCRIPTION/LOCATION into an
//! existing resource without disturbing its other properties.

use chrono::{DateTime, Utc};
use huddle_core::{CalendarEntry, CalendarError, CalendarResult, extract_url_from_description};
use icalendar::{
    DatePerhapsTime,
    parser::{read_calendar, unfold},
};

/// Parse ICS content into a normalized calendar entry.
///
/// Resources that are not well-formed single events (missing UID or
/// start/end) yield `None` and are skipped by the caller.
pub fn parse_entry(content: &str, calendar_id: &str) -> Option<CalendarEntry> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let uid = vevent.find_prop("UID")?.val.to_string();
    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| "(No title)".to_string());
    let start = to_utc(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    let end = to_utc(DatePerhapsTime::try_from(vevent.find_prop("DTEND")?).ok()?);

    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));
    let location = vevent
        .find_prop("LOCATION")
        .map(|p| unescape_text(p.val.as_ref()));

    // An explicit URL property wins; otherwise fish the meeting link
    // out of the description.
    let url = vevent
        .find_prop("URL")
        .map(|p| p.val.to_string())
        .or_else(|| extract_url_from_description(description.as_deref()));

    Some(CalendarEntry {
        id: uid,
        calendar_id: calendar_id.to_string(),
        title,
        description,
        start,
        end,
        location,
        url,
    })
}

/// Collapse every ICS time flavor to UTC.
///
/// All-day dates become midnight UTC; floating and zoned local times
/// are taken as UTC. The client only windows and displays entries, so
/// full timezone fidelity is not required here.
fn to_utc(dpt: DatePerhapsTime) -> DateTime<Utc> {
    match dpt {
        DatePerhapsTime::Date(date) => date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
        DatePerhapsTime::DateTime(dt) => match dt {
            icalendar::CalendarDateTime::Utc(dt) => dt,
            icalendar::CalendarDateTime::Floating(naive) => naive.and_utc(),
            icalendar::CalendarDateTime::WithTimezone { date_time, .. } => date_time.and_utc(),
        },
    }
}

/// Unescape RFC 5545 TEXT values (\\n, \\, \; \,).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

/// Escape a string into an RFC 5545 TEXT value.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }
    out
}

/// Rewrite DESCRIPTION and LOCATION on the event inside a raw ICS
/// resource, leaving every other property untouched.
///
/// The share info text is appended to the existing description, or
/// becomes the description when the event has none. Properties inside
/// nested components (VALARM carries its own DESCRIPTION) are left
/// alone.
pub fn patch_event_ics(content: &str, location: &str, share_info: &str) -> CalendarResult<String> {
    let unfolded = unfold(content);
    let lines: Vec<&str> = unfolded.lines().map(|l| l.trim_end_matches('\r')).collect();

    let mut existing_description: Option<String> = None;
    let mut depth_in_vevent = 0i32;
    for line in &lines {
        match property_name(line) {
            "BEGIN" if line.ends_with("VEVENT") => depth_in_vevent = 1,
            "BEGIN" if depth_in_vevent >= 1 => depth_in_vevent += 1,
            "END" if depth_in_vevent > 1 => depth_in_vevent -= 1,
            "END" if line.ends_with("VEVENT") => depth_in_vevent = 0,
            "DESCRIPTION" if depth_in_vevent == 1 => {
                existing_description = property_value(line).map(unescape_text);
            }
            _ => {}
        }
    }

    let new_description = match existing_description {
        Some(existing) => format!("{existing}\n\n{share_info}"),
        None => share_info.to_string(),
    };

    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 2);
    let mut patched = false;
    let mut depth_in_vevent = 0i32;
    for line in &lines {
        match property_name(line) {
            "BEGIN" if line.ends_with("VEVENT") => depth_in_vevent = 1,
            "BEGIN" if depth_in_vevent >= 1 => depth_in_vevent += 1,
            "END" if depth_in_vevent > 1 => depth_in_vevent -= 1,
            "END" if depth_in_vevent == 1 && line.ends_with("VEVENT") => {
                out.push(format!("DESCRIPTION:{}", escape_text(&new_description)));
                out.push(format!("LOCATION:{}", escape_text(location)));
                patched = true;
                depth_in_vevent = 0;
            }
            // The old values get replaced wholesale
            "DESCRIPTION" | "LOCATION" if depth_in_vevent == 1 => continue,
            _ => {}
        }
        out.push((*line).to_string());
    }

    if !patched {
        return Err(CalendarError::IcsParse(
            "Resource carries no VEVENT to update".to_string(),
        ));
    }

    Ok(out.join("\r\n") + "\r\n")
}

/// The property name of an unfolded content line ("DESCRIPTION;ALTREP=..."
/// and "DESCRIPTION:" both yield "DESCRIPTION").
fn property_name(line: &str) -> &str {
    let end = line
        .find([':', ';'])
        .unwrap_or(line.len());
    &line[..end]
}

/// The raw value of an unfolded content line (after the first ':').
fn property_value(line: &str) -> Option<&str> {
    line.split_once(':').map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MEETING_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:standup-42@dav.example.com\r\n\
SUMMARY:Daily standup\r\n\
DTSTART:20250320T150000Z\r\n\
DTEND:20250320T151500Z\r\n\
DESCRIPTION:Join at https://meet.example/room123 now\r\n\
LOCATION:Room 4\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test]
    fn test_parse_entry_normalizes_fields() {
        let entry = parse_entry(MEETING_ICS, "/lena/calendars/work/").expect("Should parse");

        assert_eq!(entry.id, "standup-42@dav.example.com");
        assert_eq!(entry.calendar_id, "/lena/calendars/work/");
        assert_eq!(entry.title, "Daily standup");
        assert_eq!(
            entry.start,
            Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap()
        );
        assert_eq!(
            entry.end,
            Utc.with_ymd_and_hms(2025, 3, 20, 15, 15, 0).unwrap()
        );
        assert_eq!(entry.location.as_deref(), Some("Room 4"));
        assert_eq!(entry.url.as_deref(), Some("https://meet.example/room123"));
    }

    #[test]
    fn test_parse_entry_prefers_url_property() {
        let ics = MEETING_ICS.replace(
            "LOCATION:Room 4\r\n",
            "LOCATION:Room 4\r\nURL:https://meet.example/explicit\r\n",
        );

        let entry = parse_entry(&ics, "cal").expect("Should parse");
        assert_eq!(entry.url.as_deref(), Some("https://meet.example/explicit"));
    }

    #[test]
    fn test_parse_entry_requires_uid() {
        let ics = MEETING_ICS.replace("UID:standup-42@dav.example.com\r\n", "");
        assert!(parse_entry(&ics, "cal").is_none());
    }

    #[test]
    fn test_parse_entry_all_day_date() {
        let ics = MEETING_ICS
            .replace(
                "DTSTART:20250320T150000Z",
                "DTSTART;VALUE=DATE:20250320",
            )
            .replace("DTEND:20250320T151500Z", "DTEND;VALUE=DATE:20250321");

        let entry = parse_entry(&ics, "cal").expect("Should parse");
        assert_eq!(
            entry.start,
            Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unescape_text_handles_newlines_and_commas() {
        assert_eq!(unescape_text("line1\\nline2\\, done"), "line1\nline2, done");
    }

    #[test]
    fn test_patch_appends_share_info_to_description() {
        let patched = patch_event_ics(
            MEETING_ICS,
            "https://huddle.example/room42",
            "Click the following link to join the meeting:\nhttps://huddle.example/room42",
        )
        .expect("Should patch");

        // One DESCRIPTION, carrying old text plus the share info
        let descriptions: Vec<&str> = patched
            .lines()
            .filter(|l| l.starts_with("DESCRIPTION:"))
            .collect();
        assert_eq!(descriptions.len(), 1);
        assert!(descriptions[0].contains("Join at https://meet.example/room123 now"));
        assert!(descriptions[0].contains("Click the following link"));

        assert!(patched.contains("LOCATION:https://huddle.example/room42"));
        // Everything else survives
        assert!(patched.contains("SUMMARY:Daily standup"));
        assert!(patched.contains("DTSTART:20250320T150000Z"));
    }

    #[test]
    fn test_patch_sets_description_when_event_has_none() {
        let ics = MEETING_ICS.replace(
            "DESCRIPTION:Join at https://meet.example/room123 now\r\n",
            "",
        );

        let patched =
            patch_event_ics(&ics, "https://huddle.example/room42", "Share info").expect("Should patch");
        assert!(patched.contains("DESCRIPTION:Share info"));
    }

    #[test]
    fn test_patch_leaves_valarm_description_alone() {
        let ics = MEETING_ICS.replace(
            "END:VEVENT\r\n",
            "BEGIN:VALARM\r\nACTION:DISPLAY\r\nDESCRIPTION:Reminder\r\nTRIGGER:-PT10M\r\nEND:VALARM\r\nEND:VEVENT\r\n",
        );

        let patched = patch_event_ics(&ics, "loc", "Share info").expect("Should patch");
        assert!(
            patched.contains("DESCRIPTION:Reminder"),
            "The alarm's own DESCRIPTION must survive"
        );
    }

    #[test]
    fn test_patch_rejects_resource_without_vevent() {
        let err = patch_event_ics("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n", "loc", "info")
            .expect_err("Should fail");
        assert!(matches!(err, CalendarError::IcsParse(_)));
    }
}
