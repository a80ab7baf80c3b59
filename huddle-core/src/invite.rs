//! Invite text generation.

/// The share-info blurb appended to an event description when a meeting
/// link is written into it.
pub fn share_info_text(location: &str) -> String {
    format!("Click the following link to join the meeting:\n{location}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_info_text_embeds_location() {
        let text = share_info_text("https://huddle.example/room42");
        assert!(text.ends_with("https://huddle.example/room42"));
    }
}
