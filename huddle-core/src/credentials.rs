//! CalDAV account credentials.
//!
//! Credentials deliberately stay out of the application store; they live
//! here and in the provider's session only. The store never sees the
//! password.

use serde::{Deserialize, Serialize};

/// Server URL + username + password for HTTP basic auth.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credentials {
            server_url: server_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// All three fields present. Sign-in refuses to build a client
    /// otherwise.
    pub fn is_complete(&self) -> bool {
        !self.server_url.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

// The password must never reach logs or debug dumps.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_complete_requires_all_fields() {
        let full = Credentials::new("https://dav.example.com", "lena", "hunter2");
        assert!(full.is_complete());

        for missing in [
            Credentials::new("", "lena", "hunter2"),
            Credentials::new("https://dav.example.com", "", "hunter2"),
            Credentials::new("https://dav.example.com", "lena", ""),
        ] {
            assert!(!missing.is_complete());
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("https://dav.example.com", "lena", "hunter2");
        let dump = format!("{creds:?}");
        assert!(!dump.contains("hunter2"));
        assert!(dump.contains("<redacted>"));
    }
}
