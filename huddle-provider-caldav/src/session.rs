//! Credential storage for CalDAV sign-in.
//!
//! Stores server URL + username + password at:
//!   ~/.config/huddle/providers/caldav/session.toml
//!
//! The session file is the only place credentials are persisted; they
//! never enter the application store.

use anyhow::{Context, Result};
use huddle_core::Credentials;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("huddle")
        .join("providers")
        .join("caldav"))
}

/// A saved CalDAV session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    credentials: Credentials,
}

impl Session {
    fn path() -> Result<PathBuf> {
        Ok(base_dir()?.join("session.toml"))
    }

    pub fn from_credentials(credentials: Credentials) -> Self {
        Session { credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Load the saved session, if any.
    pub fn load() -> Result<Option<Self>> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read CalDAV session from {}", path.display()))?;

        let session: Session = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse CalDAV session from {}", path.display()))?;

        Ok(Some(session))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(&self).context("Failed to serialize session")?;

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains credentials
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }
}
