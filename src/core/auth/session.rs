//! Session storage: the signed-in Supabase session lives in `session.json` in the
//! config directory, with restrictive permissions (0o600 on Unix).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::core::paths;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds.
    pub expires_at: i64,
    pub user: SessionUser,
}

impl Session {
    /// True when the access token expires within `margin_secs` of `now`.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at - now <= margin_secs
    }

    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or("(no email)")
    }
}

/// Path to the session file in the config directory.
pub fn session_path() -> Option<PathBuf> {
    paths::config_dir().map(|d| d.join("session.json"))
}

/// Load the stored session. `None` if absent or unreadable.
pub fn load_session() -> Option<Session> {
    load_session_from(&session_path()?)
}

pub(super) fn load_session_from(path: &Path) -> Option<Session> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            None
        }
    }
}

/// Store the session, creating the config dir if needed.
pub fn store_session(session: &Session) -> Result<(), AuthError> {
    let path = session_path().ok_or(AuthError::NoConfigDir)?;
    store_session_at(&path, session)
}

pub(super) fn store_session_at(path: &Path, session: &Session) -> Result<(), AuthError> {
    let dir = path.parent().ok_or_else(|| {
        AuthError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Invalid session path",
        ))
    })?;
    fs::create_dir_all(dir)?;

    let mut file = fs::File::create(path)?;
    #[cfg(unix)]
    {
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    file.write_all(serde_json::to_string_pretty(session)?.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Remove the stored session. A missing file is not an error.
pub fn clear_session() -> Result<(), AuthError> {
    let path = session_path().ok_or(AuthError::NoConfigDir)?;
    clear_session_at(&path)
}

pub(super) fn clear_session_at(path: &Path) -> Result<(), AuthError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
