use crate::models::{BadgeScoreError, Result, Role};
use super::{RoleGuard, Session};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JSON file holding the current session. No file means signed out.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn hydrate(&self) -> Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let session: Session = serde_json::from_str(&raw)?;
        if !session.holds(session.active_role) {
            return Err(BadgeScoreError::RoleNotHeld(session.active_role));
        }
        Ok(Some(session))
    }

    pub fn persist(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        info!("Saved session for {} as {}", session.user_id, session.active_role);
        Ok(())
    }

    /// Runs `guard` against the stored session.
    pub fn authorize(&self, guard: &RoleGuard) -> Result<Role> {
        let session = self.hydrate()?;
        guard.check(session.as_ref())
    }

    pub fn logout(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
