use crate::models::{BadgeScoreError, Result, Role};
use super::Session;
use std::collections::HashSet;
use tracing::warn;

/// Allows a fixed set of roles through.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: HashSet<Role>,
}

impl RoleGuard {
    pub fn new<I: IntoIterator<Item = Role>>(allowed: I) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Returns the session's active role if it may pass.
    pub fn check(&self, session: Option<&Session>) -> Result<Role> {
        let session = session.ok_or(BadgeScoreError::NotSignedIn)?;
        let role = session.active_role;
        if !self.allows(role) {
            warn!("User {} denied access as {}", session.user_id, role);
            return Err(BadgeScoreError::AccessDenied { role });
        }
        Ok(role)
    }
}
