pub mod guard;
pub mod store;

pub use guard::RoleGuard;
pub use store::SessionStore;

use crate::models::{BadgeScoreError, Result, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user and the persona they are currently acting as.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub roles: Vec<Role>,
    pub active_role: Role,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session acting as the first of `roles`.
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Result<Self> {
        let active_role = *roles.first().ok_or(BadgeScoreError::NotSignedIn)?;
        Ok(Self {
            user_id: user_id.into(),
            roles,
            active_role,
            signed_in_at: Utc::now(),
        })
    }

    pub fn holds(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn switch_role(&mut self, role: Role) -> Result<()> {
        if !self.holds(role) {
            return Err(BadgeScoreError::RoleNotHeld(role));
        }
        self.active_role = role;
        Ok(())
    }
}
