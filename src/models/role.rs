use serde::{Deserialize, Serialize};

/// Marketplace personas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Tenant,
    Landlord,
    Handyman,
    Realtor,
    HotelManager,
    Homerunner,
    Admin,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Tenant,
        Role::Landlord,
        Role::Handyman,
        Role::Realtor,
        Role::HotelManager,
        Role::Homerunner,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Landlord => "landlord",
            Role::Handyman => "handyman",
            Role::Realtor => "realtor",
            Role::HotelManager => "hotel-manager",
            Role::Homerunner => "homerunner",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tenant" => Some(Role::Tenant),
            "landlord" => Some(Role::Landlord),
            "handyman" | "artisan" => Some(Role::Handyman),
            "realtor" | "agent" => Some(Role::Realtor),
            "hotel-manager" | "hotel_manager" | "hotelmanager" => Some(Role::HotelManager),
            "homerunner" | "home-runner" => Some(Role::Homerunner),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Parses a comma separated role list such as `tenant,landlord`.
    pub fn parse_list(s: &str) -> super::Result<Vec<Self>> {
        let mut roles = Vec::new();
        for part in s.split(',').filter(|p| !p.trim().is_empty()) {
            let role = Role::parse(part)
                .ok_or_else(|| super::BadgeScoreError::UnknownRole(part.trim().to_string()))?;
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        Ok(roles)
    }

    /// Roles that earn performance badges.
    pub fn has_badge(&self) -> bool {
        matches!(self, Role::Handyman | Role::Homerunner)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
