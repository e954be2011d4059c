use thiserror::Error;

use super::Role;

#[derive(Error, Debug)]
pub enum BadgeScoreError {
    #[error("Tier catalog is empty")]
    EmptyTierCatalog,

    #[error("Tier catalog has no tier with a minimum score of 0")]
    MissingBaseTier,

    #[error("Duplicate tier id: {0}")]
    DuplicateTier(String),

    #[error("More than one tier has minimum score {0}")]
    DuplicateTierFloor(u32),

    #[error("Thresholds for {metric} must be strictly ascending")]
    UnsortedThresholds { metric: String },

    #[error("Thresholds for {metric} contain a non-finite value")]
    NonFiniteThreshold { metric: String },

    #[error("Duplicate metric target: {0}")]
    DuplicateMetric(String),

    #[error("Missing value for metric: {0}")]
    MissingMetric(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Metric {metric} has a non-finite value")]
    NonFiniteMetric { metric: String },

    #[error("Invalid metric entry '{0}', expected name=value")]
    InvalidMetricEntry(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Role {} has no badge scheme", .0.as_str())]
    NoBadgeScheme(Role),

    #[error("Role {} is not held by this user", .0.as_str())]
    RoleNotHeld(Role),

    #[error("Role {} is not allowed here", .role.as_str())]
    AccessDenied { role: Role },

    #[error("No active session")]
    NotSignedIn,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BadgeScoreError>;
