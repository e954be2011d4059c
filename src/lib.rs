pub mod models;
pub mod config;
pub mod scoring;
pub mod session;

pub use models::{
    BadgeResult, BadgeScoreError, MetricSet, MetricTarget, ProgressEntry, Result, Role, Thresholds,
    Tier, TierCatalog,
};
pub use config::Settings;

// Re-export commonly used types
pub use scoring::{calculate_badge, BadgeCalculator, BadgeReport, BadgeScheme};
