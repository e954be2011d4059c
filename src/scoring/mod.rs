pub mod algorithm;
pub mod presets;
pub mod calculator;

pub use algorithm::{calculate_badge, count_points, next_threshold, pick_tier, BadgeScheme};
pub use calculator::{BadgeCalculator, BadgeReport};
