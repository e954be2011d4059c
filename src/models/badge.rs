use serde::{Deserialize, Serialize};

use super::Tier;

/// Outcome of scoring a metric set against a badge scheme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResult {
    pub tier: Tier,
    pub label: String,
    pub class: String,
    pub score: u32,
    pub total_possible: u32,
    pub next_tier: Option<Tier>,
    pub progress: Vec<ProgressEntry>,
}

/// Per-metric display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub metric: String,
    pub label: String,
    pub current: f64,
    /// Next unmet threshold, `None` once every threshold is met.
    pub target: Option<f64>,
    pub met: bool,
    pub points: u32,
    pub max_points: u32,
    pub unit: Option<String>,
}

impl BadgeResult {
    pub fn is_max_tier(&self) -> bool {
        self.next_tier.is_none()
    }

    pub fn points_to_next_tier(&self) -> Option<u32> {
        self.next_tier
            .as_ref()
            .map(|t| t.min_score.saturating_sub(self.score))
    }

    pub fn progress_for(&self, metric: &str) -> Option<&ProgressEntry> {
        self.progress.iter().find(|p| p.metric == metric)
    }
}

impl ProgressEntry {
    /// Distance from the current value to the next threshold.
    pub fn remaining(&self) -> Option<f64> {
        self.target.map(|t| t - self.current)
    }
}
