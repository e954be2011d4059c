use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{BadgeScoreError, Result};

/// A named performance bracket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub id: String,
    pub label: String,
    pub min_score: u32,
    /// Presentation class used by the front end to style the badge.
    pub class: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

impl Tier {
    pub fn new(id: &str, label: &str, min_score: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            min_score,
            class: format!("badge-{}", id),
            description: String::new(),
            requirements: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = class.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_requirements(mut self, requirements: &[&str]) -> Self {
        self.requirements = requirements.iter().map(|r| r.to_string()).collect();
        self
    }
}

/// Tiers ordered by ascending `min_score`, always holding a zero-floor tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<Tier>", into = "Vec<Tier>")]
pub struct TierCatalog {
    tiers: Vec<Tier>,
}

impl TierCatalog {
    pub fn new(mut tiers: Vec<Tier>) -> Result<Self> {
        if tiers.is_empty() {
            return Err(BadgeScoreError::EmptyTierCatalog);
        }

        let mut ids = HashSet::new();
        for tier in &tiers {
            if !ids.insert(tier.id.as_str()) {
                return Err(BadgeScoreError::DuplicateTier(tier.id.clone()));
            }
        }

        tiers.sort_by_key(|t| t.min_score);
        if let Some(w) = tiers.windows(2).find(|w| w[0].min_score == w[1].min_score) {
            return Err(BadgeScoreError::DuplicateTierFloor(w[0].min_score));
        }
        if tiers[0].min_score != 0 {
            return Err(BadgeScoreError::MissingBaseTier);
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn base(&self) -> &Tier {
        &self.tiers[0]
    }

    pub fn highest(&self) -> &Tier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// The highest tier whose floor is at or below `score`.
    pub fn tier_for(&self, score: u32) -> &Tier {
        self.tiers
            .iter()
            .rev()
            .find(|t| t.min_score <= score)
            .unwrap_or_else(|| self.base())
    }

    /// The lowest tier whose floor is strictly above `tier`'s floor.
    pub fn next_after(&self, tier: &Tier) -> Option<&Tier> {
        self.tiers.iter().find(|t| t.min_score > tier.min_score)
    }
}

impl TryFrom<Vec<Tier>> for TierCatalog {
    type Error = BadgeScoreError;

    fn try_from(tiers: Vec<Tier>) -> Result<Self> {
        TierCatalog::new(tiers)
    }
}

impl From<TierCatalog> for Vec<Tier> {
    fn from(catalog: TierCatalog) -> Self {
        catalog.tiers
    }
}
