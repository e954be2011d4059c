use crate::models::{
    BadgeResult, BadgeScoreError, MetricSet, MetricTarget, ProgressEntry, Result, Tier, TierCatalog,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Number of thresholds `value` meets or exceeds.
pub fn count_points(value: f64, thresholds: &[f64]) -> u32 {
    thresholds.iter().filter(|t| value >= **t).count() as u32
}

/// First threshold strictly above `value`.
pub fn next_threshold(value: f64, thresholds: &[f64]) -> Option<f64> {
    thresholds.iter().copied().find(|t| *t > value)
}

/// Highest tier whose floor is at or below `score`, `None` if no tier qualifies.
pub fn pick_tier(tiers: &[Tier], score: u32) -> Option<&Tier> {
    let mut sorted: Vec<&Tier> = tiers.iter().collect();
    sorted.sort_by(|a, b| b.min_score.cmp(&a.min_score));
    sorted.into_iter().find(|t| t.min_score <= score)
}

/// Scores `metrics` against `targets` and classifies the total with `catalog`.
///
/// Every targeted metric must be present and finite, and `metrics` may not
/// carry names no target knows about.
pub fn calculate_badge(
    metrics: &MetricSet,
    targets: &[MetricTarget],
    catalog: &TierCatalog,
) -> Result<BadgeResult> {
    check_targets(targets)?;

    if let Some(unknown) = metrics
        .names()
        .find(|name| !targets.iter().any(|t| t.metric == *name))
    {
        return Err(BadgeScoreError::UnknownMetric(unknown.to_string()));
    }

    let mut score = 0;
    let mut total_possible = 0;
    let mut progress = Vec::with_capacity(targets.len());

    for target in targets {
        let current = metrics
            .get(&target.metric)
            .ok_or_else(|| BadgeScoreError::MissingMetric(target.metric.clone()))?;
        if !current.is_finite() {
            return Err(BadgeScoreError::NonFiniteMetric {
                metric: target.metric.clone(),
            });
        }

        let thresholds = target.thresholds.as_slice();
        let points = count_points(current, thresholds);
        let max_points = thresholds.len() as u32;
        debug!("{}: {} -> {}/{} points", target.metric, current, points, max_points);

        score += points;
        total_possible += max_points;
        progress.push(ProgressEntry {
            metric: target.metric.clone(),
            label: target.label.clone(),
            current,
            target: next_threshold(current, thresholds),
            met: points == max_points,
            points,
            max_points,
            unit: target.unit.clone(),
        });
    }

    // A validated catalog always has a zero-floor tier, so this never falls back.
    let tier = pick_tier(catalog.tiers(), score).unwrap_or_else(|| catalog.base());
    let next_tier = catalog.next_after(tier).cloned();

    Ok(BadgeResult {
        label: tier.label.clone(),
        class: tier.class.clone(),
        tier: tier.clone(),
        score,
        total_possible,
        next_tier,
        progress,
    })
}

fn check_targets(targets: &[MetricTarget]) -> Result<()> {
    let mut seen = HashSet::new();
    for target in targets {
        if !seen.insert(target.metric.as_str()) {
            return Err(BadgeScoreError::DuplicateMetric(target.metric.clone()));
        }
    }
    Ok(())
}

/// A role's metric targets together with its tier catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BadgeScheme {
    targets: Vec<MetricTarget>,
    catalog: TierCatalog,
}

impl BadgeScheme {
    pub fn new(targets: Vec<MetricTarget>, catalog: TierCatalog) -> Result<Self> {
        check_targets(&targets)?;
        Ok(Self { targets, catalog })
    }

    pub fn targets(&self) -> &[MetricTarget] {
        &self.targets
    }

    pub fn catalog(&self) -> &TierCatalog {
        &self.catalog
    }

    pub fn total_possible(&self) -> u32 {
        self.targets.iter().map(|t| t.thresholds.len() as u32).sum()
    }

    /// Replaces the breakpoints of `metric`. Names match case-insensitively
    /// since layered config lowercases its keys.
    pub fn override_thresholds(&mut self, metric: &str, values: Vec<f64>) -> Result<()> {
        let target = self
            .targets
            .iter_mut()
            .find(|t| t.metric.eq_ignore_ascii_case(metric))
            .ok_or_else(|| BadgeScoreError::UnknownMetric(metric.to_string()))?;
        target.thresholds = crate::models::Thresholds::new(&target.metric, values)?;
        Ok(())
    }

    pub fn calculate(&self, metrics: &MetricSet) -> Result<BadgeResult> {
        calculate_badge(metrics, &self.targets, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<Tier> {
        vec![
            Tier::new("bronze", "Bronze", 0),
            Tier::new("silver", "Silver", 3),
            Tier::new("gold", "Gold", 6),
            Tier::new("platinum", "Platinum", 8),
        ]
    }

    fn scheme() -> BadgeScheme {
        BadgeScheme::new(
            vec![
                MetricTarget::new("jobs", "Jobs", vec![1.0, 2.0, 3.0]).unwrap(),
                MetricTarget::new("rating", "Rating", vec![4.0, 4.5]).unwrap().with_unit("/5"),
            ],
            TierCatalog::new(tiers()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_count_points_inclusive() {
        let t = [50.0, 150.0, 300.0];
        assert_eq!(count_points(49.0, &t), 0);
        assert_eq!(count_points(50.0, &t), 1);
        assert_eq!(count_points(299.99, &t), 2);
        assert_eq!(count_points(300.0, &t), 3);
        assert_eq!(count_points(1e9, &t), 3);
        assert_eq!(count_points(10.0, &[]), 0);
    }

    #[test]
    fn test_next_threshold() {
        let t = [50.0, 150.0, 300.0];
        assert_eq!(next_threshold(0.0, &t), Some(50.0));
        assert_eq!(next_threshold(50.0, &t), Some(150.0));
        assert_eq!(next_threshold(300.0, &t), None);
        assert_eq!(next_threshold(1.0, &[]), None);
    }

    #[test]
    fn test_pick_tier_unsorted_input() {
        let mut t = tiers();
        t.reverse();
        assert_eq!(pick_tier(&t, 7).map(|t| t.id.as_str()), Some("gold"));
        assert_eq!(pick_tier(&t, 0).map(|t| t.id.as_str()), Some("bronze"));
    }

    #[test]
    fn test_pick_tier_without_floor_is_none() {
        let t = vec![Tier::new("silver", "Silver", 3)];
        assert!(pick_tier(&t, 2).is_none());
        assert!(pick_tier(&[], 2).is_none());
    }

    #[test]
    fn test_calculate_progress_entries() {
        let metrics = MetricSet::new().with("jobs", 3.0).with("rating", 4.2);
        let result = scheme().calculate(&metrics).unwrap();

        assert_eq!(result.score, 4);
        assert_eq!(result.total_possible, 5);
        assert_eq!(result.tier.id, "silver");
        assert_eq!(result.next_tier.as_ref().map(|t| t.id.as_str()), Some("gold"));
        assert_eq!(result.points_to_next_tier(), Some(2));

        let jobs = result.progress_for("jobs").unwrap();
        assert!(jobs.met);
        assert_eq!(jobs.target, None);

        let rating = result.progress_for("rating").unwrap();
        assert!(!rating.met);
        assert_eq!(rating.target, Some(4.5));
        assert_eq!(rating.unit.as_deref(), Some("/5"));
        assert!((rating.remaining().unwrap() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_tier_matches_pick_tier() {
        let s = scheme();
        for jobs in [0.0, 1.0, 2.0, 3.0] {
            let metrics = MetricSet::new().with("jobs", jobs).with("rating", 4.6);
            let result = s.calculate(&metrics).unwrap();
            assert_eq!(pick_tier(s.catalog().tiers(), result.score), Some(&result.tier));
            assert_eq!(s.catalog().tier_for(result.score), &result.tier);
        }
    }

    #[test]
    fn test_calculate_rejects_bad_metric_sets() {
        let s = scheme();
        assert!(matches!(
            s.calculate(&MetricSet::new().with("jobs", 1.0)),
            Err(BadgeScoreError::MissingMetric(m)) if m == "rating"
        ));
        assert!(matches!(
            s.calculate(&MetricSet::new().with("jobs", 1.0).with("rating", 4.0).with("tips", 2.0)),
            Err(BadgeScoreError::UnknownMetric(m)) if m == "tips"
        ));
        assert!(matches!(
            s.calculate(&MetricSet::new().with("jobs", f64::NAN).with("rating", 4.0)),
            Err(BadgeScoreError::NonFiniteMetric { .. })
        ));
    }

    #[test]
    fn test_scheme_rejects_duplicate_targets() {
        let err = BadgeScheme::new(
            vec![
                MetricTarget::new("jobs", "Jobs", vec![1.0]).unwrap(),
                MetricTarget::new("jobs", "Jobs again", vec![2.0]).unwrap(),
            ],
            TierCatalog::new(tiers()).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, BadgeScoreError::DuplicateMetric(m) if m == "jobs"));
    }

    #[test]
    fn test_empty_targets_score_zero() {
        let s = BadgeScheme::new(vec![], TierCatalog::new(tiers()).unwrap()).unwrap();
        let result = s.calculate(&MetricSet::new()).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.total_possible, 0);
        assert_eq!(result.tier.id, "bronze");
    }

    #[test]
    fn test_override_thresholds() {
        let mut s = scheme();
        s.override_thresholds("jobs", vec![10.0]).unwrap();
        assert_eq!(s.total_possible(), 3);
        assert!(s.override_thresholds("jobs", vec![5.0, 1.0]).is_err());

        s.override_thresholds("RATING", vec![3.0]).unwrap();
        assert_eq!(s.targets()[1].metric, "rating");
        assert_eq!(s.targets()[1].thresholds.as_slice(), &[3.0]);
        assert!(matches!(
            s.override_thresholds("tips", vec![1.0]),
            Err(BadgeScoreError::UnknownMetric(_))
        ));
    }
}
