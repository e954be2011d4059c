use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{BadgeScoreError, Result};

/// Current values for a participant, keyed by metric name.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct MetricSet {
    values: BTreeMap<String, f64>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Parses `name=value` entries. A later entry for the same name wins.
    pub fn from_pairs<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let mut set = Self::new();
        for entry in entries {
            let entry = entry.as_ref();
            let (name, raw) = entry
                .split_once('=')
                .ok_or_else(|| BadgeScoreError::InvalidMetricEntry(entry.to_string()))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(BadgeScoreError::InvalidMetricEntry(entry.to_string()));
            }
            let value: f64 = raw
                .trim()
                .replace('_', "")
                .parse()
                .map_err(|_| BadgeScoreError::InvalidMetricEntry(entry.to_string()))?;
            set.insert(name, value);
        }
        Ok(set)
    }

    /// Folds `other` over `self`; values in `other` win.
    pub fn merge(&mut self, other: &MetricSet) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), *value);
        }
    }
}

/// Breakpoints for one metric, strictly ascending and finite.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Thresholds(Vec<f64>);

impl Thresholds {
    pub fn new(metric: &str, values: Vec<f64>) -> Result<Self> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(BadgeScoreError::NonFiniteThreshold {
                metric: metric.to_string(),
            });
        }
        if values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(BadgeScoreError::UnsortedThresholds {
                metric: metric.to_string(),
            });
        }
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest breakpoint, the value at which the metric is maxed out.
    pub fn ceiling(&self) -> Option<f64> {
        self.0.last().copied()
    }
}

/// One metric a badge scheme scores, with its breakpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricTarget {
    pub metric: String,
    pub label: String,
    pub unit: Option<String>,
    pub thresholds: Thresholds,
}

impl MetricTarget {
    pub fn new(metric: &str, label: &str, values: Vec<f64>) -> Result<Self> {
        Ok(Self {
            metric: metric.to_string(),
            label: label.to_string(),
            unit: None,
            thresholds: Thresholds::new(metric, values)?,
        })
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandymanMetrics {
    pub services_rendered: u32,
    pub company_revenue_ngn: f64,
    pub average_rating: f64,
}

impl From<HandymanMetrics> for MetricSet {
    fn from(m: HandymanMetrics) -> Self {
        MetricSet::new()
            .with("servicesRendered", m.services_rendered as f64)
            .with("companyRevenueNgn", m.company_revenue_ngn)
            .with("averageRating", m.average_rating)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomerunnerMetrics {
    pub viewings_hosted: u32,
    pub inspections_completed: u32,
    /// Percentage of viewings that turned into a signed lease or sale.
    pub conversion_rate: f64,
    pub average_rating: f64,
}

impl From<HomerunnerMetrics> for MetricSet {
    fn from(m: HomerunnerMetrics) -> Self {
        MetricSet::new()
            .with("viewingsHosted", m.viewings_hosted as f64)
            .with("inspectionsCompleted", m.inspections_completed as f64)
            .with("conversionRate", m.conversion_rate)
            .with("averageRating", m.average_rating)
    }
}
