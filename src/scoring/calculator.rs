use crate::{
    models::{BadgeResult, BadgeScoreError, MetricSet, Result, Role},
    scoring::BadgeScheme,
    config::Settings,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A badge result stamped with who it belongs to and when it was computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeReport {
    pub participant_id: String,
    pub role: Role,
    pub badge: BadgeResult,
    pub calculated_at: DateTime<Utc>,
}

pub struct BadgeCalculator {
    settings: Settings,
}

impl BadgeCalculator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The role's built-in scheme with configured overrides applied.
    pub fn scheme_for(&self, role: Role) -> Result<BadgeScheme> {
        let mut scheme = BadgeScheme::for_role(role)?;

        if let Some(overrides) = self.settings.overrides_for(role) {
            for (metric, values) in overrides {
                scheme
                    .override_thresholds(metric, values.clone())
                    .map_err(|e| match e {
                        BadgeScoreError::UnknownMetric(m) => BadgeScoreError::ConfigError(format!(
                            "override for unknown {} metric: {}",
                            role, m
                        )),
                        other => other,
                    })?;
                info!("Using configured thresholds for {}.{}: {:?}", role, metric, values);
            }
        }

        Ok(scheme)
    }

    pub fn calculate(&self, role: Role, metrics: &MetricSet) -> Result<BadgeResult> {
        let scheme = self.scheme_for(role)?;
        let result = scheme.calculate(metrics)?;

        info!(
            "{} badge: {} ({}/{} points)",
            role, result.label, result.score, result.total_possible
        );
        if let Some(needed) = result.points_to_next_tier() {
            info!("{} more points to reach the next tier", needed);
        }

        Ok(result)
    }

    pub fn report(&self, participant_id: &str, role: Role, metrics: &MetricSet) -> Result<BadgeReport> {
        info!("Calculating {} badge for participant: {}", role, participant_id);

        let badge = match self.calculate(role, metrics) {
            Ok(badge) => badge,
            Err(e) => {
                warn!("Failed to calculate badge for {}: {}", participant_id, e);
                return Err(e);
            }
        };

        Ok(BadgeReport {
            participant_id: participant_id.to_string(),
            role,
            badge,
            calculated_at: Utc::now(),
        })
    }

    pub fn calculate_batch(&self, role: Role, participants: &[(String, MetricSet)]) -> Vec<Result<BadgeReport>> {
        info!("Calculating {} badges for {} participants", role, participants.len());

        participants
            .iter()
            .map(|(id, metrics)| self.report(id, role, metrics))
            .collect()
    }
}
