use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::models::{BadgeScoreError, Result, Role, Thresholds};
use crate::scoring::presets;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub scoring: ScoringSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoringSettings {
    /// Role name -> metric name -> replacement breakpoints. Keys arrive
    /// lowercased from files and the environment.
    #[serde(default, deserialize_with = "deserialize_overrides")]
    pub overrides: HashMap<String, HashMap<String, Vec<f64>>>,
}

/// Breakpoints as they show up across sources: a TOML array, a single
/// number, or an env string such as `5,10,20` or `[5.0]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawThresholds {
    Number(f64),
    Text(String),
    List(Vec<RawThresholds>),
}

impl RawThresholds {
    fn flatten_into(self, out: &mut Vec<f64>) -> std::result::Result<(), String> {
        match self {
            RawThresholds::Number(v) => out.push(v),
            RawThresholds::Text(text) => {
                let trimmed = text.trim().trim_start_matches('[').trim_end_matches(']');
                for part in trimmed.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let value = part
                        .parse()
                        .map_err(|_| format!("invalid threshold value: {}", part))?;
                    out.push(value);
                }
            }
            RawThresholds::List(items) => {
                for item in items {
                    item.flatten_into(out)?;
                }
            }
        }
        Ok(())
    }
}

fn deserialize_overrides<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, HashMap<String, Vec<f64>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: HashMap<String, HashMap<String, RawThresholds>> = HashMap::deserialize(deserializer)?;
    let mut overrides = HashMap::with_capacity(raw.len());
    for (role, metrics) in raw {
        let mut parsed = HashMap::with_capacity(metrics.len());
        for (metric, value) in metrics {
            let mut values = Vec::new();
            value.flatten_into(&mut values).map_err(serde::de::Error::custom)?;
            parsed.insert(metric, values);
        }
        overrides.insert(role, parsed);
    }
    Ok(overrides)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    pub store_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Badge Scorer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
                environment: Environment::Development,
            },
            scoring: ScoringSettings::default(),
            session: SessionSettings {
                store_path: PathBuf::from(".badge-scorer/session.json"),
            },
        }
    }
}

impl Settings {
    pub fn new() -> std::result::Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::environment_source())
            .build()?;

        s.try_deserialize()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        s.try_deserialize()
    }

    /// `BADGE_SCORER__SCORING__OVERRIDES__HANDYMAN__SERVICESRENDERED=5,10,20`
    /// style variables, with every preset metric parsed as a list.
    fn environment_source() -> config::Environment {
        let mut env = config::Environment::with_prefix("BADGE_SCORER")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",");
        for role in Role::ALL.into_iter().filter(Role::has_badge) {
            for metric in presets::metric_names(role) {
                let key = format!("scoring.overrides.{}.{}", role, metric).to_lowercase();
                env = env.with_list_parse_key(&key);
            }
        }
        env
    }

    /// Configured breakpoint overrides for `role`, keyed by metric name.
    pub fn overrides_for(&self, role: Role) -> Option<&HashMap<String, Vec<f64>>> {
        self.scoring
            .overrides
            .iter()
            .filter(|(name, _)| Role::parse(name) == Some(role))
            .min_by(|a, b| a.0.cmp(b.0))
            .map(|(_, overrides)| overrides)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen_roles: HashMap<Role, &str> = HashMap::new();

        for (role_name, overrides) in &self.scoring.overrides {
            let role = Role::parse(role_name).ok_or_else(|| {
                BadgeScoreError::ConfigError(format!("unknown role in scoring overrides: {}", role_name))
            })?;
            if !role.has_badge() {
                return Err(BadgeScoreError::ConfigError(format!(
                    "role {} does not earn badges",
                    role
                )));
            }
            if let Some(previous) = seen_roles.insert(role, role_name) {
                return Err(BadgeScoreError::ConfigError(format!(
                    "scoring overrides for {} given twice ({} and {})",
                    role, previous, role_name
                )));
            }

            let known = presets::metric_names(role);
            let mut seen_metrics: Vec<&str> = Vec::new();
            for (metric, values) in overrides {
                let name = known
                    .iter()
                    .find(|m| m.eq_ignore_ascii_case(metric))
                    .ok_or_else(|| {
                        BadgeScoreError::ConfigError(format!("unknown {} metric in overrides: {}", role, metric))
                    })?;
                if seen_metrics.contains(name) {
                    return Err(BadgeScoreError::ConfigError(format!(
                        "{} overrides list {} twice",
                        role, name
                    )));
                }
                seen_metrics.push(*name);

                Thresholds::new(name, values.clone()).map_err(|e| {
                    BadgeScoreError::ConfigError(format!("{} overrides: {}", role, e))
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.overrides_for(Role::Handyman).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_overrides() {
        let mut settings = Settings::default();
        settings
            .scoring
            .overrides
            .insert("handyman".into(), HashMap::from([("servicesRendered".into(), vec![100.0, 20.0])]));
        assert!(matches!(settings.validate(), Err(BadgeScoreError::ConfigError(_))));

        let mut settings = Settings::default();
        settings.scoring.overrides.insert("tenant".into(), HashMap::new());
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.scoring.overrides.insert("plumber".into(), HashMap::new());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_overrides_for_accepts_role_aliases() {
        let mut settings = Settings::default();
        settings
            .scoring
            .overrides
            .insert("home-runner".into(), HashMap::from([("viewingsHosted".into(), vec![5.0])]));
        assert!(settings.overrides_for(Role::Homerunner).is_some());
        assert!(settings.overrides_for(Role::Handyman).is_none());
    }

    #[test]
    fn test_validate_checks_metric_names_against_presets() {
        let mut settings = Settings::default();
        settings
            .scoring
            .overrides
            .insert("handyman".into(), HashMap::from([("servicesrendered".into(), vec![5.0, 10.0])]));
        assert!(settings.validate().is_ok());

        let mut settings = Settings::default();
        settings
            .scoring
            .overrides
            .insert("handyman".into(), HashMap::from([("viewingsHosted".into(), vec![5.0])]));
        assert!(matches!(settings.validate(), Err(BadgeScoreError::ConfigError(msg)) if msg.contains("viewingsHosted")));

        let mut settings = Settings::default();
        settings.scoring.overrides.insert(
            "handyman".into(),
            HashMap::from([
                ("servicesRendered".into(), vec![5.0]),
                ("servicesrendered".into(), vec![6.0]),
            ]),
        );
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_role_given_twice() {
        let mut settings = Settings::default();
        settings
            .scoring
            .overrides
            .insert("homerunner".into(), HashMap::from([("viewingsHosted".into(), vec![5.0])]));
        settings
            .scoring
            .overrides
            .insert("home-runner".into(), HashMap::from([("viewingsHosted".into(), vec![9.0])]));
        assert!(matches!(settings.validate(), Err(BadgeScoreError::ConfigError(msg)) if msg.contains("twice")));
    }

    #[test]
    fn test_from_file_keeps_overrides() {
        let dir = std::env::temp_dir().join(format!("badge-scorer-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("overrides.toml");
        std::fs::write(
            &path,
            "[scoring.overrides.handyman]\nservicesRendered = [5.0, 10.0, 20.0]\naverageRating = 4\ncompanyRevenueNgn = \"100000, 200000\"\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert!(settings.validate().is_ok());

        let overrides = settings.overrides_for(Role::Handyman).unwrap();
        let mut values: Vec<Vec<f64>> = overrides.values().cloned().collect();
        values.sort_by_key(|v| v.len());
        assert_eq!(values, vec![vec![4.0], vec![100_000.0, 200_000.0], vec![5.0, 10.0, 20.0]]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
