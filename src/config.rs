use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for the initial community generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Seed for the random generator; drawn from the OS when absent.
    pub seed: Option<u64>,
    /// Number of seeded attempts before generation gives up.
    pub max_attempts: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self { Self { seed: None, max_attempts: 8 } }
}

impl GenerateConfig {
    /// Deterministic configuration with the given seed.
    pub fn seeded(seed: u64) -> Self { Self { seed: Some(seed), ..Self::default() } }
}

/// Per-objective thresholds beyond which a community is refined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Largest acceptable standard deviation of precinct partisan ratios.
    pub partisan: f64,
    /// Smallest acceptable Schwartzberg score.
    pub compactness: f64,
    /// Largest acceptable population deviation, as a fraction of the target.
    pub population: f64,
}

impl Default for Tolerances {
    fn default() -> Self { Self { partisan: 0.05, compactness: 0.5, population: 0.05 } }
}

/// Settings for the refinement driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    pub tolerances: Tolerances,
    /// Times a single community may be selected as worst within one objective pass.
    pub max_iterations: usize,
    /// Stop once fewer than this fraction of precincts change in a full pass.
    pub changed_precinct_tolerance: f64,
    /// Ceiling on full passes.
    pub max_passes: usize,
    /// Wall-clock budget in seconds.
    pub time_budget_secs: Option<f64>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            max_iterations: 5,
            changed_precinct_tolerance: 0.10,
            max_passes: 20,
            time_budget_secs: None,
        }
    }
}

impl RefineConfig {
    /// Parse refinement settings alone from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse refinement configuration")
    }

    #[inline]
    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_secs.filter(|s| s.is_finite() && *s >= 0.0).map(Duration::from_secs_f64)
    }
}

/// Combined run configuration, as stored in a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generate: GenerateConfig,
    pub refine: RefineConfig,
}

impl Config {
    /// Parse a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse configuration")
    }

    /// Read a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_refinement_constants() {
        let config = RefineConfig::default();
        assert_eq!(config.max_iterations, 5);
        assert_eq!(config.changed_precinct_tolerance, 0.10);
        assert!(config.time_budget().is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = Config::from_json(r#"{ "generate": { "seed": 7 }, "refine": { "tolerances": { "population": 0.01 } } }"#).unwrap();
        assert_eq!(config.generate.seed, Some(7));
        assert_eq!(config.generate.max_attempts, 8);
        assert_eq!(config.refine.tolerances.population, 0.01);
        assert_eq!(config.refine.tolerances.compactness, Tolerances::default().compactness);
        assert_eq!(config.refine.max_passes, 20);
    }

    #[test]
    fn refine_config_parses_on_its_own() {
        let config = RefineConfig::from_json(r#"{ "max_passes": 2, "time_budget_secs": 0.5 }"#).unwrap();
        assert_eq!(config.max_passes, 2);
        assert_eq!(config.time_budget(), Some(Duration::from_millis(500)));
        assert_eq!(config.tolerances, Tolerances::default());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn time_budget_converts_seconds() {
        let config = RefineConfig { time_budget_secs: Some(1.5), ..RefineConfig::default() };
        assert_eq!(config.time_budget(), Some(Duration::from_millis(1500)));
    }
}
