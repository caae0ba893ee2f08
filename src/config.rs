// src/config.rs

use std::time::Duration;

use crate::error::ConfigError;
use crate::random::SeededRandom;

pub const TICK_MS_VAR: &str = "CLUSTER_TICK_MS";
pub const SEED_VAR: &str = "CLUSTER_SEED";
pub const MAX_TICKS_VAR: &str = "CLUSTER_MAX_TICKS";

/// Wall-clock cadence matching the simulated tick length.
pub const DEFAULT_TICK_MS: u64 = 1500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub tick_interval: Duration,    // wall-clock time between ticks
    pub seed: Option<u64>,          // None => OS entropy
    pub max_ticks: Option<u64>,     // None => run until shutdown
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            seed: None,
            max_ticks: None,
        }
    }
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value lookup. Unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_u64(&lookup, TICK_MS_VAR)? {
            if ms == 0 {
                return Err(ConfigError::Zero { var: TICK_MS_VAR });
            }
            config.tick_interval = Duration::from_millis(ms);
        }

        config.seed = parse_u64(&lookup, SEED_VAR)?;

        if let Some(n) = parse_u64(&lookup, MAX_TICKS_VAR)? {
            if n == 0 {
                return Err(ConfigError::Zero { var: MAX_TICKS_VAR });
            }
            config.max_ticks = Some(n);
        }

        Ok(config)
    }

    pub fn random_source(&self) -> SeededRandom {
        match self.seed {
            Some(seed) => SeededRandom::from_seed(seed),
            None => SeededRandom::from_entropy(),
        }
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { var, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = HostConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.tick_interval, Duration::from_millis(1500));
    }

    #[test]
    fn reads_all_variables() {
        let config = HostConfig::from_lookup(lookup(&[
            (TICK_MS_VAR, "250"),
            (SEED_VAR, " 7 "),
            (MAX_TICKS_VAR, "12"),
        ]))
        .unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_ticks, Some(12));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = HostConfig::from_lookup(lookup(&[(SEED_VAR, "  ")])).unwrap();
        assert_eq!(config.seed, None);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = HostConfig::from_lookup(lookup(&[(TICK_MS_VAR, "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: TICK_MS_VAR, .. }));
        assert!(err.to_string().contains("fast"));

        let err = HostConfig::from_lookup(lookup(&[(SEED_VAR, "-1")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: SEED_VAR, .. }));
    }

    #[test]
    fn rejects_zero_cadence_and_limit() {
        let err = HostConfig::from_lookup(lookup(&[(TICK_MS_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Zero { var: TICK_MS_VAR }));

        let err = HostConfig::from_lookup(lookup(&[(MAX_TICKS_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Zero { var: MAX_TICKS_VAR }));
    }

    #[test]
    fn seeded_config_gives_reproducible_source() {
        let config = HostConfig { seed: Some(99), ..HostConfig::default() };
        let mut a = config.random_source();
        let mut b = config.random_source();
        assert_eq!(a.next_unit(), b.next_unit());
    }
}
