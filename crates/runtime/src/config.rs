// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration: `{numberOfUsers, rampUpTime, testDuration,
//! connectionPoolSize, metricsInterval, workerMode, poolSizeOverrides}`
//! (§4.5), validated synchronously at construction so the engine never
//! starts with a bad configuration (§7).

use loadgen_pool::WorkerMode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// TOML-shaped configuration, durations expressed in whole seconds for
/// readability in config files; converted to [`RuntimeConfig`] via
/// [`TryFrom`], which is where validation happens.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TomlConfig {
    pub number_of_users: i64,
    pub ramp_up_secs: u64,
    pub test_duration_secs: u64,
    pub connection_pool_size: i64,
    #[serde(default = "default_metrics_interval_secs")]
    pub metrics_interval_secs: u64,
    #[serde(default)]
    pub worker_mode: Option<WorkerMode>,
    /// Per-action override of `connectionPoolSize`, keyed by action name;
    /// actions not listed here fall back to the global value.
    #[serde(default)]
    pub pool_size_overrides: HashMap<String, i64>,
}

fn default_metrics_interval_secs() -> u64 {
    5
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub number_of_users: usize,
    pub ramp_up: Duration,
    pub test_duration: Duration,
    pub connection_pool_size: usize,
    pub metrics_interval: Duration,
    pub worker_mode: WorkerMode,
    pub pool_size_overrides: HashMap<String, usize>,
}

impl RuntimeConfig {
    pub fn new(
        number_of_users: usize,
        ramp_up: Duration,
        test_duration: Duration,
        connection_pool_size: usize,
        metrics_interval: Duration,
    ) -> Result<Self, ConfigError> {
        Self::validate(number_of_users, connection_pool_size, metrics_interval)?;
        Ok(Self {
            number_of_users,
            ramp_up,
            test_duration,
            connection_pool_size,
            metrics_interval,
            worker_mode: WorkerMode::Lightweight,
            pool_size_overrides: HashMap::new(),
        })
    }

    pub fn with_worker_mode(mut self, mode: WorkerMode) -> Self {
        self.worker_mode = mode;
        self
    }

    pub fn with_pool_size_override(mut self, action_name: impl Into<String>, size: usize) -> Self {
        self.pool_size_overrides.insert(action_name.into(), size);
        self
    }

    /// The pool size to register for `action_name`: its override if one
    /// was configured, else the global `connection_pool_size`.
    pub fn pool_size_for(&self, action_name: &str) -> usize {
        self.pool_size_overrides
            .get(action_name)
            .copied()
            .unwrap_or(self.connection_pool_size)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let raw: TomlConfig = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::try_from(raw)
    }

    fn validate(
        number_of_users: usize,
        connection_pool_size: usize,
        metrics_interval: Duration,
    ) -> Result<(), ConfigError> {
        if number_of_users == 0 {
            return Err(ConfigError::NonPositiveUsers);
        }
        if connection_pool_size == 0 {
            return Err(ConfigError::NonPositivePoolSize);
        }
        if metrics_interval.is_zero() {
            return Err(ConfigError::NonPositiveMetricsInterval);
        }
        Ok(())
    }
}

impl TryFrom<TomlConfig> for RuntimeConfig {
    type Error = ConfigError;

    fn try_from(raw: TomlConfig) -> Result<Self, Self::Error> {
        if raw.number_of_users <= 0 {
            return Err(ConfigError::NonPositiveUsers);
        }
        if raw.connection_pool_size <= 0 {
            return Err(ConfigError::NonPositivePoolSize);
        }
        let metrics_interval = Duration::from_secs(raw.metrics_interval_secs);
        if metrics_interval.is_zero() {
            return Err(ConfigError::NonPositiveMetricsInterval);
        }
        let mut pool_size_overrides = HashMap::with_capacity(raw.pool_size_overrides.len());
        for (action_name, size) in raw.pool_size_overrides {
            if size <= 0 {
                return Err(ConfigError::NonPositivePoolSize);
            }
            pool_size_overrides.insert(action_name, size as usize);
        }
        Ok(RuntimeConfig {
            number_of_users: raw.number_of_users as usize,
            ramp_up: Duration::from_secs(raw.ramp_up_secs),
            test_duration: Duration::from_secs(raw.test_duration_secs),
            connection_pool_size: raw.connection_pool_size as usize,
            metrics_interval,
            worker_mode: raw.worker_mode.unwrap_or(WorkerMode::Lightweight),
            pool_size_overrides,
        })
    }
}

/// Configuration errors surfaced synchronously (§7).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("numberOfUsers must be positive")]
    NonPositiveUsers,
    #[error("connectionPoolSize must be positive")]
    NonPositivePoolSize,
    #[error("metricsInterval must be positive")]
    NonPositiveMetricsInterval,
    #[error("failed to parse TOML configuration: {0}")]
    Parse(String),
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
