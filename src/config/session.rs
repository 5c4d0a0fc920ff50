//! Session-store tuning from environment variables.
//!
//! This module reads the idle cutoff and sweep cadence for the in-memory
//! session store from the environment, falling back to a 30-minute cutoff
//! swept every 5 minutes when nothing is configured.

use std::time::Duration;
use tracing::warn;

/// Default idle cutoff: sessions quiet this long are evicted.
const DEFAULT_IDLE_SECS: u64 = 30 * 60;

/// Default sweep cadence.
const DEFAULT_SWEEP_SECS: u64 = 5 * 60;

/// Tuning for the session store's idle-eviction sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// How long a session may sit idle before the sweep evicts it
    pub idle_timeout: Duration,
    /// How often the sweep runs
    pub sweep_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_SECS),
        }
    }
}

fn seconds_from_env(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(var, value = %raw, "ignoring unparseable duration, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Reads session-store settings from `SESSION_IDLE_SECS` and
/// `SESSION_SWEEP_SECS`, using the defaults for anything unset or invalid.
#[must_use]
pub fn session_settings_from_env() -> SessionSettings {
    SessionSettings {
        idle_timeout: Duration::from_secs(seconds_from_env(
            "SESSION_IDLE_SECS",
            DEFAULT_IDLE_SECS,
        )),
        sweep_interval: Duration::from_secs(seconds_from_env(
            "SESSION_SWEEP_SECS",
            DEFAULT_SWEEP_SECS,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SessionSettings::default();
        assert_eq!(settings.idle_timeout, Duration::from_secs(1800));
        assert_eq!(settings.sweep_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_seconds_from_env_fallback() {
        // Variable not set: default wins.
        assert_eq!(seconds_from_env("CALLSCREEN_TEST_UNSET_VAR", 42), 42);
    }
}
