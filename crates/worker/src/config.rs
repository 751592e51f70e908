use std::time::Duration;

/// Scheduler settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether the API process runs the scheduler loop (default: `true`).
    pub enabled: bool,
    /// Time between ticks (default: 60 s).
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval: Duration::from_secs(60),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default |
    /// |--------------------------------|---------|
    /// | `SCHEDULER_ENABLED`            | `true`  |
    /// | `SCHEDULER_POLL_INTERVAL_SECS` | `60`    |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Malformed values fall back to
    /// the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let enabled = lookup("SCHEDULER_ENABLED")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.enabled);

        let poll_interval = lookup("SCHEDULER_POLL_INTERVAL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        Self {
            enabled,
            poll_interval,
        }
    }
}
