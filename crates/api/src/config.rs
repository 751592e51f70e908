use cheers_slack::config::SlackConfig;
use cheers_worker::config::SchedulerConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9060`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    pub scheduler: SchedulerConfig,
    pub slack: SlackConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `9060`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                    |
    ///
    /// Scheduler and Slack settings are read by [`SchedulerConfig`] and
    /// [`SlackConfig`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Malformed numbers fall back to
    /// the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = get("PORT").and_then(|v| v.parse().ok()).unwrap_or(9060);

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = get("REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        let shutdown_timeout_secs = get("SHUTDOWN_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            scheduler: SchedulerConfig::from_lookup(&lookup),
            slack: SlackConfig::from_lookup(&lookup),
        }
    }
}
