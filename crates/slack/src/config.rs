use std::time::Duration;

/// Which outbound client to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Real Slack Web API calls.
    Api,
    /// Log instead of calling Slack.
    Noop,
}

/// Slack settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Fallback bot token for workspaces without a stored installation.
    pub bot_token: Option<String>,
    /// Secret used to verify `/slack/events` requests.
    pub signing_secret: Option<String>,
    /// Web API base URL (default: `https://slack.com/api`).
    pub api_base_url: String,
    /// Per-call timeout in seconds (default: `12`).
    pub http_timeout_secs: u64,
    /// Client selection (default: `api`).
    pub mode: ClientMode,
}

impl SlackConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `SLACK_BOT_TOKEN`         | unset                   |
    /// | `SLACK_SIGNING_SECRET`    | unset                   |
    /// | `SLACK_API_BASE_URL`      | `https://slack.com/api` |
    /// | `SLACK_HTTP_TIMEOUT_SECS` | `12`                    |
    /// | `SLACK_CLIENT_MODE`       | `api`                   |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset and
    /// malformed numbers fall back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = get("SLACK_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "https://slack.com/api".into());

        let http_timeout_secs = get("SLACK_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(12);

        let mode = match get("SLACK_CLIENT_MODE").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("noop") => ClientMode::Noop,
            _ => ClientMode::Api,
        };

        Self {
            bot_token: get("SLACK_BOT_TOKEN"),
            signing_secret: get("SLACK_SIGNING_SECRET"),
            api_base_url,
            http_timeout_secs,
            mode,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
