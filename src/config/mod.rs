//! Configuration handling for the inspection engine.
//!
//! Every timeout the engine uses is overridable through the environment so
//! operators can tune it without a rebuild, but the defaults are what the
//! engine was calibrated with: a short primary fetch, a generous rendering
//! window, and a settle delay for late-hydrating pages. `Config::from_env`
//! performs that loading with sensible defaults.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names. Keeping them public lets other crates (tests,
/// build scripts) refer to them if needed later.
pub const ENV_PRIMARY_TIMEOUT_SECS: &str = "OGAUDIT_PRIMARY_TIMEOUT_SECS";
pub const ENV_RENDER_TIMEOUT_SECS: &str = "OGAUDIT_RENDER_TIMEOUT_SECS";
pub const ENV_SETTLE_DELAY_MS: &str = "OGAUDIT_SETTLE_DELAY_MS";
pub const ENV_PROBE_TIMEOUT_SECS: &str = "OGAUDIT_PROBE_TIMEOUT_SECS";
pub const ENV_USER_AGENT: &str = "OGAUDIT_USER_AGENT";

/// Default values used when environment variables are absent.
const DEFAULT_PRIMARY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SETTLE_DELAY_MS: u64 = 2000;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Identity presented to inspected sites. A realistic desktop browser string
/// keeps naive bot-blockers from rejecting the primary strategy outright.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Engine runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    primary_timeout_secs: u64,
    render_timeout_secs: u64,
    settle_delay_ms: u64,
    probe_timeout_secs: u64,
    user_agent: String,
}

impl Config {
    /// Create a new config explicitly.
    pub fn new(
        primary_timeout_secs: u64,
        render_timeout_secs: u64,
        settle_delay_ms: u64,
        probe_timeout_secs: u64,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            primary_timeout_secs,
            render_timeout_secs,
            settle_delay_ms,
            probe_timeout_secs,
            user_agent: user_agent.into(),
        }
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// Fails only when a variable is present but not a valid integer; absent
    /// variables never fail.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            primary_timeout_secs: read_u64(
                ENV_PRIMARY_TIMEOUT_SECS,
                DEFAULT_PRIMARY_TIMEOUT_SECS,
            )?,
            render_timeout_secs: read_u64(ENV_RENDER_TIMEOUT_SECS, DEFAULT_RENDER_TIMEOUT_SECS)?,
            settle_delay_ms: read_u64(ENV_SETTLE_DELAY_MS, DEFAULT_SETTLE_DELAY_MS)?,
            probe_timeout_secs: read_u64(ENV_PROBE_TIMEOUT_SECS, DEFAULT_PROBE_TIMEOUT_SECS)?,
            user_agent: env::var(ENV_USER_AGENT)
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }

    /// Total timeout for the lightweight primary fetch.
    pub fn primary_timeout(&self) -> Duration {
        Duration::from_secs(self.primary_timeout_secs)
    }
    /// Navigation timeout for the headless rendering fallback.
    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }
    /// Post-load delay allowing late hydration before capturing the DOM.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
    /// Per-tier timeout for image reachability probes.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
    /// User-Agent string presented by every outbound request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Calibrated defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        // not `Default` impl yet to keep explicit semantics
        Self::new(
            DEFAULT_PRIMARY_TIMEOUT_SECS,
            DEFAULT_RENDER_TIMEOUT_SECS,
            DEFAULT_SETTLE_DELAY_MS,
            DEFAULT_PROBE_TIMEOUT_SECS,
            DEFAULT_USER_AGENT,
        )
    }
}

fn read_u64(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
