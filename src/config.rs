//! Configuration types for nexy-tasks
//!
//! Every field has a default matching the upstream web client's cadence, so
//! an empty TOML file (or no file at all) yields a working configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upstream endpoints and request shape
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the points API (default: "https://api.nexyai.io")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// IP echo endpoint used to display the account's egress address
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,

    /// `origin` header sent with authenticated calls
    #[serde(default = "default_origin")]
    pub origin: String,

    /// `referer` header sent with authenticated calls
    #[serde(default = "default_referer")]
    pub referer: String,

    /// Per-request timeout (default: 60 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ip_echo_url: default_ip_echo_url(),
            origin: default_origin(),
            referer: default_referer(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Retry behavior of the HTTP client
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts per request, first one included (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 2000 ms)
    #[serde(default = "default_initial_delay", with = "duration_ms_serde")]
    pub initial_delay: Duration,

    /// Upper bound for a single backoff delay (default: 60 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after every retry (default: 1.5)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Verify and claim pacing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskFlowConfig {
    /// Total verify polls while the server reports `in_progress` (default: 6)
    #[serde(default = "default_verify_max_polls")]
    pub verify_max_polls: u32,

    /// Wait between `in_progress` polls (default: 10 seconds)
    #[serde(default = "default_verify_poll_interval", with = "duration_serde")]
    pub verify_poll_interval: Duration,

    /// Attempts inside a single claim call (default: 5)
    #[serde(default = "default_claim_max_retries")]
    pub claim_max_retries: u32,

    /// Wait between attempts inside a claim call (default: 5 seconds)
    #[serde(default = "default_five_secs", with = "duration_serde")]
    pub claim_retry_delay: Duration,

    /// Claim calls the orchestrator makes per verified task (default: 3)
    #[serde(default = "default_claim_outer_attempts")]
    pub claim_outer_attempts: u32,

    /// Wait between orchestrator-level claim calls (default: 5 seconds)
    #[serde(default = "default_five_secs", with = "duration_serde")]
    pub claim_outer_delay: Duration,

    /// Pause after each processed task (default: 2 seconds)
    #[serde(default = "default_inter_task_delay", with = "duration_serde")]
    pub inter_task_delay: Duration,
}

impl Default for TaskFlowConfig {
    fn default() -> Self {
        Self {
            verify_max_polls: default_verify_max_polls(),
            verify_poll_interval: default_verify_poll_interval(),
            claim_max_retries: default_claim_max_retries(),
            claim_retry_delay: default_five_secs(),
            claim_outer_attempts: default_claim_outer_attempts(),
            claim_outer_delay: default_five_secs(),
            inter_task_delay: default_inter_task_delay(),
        }
    }
}

/// Cycle pacing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Pause after each account (default: 5 seconds)
    #[serde(default = "default_five_secs", with = "duration_serde")]
    pub inter_account_delay: Duration,

    /// Pause between full cycles (default: 24 hours)
    #[serde(default = "default_cycle_interval", with = "duration_serde")]
    pub cycle_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            inter_account_delay: default_five_secs(),
            cycle_interval: default_cycle_interval(),
        }
    }
}

/// Where credentials and proxies come from
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputConfig {
    /// Newline-delimited bearer tokens (default: "token.txt")
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    /// Newline-delimited proxy URIs (default: "proxy.txt")
    #[serde(default = "default_proxy_file")]
    pub proxy_file: PathBuf,

    /// Route accounts through proxies from `proxy_file` (default: false)
    #[serde(default)]
    pub use_proxy: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            proxy_file: default_proxy_file(),
            use_proxy: false,
        }
    }
}

/// Main configuration
///
/// Built once before the first cycle and shared read-only afterwards.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Verify/claim pacing
    #[serde(default)]
    pub tasks: TaskFlowConfig,

    /// Cycle pacing
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Token and proxy sources
    #[serde(default)]
    pub inputs: InputConfig,
}

impl Config {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config {
            message: format!("invalid TOML: {}", e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject settings that would make the workflow loop or never run
    pub fn validate(&self) -> Result<()> {
        for (key, url) in [
            ("api.base_url", &self.api.base_url),
            ("api.ip_echo_url", &self.api.ip_echo_url),
        ] {
            let parsed = url::Url::parse(url).map_err(|e| Error::Config {
                message: format!("{} is not a valid URL: {}", url, e),
                key: Some(key.to_string()),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::Config {
                    message: format!("{} must use http or https", url),
                    key: Some(key.to_string()),
                });
            }
        }

        for (key, value) in [
            ("retry.max_attempts", self.retry.max_attempts),
            ("tasks.verify_max_polls", self.tasks.verify_max_polls),
            ("tasks.claim_max_retries", self.tasks.claim_max_retries),
            ("tasks.claim_outer_attempts", self.tasks.claim_outer_attempts),
        ] {
            if value == 0 {
                return Err(Error::Config {
                    message: "must be at least 1".to_string(),
                    key: Some(key.to_string()),
                });
            }
        }

        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(Error::Config {
                message: format!(
                    "backoff multiplier must be a finite number >= 1.0, got {}",
                    multiplier
                ),
                key: Some("retry.backoff_multiplier".to_string()),
            });
        }

        if self.api.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be non-zero".to_string(),
                key: Some("api.request_timeout".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.nexyai.io".to_string()
}

fn default_ip_echo_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}

fn default_origin() -> String {
    "https://astpoint.asterai.xyz".to_string()
}

fn default_referer() -> String {
    "https://astpoint.asterai.xyz/".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(2000)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

fn default_verify_max_polls() -> u32 {
    6
}

fn default_verify_poll_interval() -> Duration {
    Duration::from_secs(10)
}

fn default_claim_max_retries() -> u32 {
    5
}

fn default_claim_outer_attempts() -> u32 {
    3
}

fn default_five_secs() -> Duration {
    Duration::from_secs(5)
}

fn default_inter_task_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_cycle_interval() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_token_file() -> PathBuf {
    PathBuf::from("token.txt")
}

fn default_proxy_file() -> PathBuf {
    PathBuf::from("proxy.txt")
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ms = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(ms))
    }
}
