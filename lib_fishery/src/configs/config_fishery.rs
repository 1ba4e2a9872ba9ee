use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{FisheryError, FisheryResult};

/// Public FishBase mirror used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://fishbase.ropensci.org/";
/// Directory holding cached `{route}.json` files.
pub const DEFAULT_DATA_DIR: &str = "./data";
/// Default message template; `{}` is replaced by the extracted value.
pub const NAME_TEMPLATE: &str = "Common name: {}";

const ENV_BASE_URL: &str = "FISHERY_BASE_URL";
const ENV_DATA_DIR: &str = "FISHERY_DATA_DIR";
const ENV_NAME_TEMPLATE: &str = "FISHERY_NAME_TEMPLATE";

/// One partial configuration source (file, environment, CLI).
///
/// Layers are merged so that `Some` values of the later layer win.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    /// Base URL for remote fetches.
    pub base_url: Option<String>,
    /// Directory for local `{route}.json` files.
    pub data_dir: Option<PathBuf>,
    /// Default formatter template.
    pub name_template: Option<String>,
    /// Attempts per remote request (1 = no retry).
    pub max_attempts: Option<u32>,
    /// Linear backoff step between remote attempts.
    pub retry_delay_ms: Option<u64>,
    /// Per-request timeout.
    pub timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Merge two layers, where `other` overrides `self` for `Some` values.
    pub fn merge(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            base_url: other.base_url.or(self.base_url),
            data_dir: other.data_dir.or(self.data_dir),
            name_template: other.name_template.or(self.name_template),
            max_attempts: other.max_attempts.or(self.max_attempts),
            retry_delay_ms: other.retry_delay_ms.or(self.retry_delay_ms),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Reads a camelCase JSON configuration file.
    pub fn from_json_file(path: &Path) -> FisheryResult<ConfigLayer> {
        let raw = fs::read_to_string(path).map_err(|e| {
            FisheryError::NotFound(format!("config file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            FisheryError::Format(format!("config file {}: {}", path.display(), e))
        })
    }

    /// Layer built from the `FISHERY_*` environment variables.
    pub fn from_env() -> ConfigLayer {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ConfigLayer::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigLayer
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        ConfigLayer {
            base_url: non_empty(ENV_BASE_URL),
            data_dir: non_empty(ENV_DATA_DIR).map(PathBuf::from),
            name_template: non_empty(ENV_NAME_TEMPLATE),
            ..Default::default()
        }
    }

    /// Fill the gaps with defaults and validate the result.
    pub fn resolve(self) -> FisheryResult<FisheryConfig> {
        let defaults = FisheryConfig::default();
        let config = FisheryConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            name_template: self.name_template.unwrap_or(defaults.name_template),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            retry_delay: self
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        };
        config.validate()?;
        Ok(config)
    }
}

/// # Fishery Configuration
///
/// Everything the data sources and the formatter need, fixed at construction
/// time. There is no runtime reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FisheryConfig {
    /// Absolute base URL; routes are joined onto it.
    pub base_url: String,
    /// Directory searched by the local data source.
    pub data_dir: PathBuf,
    /// Default formatter template containing one `{}` placeholder.
    pub name_template: String,
    /// Attempts per remote request.
    pub max_attempts: u32,
    /// Backoff step between remote attempts.
    pub retry_delay: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for FisheryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            name_template: NAME_TEMPLATE.to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(10),
        }
    }
}

impl FisheryConfig {
    /// Checks the invariants every consumer relies on.
    pub fn validate(&self) -> FisheryResult<()> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(FisheryError::Config(format!(
                "base URL '{}' cannot be used as a base",
                self.base_url
            )));
        }
        if !self.name_template.contains("{}") {
            return Err(FisheryError::Config(format!(
                "name template '{}' has no {{}} placeholder",
                self.name_template
            )));
        }
        if self.max_attempts == 0 {
            return Err(FisheryError::Config("maxAttempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for FisheryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FisheryConfig
    Base URL: {},
    Data dir: {},
    Name template: {},
    Max attempts: {},
    Retry delay: {:?},
    Timeout: {:?}
",
            self.base_url,
            self.data_dir.display(),
            self.name_template,
            self.max_attempts,
            self.retry_delay,
            self.timeout
        )
    }
}
