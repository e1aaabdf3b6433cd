use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::error::{Result, SeedError};
use crate::retry::RetryPolicy;
use crate::types::Flavor;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    pub gateway_url: String,
    pub flavor: Flavor,
    pub images_dir: Option<PathBuf>,
    pub admin: AdminConfig,
    pub timing: TimingConfig,
    pub services: Vec<ServiceConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub health_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub settle_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceConfig {
    pub name: String,
    pub url: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            flavor: Flavor::default(),
            images_dir: None,
            admin: AdminConfig::default(),
            timing: TimingConfig::default(),
            services: DEFAULT_SERVICES
                .iter()
                .map(|(name, url)| ServiceConfig {
                    name: name.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            health_timeout_secs: DEFAULT_HEALTH_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            settle_delay_secs: DEFAULT_SETTLE_DELAY_SECS,
        }
    }
}

/// Values given on the command line; `None` leaves the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub gateway_url: Option<String>,
    pub flavor: Option<Flavor>,
    pub images_dir: Option<PathBuf>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<u64>,
}

impl SeedConfig {
    /// Load from `path`, or from `seed.toml` if present, then apply environment overrides.
    ///
    /// An explicit path that cannot be read is an error; a missing default file is not.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SeedError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `SEED_*` variables through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SEED_GATEWAY_URL") {
            self.gateway_url = url;
        }
        if let Some(flavor) = lookup("SEED_FLAVOR") {
            self.flavor = flavor.parse()?;
        }
        if let Some(dir) = lookup("SEED_IMAGES_DIR") {
            self.images_dir = Some(PathBuf::from(dir));
        }
        if let Some(n) = lookup("SEED_MAX_RETRIES") {
            self.timing.max_retries = parse_number("SEED_MAX_RETRIES", &n)?;
        }
        if let Some(n) = lookup("SEED_RETRY_DELAY_SECS") {
            self.timing.retry_delay_secs = parse_number("SEED_RETRY_DELAY_SECS", &n)?;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        if let Some(url) = overrides.gateway_url {
            self.gateway_url = url;
        }
        if let Some(flavor) = overrides.flavor {
            self.flavor = flavor;
        }
        if let Some(dir) = overrides.images_dir {
            self.images_dir = Some(dir);
        }
        if let Some(n) = overrides.max_retries {
            self.timing.max_retries = n;
        }
        if let Some(n) = overrides.retry_delay_secs {
            self.timing.retry_delay_secs = n;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateway_url.trim().is_empty() {
            return Err(SeedError::Config("gateway_url must not be empty".into()));
        }
        if !self.gateway_url.starts_with("http://") && !self.gateway_url.starts_with("https://") {
            return Err(SeedError::Config(format!(
                "gateway_url must be an http(s) URL, got '{}'",
                self.gateway_url
            )));
        }
        if self.admin.username.trim().is_empty() || self.admin.password.is_empty() {
            return Err(SeedError::Config("admin credentials must not be empty".into()));
        }
        Ok(())
    }

    /// Gateway URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.gateway_url.trim_end_matches('/')
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.timing.max_retries,
            Duration::from_secs(self.timing.retry_delay_secs),
        )
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.timing.health_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timing.request_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.timing.settle_delay_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| SeedError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}
