use crate::config::datasets::default_datasets;
use crate::core::{ConfigProvider, Dataset};
use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DAY_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    pub server: ServerSection,
    pub cache: CacheSection,
    pub sessions: SessionSection,
    pub explorer: ExplorerSection,
    /// Replaces the built-in dataset catalog when non-empty.
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5006,
            max_upload_mb: 512,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub ttl_seconds: u64,
    pub capacity: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_seconds: DAY_SECONDS,
            capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub ttl_seconds: u64,
    pub capacity: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            ttl_seconds: 60 * 60,
            capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSection {
    pub category_limit: usize,
    pub min_unique_values: usize,
    pub request_timeout_seconds: u64,
}

impl Default for ExplorerSection {
    fn default() -> Self {
        Self {
            category_limit: crate::core::aggregate::CATEGORY_LIMIT,
            min_unique_values: crate::core::aggregate::MIN_UNIQUE_VALUES,
            request_timeout_seconds: 300,
        }
    }
}

impl ExplorerSettings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// Expands `${VAR}` from the environment; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExplorerError::ProcessingError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn datasets(&self) -> Vec<Dataset> {
        if self.datasets.is_empty() {
            default_datasets()
        } else {
            self.datasets.clone()
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }
}

impl ConfigProvider for ExplorerSettings {
    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_seconds)
    }

    fn cache_capacity(&self) -> usize {
        self.cache.capacity
    }

    fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.sessions.ttl_seconds)
    }

    fn session_capacity(&self) -> usize {
        self.sessions.capacity
    }

    fn category_limit(&self) -> usize {
        self.explorer.category_limit
    }

    fn min_unique_values(&self) -> usize {
        self.explorer.min_unique_values
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.explorer.request_timeout_seconds)
    }
}

impl Validate for ExplorerSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.server.host)?;
        validate_positive_number("server.max_upload_mb", self.server.max_upload_mb, 1)?;
        validate_positive_number("cache.capacity", self.cache.capacity, 1)?;
        validate_positive_number("sessions.capacity", self.sessions.capacity, 1)?;
        // The palette has 20 colors: the kept categories plus "other".
        validate_range("explorer.category_limit", self.explorer.category_limit, 1, 19)?;
        validate_positive_number("explorer.min_unique_values", self.explorer.min_unique_values, 1)?;
        if self.explorer.request_timeout_seconds == 0 {
            return Err(ExplorerError::InvalidConfigValueError {
                field: "explorer.request_timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be positive".to_string(),
            });
        }

        for (i, dataset) in self.datasets.iter().enumerate() {
            validate_url(&format!("datasets[{}].url", i), &dataset.url)?;
            validate_non_empty_string(&format!("datasets[{}].label", i), &dataset.label)?;
        }

        Ok(())
    }
}
