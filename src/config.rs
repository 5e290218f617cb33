//! # Search Configuration
//!
//! Settings are layered: built-in defaults, then an optional file (TOML, YAML or JSON,
//! picked by extension), then `MEMBER_SEARCH_*` environment variables. `DATABASE_URL`
//! is honoured as a fallback for the connection string.

use crate::error::{Result, SearchError};
use crate::search::CountStrategy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "MEMBER_SEARCH";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    /// Upper bound for one search call, content and count together. `None` waits forever.
    pub query_timeout_ms: Option<u64>,
    /// Largest `limit` a page request may carry
    pub max_page_size: u64,
    pub default_count_strategy: CountStrategy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            database_url: "postgresql://localhost/member_search_development".to_string(),
            max_connections: 10,
            acquire_timeout_ms: 5000,
            query_timeout_ms: Some(30_000),
            max_page_size: 1000,
            default_count_strategy: CountStrategy::default(),
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::build(path, None)
    }

    /// Same layering as [`SearchConfig::load`] with an explicit variable map standing in
    /// for the process environment
    pub fn load_with_vars(path: Option<&Path>, vars: HashMap<String, String>) -> Result<Self> {
        Self::build(path, Some(vars))
    }

    fn build(path: Option<&Path>, vars: Option<HashMap<String, String>>) -> Result<Self> {
        let database_url = match &vars {
            Some(vars) => vars.get("DATABASE_URL").cloned(),
            None => std::env::var("DATABASE_URL").ok(),
        };

        let mut builder = Config::builder();
        if let Some(url) = database_url {
            builder = builder.set_default("database_url", url)?;
        }
        if let Some(path) = path {
            if !path.exists() {
                return Err(SearchError::ConfigurationError(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(vars),
        );

        let config: SearchConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(SearchError::ConfigurationError(
                "database_url must not be empty".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(SearchError::ConfigurationError(
                "max_connections must be greater than zero".to_string(),
            ));
        }
        if self.acquire_timeout_ms == 0 {
            return Err(SearchError::ConfigurationError(
                "acquire_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.query_timeout_ms == Some(0) {
            return Err(SearchError::ConfigurationError(
                "query_timeout_ms must be greater than zero when set".to_string(),
            ));
        }
        if self.max_page_size == 0 {
            return Err(SearchError::ConfigurationError(
                "max_page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }
}
