#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CatalogSettings, CliConfig};
pub use toml_config::TomlConfig;

use crate::adapters::DEFAULT_BASE_URL;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};

/// API 連線設定；預設沒有逾時，沿用 HTTP client 本身的行為
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

impl Validate for ApiConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.base_url)?;
        if let Some(secs) = self.timeout_seconds {
            validation::validate_positive_number("api.timeout_seconds", secs, 1)?;
        }
        if let Some(agent) = &self.user_agent {
            validation::validate_non_empty_string("api.user_agent", agent)?;
        }
        Ok(())
    }
}
