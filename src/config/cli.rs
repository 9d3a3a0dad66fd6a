use crate::config::{ApiConfig, TomlConfig};
use crate::domain::model::{EntityKind, CRAWL_PREVIEW_LENGTH};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "swapi-catalog")]
#[command(about = "Browse the Star Wars film catalog from the terminal")]
pub struct CliConfig {
    #[arg(long, help = "API base URL (default: https://swapi.info/api)")]
    pub base_url: Option<String>,

    #[arg(long, help = "Filter films by title")]
    pub search: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',', help = "Related sections to expand")]
    pub expand: Vec<EntityKind>,

    #[arg(long, help = "Show the whole opening crawl")]
    pub full_crawl: bool,

    #[arg(long, help = "Load settings from a TOML file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// 命令列與 TOML 合併後的最終設定
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub api: ApiConfig,
    pub search: String,
    pub expand: Vec<EntityKind>,
    pub full_crawl: bool,
    pub crawl_length: usize,
}

impl CliConfig {
    /// TOML 檔案提供預設值，命令列上明確給的參數優先
    pub fn resolve(&self) -> Result<CatalogSettings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        file.validate()?;

        // 沒有設定檔時 file.api.base_url 就是 DEFAULT_BASE_URL
        let mut api = file.api.clone();
        if let Some(base_url) = &self.base_url {
            api.base_url = base_url.clone();
        }

        let search = self
            .search
            .clone()
            .or_else(|| file.display.search.clone())
            .unwrap_or_default();

        let expand = if self.expand.is_empty() {
            file.expand().to_vec()
        } else {
            self.expand.clone()
        };

        let settings = CatalogSettings {
            api,
            search,
            expand,
            full_crawl: self.full_crawl || file.display.full_crawl.unwrap_or(false),
            crawl_length: if self.config.is_some() {
                file.crawl_length()
            } else {
                CRAWL_PREVIEW_LENGTH
            },
        };
        settings.api.validate()?;
        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.base_url {
            Some(base_url) => validation::validate_url("base_url", base_url),
            None => Ok(()),
        }
    }
}
