use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use swapi_catalog::utils::{logger, validation::Validate};
use swapi_catalog::{run_catalog, CatalogRequest, CliConfig, SwapiClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting swapi-catalog");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    let settings = match config.validate().and_then(|_| config.resolve()) {
        Ok(settings) => settings,
        Err(e) if e.is_config() => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("❌ Failed to load settings: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let client = SwapiClient::from_config(&settings.api).context("failed to create API client")?;
    tracing::debug!("Using API base URL: {}", client.base_url());

    let request = CatalogRequest {
        search: settings.search,
        expand: settings.expand,
        full_crawl: settings.full_crawl,
        crawl_length: settings.crawl_length,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_catalog(Arc::new(client), &request, &mut out)
        .await
        .context("failed to render catalog")?;

    if summary.is_failure() {
        tracing::error!(
            "❌ Film list failed to load: {}",
            summary.error.as_deref().unwrap_or_default()
        );
        std::process::exit(2);
    }

    tracing::info!(
        "✅ Rendered {} of {} films",
        summary.shown_films,
        summary.total_films
    );
    Ok(())
}
