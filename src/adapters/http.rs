use crate::config::ApiConfig;
use crate::domain::model::{Film, RelatedEntity};
use crate::domain::ports::FilmApi;
use crate::utils::error::{CatalogError, Result};
use futures::future::join_all;
use reqwest::{Client, Response};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://swapi.info/api";

#[derive(Debug, Clone)]
pub struct SwapiClient {
    base_url: String,
    client: Client,
}

impl SwapiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let client = builder.build().map_err(|e| CatalogError::ConfigError {
            message: format!("Failed to build HTTP client: {}", e),
        })?;
        Ok(Self::with_client(config.base_url.clone(), client))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn films_url(&self) -> String {
        format!("{}/films", self.base_url)
    }

    /// 單筆關聯資料；任何失敗都回傳 None
    async fn fetch_one<E: RelatedEntity>(&self, url: &str) -> Option<E> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Dropping {} entry {}: {}", E::KIND, url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Dropping {} entry {}: status {}", E::KIND, url, status);
            return None;
        }

        match response.json::<E>().await {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::debug!("Dropping {} entry {}: {}", E::KIND, url, e);
                None
            }
        }
    }
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CatalogError::server(
            status,
            format!("Http failure response for {}: {}", url, status),
        ))
    }
}

#[async_trait::async_trait]
impl FilmApi for SwapiClient {
    async fn fetch_films(&self) -> Result<Vec<Film>> {
        let url = self.films_url();
        tracing::debug!("Making API request to: {}", url);

        let result = async {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(CatalogError::client)?;
            tracing::debug!("API response status: {}", response.status());

            let response = check_status(&url, response)?;
            let status = response.status();
            response.json::<Vec<Film>>().await.map_err(|e| {
                if e.is_decode() {
                    CatalogError::server(
                        status,
                        format!("Http failure during parsing for {}: {}", url, e),
                    )
                } else {
                    CatalogError::client(e)
                }
            })
        }
        .await;

        match &result {
            Ok(films) => tracing::info!("Loaded {} films", films.len()),
            Err(e) => tracing::error!("{}", e),
        }
        result
    }

    async fn fetch_related<E: RelatedEntity>(&self, urls: &[String]) -> Result<Vec<E>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!("Fetching {} {} entries", urls.len(), E::KIND);
        let requests = urls.iter().map(|url| self.fetch_one::<E>(url));
        let entities: Vec<E> = join_all(requests).await.into_iter().flatten().collect();

        if entities.len() < urls.len() {
            tracing::warn!(
                "Loaded {} of {} {} entries",
                entities.len(),
                urls.len(),
                E::KIND
            );
        }
        Ok(entities)
    }
}
