use crate::domain::model::{Film, RelatedEntity};
use crate::domain::ports::FilmApi;
use crate::utils::error::{CatalogError, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// 測試用的 API：記錄呼叫次數，可選擇讓回應等待 `gate`
#[derive(Default)]
pub struct FakeApi {
    pub films: Vec<Film>,
    pub films_status: Option<u16>,
    pub broken_urls: HashSet<String>,
    pub fail_related: bool,
    pub gate: Option<Arc<Notify>>,
    pub film_calls: AtomicUsize,
    pub related_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_films(films: Vec<Film>) -> Self {
        Self {
            films,
            ..Self::default()
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn film_calls(&self) -> usize {
        self.film_calls.load(Ordering::SeqCst)
    }

    pub fn related_calls(&self) -> usize {
        self.related_calls.load(Ordering::SeqCst)
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait::async_trait]
impl FilmApi for FakeApi {
    async fn fetch_films(&self) -> Result<Vec<Film>> {
        self.film_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        match self.films_status {
            Some(status) => Err(CatalogError::Server {
                status,
                message: "Http failure response for /films".to_string(),
            }),
            None => Ok(self.films.clone()),
        }
    }

    async fn fetch_related<E: RelatedEntity>(&self, urls: &[String]) -> Result<Vec<E>> {
        self.related_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        if self.fail_related {
            return Err(CatalogError::Aggregation {
                message: "join failed".to_string(),
            });
        }
        let entities = urls
            .iter()
            .filter(|url| !self.broken_urls.contains(*url))
            .map(|url| {
                let name = url.rsplit('/').next().unwrap_or_default();
                serde_json::from_value(serde_json::json!({ "name": name, "url": url }))
            })
            .collect::<std::result::Result<Vec<E>, _>>()?;
        Ok(entities)
    }
}

pub fn film(title: &str, episode_id: u32) -> Film {
    Film {
        title: title.to_string(),
        episode_id,
        opening_crawl: format!("Opening crawl of {}", title),
        director: "George Lucas".to_string(),
        producer: "Gary Kurtz".to_string(),
        release_date: "1977-05-25".to_string(),
        characters: vec![],
        starships: vec![],
        vehicles: vec![],
        species: vec![],
        planets: vec![],
        created: String::new(),
        edited: String::new(),
        url: format!("https://swapi.info/api/films/{}", episode_id),
    }
}

pub fn urls(kind: &str, ids: &[u32]) -> Vec<String> {
    ids.iter()
        .map(|id| format!("https://swapi.info/api/{}/{}", kind, id))
        .collect()
}
