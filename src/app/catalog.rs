use crate::app::render;
use crate::core::film_card::CardDeck;
use crate::core::film_list::FilmListController;
use crate::core::search::SearchState;
use crate::domain::model::{EntityKind, CRAWL_PREVIEW_LENGTH};
use crate::domain::ports::FilmApi;
use crate::utils::error::Result;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CatalogRequest {
    pub search: String,
    pub expand: Vec<EntityKind>,
    pub full_crawl: bool,
    pub crawl_length: usize,
}

impl Default for CatalogRequest {
    fn default() -> Self {
        Self {
            search: String::new(),
            expand: Vec::new(),
            full_crawl: false,
            crawl_length: CRAWL_PREVIEW_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub total_films: usize,
    pub shown_films: usize,
    pub error: Option<String>,
}

impl CatalogSummary {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// 載入電影、套用搜尋、展開要求的區塊後輸出所有卡片
pub async fn run_catalog<A, W>(api: Arc<A>, request: &CatalogRequest, out: &mut W) -> Result<CatalogSummary>
where
    A: FilmApi + 'static,
    W: Write,
{
    let search = Arc::new(SearchState::new());
    search.set_search_term(&request.search);

    let controller = FilmListController::start(Arc::clone(&api), Arc::clone(&search));
    let state = controller.wait_until_settled().await;
    let visible = controller.visible_films();

    render::render_list_status(out, &state.loading, visible.len(), &search.current_term())?;
    if let Some(error) = state.loading.error {
        return Ok(CatalogSummary {
            total_films: 0,
            shown_films: 0,
            error: Some(error),
        });
    }
    tracing::info!(
        "Showing {} of {} films for {:?}",
        visible.len(),
        state.films.len(),
        search.current_term()
    );

    let mut deck = CardDeck::new(api);
    deck.sync(&visible);

    // 先全部觸發，讓各張卡片的請求同時進行
    for card in deck.cards() {
        for kind in &request.expand {
            card.expand(*kind);
        }
    }
    for card in deck.cards() {
        for kind in &request.expand {
            card.wait_for_section(*kind).await;
        }
    }

    for card in deck.cards_mut() {
        if request.full_crawl {
            card.toggle_crawl();
        }
    }
    for card in deck.cards() {
        render::render_film_card(out, card, &request.expand, request.crawl_length)?;
    }

    Ok(CatalogSummary {
        total_films: state.films.len(),
        shown_films: deck.len(),
        error: None,
    })
}
