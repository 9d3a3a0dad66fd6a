use crate::core::related::RelatedLoader;
use crate::domain::model::{
    Character, EntityKind, Film, LoadingState, Species, Starship, Vehicle, CRAWL_PREVIEW_LENGTH,
};
use crate::domain::ports::FilmApi;
use std::sync::Arc;

/// 一部電影的卡片：開場字幕展開狀態加上四種關聯資料的 loader
pub struct FilmCard<A: FilmApi + 'static> {
    film: Film,
    crawl_expanded: bool,
    pub characters: RelatedLoader<Character, A>,
    pub starships: RelatedLoader<Starship, A>,
    pub vehicles: RelatedLoader<Vehicle, A>,
    pub species: RelatedLoader<Species, A>,
}

impl<A: FilmApi + 'static> FilmCard<A> {
    pub fn new(film: Film, api: Arc<A>) -> Self {
        let urls = |kind: EntityKind| film.related_urls(kind).to_vec();
        let characters = RelatedLoader::new(Arc::clone(&api), urls(EntityKind::Characters));
        let starships = RelatedLoader::new(Arc::clone(&api), urls(EntityKind::Starships));
        let vehicles = RelatedLoader::new(Arc::clone(&api), urls(EntityKind::Vehicles));
        let species = RelatedLoader::new(api, urls(EntityKind::Species));
        Self {
            film,
            crawl_expanded: false,
            characters,
            starships,
            vehicles,
            species,
        }
    }

    pub fn film(&self) -> &Film {
        &self.film
    }

    pub fn track_key(&self) -> &str {
        &self.film.url
    }

    /// 展開某個關聯資料面板
    pub fn expand(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Characters => self.characters.trigger(),
            EntityKind::Starships => self.starships.trigger(),
            EntityKind::Vehicles => self.vehicles.trigger(),
            EntityKind::Species => self.species.trigger(),
        }
    }

    pub fn section_state(&self, kind: EntityKind) -> LoadingState {
        match kind {
            EntityKind::Characters => self.characters.loading_state(),
            EntityKind::Starships => self.starships.loading_state(),
            EntityKind::Vehicles => self.vehicles.loading_state(),
            EntityKind::Species => self.species.loading_state(),
        }
    }

    pub async fn wait_for_section(&self, kind: EntityKind) -> LoadingState {
        match kind {
            EntityKind::Characters => self.characters.wait_until_settled().await,
            EntityKind::Starships => self.starships.wait_until_settled().await,
            EntityKind::Vehicles => self.vehicles.wait_until_settled().await,
            EntityKind::Species => self.species.wait_until_settled().await,
        }
    }

    pub fn toggle_crawl(&mut self) {
        self.crawl_expanded = !self.crawl_expanded;
    }

    pub fn is_crawl_expanded(&self) -> bool {
        self.crawl_expanded
    }

    pub fn crawl_text(&self) -> String {
        self.crawl_preview(CRAWL_PREVIEW_LENGTH)
    }

    /// 展開時回傳完整字幕，否則截斷到 `max_chars`
    pub fn crawl_preview(&self, max_chars: usize) -> String {
        if self.crawl_expanded {
            self.film.opening_crawl.clone()
        } else {
            self.film.truncated_crawl(max_chars)
        }
    }
}

/// 依照目前可見的電影清單維護卡片；以電影 URL 識別，已存在的卡片 (及其快取) 會保留
pub struct CardDeck<A: FilmApi + 'static> {
    api: Arc<A>,
    cards: Vec<FilmCard<A>>,
}

impl<A: FilmApi + 'static> CardDeck<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            cards: Vec::new(),
        }
    }

    /// 被篩掉的卡片會被 drop，連同進行中的請求一起取消
    pub fn sync(&mut self, visible: &[Film]) {
        let mut previous = std::mem::take(&mut self.cards);
        for film in visible {
            match previous.iter().position(|card| card.track_key() == film.url) {
                Some(index) => self.cards.push(previous.swap_remove(index)),
                None => self
                    .cards
                    .push(FilmCard::new(film.clone(), Arc::clone(&self.api))),
            }
        }
        if !previous.is_empty() {
            tracing::debug!("Removing {} film cards", previous.len());
        }
    }

    pub fn cards(&self) -> &[FilmCard<A>] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [FilmCard<A>] {
        &mut self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::film_list::filter_films;
    use crate::core::testing::{film, urls, FakeApi};

    fn film_with_relations() -> Film {
        let mut f = film("A New Hope", 4);
        f.characters = urls("people", &[1, 2]);
        f.starships = urls("starships", &[9]);
        f.opening_crawl = "It is a period of civil war. ".repeat(10);
        f
    }

    #[tokio::test]
    async fn test_loaders_take_urls_from_film() {
        let f = film_with_relations();
        let card = FilmCard::new(f.clone(), Arc::new(FakeApi::default()));

        assert_eq!(card.characters.urls(), f.related_urls(EntityKind::Characters));
        assert_eq!(card.starships.urls(), f.related_urls(EntityKind::Starships));
        assert!(card.vehicles.urls().is_empty());
        assert!(card.species.urls().is_empty());
        assert_eq!(card.track_key(), f.url);
    }

    #[tokio::test]
    async fn test_expand_triggers_only_matching_loader() {
        let api = Arc::new(FakeApi::default());
        let card = FilmCard::new(film_with_relations(), Arc::clone(&api));

        assert!(card.expand(EntityKind::Characters));
        assert!(!card.expand(EntityKind::Vehicles));
        assert_eq!(card.section_state(EntityKind::Vehicles), LoadingState::idle());
        let state = card.wait_for_section(EntityKind::Characters).await;

        assert_eq!(state, LoadingState::idle());
        assert_eq!(card.characters.entities().len(), 2);
        assert!(!card.starships.has_loaded());
        assert_eq!(api.related_calls(), 1);
    }

    #[tokio::test]
    async fn test_crawl_toggle() {
        let api = Arc::new(FakeApi::default());
        let mut card = FilmCard::new(film_with_relations(), api);

        assert!(card.crawl_text().ends_with("..."));
        assert_eq!(card.crawl_text().chars().count(), CRAWL_PREVIEW_LENGTH + 3);

        card.toggle_crawl();
        assert!(card.is_crawl_expanded());
        assert_eq!(card.crawl_text(), card.film().opening_crawl);
    }

    #[tokio::test]
    async fn test_deck_keeps_cache_for_cards_that_stay_visible() {
        let api = Arc::new(FakeApi::default());
        let mut empire = film("The Empire Strikes Back", 5);
        empire.characters = urls("people", &[1]);
        let films = vec![film_with_relations(), empire];

        let mut deck = CardDeck::new(Arc::clone(&api));
        deck.sync(&films);
        assert_eq!(deck.len(), 2);

        deck.cards()[1].expand(EntityKind::Characters);
        deck.cards()[1]
            .wait_for_section(EntityKind::Characters)
            .await;

        deck.sync(&filter_films(&films, "empire"));
        assert_eq!(deck.len(), 1);
        assert!(!deck.cards()[0].expand(EntityKind::Characters));
        assert_eq!(api.related_calls(), 1);
    }

    #[tokio::test]
    async fn test_deck_recreates_filtered_out_cards() {
        let api = Arc::new(FakeApi::default());
        let films = vec![film_with_relations()];

        let mut deck = CardDeck::new(Arc::clone(&api));
        deck.sync(&films);
        deck.cards()[0].expand(EntityKind::Starships);
        deck.cards()[0].wait_for_section(EntityKind::Starships).await;

        deck.sync(&[]);
        assert!(deck.is_empty());

        deck.sync(&films);
        assert!(!deck.cards()[0].starships.has_loaded());
        assert!(deck.cards()[0].expand(EntityKind::Starships));
        deck.cards()[0].wait_for_section(EntityKind::Starships).await;
        assert_eq!(api.related_calls(), 2);
    }
}
