use crate::domain::model::{LoadingState, RelatedEntity};
use crate::domain::ports::FilmApi;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// 延遲載入某部電影的一種關聯資料
///
/// 第一次 `trigger` 時才發出請求，之後的觸發都不做事；結果保留到 loader 被 drop 為止。
/// 每張電影卡片各自擁有 loader，不同電影之間不共用快取。
pub struct RelatedLoader<E: RelatedEntity, A: FilmApi + 'static> {
    api: Arc<A>,
    urls: Vec<String>,
    has_loaded: AtomicBool,
    entities: Arc<watch::Sender<Vec<E>>>,
    loading: Arc<watch::Sender<LoadingState>>,
    task: OnceLock<JoinHandle<()>>,
}

impl<E: RelatedEntity, A: FilmApi + 'static> RelatedLoader<E, A> {
    pub fn new(api: Arc<A>, urls: Vec<String>) -> Self {
        let (entities, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(LoadingState::idle());
        Self {
            api,
            urls,
            has_loaded: AtomicBool::new(false),
            entities: Arc::new(entities),
            loading: Arc::new(loading),
            task: OnceLock::new(),
        }
    }

    /// 面板展開時呼叫；回傳是否真的發出了請求
    pub fn trigger(&self) -> bool {
        if self.urls.is_empty() {
            return false;
        }
        // 在任何 await 之前就設定，重複觸發不會再發請求
        if self.has_loaded.swap(true, Ordering::SeqCst) {
            return false;
        }

        tracing::debug!("Loading {} {} entries", self.urls.len(), E::KIND);
        self.loading.send_replace(LoadingState::loading());

        let api = Arc::clone(&self.api);
        let urls = self.urls.clone();
        let entities = Arc::clone(&self.entities);
        let loading = Arc::clone(&self.loading);
        let handle = tokio::spawn(async move {
            match api.fetch_related::<E>(&urls).await {
                Ok(found) => {
                    entities.send_replace(found);
                    loading.send_replace(LoadingState::idle());
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", E::KIND, e);
                    loading.send_replace(LoadingState::failed(e.to_string()));
                }
            }
        });
        let _ = self.task.set(handle);
        true
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn entities(&self) -> Vec<E> {
        self.entities.borrow().clone()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading.borrow().clone()
    }

    pub fn subscribe_entities(&self) -> watch::Receiver<Vec<E>> {
        self.entities.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingState> {
        self.loading.subscribe()
    }

    pub async fn wait_until_settled(&self) -> LoadingState {
        let mut rx = self.loading.subscribe();
        let state = match rx.wait_for(LoadingState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.loading_state(),
        };
        state
    }
}

impl<E: RelatedEntity, A: FilmApi + 'static> Drop for RelatedLoader<E, A> {
    fn drop(&mut self) {
        if let Some(task) = self.task.get() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{urls, FakeApi};
    use crate::domain::model::{Character, Starship};
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_initial_state_is_unloaded() {
        let api = Arc::new(FakeApi::default());
        let loader: RelatedLoader<Character, _> = RelatedLoader::new(api, urls("people", &[1]));

        assert!(!loader.has_loaded());
        assert!(loader.entities().is_empty());
        assert_eq!(loader.loading_state(), LoadingState::idle());
    }

    #[tokio::test]
    async fn test_trigger_loads_entities_once() {
        let api = Arc::new(FakeApi::default());
        let loader: RelatedLoader<Character, _> =
            RelatedLoader::new(Arc::clone(&api), urls("people", &[1, 5]));

        assert!(loader.trigger());
        assert_eq!(loader.loading_state(), LoadingState::loading());

        let state = loader.wait_until_settled().await;
        assert_eq!(state, LoadingState::idle());
        let names: Vec<String> = loader.entities().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["1", "5"]);

        for _ in 0..3 {
            assert!(!loader.trigger());
        }
        assert_eq!(api.related_calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_triggers_before_resolution_fetch_once() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi::default().gated(Arc::clone(&gate)));
        let loader: RelatedLoader<Starship, _> =
            RelatedLoader::new(Arc::clone(&api), urls("starships", &[2, 3]));

        let started: Vec<bool> = (0..5).map(|_| loader.trigger()).collect();
        assert_eq!(started, vec![true, false, false, false, false]);
        {
            let mut settled = tokio_test::task::spawn(loader.wait_until_settled());
            tokio_test::assert_pending!(settled.poll());
        }

        gate.notify_one();
        loader.wait_until_settled().await;
        assert_eq!(loader.entities().len(), 2);
        assert_eq!(api.related_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_urls_never_fetch() {
        let api = Arc::new(FakeApi::default());
        let loader: RelatedLoader<Character, _> = RelatedLoader::new(Arc::clone(&api), vec![]);

        assert!(!loader.trigger());
        assert!(!loader.has_loaded());
        assert_eq!(loader.loading_state(), LoadingState::idle());
        tokio::task::yield_now().await;
        assert_eq!(api.related_calls(), 0);
    }

    #[tokio::test]
    async fn test_broken_url_dropped_without_error() {
        let all = urls("people", &[1, 404, 3]);
        let api = Arc::new(FakeApi {
            broken_urls: [all[1].clone()].into_iter().collect(),
            ..FakeApi::default()
        });
        let loader: RelatedLoader<Character, _> = RelatedLoader::new(api, all);

        loader.trigger();
        let state = loader.wait_until_settled().await;

        assert!(state.error.is_none());
        let names: Vec<String> = loader.entities().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_failure_sets_error_and_keeps_list() {
        let api = Arc::new(FakeApi {
            fail_related: true,
            ..FakeApi::default()
        });
        let loader: RelatedLoader<Character, _> = RelatedLoader::new(api, urls("people", &[1]));

        loader.trigger();
        let state = loader.wait_until_settled().await;

        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("Aggregation error: join failed"));
        assert!(loader.entities().is_empty());
        assert!(!loader.trigger());
    }

    #[tokio::test]
    async fn test_drop_discards_late_response() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeApi::default().gated(Arc::clone(&gate)));
        let loader: RelatedLoader<Character, _> =
            RelatedLoader::new(Arc::clone(&api), urls("people", &[1]));
        let mut entities = loader.subscribe_entities();
        let mut loading = loader.subscribe_loading();

        loader.trigger();
        tokio::task::yield_now().await;
        assert_eq!(api.related_calls(), 1);

        drop(loader);
        gate.notify_one();

        // 所有 sender 被釋放後 changed() 會回傳錯誤
        assert!(entities.changed().await.is_err());
        assert!(entities.borrow().is_empty());
        assert!(loading.borrow_and_update().is_loading);
        assert!(loading.changed().await.is_err());
    }
}
