use crate::core::search::{normalize_term, SearchState};
use crate::domain::model::{Film, LoadingState};
use crate::domain::ports::FilmApi;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmListState {
    pub films: Vec<Film>,
    pub loading: LoadingState,
}

/// 標題包含搜尋字串 (不分大小寫) 的電影；空字串回傳全部
pub fn filter_films(films: &[Film], term: &str) -> Vec<Film> {
    let term = normalize_term(term);
    if term.is_empty() {
        return films.to_vec();
    }
    films
        .iter()
        .filter(|film| film.title.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

/// 載入一次電影清單，再與搜尋字串組合出要顯示的清單
///
/// 必須在 tokio runtime 內建立。drop 時會取消尚未完成的請求與篩選工作。
pub struct FilmListController {
    search: Arc<SearchState>,
    state: Arc<watch::Sender<FilmListState>>,
    visible: Arc<watch::Sender<Vec<Film>>>,
    tasks: Vec<JoinHandle<()>>,
}

impl FilmListController {
    pub fn start<A: FilmApi + 'static>(api: Arc<A>, search: Arc<SearchState>) -> Self {
        let (state_tx, _) = watch::channel(FilmListState {
            films: Vec::new(),
            loading: LoadingState::loading(),
        });
        let state = Arc::new(state_tx);
        let (visible_tx, _) = watch::channel(Vec::new());
        let visible = Arc::new(visible_tx);

        let load_task = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                match api.fetch_films().await {
                    Ok(films) => state.send_modify(|s| {
                        s.films = films;
                        s.loading = LoadingState::idle();
                    }),
                    Err(e) => {
                        tracing::warn!("Failed to load films: {}", e);
                        state.send_modify(|s| s.loading = LoadingState::failed(e.to_string()));
                    }
                }
            })
        };

        let filter_task = {
            let mut terms = search.subscribe();
            let mut state_rx = state.subscribe();
            let visible = Arc::clone(&visible);
            tokio::spawn(async move {
                let mut term = String::new();
                loop {
                    tokio::select! {
                        next = terms.recv() => match next {
                            Some(next) => term = next,
                            None => break,
                        },
                        changed = state_rx.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                    }
                    let films = filter_films(&state_rx.borrow_and_update().films, &term);
                    visible.send_replace(films);
                }
            })
        };

        Self {
            search,
            state,
            visible,
            tasks: vec![load_task, filter_task],
        }
    }

    pub fn state(&self) -> FilmListState {
        self.state.borrow().clone()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.state.borrow().loading.clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<FilmListState> {
        self.state.subscribe()
    }

    /// 同步計算，不等待篩選工作
    pub fn visible_films(&self) -> Vec<Film> {
        filter_films(&self.state.borrow().films, &self.search.current_term())
    }

    pub fn subscribe_visible(&self) -> watch::Receiver<Vec<Film>> {
        self.visible.subscribe()
    }

    pub async fn wait_until_settled(&self) -> FilmListState {
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|s| s.loading.is_settled()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}

impl Drop for FilmListController {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
