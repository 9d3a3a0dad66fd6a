use std::sync::Mutex;
use tokio::sync::mpsc;

/// 目前的搜尋字串，訂閱者會先收到最新值，之後依序收到每次更新
#[derive(Debug, Default)]
pub struct SearchState {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    term: String,
    subscribers: Vec<mpsc::UnboundedSender<String>>,
}

pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&self, raw: &str) {
        let term = normalize_term(raw);
        let mut inner = self.lock();
        tracing::debug!("Search term set to {:?}", term);
        inner.term = term.clone();
        inner
            .subscribers
            .retain(|subscriber| subscriber.send(term.clone()).is_ok());
    }

    pub fn current_term(&self) -> String {
        self.lock().term.clone()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // 新的 receiver 一定還活著，send 不會失敗
        let _ = tx.send(inner.term.clone());
        inner.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // 鎖只在同步區段內持有；poisoned 時沿用內部資料
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
