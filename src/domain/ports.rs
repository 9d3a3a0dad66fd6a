use crate::domain::model::{Film, RelatedEntity};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 電影資料 API 的抽象，方便在測試中替換
#[async_trait]
pub trait FilmApi: Send + Sync {
    async fn fetch_films(&self) -> Result<Vec<Film>>;

    /// 並行取得每個 URL 的資料；單筆失敗直接略過，結果保持輸入順序
    async fn fetch_related<E: RelatedEntity>(&self, urls: &[String]) -> Result<Vec<E>>;
}
