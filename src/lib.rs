pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CatalogSettings, CliConfig};

pub use adapters::{SwapiClient, DEFAULT_BASE_URL};
pub use app::{run_catalog, CatalogRequest, CatalogSummary};
pub use config::{ApiConfig, TomlConfig};
pub use crate::core::film_card::{CardDeck, FilmCard};
pub use crate::core::film_list::{filter_films, FilmListController, FilmListState};
pub use crate::core::related::RelatedLoader;
pub use crate::core::search::SearchState;
pub use domain::model::{
    Character, EntityKind, Film, LoadingState, RelatedEntity, Species, Starship, Vehicle,
};
pub use domain::ports::FilmApi;
pub use utils::error::{CatalogError, Result};
