use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 卡片上預設顯示的開場字幕長度
pub const CRAWL_PREVIEW_LENGTH: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub episode_id: u32,
    #[serde(default)]
    pub opening_crawl: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub planets: Vec<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub edited: String,
    pub url: String,
}

impl Film {
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d").ok()
    }

    /// 超過 `max_chars` 個字元時截斷並加上 `...`
    pub fn truncated_crawl(&self, max_chars: usize) -> String {
        if self.opening_crawl.chars().count() <= max_chars {
            return self.opening_crawl.clone();
        }
        let cut: String = self.opening_crawl.chars().take(max_chars).collect();
        format!("{}...", cut)
    }

    pub fn related_urls(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Characters => &self.characters,
            EntityKind::Starships => &self.starships,
            EntityKind::Vehicles => &self.vehicles,
            EntityKind::Species => &self.species,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum EntityKind {
    Characters,
    Starships,
    Vehicles,
    Species,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Characters,
        EntityKind::Starships,
        EntityKind::Vehicles,
        EntityKind::Species,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Characters => "Characters",
            EntityKind::Starships => "Starships",
            EntityKind::Vehicles => "Vehicles",
            EntityKind::Species => "Species",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 由 URL 參照的關聯資料 (角色、星艦、載具、物種)
pub trait RelatedEntity:
    DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    const KIND: EntityKind;

    fn url(&self) -> &str;
    fn name(&self) -> &str;
    /// 清單中名稱後面的一行說明
    fn summary(&self) -> String;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub name: String,
    pub height: String,
    pub mass: String,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_year: String,
    pub gender: String,
    pub homeworld: String,
    pub films: Vec<String>,
    pub species: Vec<String>,
    pub vehicles: Vec<String>,
    pub starships: Vec<String>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

impl RelatedEntity for Character {
    const KIND: EntityKind = EntityKind::Characters;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("born {}, {}", self.birth_year, self.gender)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Starship {
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub cost_in_credits: String,
    pub length: String,
    pub max_atmosphering_speed: String,
    pub crew: String,
    pub passengers: String,
    pub cargo_capacity: String,
    pub consumables: String,
    pub hyperdrive_rating: String,
    #[serde(rename = "MGLT")]
    pub mglt: String,
    pub starship_class: String,
    pub pilots: Vec<String>,
    pub films: Vec<String>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

impl RelatedEntity for Starship {
    const KIND: EntityKind = EntityKind::Starships;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.model, self.starship_class)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vehicle {
    pub name: String,
    pub model: String,
    pub manufacturer: String,
    pub cost_in_credits: String,
    pub length: String,
    pub max_atmosphering_speed: String,
    pub crew: String,
    pub passengers: String,
    pub cargo_capacity: String,
    pub consumables: String,
    pub vehicle_class: String,
    pub pilots: Vec<String>,
    pub films: Vec<String>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

impl RelatedEntity for Vehicle {
    const KIND: EntityKind = EntityKind::Vehicles;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{} ({})", self.model, self.vehicle_class)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Species {
    pub name: String,
    pub classification: String,
    pub designation: String,
    pub average_height: String,
    pub skin_colors: String,
    pub hair_colors: String,
    pub eye_colors: String,
    pub average_lifespan: String,
    pub homeworld: Option<String>,
    pub language: String,
    pub people: Vec<String>,
    pub films: Vec<String>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

impl RelatedEntity for Species {
    const KIND: EntityKind = EntityKind::Species;

    fn url(&self) -> &str {
        &self.url
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> String {
        format!("{}, speaks {}", self.classification, self.language)
    }
}

/// 每個元件各自的載入狀態；`is_loading` 為 true 時不會同時帶有錯誤
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LoadingState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_loading: false,
            error: Some(message.into()),
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}
