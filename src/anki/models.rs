//! Data models for Anki-style decks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deck studied with the Anki scheduler over one or more tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiProgress {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub table_ids: Vec<Uuid>,
    #[serde(default)]
    pub anki_config: AnkiConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnkiProgress {
    pub fn new(name: String, table_ids: Vec<Uuid>, anki_config: AnkiConfig) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            table_ids,
            anki_config,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Daily limits of a deck
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiConfig {
    #[serde(default = "default_new_cards_per_day")]
    pub new_cards_per_day: u32,
    #[serde(default = "default_max_reviews_per_day")]
    pub max_reviews_per_day: u32,
}

fn default_new_cards_per_day() -> u32 {
    20
}

fn default_max_reviews_per_day() -> u32 {
    100
}

impl Default for AnkiConfig {
    fn default() -> Self {
        Self {
            new_cards_per_day: default_new_cards_per_day(),
            max_reviews_per_day: default_max_reviews_per_day(),
        }
    }
}

/// Answer button pressed in an Anki review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnkiGrade {
    Again,
    Hard,
    Good,
    Easy,
}

impl AnkiGrade {
    /// SM-2 quality (0-5) of the button
    pub fn quality(&self) -> i32 {
        match self {
            Self::Again => 1,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.quality() >= 3
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "again" | "1" => Some(Self::Again),
            "hard" | "2" => Some(Self::Hard),
            "good" | "3" => Some(Self::Good),
            "easy" | "4" => Some(Self::Easy),
            _ => None,
        }
    }
}
