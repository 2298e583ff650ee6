//! Data models for Confidence reviews

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-reported grade of a card in a Confidence review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlashcardStatus {
    /// Never graded; never stored in `card_states`
    New,
    Again,
    Hard,
    Good,
    Easy,
    Perfect,
    Superb,
}

impl Default for FlashcardStatus {
    fn default() -> Self {
        Self::New
    }
}

impl FlashcardStatus {
    pub const GRADES: [FlashcardStatus; 6] = [
        Self::Again,
        Self::Hard,
        Self::Good,
        Self::Easy,
        Self::Perfect,
        Self::Superb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
            Self::Perfect => "perfect",
            Self::Superb => "superb",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "new" => Some(Self::New),
            "again" => Some(Self::Again),
            "hard" => Some(Self::Hard),
            "good" => Some(Self::Good),
            "easy" => Some(Self::Easy),
            "perfect" => Some(Self::Perfect),
            "superb" => Some(Self::Superb),
            _ => None,
        }
    }
}

/// A named Confidence review over one or more tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceProgress {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub table_ids: Vec<Uuid>,
    /// Row ids in review order; the front is the current card
    #[serde(default)]
    pub queue: Vec<Uuid>,
    #[serde(default)]
    pub card_states: HashMap<Uuid, FlashcardStatus>,
    /// How many unseen rows `add_new_words` introduces at a time
    #[serde(default = "default_new_word_count")]
    pub new_word_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_new_word_count() -> usize {
    10
}

impl ConfidenceProgress {
    pub fn new(
        name: String,
        table_ids: Vec<Uuid>,
        queue: Vec<Uuid>,
        new_word_count: usize,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            table_ids,
            queue,
            card_states: HashMap::new(),
            new_word_count,
            created_at: now,
            updated_at: now,
        }
    }

    /// The card currently under review
    pub fn front(&self) -> Option<Uuid> {
        self.queue.first().copied()
    }

    pub fn status_of(&self, row_id: Uuid) -> FlashcardStatus {
        self.card_states.get(&row_id).copied().unwrap_or_default()
    }

    /// Count of queued cards per status, `New` included
    pub fn status_counts(&self) -> HashMap<FlashcardStatus, usize> {
        let mut counts = HashMap::new();
        for row_id in &self.queue {
            *counts.entry(self.status_of(*row_id)).or_insert(0) += 1;
        }
        counts
    }
}
