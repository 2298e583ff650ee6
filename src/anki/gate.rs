//! Due-date gate and daily session for Anki decks
//!
//! The gate is re-evaluated from the rows on every call; nothing is cached.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::models::AnkiProgress;
use crate::vocab::{RowStats, VocabRow};

/// Due and new card counts of a deck at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDueSummary {
    pub due_count: usize,
    /// All unscheduled rows
    pub new_count: usize,
    /// New rows the deck's daily limit lets through
    pub clamped_new_count: usize,
}

impl DeckDueSummary {
    /// Whether a reminder should fire for the deck
    pub fn should_notify(&self) -> bool {
        self.due_count > 0 || self.clamped_new_count > 0
    }
}

pub fn is_due(stats: &RowStats, now: DateTime<Utc>) -> bool {
    matches!(stats.anki_due_date, Some(due) if due <= now)
}

pub fn is_new(stats: &RowStats) -> bool {
    stats.anki_due_date.is_none()
}

pub fn summarize_deck<'a>(
    deck: &AnkiProgress,
    rows: impl IntoIterator<Item = &'a VocabRow>,
    now: DateTime<Utc>,
) -> DeckDueSummary {
    let mut due_count = 0;
    let mut new_count = 0;
    for row in rows {
        if is_new(&row.stats) {
            new_count += 1;
        } else if is_due(&row.stats, now) {
            due_count += 1;
        }
    }

    let clamped_new_count = new_count.min(deck.anki_config.new_cards_per_day as usize);

    DeckDueSummary {
        due_count,
        new_count,
        clamped_new_count,
    }
}

/// Cards to study today: due rows oldest first, capped at the review limit,
/// followed by new rows capped at the new card limit
pub fn build_anki_session<'a>(
    deck: &AnkiProgress,
    rows: &'a [VocabRow],
    now: DateTime<Utc>,
) -> Vec<&'a VocabRow> {
    let mut due: Vec<&VocabRow> = rows.iter().filter(|r| is_due(&r.stats, now)).collect();
    due.sort_by_key(|r| r.stats.anki_due_date);
    due.truncate(deck.anki_config.max_reviews_per_day as usize);

    let new_rows = rows
        .iter()
        .filter(|r| is_new(&r.stats))
        .take(deck.anki_config.new_cards_per_day as usize);

    due.into_iter().chain(new_rows).collect()
}
