//! Anki deck commands

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{row_label, CommandError, CommandResult};
use crate::anki::algorithm::{apply_review, format_interval, preview_intervals, ReviewResult};
use crate::anki::{
    build_anki_session, summarize_deck, AnkiConfig, AnkiGrade, AnkiProgress, DeckDueSummary,
};
use crate::clock::Clock;
use crate::storage::VocabRepository;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiCard {
    pub row_id: Uuid,
    pub table_id: Uuid,
    pub label: String,
    pub due_date: Option<DateTime<Utc>>,
    /// What Again, Hard, Good and Easy would schedule, formatted
    pub preview: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnkiDueView {
    pub deck_id: Uuid,
    pub deck_name: String,
    pub summary: DeckDueSummary,
    pub cards: Vec<AnkiCard>,
}

pub fn create_anki_deck(
    repo: &dyn VocabRepository,
    name: String,
    table_ids: Vec<Uuid>,
    config: AnkiConfig,
) -> CommandResult<AnkiProgress> {
    // Fail early on unknown tables
    repo.get_tables(&table_ids)?;

    let deck = AnkiProgress::new(name, table_ids, config);
    repo.save_anki_deck(&deck)?;
    log::info!("Created Anki deck {}", deck.name);
    Ok(deck)
}

/// Today's cards of a deck with its due summary
pub fn anki_due(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    deck_id: Uuid,
) -> CommandResult<AnkiDueView> {
    let deck = repo.get_anki_deck(deck_id)?;
    let tables = repo.get_tables(&deck.table_ids)?;
    let now = clock.now();

    let summary = summarize_deck(&deck, tables.iter().flat_map(|t| t.rows.iter()), now);

    // The daily limits apply to the deck as a whole, not per table
    let mut cards = Vec::new();
    for table in &tables {
        for row in build_anki_session(&deck, &table.rows, now) {
            cards.push(AnkiCard {
                row_id: row.id,
                table_id: table.id,
                label: row_label(table, row),
                due_date: row.stats.anki_due_date,
                preview: preview_intervals(&row.stats, now)
                    .iter()
                    .map(|d| format_interval(*d))
                    .collect(),
            });
        }
    }
    let (mut due, new): (Vec<AnkiCard>, Vec<AnkiCard>) =
        cards.into_iter().partition(|c| c.due_date.is_some());
    due.sort_by_key(|c| c.due_date);
    due.truncate(deck.anki_config.max_reviews_per_day as usize);
    due.extend(new.into_iter().take(deck.anki_config.new_cards_per_day as usize));

    Ok(AnkiDueView {
        deck_id: deck.id,
        deck_name: deck.name,
        summary,
        cards: due,
    })
}

/// Grade a card of a deck and reschedule it
pub fn review_anki_card(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    deck_id: Uuid,
    row_id: Uuid,
    grade: AnkiGrade,
) -> CommandResult<ReviewResult> {
    let deck = repo.get_anki_deck(deck_id)?;
    let mut tables = repo.get_tables(&deck.table_ids)?;

    let now = clock.now();
    let (table, result) = tables
        .iter_mut()
        .find_map(|t| {
            let result = apply_review(&mut t.row_mut(row_id)?.stats, grade, now);
            Some((t, result))
        })
        .ok_or_else(|| CommandError {
            message: format!("Row {} is not in deck {}", row_id, deck.name),
        })?;
    table.updated_at = now;
    repo.save_table(table)?;

    log::debug!(
        "Reviewed {} in {}: next in {} day(s), ease {:.2}",
        row_id,
        deck.name,
        result.interval,
        result.ease_factor
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::commands::test_support::{create_test_storage, seed_table};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 7, 30, 0).unwrap()
    }

    #[test]
    fn test_due_view_respects_limits() {
        let (storage, _temp) = create_test_storage();
        let mut table = seed_table(&storage);
        table.rows[2].stats.anki_due_date = Some(now() - Duration::days(1));
        table.rows[2].stats.anki_interval = 1;
        storage.save_table(&table).unwrap();

        let config = AnkiConfig {
            new_cards_per_day: 1,
            max_reviews_per_day: 100,
        };
        let deck = create_anki_deck(&storage, "Daily".to_string(), vec![table.id], config).unwrap();
        let view = anki_due(&storage, &FixedClock(now()), deck.id).unwrap();

        assert_eq!(view.summary.due_count, 1);
        assert_eq!(view.summary.new_count, 2);
        assert_eq!(view.summary.clamped_new_count, 1);
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[0].row_id, table.rows[2].id);
        assert_eq!(view.cards[0].preview.len(), 4);
    }

    #[test]
    fn test_review_schedules_row() {
        let (storage, _temp) = create_test_storage();
        let table = seed_table(&storage);
        let deck =
            create_anki_deck(&storage, "Daily".to_string(), vec![table.id], AnkiConfig::default())
                .unwrap();
        let row_id = table.rows[0].id;

        let clock = FixedClock(now());
        let result = review_anki_card(&storage, &clock, deck.id, row_id, AnkiGrade::Good).unwrap();

        assert_eq!(result.interval, 1);
        let saved = storage.get_table(table.id).unwrap();
        let stats = &saved.row(row_id).unwrap().stats;
        assert_eq!(stats.anki_due_date, Some(now() + Duration::days(1)));
        assert_eq!(stats.anki_repetitions, 1);
        assert_eq!(stats.correct, 1);
    }

    #[test]
    fn test_deck_over_unknown_table() {
        let (storage, _temp) = create_test_storage();
        let missing = vec![Uuid::new_v4()];
        assert!(
            create_anki_deck(&storage, "Nope".to_string(), missing, AnkiConfig::default()).is_err()
        );
    }
}
