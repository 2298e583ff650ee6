//! Reminder sweep over Anki decks

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{Notification, NotificationAction, NotificationSink};
use crate::anki::{summarize_deck, AnkiProgress, DeckDueSummary};
use crate::clock::Clock;
use crate::vocab::{VocabRow, VocabTable};

pub const ANKI_SCREEN: &str = "anki";

/// Stable id for a deck's reminder on a calendar day
pub fn reminder_id(deck_id: Uuid, now: DateTime<Utc>) -> Uuid {
    let name = format!("anki-reminder:{}:{}", deck_id, now.format("%Y-%m-%d"));
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

/// Reminder for a deck, or `None` when the gate stays closed
pub fn anki_reminder(
    deck: &AnkiProgress,
    summary: &DeckDueSummary,
    now: DateTime<Utc>,
) -> Option<Notification> {
    if !summary.should_notify() {
        return None;
    }

    let mut parts = Vec::new();
    if summary.due_count > 0 {
        parts.push(format!(
            "{} card{} due for review",
            summary.due_count,
            if summary.due_count == 1 { "" } else { "s" }
        ));
    }
    if summary.clamped_new_count > 0 {
        parts.push(format!(
            "{} new card{}",
            summary.clamped_new_count,
            if summary.clamped_new_count == 1 { "" } else { "s" }
        ));
    }

    Some(Notification {
        id: reminder_id(deck.id, now),
        title: format!("Time to review {}", deck.name),
        message: format!("{}.", parts.join(" and ")),
        action: NotificationAction {
            screen: ANKI_SCREEN.to_string(),
        },
        created_at: now,
    })
}

/// Rows of every table a deck covers
pub fn deck_rows<'a>(deck: &AnkiProgress, tables: &'a [VocabTable]) -> Vec<&'a VocabRow> {
    tables
        .iter()
        .filter(|t| deck.table_ids.contains(&t.id))
        .flat_map(|t| t.rows.iter())
        .collect()
}

/// Evaluate every deck and push a reminder for each open gate.
/// Returns the number of reminders the sink accepted.
pub fn sweep_anki_decks(
    decks: &[AnkiProgress],
    tables: &[VocabTable],
    clock: &dyn Clock,
    sink: &mut dyn NotificationSink,
) -> usize {
    let now = clock.now();
    let mut sent = 0;

    for deck in decks {
        let summary = summarize_deck(deck, deck_rows(deck, tables), now);
        log::debug!(
            "Deck {} has {} due and {} new ({} allowed today)",
            deck.name,
            summary.due_count,
            summary.new_count,
            summary.clamped_new_count
        );

        if let Some(notification) = anki_reminder(deck, &summary, now) {
            if sink.add_notification(notification) {
                sent += 1;
            } else {
                log::debug!("Reminder for {} already sent today", deck.name);
            }
        }
    }

    if sent > 0 {
        log::info!("Anki sweep sent {} reminder(s)", sent);
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::AnkiConfig;
    use crate::clock::FixedClock;
    use crate::notifications::MemorySink;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 2, 7, 30, 0).unwrap()
    }

    fn table_with(due_dates: &[Option<DateTime<Utc>>]) -> VocabTable {
        let mut table = VocabTable::new("Verbs".to_string());
        for due in due_dates {
            let mut row = VocabRow::new();
            row.stats.anki_due_date = *due;
            table.rows.push(row);
        }
        table
    }

    fn deck_for(table: &VocabTable, new_cards_per_day: u32) -> AnkiProgress {
        AnkiProgress::new(
            "Verbs deck".to_string(),
            vec![table.id],
            AnkiConfig {
                new_cards_per_day,
                max_reviews_per_day: 100,
            },
        )
    }

    #[test]
    fn test_sweep_skips_deck_with_only_blocked_new_cards() {
        let table = table_with(&[None, None, None]);
        let deck = deck_for(&table, 0);
        let mut sink = MemorySink::default();

        let sent = sweep_anki_decks(&[deck], &[table], &FixedClock(now()), &mut sink);

        assert_eq!(sent, 0);
        assert!(sink.notifications.is_empty());
    }

    #[test]
    fn test_sweep_reports_due_card() {
        let table = table_with(&[Some(now() - Duration::days(1))]);
        let deck = deck_for(&table, 5);
        let mut sink = MemorySink::default();

        let sent = sweep_anki_decks(&[deck.clone()], &[table], &FixedClock(now()), &mut sink);

        assert_eq!(sent, 1);
        let notification = &sink.notifications[0];
        assert_eq!(notification.id, reminder_id(deck.id, now()));
        assert_eq!(notification.action.screen, "anki");
        assert_eq!(notification.message, "1 card due for review.");
    }

    #[test]
    fn test_sweep_ignores_tables_outside_deck() {
        let covered = table_with(&[Some(now() + Duration::days(2))]);
        let other = table_with(&[Some(now() - Duration::days(2))]);
        let deck = deck_for(&covered, 5);
        let mut sink = MemorySink::default();

        let sent = sweep_anki_decks(&[deck], &[covered, other], &FixedClock(now()), &mut sink);
        assert_eq!(sent, 0);
    }

    #[test]
    fn test_reminder_message_mentions_new_cards() {
        let table =
            table_with(&[Some(now() - Duration::days(1)), Some(now()), None, None, None]);
        let deck = deck_for(&table, 2);
        let rows = deck_rows(&deck, std::slice::from_ref(&table));
        let summary = summarize_deck(&deck, rows, now());

        let notification = anki_reminder(&deck, &summary, now()).unwrap();
        assert_eq!(notification.message, "2 cards due for review and 2 new cards.");
        assert_eq!(notification.title, "Time to review Verbs deck");
    }

    #[test]
    fn test_reminder_id_is_stable_within_a_day() {
        let deck_id = Uuid::new_v4();
        let today = reminder_id(deck_id, now());
        assert_eq!(today, reminder_id(deck_id, now() + Duration::hours(3)));
        assert_ne!(today, reminder_id(deck_id, now() + Duration::days(1)));
    }

    #[test]
    fn test_memory_sink_skips_repeated_reminder() {
        let table = table_with(&[Some(now() - Duration::days(1))]);
        let deck = deck_for(&table, 5);
        let decks = [deck];
        let tables = [table];
        let mut sink = MemorySink::default();

        let first = sweep_anki_decks(&decks, &tables, &FixedClock(now()), &mut sink);
        let later = FixedClock(now() + Duration::hours(1));
        let second = sweep_anki_decks(&decks, &tables, &later, &mut sink);

        assert_eq!((first, second), (1, 0));
        assert_eq!(sink.notifications.len(), 1);
    }
}
