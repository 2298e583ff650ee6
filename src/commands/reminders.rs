use super::CommandResult;
use crate::clock::Clock;
use crate::notifications::{sweep_anki_decks, MemorySink, Notification};
use crate::storage::VocabRepository;

/// Run the Anki reminder sweep over every saved deck
pub fn anki_reminders(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
) -> CommandResult<Vec<Notification>> {
    let decks = repo.list_anki_decks()?;
    let tables = repo.list_tables()?;

    let mut sink = MemorySink::default();
    sweep_anki_decks(&decks, &tables, clock, &mut sink);
    Ok(sink.notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anki::AnkiConfig;
    use crate::clock::SystemClock;
    use crate::commands::create_anki_deck;
    use crate::commands::test_support::{create_test_storage, seed_table};

    #[test]
    fn test_only_open_decks_remind() {
        let (storage, _temp) = create_test_storage();
        let table = seed_table(&storage);
        let closed = AnkiConfig {
            new_cards_per_day: 0,
            max_reviews_per_day: 100,
        };
        create_anki_deck(&storage, "Closed".to_string(), vec![table.id], closed).unwrap();
        let open =
            create_anki_deck(&storage, "Open".to_string(), vec![table.id], AnkiConfig::default())
                .unwrap();

        let sent = anki_reminders(&storage, &SystemClock).unwrap();

        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, format!("Time to review {}", open.name));
        assert_eq!(sent[0].action.screen, "anki");
    }

    #[test]
    fn test_no_decks_no_reminders() {
        let (storage, _temp) = create_test_storage();
        assert!(anki_reminders(&storage, &SystemClock).unwrap().is_empty());
    }
}
