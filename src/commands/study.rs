//! Study session commands
//!
//! A session is generated from saved settings, answered one question at a
//! time and closed either when the last question is answered or when the
//! user quits. Row stats are written to the tables only on close.

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use super::{CommandError, CommandResult};
use crate::clock::Clock;
use crate::storage::VocabRepository;
use crate::study::{
    finish_session, generate_session, quit_session, record_answer, SessionSummary, StudyProgress,
    StudySettings,
};
use crate::validation::{BasicQuestionBuilder, StudyQuestion};
use crate::vocab::{PriorityWeights, VocabTable};

/// How the user answered the current question
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Self-assessed, as for flashcards
    Graded(bool),
    /// Typed or picked text, checked against the expected answer
    Response(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub expected: Option<String>,
    pub remaining: usize,
    pub next: Option<StudyQuestion>,
    /// Set when this answer completed the session
    pub summary: Option<SessionSummary>,
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Whether a response matches the expected answer or one of its
/// `" / "`-separated alternatives
pub fn response_matches(expected: &str, response: &str) -> bool {
    let response = normalize(response);
    if response.is_empty() {
        return false;
    }
    normalize(expected) == response || expected.split(" / ").any(|alt| normalize(alt) == response)
}

pub fn create_study_settings(
    repo: &dyn VocabRepository,
    settings: StudySettings,
) -> CommandResult<StudySettings> {
    let table_ids: Vec<Uuid> = settings.sources.iter().map(|s| s.table_id).collect();
    repo.get_tables(&table_ids)?;

    repo.save_study_settings(&settings)?;
    Ok(settings)
}

fn settings_tables(
    repo: &dyn VocabRepository,
    settings: &StudySettings,
) -> CommandResult<Vec<VocabTable>> {
    let mut table_ids: Vec<Uuid> = Vec::new();
    for source in &settings.sources {
        if !table_ids.contains(&source.table_id) {
            table_ids.push(source.table_id);
        }
    }
    Ok(repo.get_tables(&table_ids)?)
}

/// Generate and save a new session from saved settings
pub fn start_session<R: Rng + ?Sized>(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    settings_id: Uuid,
    weights: &PriorityWeights,
    rng: &mut R,
) -> CommandResult<StudyProgress> {
    let settings = repo.get_study_settings(settings_id)?;
    let tables = settings_tables(repo, &settings)?;

    let progress = generate_session(
        &settings,
        &tables,
        &BasicQuestionBuilder,
        weights,
        clock.now(),
        rng,
    )?;
    repo.save_study_progress(&progress)?;
    Ok(progress)
}

/// Answer the current question. The session is finished and its stats
/// written once the last question is answered.
pub fn answer_question(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    progress_id: Uuid,
    answer: Answer,
) -> CommandResult<AnswerOutcome> {
    let mut progress = repo.get_study_progress(progress_id)?;
    let expected = progress.current().and_then(|q| q.answer.clone());

    let correct = match answer {
        Answer::Graded(correct) => correct,
        Answer::Response(response) => match &expected {
            Some(expected) => response_matches(expected, &response),
            None => {
                return Err(CommandError {
                    message: "This question has no answer to check; grade it instead".to_string(),
                })
            }
        },
    };
    record_answer(&mut progress, correct)?;

    let summary = if progress.is_complete() {
        let settings = repo.get_study_settings(progress.settings_id)?;
        let mut tables = settings_tables(repo, &settings)?;
        let summary = finish_session(&mut progress, &mut tables, clock.now())?;
        for table in &tables {
            repo.save_table(table)?;
        }
        Some(summary)
    } else {
        None
    };
    repo.save_study_progress(&progress)?;

    Ok(AnswerOutcome {
        correct,
        expected,
        remaining: progress.remaining(),
        next: progress.current().cloned(),
        summary,
    })
}

/// Abandon a session, flagging the rows that were never answered
pub fn quit_study_session(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    progress_id: Uuid,
) -> CommandResult<SessionSummary> {
    let mut progress = repo.get_study_progress(progress_id)?;
    let settings = repo.get_study_settings(progress.settings_id)?;
    let mut tables = settings_tables(repo, &settings)?;

    let summary = quit_session(&mut progress, &mut tables, clock.now())?;
    for table in &tables {
        repo.save_table(table)?;
    }
    repo.save_study_progress(&progress)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::commands::test_support::{create_test_storage, seed_table};
    use crate::study::{SessionStatus, StudySource, WordSelection};
    use crate::vocab::InteractionMode;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 9, 1, 19, 0, 0).unwrap())
    }

    fn typing_settings(table: &VocabTable, count: usize) -> StudySettings {
        let source = StudySource {
            table_id: table.id,
            relation_ids: Vec::new(),
        };
        let mut settings = StudySettings::new(
            "Evening".to_string(),
            vec![source],
            WordSelection::WordCount(count),
        );
        settings.modes = vec![InteractionMode::Typing];
        settings
    }

    #[test]
    fn test_response_matching() {
        assert!(response_matches("dog", "  Dog "));
        assert!(response_matches("dog / hound", "hound"));
        assert!(response_matches("big   house", "big house"));
        assert!(!response_matches("dog", "cat"));
        assert!(!response_matches("dog", "   "));
    }

    #[test]
    fn test_full_session_writes_stats() {
        let (storage, _temp) = create_test_storage();
        let table = seed_table(&storage);
        let settings = create_study_settings(&storage, typing_settings(&table, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let weights = PriorityWeights::default();
        let progress = start_session(&storage, &clock(), settings.id, &weights, &mut rng).unwrap();
        assert_eq!(progress.queue.len(), 2);

        let first_expected = progress.queue[0].answer.clone().unwrap();
        let answer = Answer::Response(first_expected);
        let outcome = answer_question(&storage, &clock(), progress.id, answer).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.remaining, 1);
        assert!(outcome.summary.is_none());

        let answer = Answer::Response("wrong".to_string());
        let outcome = answer_question(&storage, &clock(), progress.id, answer).unwrap();
        assert!(!outcome.correct);
        let summary = outcome.summary.unwrap();
        assert_eq!(summary.status, SessionStatus::Finished);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.incorrect, 1);

        let saved = storage.get_table(table.id).unwrap();
        let studied: Vec<_> = saved.rows.iter().filter(|r| r.stats.in_queue_count == 1).collect();
        assert_eq!(studied.len(), 2);
        assert!(studied.iter().all(|r| r.stats.last_practice_date == Some(clock().0)));

        let err =
            answer_question(&storage, &clock(), progress.id, Answer::Graded(true)).unwrap_err();
        assert_eq!(err.message, "Session is no longer in progress");
    }

    #[test]
    fn test_quit_flags_rows() {
        let (storage, _temp) = create_test_storage();
        let table = seed_table(&storage);
        let settings = create_study_settings(&storage, typing_settings(&table, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let weights = PriorityWeights::default();
        let progress = start_session(&storage, &clock(), settings.id, &weights, &mut rng).unwrap();

        answer_question(&storage, &clock(), progress.id, Answer::Graded(true)).unwrap();
        let summary = quit_study_session(&storage, &clock(), progress.id).unwrap();

        assert_eq!(summary.quit_rows, 2);
        let saved = storage.get_table(table.id).unwrap();
        assert_eq!(saved.rows.iter().filter(|r| r.stats.was_quit).count(), 2);
        assert_eq!(
            storage.get_study_progress(progress.id).unwrap().status,
            SessionStatus::Quit
        );
    }

    #[test]
    fn test_settings_over_unknown_table() {
        let (storage, _temp) = create_test_storage();
        let source = StudySource {
            table_id: Uuid::new_v4(),
            relation_ids: Vec::new(),
        };
        let settings = StudySettings::new(
            "Nowhere".to_string(),
            vec![source],
            WordSelection::WordCount(5),
        );
        assert!(create_study_settings(&storage, settings).is_err());
    }
}
