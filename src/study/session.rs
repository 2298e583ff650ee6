//! Answering and closing study sessions
//!
//! Stats are written back once, when the session is closed. A row counts as
//! having appeared in the session once, however many questions it produced.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::models::*;
use crate::vocab::VocabTable;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Table not found: {0}")]
    TableNotFound(Uuid),

    #[error("Relation not found: {0}")]
    RelationNotFound(Uuid),

    #[error("No row in the selected sources can be asked in the selected modes")]
    NoQuestions,

    #[error("Session is no longer in progress")]
    NotInProgress,

    #[error("Every question of the session has been answered")]
    AllAnswered,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Record the answer to the current question and advance the cursor
pub fn record_answer(progress: &mut StudyProgress, correct: bool) -> Result<()> {
    if progress.status != SessionStatus::InProgress {
        return Err(SessionError::NotInProgress);
    }
    let (row_id, table_id) = progress
        .current()
        .map(|q| (q.row_id, q.table_id))
        .ok_or(SessionError::AllAnswered)?;

    progress.answers.push(AnswerRecord {
        row_id,
        table_id,
        correct,
    });
    progress.current_index += 1;
    progress.updated_at = Utc::now();
    Ok(())
}

/// Finish a session and write its results into the row stats
pub fn finish_session(
    progress: &mut StudyProgress,
    tables: &mut [VocabTable],
    now: DateTime<Utc>,
) -> Result<SessionSummary> {
    close_session(progress, tables, now, SessionStatus::Finished)
}

/// Abandon a session. Rows that were never answered are flagged so the
/// priority score brings them back first.
pub fn quit_session(
    progress: &mut StudyProgress,
    tables: &mut [VocabTable],
    now: DateTime<Utc>,
) -> Result<SessionSummary> {
    close_session(progress, tables, now, SessionStatus::Quit)
}

fn close_session(
    progress: &mut StudyProgress,
    tables: &mut [VocabTable],
    now: DateTime<Utc>,
    status: SessionStatus,
) -> Result<SessionSummary> {
    if progress.status != SessionStatus::InProgress {
        return Err(SessionError::NotInProgress);
    }

    let mut session_rows: Vec<(Uuid, Uuid)> = Vec::new();
    for question in &progress.queue {
        let key = (question.table_id, question.row_id);
        if !session_rows.contains(&key) {
            session_rows.push(key);
        }
    }
    let answered_rows: HashSet<Uuid> = progress.answers.iter().map(|a| a.row_id).collect();

    let mut summary = SessionSummary {
        status,
        answered: progress.answers.len(),
        correct: progress.answers.iter().filter(|a| a.correct).count(),
        incorrect: progress.answers.iter().filter(|a| !a.correct).count(),
        rows: session_rows.len(),
        quit_rows: 0,
    };

    for answer in &progress.answers {
        let Some(row) = tables
            .iter_mut()
            .find(|t| t.id == answer.table_id)
            .and_then(|t| t.row_mut(answer.row_id))
        else {
            log::warn!("Answered row {} no longer exists", answer.row_id);
            continue;
        };
        if answer.correct {
            row.stats.correct += 1;
        } else {
            row.stats.incorrect += 1;
        }
    }

    for (table_id, row_id) in &session_rows {
        let Some(table) = tables.iter_mut().find(|t| t.id == *table_id) else {
            continue;
        };
        let Some(row) = table.row_mut(*row_id) else {
            continue;
        };

        row.stats.in_queue_count += 1;
        if answered_rows.contains(row_id) {
            row.stats.last_studied = Some(now);
            row.stats.last_practice_date = Some(now);
            row.stats.was_quit = false;
        } else if status == SessionStatus::Quit {
            row.stats.was_quit = true;
            summary.quit_rows += 1;
        }
        table.updated_at = now;
    }

    progress.status = status;
    progress.updated_at = now;

    log::info!(
        "Closed session {} as {:?}: {}/{} correct over {} rows",
        progress.id,
        status,
        summary.correct,
        summary.answered,
        summary.rows
    );

    Ok(summary)
}
