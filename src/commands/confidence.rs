//! Confidence review commands

use serde::Serialize;
use uuid::Uuid;

use super::{row_label, CommandError, CommandResult};
use crate::clock::Clock;
use crate::confidence::queue::add_new_words;
use crate::confidence::{apply_grade, ConfidenceProgress, FlashcardStatus};
use crate::storage::VocabRepository;
use crate::vocab::priority::rank_by_priority;
use crate::vocab::{PriorityWeights, VocabTable};

/// The card at the front of a review
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceCard {
    pub row_id: Uuid,
    pub label: String,
    pub status: FlashcardStatus,
    pub viewed: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceOverview {
    pub id: Uuid,
    pub name: String,
    pub queue_len: usize,
    pub current: Option<ConfidenceCard>,
    pub status_counts: Vec<(FlashcardStatus, usize)>,
}

/// Row ids of the given tables, most urgent first
fn rows_by_priority(
    tables: &[VocabTable],
    clock: &dyn Clock,
    weights: &PriorityWeights,
) -> Vec<Uuid> {
    let rows = tables.iter().flat_map(|t| t.rows.iter());
    rank_by_priority(rows, clock.now(), weights)
        .into_iter()
        .map(|scored| scored.row.id)
        .collect()
}

fn current_card(progress: &ConfidenceProgress, tables: &[VocabTable]) -> Option<ConfidenceCard> {
    let row_id = progress.front()?;
    let (table, row) = tables
        .iter()
        .find_map(|t| t.row(row_id).map(|r| (t, r)))?;
    Some(ConfidenceCard {
        row_id,
        label: row_label(table, row),
        status: progress.status_of(row_id),
        viewed: row.stats.confi_viewed,
    })
}

fn overview(progress: &ConfidenceProgress, tables: &[VocabTable]) -> ConfidenceOverview {
    let counts = progress.status_counts();
    let status_counts = std::iter::once(FlashcardStatus::New)
        .chain(FlashcardStatus::GRADES)
        .map(|s| (s, counts.get(&s).copied().unwrap_or(0)))
        .collect();

    ConfidenceOverview {
        id: progress.id,
        name: progress.name.clone(),
        queue_len: progress.queue.len(),
        current: current_card(progress, tables),
        status_counts,
    }
}

/// Start a review seeded with the most urgent rows of the tables
pub fn create_confidence_review(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    name: String,
    table_ids: Vec<Uuid>,
    new_word_count: usize,
    weights: &PriorityWeights,
) -> CommandResult<ConfidenceProgress> {
    let tables = repo.get_tables(&table_ids)?;
    let mut progress = ConfidenceProgress::new(name, table_ids, Vec::new(), new_word_count);
    let added = add_new_words(&mut progress, &rows_by_priority(&tables, clock, weights));
    if added.is_empty() {
        return Err(CommandError {
            message: "The selected tables have no rows".to_string(),
        });
    }

    repo.save_confidence(&progress)?;
    log::info!("Created confidence review {} with {} cards", progress.name, added.len());
    Ok(progress)
}

pub fn show_confidence_review(
    repo: &dyn VocabRepository,
    progress_id: Uuid,
) -> CommandResult<ConfidenceOverview> {
    let progress = repo.get_confidence(progress_id)?;
    let tables = repo.get_tables(&progress.table_ids)?;
    Ok(overview(&progress, &tables))
}

/// Grade a card of a review, count the view on its row and return the
/// review's new state
pub fn grade_confidence_card(
    repo: &dyn VocabRepository,
    progress_id: Uuid,
    row_id: Uuid,
    grade: FlashcardStatus,
) -> CommandResult<ConfidenceOverview> {
    let mut progress = repo.get_confidence(progress_id)?;
    apply_grade(&mut progress, row_id, grade)?;

    let mut tables = repo.get_tables(&progress.table_ids)?;
    if let Some(table) = tables.iter_mut().find(|t| t.row(row_id).is_some()) {
        if let Some(row) = table.row_mut(row_id) {
            row.stats.confi_viewed += 1;
        }
        repo.save_table(table)?;
    }
    repo.save_confidence(&progress)?;

    Ok(overview(&progress, &tables))
}

/// Bring more unseen rows into a review. Returns how many were added.
pub fn add_confidence_words(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    progress_id: Uuid,
    weights: &PriorityWeights,
) -> CommandResult<usize> {
    let mut progress = repo.get_confidence(progress_id)?;
    let tables = repo.get_tables(&progress.table_ids)?;

    let added = add_new_words(&mut progress, &rows_by_priority(&tables, clock, weights));
    if !added.is_empty() {
        repo.save_confidence(&progress)?;
    }
    Ok(added.len())
}
