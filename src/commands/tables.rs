//! Table-level commands: listing, priority ranking, validation and resets

use serde::Serialize;
use uuid::Uuid;

use super::{CommandError, CommandResult};
use crate::clock::Clock;
use crate::storage::VocabRepository;
use crate::validation::{validate_table, BasicQuestionBuilder, RowValidationResult};
use crate::vocab::priority::{rank_by_priority, PriorityBreakdown};
use crate::vocab::stats::{level, rank_point, reset_progress};
use crate::vocab::{PriorityWeights, VocabRow, VocabTable};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOverview {
    pub id: Uuid,
    pub name: String,
    pub row_count: usize,
    pub relation_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRow {
    pub row_id: Uuid,
    pub label: String,
    pub score: f64,
    pub level: u8,
    pub rank_point: i64,
    pub breakdown: PriorityBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationValidation {
    pub relation_id: Uuid,
    pub relation_name: String,
    pub invalid_rows: Vec<RowValidationResult>,
}

/// First filled cell of a row, in column order
pub fn row_label(table: &VocabTable, row: &VocabRow) -> String {
    table
        .columns
        .iter()
        .find_map(|c| row.value(&c.id))
        .map(str::to_string)
        .unwrap_or_else(|| row.id.to_string())
}

pub fn list_tables(repo: &dyn VocabRepository) -> CommandResult<Vec<TableOverview>> {
    let tables = repo.list_tables()?;
    Ok(tables
        .into_iter()
        .map(|t| TableOverview {
            id: t.id,
            name: t.name,
            row_count: t.rows.len(),
            relation_count: t.relations.len(),
        })
        .collect())
}

/// Rows of a table, most urgent first
pub fn rank_table(
    repo: &dyn VocabRepository,
    clock: &dyn Clock,
    table_id: Uuid,
    weights: &PriorityWeights,
) -> CommandResult<Vec<RankedRow>> {
    let table = repo.get_table(table_id)?;

    Ok(rank_by_priority(&table.rows, clock.now(), weights)
        .into_iter()
        .map(|scored| RankedRow {
            row_id: scored.row.id,
            label: row_label(&table, scored.row),
            score: scored.score,
            level: level(&scored.row.stats),
            rank_point: rank_point(&scored.row.stats),
            breakdown: scored.breakdown,
        })
        .collect())
}

/// Validate a table against one relation, or all of them
pub fn validate_rows(
    repo: &dyn VocabRepository,
    table_id: Uuid,
    relation_id: Option<Uuid>,
) -> CommandResult<Vec<RelationValidation>> {
    let table = repo.get_table(table_id)?;

    let relations: Vec<_> = match relation_id {
        Some(id) => vec![table.relation(id).ok_or_else(|| CommandError {
            message: format!("Relation not found: {}", id),
        })?],
        None => table.relations.iter().collect(),
    };

    Ok(relations
        .into_iter()
        .map(|relation| RelationValidation {
            relation_id: relation.id,
            relation_name: relation.name.clone(),
            invalid_rows: validate_table(&table, relation, &BasicQuestionBuilder),
        })
        .collect())
}

/// Reset the study stats of one row, or of the whole table.
/// Returns the number of rows reset.
pub fn reset_rows(
    repo: &dyn VocabRepository,
    table_id: Uuid,
    row_id: Option<Uuid>,
) -> CommandResult<usize> {
    let mut table = repo.get_table(table_id)?;

    let count = match row_id {
        Some(id) => {
            let row = table.row_mut(id).ok_or_else(|| CommandError {
                message: format!("Row not found: {}", id),
            })?;
            reset_progress(&mut row.stats);
            1
        }
        None => {
            for row in &mut table.rows {
                reset_progress(&mut row.stats);
            }
            table.rows.len()
        }
    };

    table.updated_at = chrono::Utc::now();
    repo.save_table(&table)?;
    log::info!("Reset progress of {} row(s) in {}", count, table.name);

    Ok(count)
}
