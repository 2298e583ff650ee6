//! Study session generation
//!
//! Picks rows from the configured sources, orders them by the criteria
//! sorts (priority first when none are given), and materializes one question
//! per row, relation and mode.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::models::*;
use super::session::{Result, SessionError};
use crate::validation::{QuestionBuilder, StudyQuestion};
use crate::vocab::priority::{max_in_queue, priority_score_with};
use crate::vocab::stats::{failure_rate, level, rank_point};
use crate::vocab::{InteractionMode, PriorityWeights, Relation, VocabRow, VocabTable};

/// A candidate row with the keys its sorts need
struct Candidate<'a> {
    table: &'a VocabTable,
    relations: Vec<&'a Relation>,
    row: &'a VocabRow,
    priority: f64,
    random_key: u64,
}

const DEFAULT_SORT: CriteriaSort = CriteriaSort {
    criterion: SortCriterion::Priority,
    direction: SortDirection::Descending,
};

fn compare(a: &Candidate, b: &Candidate, criterion: SortCriterion) -> Ordering {
    match criterion {
        SortCriterion::Priority => a.priority.total_cmp(&b.priority),
        SortCriterion::RankPoint => rank_point(&a.row.stats).cmp(&rank_point(&b.row.stats)),
        SortCriterion::Level => level(&a.row.stats).cmp(&level(&b.row.stats)),
        SortCriterion::FailureRate => {
            failure_rate(&a.row.stats).total_cmp(&failure_rate(&b.row.stats))
        }
        SortCriterion::LastPracticed => {
            let key = |row: &VocabRow| row.stats.last_practice_date.or(row.stats.last_studied);
            key(a.row).cmp(&key(b.row))
        }
        SortCriterion::InQueueCount => {
            a.row.stats.in_queue_count.cmp(&b.row.stats.in_queue_count)
        }
        SortCriterion::CreatedAt => a.row.created_at.cmp(&b.row.created_at),
        SortCriterion::Random => a.random_key.cmp(&b.random_key),
    }
}

fn sort_candidates(candidates: &mut [Candidate], sorts: &[CriteriaSort]) {
    let sorts = if sorts.is_empty() { &[DEFAULT_SORT][..] } else { sorts };
    candidates.sort_by(|a, b| {
        for sort in sorts {
            let ordering = compare(a, b, sort.criterion);
            let ordering = match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn resolve_sources<'a>(
    settings: &StudySettings,
    tables: &'a [VocabTable],
) -> Result<Vec<(&'a VocabTable, Vec<&'a Relation>)>> {
    let mut resolved = Vec::new();
    for source in &settings.sources {
        let table = tables
            .iter()
            .find(|t| t.id == source.table_id)
            .ok_or(SessionError::TableNotFound(source.table_id))?;

        let relations = if source.relation_ids.is_empty() {
            table.relations.iter().collect()
        } else {
            source
                .relation_ids
                .iter()
                .map(|id| table.relation(*id).ok_or(SessionError::RelationNotFound(*id)))
                .collect::<Result<Vec<_>>>()?
        };
        resolved.push((table, relations));
    }
    Ok(resolved)
}

fn session_modes(relation: &Relation, wanted: &[InteractionMode]) -> Vec<InteractionMode> {
    relation
        .effective_modes()
        .into_iter()
        .filter(|mode| wanted.is_empty() || wanted.contains(mode))
        .collect()
}

/// Questions for one row across its relations and the session modes
fn row_questions<R: Rng + ?Sized>(
    candidate: &Candidate,
    modes: &[InteractionMode],
    builder: &dyn QuestionBuilder,
    rng: &mut R,
) -> Vec<StudyQuestion> {
    let mut questions = Vec::new();
    for relation in &candidate.relations {
        for mode in session_modes(relation, modes) {
            match builder.build(candidate.row, relation, candidate.table, mode) {
                Ok(mut question) => {
                    question.tiles.shuffle(rng);
                    questions.push(question);
                }
                Err(err) => {
                    log::debug!(
                        "Skipping row {} for {} ({}): {}",
                        candidate.row.id,
                        relation.name,
                        mode.as_str(),
                        err
                    );
                }
            }
        }
    }
    questions
}

/// Build a new session from saved settings
pub fn generate_session<R: Rng + ?Sized>(
    settings: &StudySettings,
    tables: &[VocabTable],
    builder: &dyn QuestionBuilder,
    weights: &PriorityWeights,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<StudyProgress> {
    let sources = resolve_sources(settings, tables)?;

    let pool_max = max_in_queue(sources.iter().flat_map(|(table, _)| table.rows.iter()));
    let mut index_of: HashMap<Uuid, usize> = HashMap::new();
    let mut candidates: Vec<Candidate> = Vec::new();
    for (table, relations) in &sources {
        for row in &table.rows {
            if let Some(&index) = index_of.get(&row.id) {
                // Same row from another source: ask it through the union of relations
                let merged = &mut candidates[index].relations;
                for relation in relations {
                    if !merged.iter().any(|r| r.id == relation.id) {
                        merged.push(*relation);
                    }
                }
                continue;
            }
            index_of.insert(row.id, candidates.len());
            candidates.push(Candidate {
                table: *table,
                relations: relations.clone(),
                row,
                priority: priority_score_with(&row.stats, pool_max, now, weights),
                random_key: rng.gen(),
            });
        }
    }

    let mut queue = Vec::new();
    let mut row_count = 0;
    match &settings.selection {
        WordSelection::ManualWordIds(ids) => {
            let mut by_id: HashMap<Uuid, Candidate> =
                candidates.into_iter().map(|c| (c.row.id, c)).collect();
            for id in ids {
                let Some(candidate) = by_id.remove(id) else {
                    log::warn!("Manual word {} is not in the session sources", id);
                    continue;
                };
                let questions = row_questions(&candidate, &settings.modes, builder, rng);
                if !questions.is_empty() {
                    row_count += 1;
                    queue.extend(questions);
                }
            }
        }
        WordSelection::WordCount(count) => {
            sort_candidates(&mut candidates, &settings.criteria_sorts);
            // Unaskable rows do not use up a slot
            for candidate in &candidates {
                if row_count >= *count {
                    break;
                }
                let questions = row_questions(candidate, &settings.modes, builder, rng);
                if !questions.is_empty() {
                    row_count += 1;
                    queue.extend(questions);
                }
            }
        }
    }

    if queue.is_empty() {
        return Err(SessionError::NoQuestions);
    }

    log::info!(
        "Generated session for {} with {} questions over {} rows",
        settings.name,
        queue.len(),
        row_count
    );

    Ok(StudyProgress::new(settings.id, queue))
}
