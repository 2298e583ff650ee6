//! Data models for study sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::StudyQuestion;
use crate::vocab::InteractionMode;

/// A table to draw rows from, optionally restricted to some relations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySource {
    pub table_id: Uuid,
    /// Empty means every relation of the table
    #[serde(default)]
    pub relation_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortCriterion {
    Priority,
    RankPoint,
    Level,
    FailureRate,
    LastPracticed,
    InQueueCount,
    CreatedAt,
    Random,
}

impl SortCriterion {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().replace(['-', '_'], "").as_str() {
            "priority" => Some(Self::Priority),
            "rankpoint" => Some(Self::RankPoint),
            "level" => Some(Self::Level),
            "failurerate" => Some(Self::FailureRate),
            "lastpracticed" => Some(Self::LastPracticed),
            "inqueuecount" => Some(Self::InQueueCount),
            "createdat" => Some(Self::CreatedAt),
            "random" => Some(Self::Random),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaSort {
    pub criterion: SortCriterion,
    #[serde(default)]
    pub direction: SortDirection,
}

impl CriteriaSort {
    pub fn new(criterion: SortCriterion, direction: SortDirection) -> Self {
        Self { criterion, direction }
    }
}

/// How the rows of a session are picked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WordSelection {
    /// The first `n` rows after sorting
    WordCount(usize),
    /// Exactly these rows, in this order
    ManualWordIds(Vec<Uuid>),
}

/// A saved, resumable session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySettings {
    pub id: Uuid,
    pub name: String,
    pub sources: Vec<StudySource>,
    /// Empty means every mode a relation supports
    #[serde(default)]
    pub modes: Vec<InteractionMode>,
    #[serde(default)]
    pub criteria_sorts: Vec<CriteriaSort>,
    pub selection: WordSelection,
    pub created_at: DateTime<Utc>,
}

impl StudySettings {
    pub fn new(name: String, sources: Vec<StudySource>, selection: WordSelection) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            sources,
            modes: Vec::new(),
            criteria_sorts: Vec::new(),
            selection,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Finished,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub row_id: Uuid,
    pub table_id: Uuid,
    pub correct: bool,
}

/// A materialized session: the ordered questions and a cursor into them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
    pub id: Uuid,
    pub settings_id: Uuid,
    pub queue: Vec<StudyQuestion>,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    #[serde(default)]
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudyProgress {
    pub fn new(settings_id: Uuid, queue: Vec<StudyQuestion>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            settings_id,
            queue,
            current_index: 0,
            answers: Vec::new(),
            status: SessionStatus::InProgress,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current(&self) -> Option<&StudyQuestion> {
        self.queue.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.queue.len()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.current_index)
    }
}

/// Outcome of closing a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub status: SessionStatus,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Distinct rows the session covered
    pub rows: usize,
    /// Rows flagged as quit
    pub quit_rows: usize,
}
