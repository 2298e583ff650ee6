//! Data models for vocabulary tables

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A table of vocabulary rows with its column schema and study relations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabTable {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<VocabRow>,
    #[serde(default)]
    pub relations: Vec<Relation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VocabTable {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            columns: Vec::new(),
            rows: Vec::new(),
            relations: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn row(&self, row_id: Uuid) -> Option<&VocabRow> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    pub fn row_mut(&mut self, row_id: Uuid) -> Option<&mut VocabRow> {
        self.rows.iter_mut().find(|r| r.id == row_id)
    }

    pub fn relation(&self, relation_id: Uuid) -> Option<&Relation> {
        self.relations.iter().find(|r| r.id == relation_id)
    }

    /// Resolve a column by id first, then by case-insensitive name
    pub fn find_column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == key).or_else(|| {
            let key_lower = key.to_lowercase();
            self.columns
                .iter()
                .find(|c| c.name.to_lowercase() == key_lower)
        })
    }
}

/// A column definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub name: String,
}

impl Column {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A single vocabulary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabRow {
    pub id: Uuid,
    /// Cell values keyed by column id
    #[serde(default)]
    pub cols: HashMap<String, String>,
    #[serde(default)]
    pub stats: RowStats,
    pub created_at: DateTime<Utc>,
}

impl VocabRow {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cols: HashMap::new(),
            stats: RowStats::default(),
            created_at: Utc::now(),
        }
    }

    pub fn with_col(mut self, column_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.cols.insert(column_id.into(), value.into());
        self
    }

    /// Trimmed cell value, `None` when the cell is absent or blank
    pub fn value(&self, column_id: &str) -> Option<&str> {
        self.cols
            .get(column_id)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty_at(&self, column_id: &str) -> bool {
        self.value(column_id).is_none()
    }
}

impl Default for VocabRow {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulated study counters and scheduling state for a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowStats {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub incorrect: u32,
    #[serde(default)]
    pub last_studied: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_practice_date: Option<DateTime<Utc>>,
    /// Number of study sessions the row has appeared in
    #[serde(default)]
    pub in_queue_count: u32,
    /// Set when the row was in a session the user abandoned
    #[serde(default)]
    pub was_quit: bool,
    #[serde(default)]
    pub anki_due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_ease_factor")]
    pub anki_ease_factor: f64,
    /// Current Anki interval in days
    #[serde(default)]
    pub anki_interval: u32,
    #[serde(default)]
    pub anki_repetitions: u32,
    /// Times the row was graded in a Confidence review
    #[serde(default)]
    pub confi_viewed: u32,
}

fn default_ease_factor() -> f64 {
    2.5
}

impl Default for RowStats {
    fn default() -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            last_studied: None,
            last_practice_date: None,
            in_queue_count: 0,
            was_quit: false,
            anki_due_date: None,
            anki_ease_factor: default_ease_factor(),
            anki_interval: 0,
            anki_repetitions: 0,
            confi_viewed: 0,
        }
    }
}

/// Ways a row can be asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionMode {
    Flashcards,
    MultipleChoice,
    Typing,
    TrueFalse,
    Scrambled,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 5] = [
        Self::Flashcards,
        Self::MultipleChoice,
        Self::Typing,
        Self::TrueFalse,
        Self::Scrambled,
    ];

    /// Whether the mode checks the user against a literal answer string
    pub fn requires_answer(&self) -> bool {
        !matches!(self, Self::Flashcards | Self::Scrambled)
    }

    /// Whether the mode shows the question columns
    pub fn uses_question(&self) -> bool {
        !matches!(self, Self::Scrambled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::MultipleChoice => "multipleChoice",
            Self::Typing => "typing",
            Self::TrueFalse => "trueFalse",
            Self::Scrambled => "scrambled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().to_lowercase() == lower)
    }
}

/// Maps table columns into question/answer roles for one or more modes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub question_column_ids: Vec<String>,
    #[serde(default)]
    pub answer_column_ids: Vec<String>,
    #[serde(default)]
    pub interaction_modes: Vec<InteractionMode>,
    #[serde(default)]
    pub compatible_modes: Vec<InteractionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_formula: Option<String>,
}

impl Relation {
    pub fn new(
        name: String,
        question_column_ids: Vec<String>,
        answer_column_ids: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            question_column_ids,
            answer_column_ids,
            interaction_modes: Vec::new(),
            compatible_modes: Vec::new(),
            answer_formula: None,
        }
    }

    /// Modes this relation is studied in: explicit modes, then compatible
    /// modes, then flashcards
    pub fn effective_modes(&self) -> Vec<InteractionMode> {
        if !self.interaction_modes.is_empty() {
            self.interaction_modes.clone()
        } else if !self.compatible_modes.is_empty() {
            self.compatible_modes.clone()
        } else {
            vec![InteractionMode::Flashcards]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_modes_fallback() {
        let mut relation = Relation::new("Meaning".to_string(), vec![], vec![]);
        assert_eq!(relation.effective_modes(), vec![InteractionMode::Flashcards]);

        relation.compatible_modes = vec![InteractionMode::Typing, InteractionMode::Scrambled];
        assert_eq!(
            relation.effective_modes(),
            vec![InteractionMode::Typing, InteractionMode::Scrambled]
        );

        relation.interaction_modes = vec![InteractionMode::MultipleChoice];
        assert_eq!(relation.effective_modes(), vec![InteractionMode::MultipleChoice]);
    }

    #[test]
    fn test_stats_defaults_from_partial_json() {
        let row: VocabRow = serde_json::from_str(
            r#"{"id":"6f1d7c1e-8a43-4a8e-9a51-0d3f7c1b2a10","cols":{"word":"犬"},"stats":{"correct":2},"createdAt":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(row.stats.correct, 2);
        assert_eq!(row.stats.incorrect, 0);
        assert_eq!(row.stats.anki_ease_factor, 2.5);
        assert!(row.stats.anki_due_date.is_none());
        assert!(!row.stats.was_quit);
    }

    #[test]
    fn test_blank_cell_is_empty() {
        let row = VocabRow::new().with_col("word", "   ").with_col("meaning", "dog");
        assert!(row.is_empty_at("word"));
        assert!(row.is_empty_at("missing"));
        assert_eq!(row.value("meaning"), Some("dog"));
    }

    #[test]
    fn test_find_column_by_name() {
        let mut table = VocabTable::new("Animals".to_string());
        table.columns.push(Column::new("c1", "Word"));
        assert_eq!(table.find_column("c1").map(|c| c.name.as_str()), Some("Word"));
        assert_eq!(table.find_column("word").map(|c| c.id.as_str()), Some("c1"));
        assert!(table.find_column("Reading").is_none());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(InteractionMode::parse("typing"), Some(InteractionMode::Typing));
        assert_eq!(InteractionMode::parse("MultipleChoice"), Some(InteractionMode::MultipleChoice));
        assert_eq!(InteractionMode::parse("dictation"), None);
    }
}
