//! Row validation against a relation's interaction modes
//!
//! Each supported mode is tried through a [`QuestionBuilder`]. Modes that
//! cannot produce a question are diagnosed column by column. The validator
//! never fails; data problems come back as issues.

use serde::Serialize;
use uuid::Uuid;

use super::formula::referenced_columns;
use super::question::{QuestionBuilder, QuestionError};
use crate::vocab::{InteractionMode, Relation, VocabRow, VocabTable};

/// Pseudo column that formula issues are reported on
pub const FORMULA_COLUMN: &str = "formula";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Missing,
    FormulaError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub column_id: String,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub affected_modes: Vec<InteractionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValidationResult {
    pub row_id: Uuid,
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    pub valid_modes: Vec<InteractionMode>,
    pub invalid_modes: Vec<InteractionMode>,
}

impl RowValidationResult {
    pub fn issue(&self, column_id: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.column_id == column_id)
    }
}

fn record_issue(
    issues: &mut Vec<ValidationIssue>,
    column_id: &str,
    kind: IssueKind,
    mode: InteractionMode,
    message: Option<String>,
) {
    if let Some(issue) = issues
        .iter_mut()
        .find(|i| i.column_id == column_id && i.kind == kind)
    {
        if !issue.affected_modes.contains(&mode) {
            issue.affected_modes.push(mode);
        }
        return;
    }

    issues.push(ValidationIssue {
        column_id: column_id.to_string(),
        kind,
        affected_modes: vec![mode],
        message,
    });
}

/// Columns the answer is built from: the formula's placeholders when one is
/// set, else the relation's answer columns
fn answer_columns(relation: &Relation, table: &VocabTable) -> Vec<String> {
    match relation.answer_formula.as_deref() {
        Some(formula) if !formula.trim().is_empty() => referenced_columns(formula, table),
        _ => relation.answer_column_ids.clone(),
    }
}

/// Record a missing issue for every empty column the mode depends on
fn diagnose_missing(
    issues: &mut Vec<ValidationIssue>,
    row: &VocabRow,
    relation: &Relation,
    table: &VocabTable,
    mode: InteractionMode,
) {
    if mode.requires_answer() {
        for column_id in &answer_columns(relation, table) {
            if row.is_empty_at(column_id) {
                record_issue(issues, column_id, IssueKind::Missing, mode, None);
            }
        }
    }

    if mode.uses_question() {
        for column_id in &relation.question_column_ids {
            if row.is_empty_at(column_id) {
                record_issue(issues, column_id, IssueKind::Missing, mode, None);
            }
        }
    }
}

pub fn validate_row(
    row: &VocabRow,
    relation: &Relation,
    table: &VocabTable,
    builder: &dyn QuestionBuilder,
) -> RowValidationResult {
    let mut issues = Vec::new();
    let mut valid_modes = Vec::new();
    let mut invalid_modes = Vec::new();

    for mode in relation.effective_modes() {
        match builder.build(row, relation, table, mode) {
            Ok(_) => valid_modes.push(mode),
            Err(QuestionError::Formula(err)) => {
                invalid_modes.push(mode);
                record_issue(
                    &mut issues,
                    FORMULA_COLUMN,
                    IssueKind::FormulaError,
                    mode,
                    Some(err.to_string()),
                );
            }
            Err(err) => {
                log::trace!("Row {} cannot be asked as {}: {}", row.id, mode.as_str(), err);
                invalid_modes.push(mode);
                diagnose_missing(&mut issues, row, relation, table, mode);
            }
        }
    }

    RowValidationResult {
        row_id: row.id,
        is_valid: invalid_modes.is_empty(),
        issues,
        valid_modes,
        invalid_modes,
    }
}

/// Validate every row of a table; only rows with an invalid mode are returned
pub fn validate_table(
    table: &VocabTable,
    relation: &Relation,
    builder: &dyn QuestionBuilder,
) -> Vec<RowValidationResult> {
    let invalid: Vec<RowValidationResult> = table
        .rows
        .iter()
        .map(|row| validate_row(row, relation, table, builder))
        .filter(|result| !result.is_valid)
        .collect();

    log::debug!(
        "Validated {} rows of {} against {}: {} invalid",
        table.rows.len(),
        table.name,
        relation.name,
        invalid.len()
    );

    invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::question::{BasicQuestionBuilder, StudyQuestion};
    use crate::vocab::Column;

    fn fixture(modes: Vec<InteractionMode>) -> (VocabTable, Relation) {
        let mut table = VocabTable::new("Phrases".to_string());
        table.columns = vec![
            Column::new("phrase", "Phrase"),
            Column::new("translation", "Translation"),
            Column::new("notes", "Notes"),
        ];
        let mut relation = Relation::new(
            "Translate".to_string(),
            vec!["phrase".to_string()],
            vec!["translation".to_string()],
        );
        relation.interaction_modes = modes;
        (table, relation)
    }

    #[test]
    fn test_typing_with_empty_answer() {
        let (table, relation) = fixture(vec![InteractionMode::Typing]);
        let row = VocabRow::new().with_col("phrase", "おはよう");

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(!result.is_valid);
        assert_eq!(result.invalid_modes, vec![InteractionMode::Typing]);
        assert!(result.valid_modes.is_empty());
        assert_eq!(result.issues.len(), 1);
        let issue = &result.issues[0];
        assert_eq!(issue.column_id, "translation");
        assert_eq!(issue.kind, IssueKind::Missing);
        assert_eq!(issue.affected_modes, vec![InteractionMode::Typing]);
    }

    #[test]
    fn test_modes_aggregate_per_column() {
        let (table, relation) = fixture(vec![
            InteractionMode::Flashcards,
            InteractionMode::Typing,
            InteractionMode::MultipleChoice,
        ]);
        let row = VocabRow::new().with_col("phrase", "こんにちは");

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert_eq!(result.valid_modes, vec![InteractionMode::Flashcards]);
        assert_eq!(
            result.invalid_modes,
            vec![InteractionMode::Typing, InteractionMode::MultipleChoice]
        );
        let issue = result.issue("translation").unwrap();
        assert_eq!(
            issue.affected_modes,
            vec![InteractionMode::Typing, InteractionMode::MultipleChoice]
        );
    }

    #[test]
    fn test_flashcards_skip_answer_diagnosis() {
        let (table, relation) = fixture(vec![InteractionMode::Flashcards]);
        let row = VocabRow::new();

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].column_id, "phrase");
    }

    #[test]
    fn test_scrambled_skips_question_diagnosis() {
        let (table, relation) = fixture(vec![InteractionMode::Scrambled]);
        let row = VocabRow::new();

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(!result.is_valid);
        assert!(result.issues.is_empty());
        assert_eq!(result.invalid_modes, vec![InteractionMode::Scrambled]);
    }

    #[test]
    fn test_default_mode_is_flashcards() {
        let (table, relation) = fixture(Vec::new());
        let row = VocabRow::new().with_col("phrase", "ありがとう");

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(result.is_valid);
        assert_eq!(result.valid_modes, vec![InteractionMode::Flashcards]);
    }

    #[test]
    fn test_formula_error_issue() {
        let (table, mut relation) =
            fixture(vec![InteractionMode::Typing, InteractionMode::TrueFalse]);
        relation.answer_formula = Some("{{Gloss}}".to_string());
        let row = VocabRow::new()
            .with_col("phrase", "さようなら")
            .with_col("translation", "goodbye");

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        let issue = result.issue(FORMULA_COLUMN).unwrap();
        assert_eq!(issue.kind, IssueKind::FormulaError);
        assert_eq!(
            issue.affected_modes,
            vec![InteractionMode::Typing, InteractionMode::TrueFalse]
        );
        assert!(issue.message.as_deref().unwrap().contains("Gloss"));
    }

    #[test]
    fn test_formula_cell_with_braces_is_valid() {
        let (table, mut relation) = fixture(vec![InteractionMode::Typing]);
        relation.answer_formula = Some("{{Translation}}".to_string());
        let row = VocabRow::new()
            .with_col("phrase", "テンプレート")
            .with_col("translation", "{{ name }}");

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_empty_formula_answer_blames_its_columns() {
        let (table, mut relation) = fixture(vec![InteractionMode::Typing]);
        relation.answer_formula = Some("{{Notes}}".to_string());
        let row = VocabRow::new()
            .with_col("phrase", "すみません")
            .with_col("translation", "excuse me");

        let result = validate_row(&row, &relation, &table, &BasicQuestionBuilder);

        assert!(!result.is_valid);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].column_id, "notes");
        assert_eq!(result.issues[0].kind, IssueKind::Missing);
    }

    struct RejectEverything;

    impl QuestionBuilder for RejectEverything {
        fn build(
            &self,
            _row: &VocabRow,
            _relation: &Relation,
            _table: &VocabTable,
            _mode: InteractionMode,
        ) -> Result<StudyQuestion, QuestionError> {
            Err(QuestionError::MissingQuestion)
        }
    }

    #[test]
    fn test_builder_is_pluggable() {
        let (table, relation) = fixture(vec![InteractionMode::Flashcards]);
        let row = VocabRow::new()
            .with_col("phrase", "はい")
            .with_col("translation", "yes");

        let result = validate_row(&row, &relation, &table, &RejectEverything);

        assert!(!result.is_valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_validate_table_returns_invalid_rows() {
        let (mut table, relation) = fixture(vec![InteractionMode::Typing]);
        let good = VocabRow::new()
            .with_col("phrase", "いいえ")
            .with_col("translation", "no");
        let bad = VocabRow::new().with_col("phrase", "たぶん");
        table.rows = vec![good, bad.clone()];

        let results = validate_table(&table, &relation, &BasicQuestionBuilder);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].row_id, bad.id);
    }
}
