//! Trial questions for a row in a given interaction mode

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::formula::{evaluate_formula, FormulaError};
use crate::vocab::{InteractionMode, Relation, VocabRow, VocabTable};

/// Separator between multiple question or answer columns
const JOIN_SEPARATOR: &str = " / ";

/// Minimum answer length, in characters, for a scrambled question
const MIN_SCRAMBLED_LEN: usize = 2;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuestionError {
    #[error("Question columns are empty")]
    MissingQuestion,

    #[error("Answer is empty")]
    MissingAnswer,

    #[error("Answer too short to scramble")]
    AnswerTooShort,

    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),
}

/// A materialized question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyQuestion {
    pub row_id: Uuid,
    pub table_id: Uuid,
    pub relation_id: Uuid,
    pub mode: InteractionMode,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Pieces of the answer for scrambled questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiles: Vec<String>,
}

/// Builds a question for a row, or explains why it cannot
pub trait QuestionBuilder {
    fn build(
        &self,
        row: &VocabRow,
        relation: &Relation,
        table: &VocabTable,
        mode: InteractionMode,
    ) -> Result<StudyQuestion, QuestionError>;
}

/// Question builder driven by the relation's columns and answer formula
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicQuestionBuilder;

fn join_columns(row: &VocabRow, column_ids: &[String]) -> Option<String> {
    let values: Vec<&str> = column_ids.iter().filter_map(|id| row.value(id)).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(JOIN_SEPARATOR))
    }
}

/// Words of a multi-word answer, characters of a single word
pub fn answer_tiles(answer: &str) -> Vec<String> {
    if answer.split_whitespace().nth(1).is_some() {
        answer.split_whitespace().map(str::to_string).collect()
    } else {
        answer.chars().map(|c| c.to_string()).collect()
    }
}

impl BasicQuestionBuilder {
    fn answer_text(
        &self,
        row: &VocabRow,
        relation: &Relation,
        table: &VocabTable,
    ) -> Result<Option<String>, FormulaError> {
        match relation.answer_formula.as_deref() {
            Some(formula) if !formula.trim().is_empty() => {
                let rendered = evaluate_formula(formula, row, table)?;
                Ok(Some(rendered).filter(|s| !s.is_empty()))
            }
            _ => Ok(join_columns(row, &relation.answer_column_ids)),
        }
    }
}

impl QuestionBuilder for BasicQuestionBuilder {
    fn build(
        &self,
        row: &VocabRow,
        relation: &Relation,
        table: &VocabTable,
        mode: InteractionMode,
    ) -> Result<StudyQuestion, QuestionError> {
        let prompt = join_columns(row, &relation.question_column_ids);
        let answer = self.answer_text(row, relation, table)?;

        let mut question = StudyQuestion {
            row_id: row.id,
            table_id: table.id,
            relation_id: relation.id,
            mode,
            prompt: String::new(),
            answer: None,
            tiles: Vec::new(),
        };

        match mode {
            InteractionMode::Flashcards => {
                question.prompt = prompt.ok_or(QuestionError::MissingQuestion)?;
                question.answer = answer;
            }
            InteractionMode::MultipleChoice
            | InteractionMode::Typing
            | InteractionMode::TrueFalse => {
                question.prompt = prompt.ok_or(QuestionError::MissingQuestion)?;
                question.answer = Some(answer.ok_or(QuestionError::MissingAnswer)?);
            }
            InteractionMode::Scrambled => {
                let answer = answer.ok_or(QuestionError::MissingAnswer)?;
                if answer.chars().count() < MIN_SCRAMBLED_LEN {
                    return Err(QuestionError::AnswerTooShort);
                }
                question.prompt = prompt.unwrap_or_default();
                question.tiles = answer_tiles(&answer);
                question.answer = Some(answer);
            }
        }

        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Column;

    fn fixture() -> (VocabTable, Relation) {
        let mut table = VocabTable::new("Words".to_string());
        table.columns = vec![
            Column::new("word", "Word"),
            Column::new("reading", "Reading"),
            Column::new("meaning", "Meaning"),
        ];
        let relation = Relation::new(
            "Word to meaning".to_string(),
            vec!["word".to_string()],
            vec!["meaning".to_string()],
        );
        table.relations.push(relation.clone());
        (table, relation)
    }

    #[test]
    fn test_flashcards_allow_missing_answer() {
        let (table, relation) = fixture();
        let row = VocabRow::new().with_col("word", "水");
        let q = BasicQuestionBuilder
            .build(&row, &relation, &table, InteractionMode::Flashcards)
            .unwrap();
        assert_eq!(q.prompt, "水");
        assert_eq!(q.answer, None);
    }

    #[test]
    fn test_typing_requires_answer() {
        let (table, relation) = fixture();
        let row = VocabRow::new().with_col("word", "水");
        assert_eq!(
            BasicQuestionBuilder.build(&row, &relation, &table, InteractionMode::Typing),
            Err(QuestionError::MissingAnswer)
        );
    }

    #[test]
    fn test_missing_question() {
        let (table, relation) = fixture();
        let row = VocabRow::new().with_col("meaning", "water");
        assert_eq!(
            BasicQuestionBuilder.build(&row, &relation, &table, InteractionMode::TrueFalse),
            Err(QuestionError::MissingQuestion)
        );
    }

    #[test]
    fn test_multiple_columns_are_joined() {
        let (table, mut relation) = fixture();
        relation.question_column_ids.push("reading".to_string());
        let row = VocabRow::new()
            .with_col("word", "水")
            .with_col("reading", "みず")
            .with_col("meaning", "water");
        let q = BasicQuestionBuilder
            .build(&row, &relation, &table, InteractionMode::Typing)
            .unwrap();
        assert_eq!(q.prompt, "水 / みず");
        assert_eq!(q.answer.as_deref(), Some("water"));
    }

    #[test]
    fn test_formula_answer() {
        let (table, mut relation) = fixture();
        relation.answer_formula = Some("{{Meaning}} ({{Reading}})".to_string());
        let row = VocabRow::new()
            .with_col("word", "水")
            .with_col("reading", "みず")
            .with_col("meaning", "water");
        let q = BasicQuestionBuilder
            .build(&row, &relation, &table, InteractionMode::Typing)
            .unwrap();
        assert_eq!(q.answer.as_deref(), Some("water (みず)"));
    }

    #[test]
    fn test_scrambled_tiles() {
        let (table, relation) = fixture();
        let row = VocabRow::new().with_col("meaning", "cold water");
        let q = BasicQuestionBuilder
            .build(&row, &relation, &table, InteractionMode::Scrambled)
            .unwrap();
        assert_eq!(q.tiles, vec!["cold".to_string(), "water".to_string()]);

        let row = VocabRow::new().with_col("meaning", "a");
        assert_eq!(
            BasicQuestionBuilder.build(&row, &relation, &table, InteractionMode::Scrambled),
            Err(QuestionError::AnswerTooShort)
        );
    }

    #[test]
    fn test_answer_tiles_single_word() {
        assert_eq!(answer_tiles("みず"), vec!["み".to_string(), "ず".to_string()]);
    }
}
