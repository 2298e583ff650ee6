//! Answer formulas
//!
//! A formula is a text template with `{{Column}}` placeholders, resolved
//! against a row. Placeholders match a column id or, failing that, a column
//! name (case-insensitive). `{{Reading}} ({{Meaning}})` renders as
//! `いぬ (dog)`.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::vocab::{VocabRow, VocabTable};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unknown column in formula: {0}")]
    UnknownColumn(String),

    #[error("Unterminated placeholder in formula: {0}")]
    Unterminated(String),
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("valid placeholder regex"))
}

/// Render a formula for a row. Blank cells render as empty text.
pub fn evaluate_formula(
    formula: &str,
    row: &VocabRow,
    table: &VocabTable,
) -> Result<String, FormulaError> {
    let re = placeholder_regex();

    for caps in re.captures_iter(formula) {
        let key = &caps[1];
        if table.find_column(key).is_none() {
            return Err(FormulaError::UnknownColumn(key.to_string()));
        }
    }

    // Checked on the template only; cell values may contain braces
    if re.replace_all(formula, "").contains("{{") {
        return Err(FormulaError::Unterminated(formula.to_string()));
    }

    let rendered = re.replace_all(formula, |caps: &regex::Captures| {
        table
            .find_column(&caps[1])
            .and_then(|column| row.value(&column.id))
            .unwrap_or("")
            .to_string()
    });

    Ok(rendered.trim().to_string())
}

/// Column ids a formula refers to, in order of appearance
pub fn referenced_columns(formula: &str, table: &VocabTable) -> Vec<String> {
    let mut ids = Vec::new();
    for caps in placeholder_regex().captures_iter(formula) {
        if let Some(column) = table.find_column(&caps[1]) {
            if !ids.contains(&column.id) {
                ids.push(column.id.clone());
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Column;

    fn table() -> VocabTable {
        let mut table = VocabTable::new("Nouns".to_string());
        table.columns = vec![
            Column::new("word", "Word"),
            Column::new("reading", "Reading"),
            Column::new("meaning", "Meaning"),
        ];
        table
    }

    fn row() -> VocabRow {
        VocabRow::new()
            .with_col("word", "犬")
            .with_col("reading", "いぬ")
            .with_col("meaning", "dog")
    }

    #[test]
    fn test_renders_by_name_and_id() {
        let rendered = evaluate_formula("{{Reading}} ({{ meaning }})", &row(), &table()).unwrap();
        assert_eq!(rendered, "いぬ (dog)");
    }

    #[test]
    fn test_blank_cells_render_empty() {
        let row = VocabRow::new().with_col("word", "猫");
        let rendered = evaluate_formula("{{Word}} {{Reading}}", &row, &table()).unwrap();
        assert_eq!(rendered, "猫");
    }

    #[test]
    fn test_unknown_column() {
        assert_eq!(
            evaluate_formula("{{Kanji}}", &row(), &table()),
            Err(FormulaError::UnknownColumn("Kanji".to_string()))
        );
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(matches!(
            evaluate_formula("{{Word}} {{Reading", &row(), &table()),
            Err(FormulaError::Unterminated(_))
        ));
    }

    #[test]
    fn test_braces_in_cell_values_are_kept() {
        let row = VocabRow::new().with_col("word", "{{ name }}");
        let rendered = evaluate_formula("{{Word}}", &row, &table()).unwrap();
        assert_eq!(rendered, "{{ name }}");
    }

    #[test]
    fn test_referenced_columns() {
        assert_eq!(
            referenced_columns("{{Meaning}}/{{word}}/{{Meaning}}", &table()),
            vec!["meaning".to_string(), "word".to_string()]
        );
    }
}
