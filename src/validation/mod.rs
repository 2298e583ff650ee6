//! Row validation
//!
//! This module provides:
//! - Answer formula templates
//! - The question builder used to synthesize trial questions
//! - Per-row and per-table validation against a relation

pub mod formula;
pub mod question;
pub mod validator;

pub use question::{BasicQuestionBuilder, QuestionBuilder, QuestionError, StudyQuestion};
pub use validator::{validate_row, validate_table, IssueKind, RowValidationResult, ValidationIssue};
