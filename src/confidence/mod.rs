//! Confidence mastery loop
//!
//! This module provides:
//! - Review progress with an ordered card queue and per-card grades
//! - Grade-driven queue reordering
//! - Introduction of new words into a running review

pub mod models;
pub mod queue;

pub use models::*;
pub use queue::{apply_grade, ConfidenceError, DEFAULT_INTERVALS};
