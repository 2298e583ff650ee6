//! Vocabulary tables and the study statistics derived from them
//!
//! This module provides:
//! - Table, column, row and relation models
//! - Pure stat derivation (rank point, level, rates)
//! - The six-component priority score

pub mod models;
pub mod priority;
pub mod stats;

pub use models::*;
pub use priority::{priority_score, PriorityWeights};
