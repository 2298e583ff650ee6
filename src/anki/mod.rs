//! Anki-style spaced repetition for vocabulary rows
//!
//! This module provides:
//! - Deck definitions with daily new/review limits
//! - SM-2 scheduling of a row's Anki fields
//! - The due-date gate deciding whether a deck needs a reminder
//! - The daily review session of a deck

pub mod algorithm;
pub mod gate;
pub mod models;

pub use gate::{build_anki_session, summarize_deck, DeckDueSummary};
pub use models::*;
