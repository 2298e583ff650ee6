//! Study reminders

mod models;
pub mod sweep;

pub use models::*;
pub use sweep::{anki_reminder, sweep_anki_decks};
