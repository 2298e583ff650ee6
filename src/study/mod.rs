//! Study sessions
//!
//! This module provides:
//! - Saved session settings (sources, modes, criteria sorts, word selection)
//! - Session generation ordered by priority or the chosen criteria
//! - Answer recording and the stat write-back on finish or quit

pub mod generator;
mod models;
pub mod session;

pub use generator::generate_session;
pub use models::*;
pub use session::{finish_session, quit_session, record_answer, SessionError};
