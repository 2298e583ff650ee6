//! Vocabulary scoring and scheduling
//!
//! Rows of user-defined vocabulary tables carry study stats. From those the
//! crate derives levels and priority scores, reorders Confidence review
//! queues, schedules Anki decks, validates rows against interaction modes and
//! runs study sessions. Persistence sits behind [`storage::VocabRepository`].

pub mod anki;
pub mod clock;
pub mod commands;
pub mod config;
pub mod confidence;
pub mod notifications;
pub mod storage;
pub mod study;
pub mod validation;
pub mod vocab;
