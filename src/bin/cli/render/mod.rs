//! Output rendering

pub mod terminal;
