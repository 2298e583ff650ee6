pub mod anki;
pub mod confidence;
pub mod remind;
pub mod session;
pub mod tables;
