mod file_storage;
mod repository;

pub use file_storage::{FileStorage, Result, StorageError};
pub use repository::VocabRepository;
