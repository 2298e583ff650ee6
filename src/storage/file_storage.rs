//! JSON file storage
//!
//! Directory structure:
//! ```text
//! {data-dir}/
//! ├── tables/
//! │   └── {table-id}.json      # Columns, relations and rows with stats
//! ├── confidence/
//! │   └── {progress-id}.json   # Confidence review queues
//! ├── anki/
//! │   └── decks.json           # Array of all Anki decks
//! └── study/
//!     ├── settings/{id}.json   # Saved session settings
//!     └── sessions/{id}.json   # Materialized sessions
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::repository::VocabRepository;
use crate::anki::AnkiProgress;
use crate::confidence::ConfidenceProgress;
use crate::study::{StudyProgress, StudySettings};
use crate::vocab::VocabTable;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table not found: {0}")]
    TableNotFound(Uuid),

    #[error("Confidence review not found: {0}")]
    ConfidenceNotFound(Uuid),

    #[error("Anki deck not found: {0}")]
    DeckNotFound(Uuid),

    #[error("Study settings not found: {0}")]
    SettingsNotFound(Uuid),

    #[error("Study session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage manager for study data
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("wordwise"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.tables_dir())?;
        fs::create_dir_all(self.confidence_dir())?;
        fs::create_dir_all(self.anki_dir())?;
        fs::create_dir_all(self.settings_dir())?;
        fs::create_dir_all(self.sessions_dir())?;

        let decks_path = self.decks_path();
        if !decks_path.exists() {
            let empty_decks: Vec<AnkiProgress> = Vec::new();
            fs::write(&decks_path, serde_json::to_string_pretty(&empty_decks)?)?;
        }

        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn tables_dir(&self) -> PathBuf {
        self.base_path.join("tables")
    }

    fn confidence_dir(&self) -> PathBuf {
        self.base_path.join("confidence")
    }

    fn anki_dir(&self) -> PathBuf {
        self.base_path.join("anki")
    }

    fn decks_path(&self) -> PathBuf {
        self.anki_dir().join("decks.json")
    }

    fn settings_dir(&self) -> PathBuf {
        self.base_path.join("study").join("settings")
    }

    fn sessions_dir(&self) -> PathBuf {
        self.base_path.join("study").join("sessions")
    }

    fn entry_path(dir: &Path, id: Uuid) -> PathBuf {
        dir.join(format!("{}.json", id))
    }

    /// Read a single JSON file, `None` if it does not exist
    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    /// Read every `*.json` file in a directory. Unreadable files are skipped.
    fn read_json_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
        let mut items = Vec::new();
        if !dir.exists() {
            return Ok(items);
        }

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                match serde_json::from_str::<T>(&content) {
                    Ok(item) => items.push(item),
                    Err(e) => log::warn!("Skipping unreadable {}: {}", path.display(), e),
                }
            }
        }

        Ok(items)
    }
}

impl VocabRepository for FileStorage {
    // ==================== Tables ====================

    fn list_tables(&self) -> Result<Vec<VocabTable>> {
        let mut tables: Vec<VocabTable> = Self::read_json_dir(&self.tables_dir())?;
        tables.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(tables)
    }

    fn get_table(&self, table_id: Uuid) -> Result<VocabTable> {
        Self::read_json(&Self::entry_path(&self.tables_dir(), table_id))?
            .ok_or(StorageError::TableNotFound(table_id))
    }

    fn save_table(&self, table: &VocabTable) -> Result<()> {
        Self::write_json(&Self::entry_path(&self.tables_dir(), table.id), table)
    }

    // ==================== Confidence ====================

    fn list_confidence(&self) -> Result<Vec<ConfidenceProgress>> {
        let mut reviews: Vec<ConfidenceProgress> = Self::read_json_dir(&self.confidence_dir())?;
        reviews.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(reviews)
    }

    fn get_confidence(&self, progress_id: Uuid) -> Result<ConfidenceProgress> {
        Self::read_json(&Self::entry_path(&self.confidence_dir(), progress_id))?
            .ok_or(StorageError::ConfidenceNotFound(progress_id))
    }

    fn save_confidence(&self, progress: &ConfidenceProgress) -> Result<()> {
        Self::write_json(&Self::entry_path(&self.confidence_dir(), progress.id), progress)
    }

    // ==================== Anki ====================

    fn list_anki_decks(&self) -> Result<Vec<AnkiProgress>> {
        Ok(Self::read_json(&self.decks_path())?.unwrap_or_default())
    }

    fn get_anki_deck(&self, deck_id: Uuid) -> Result<AnkiProgress> {
        self.list_anki_decks()?
            .into_iter()
            .find(|d| d.id == deck_id)
            .ok_or(StorageError::DeckNotFound(deck_id))
    }

    fn save_anki_deck(&self, deck: &AnkiProgress) -> Result<()> {
        let mut decks = self.list_anki_decks()?;
        match decks.iter().position(|d| d.id == deck.id) {
            Some(pos) => decks[pos] = deck.clone(),
            None => decks.push(deck.clone()),
        }
        Self::write_json(&self.decks_path(), &decks)
    }

    // ==================== Study ====================

    fn list_study_settings(&self) -> Result<Vec<StudySettings>> {
        let mut settings: Vec<StudySettings> = Self::read_json_dir(&self.settings_dir())?;
        settings.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(settings)
    }

    fn get_study_settings(&self, settings_id: Uuid) -> Result<StudySettings> {
        Self::read_json(&Self::entry_path(&self.settings_dir(), settings_id))?
            .ok_or(StorageError::SettingsNotFound(settings_id))
    }

    fn save_study_settings(&self, settings: &StudySettings) -> Result<()> {
        Self::write_json(&Self::entry_path(&self.settings_dir(), settings.id), settings)
    }

    fn list_study_progress(&self) -> Result<Vec<StudyProgress>> {
        let mut sessions: Vec<StudyProgress> = Self::read_json_dir(&self.sessions_dir())?;
        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    fn get_study_progress(&self, progress_id: Uuid) -> Result<StudyProgress> {
        Self::read_json(&Self::entry_path(&self.sessions_dir(), progress_id))?
            .ok_or(StorageError::SessionNotFound(progress_id))
    }

    fn save_study_progress(&self, progress: &StudyProgress) -> Result<()> {
        Self::write_json(&Self::entry_path(&self.sessions_dir(), progress.id), progress)
    }
}
