use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use wordwise_lib::anki::AnkiProgress;
use wordwise_lib::clock::SystemClock;
use wordwise_lib::config::AppConfig;
use wordwise_lib::confidence::ConfidenceProgress;
use wordwise_lib::storage::{FileStorage, VocabRepository};
use wordwise_lib::study::{StudyProgress, StudySettings};
use wordwise_lib::vocab::VocabTable;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub storage: FileStorage,
    pub clock: SystemClock,
}

fn listing<T>(items: &[&T], name: &impl Fn(&T) -> &str) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", name(*item)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pick one item by id, exact name or unique name prefix
fn resolve<'a, T>(
    items: &'a [T],
    key: &str,
    kind: &str,
    id: impl Fn(&T) -> Uuid,
    name: impl Fn(&T) -> &str,
) -> Result<&'a T> {
    if let Ok(uuid) = Uuid::parse_str(key) {
        return items
            .iter()
            .find(|item| id(*item) == uuid)
            .with_context(|| format!("No {} with id {}", kind, uuid));
    }

    let key_lower = key.to_lowercase();

    // Exact match first
    if let Some(item) = items.iter().find(|item| name(*item).to_lowercase() == key_lower) {
        return Ok(item);
    }

    // Prefix match
    let matches: Vec<&T> = items
        .iter()
        .filter(|item| name(*item).to_lowercase().starts_with(&key_lower))
        .collect();

    match matches.len() {
        0 => bail!(
            "No {} matching '{}'. Available:\n{}",
            kind,
            key,
            listing(&items.iter().collect::<Vec<_>>(), &name)
        ),
        1 => Ok(matches[0]),
        _ => bail!("Ambiguous {} name '{}'. Matches:\n{}", kind, key, listing(&matches, &name)),
    }
}

impl App {
    /// Load the config and open storage in the configured data directory
    pub fn new(data_dir: Option<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_path().context("Failed to locate config directory")?,
        };
        let config = AppConfig::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config.data_dir().context("Failed to get data directory")?,
        };
        let storage = FileStorage::new(data_dir);
        storage.init().context("Failed to initialize storage")?;

        Ok(Self {
            config,
            storage,
            clock: SystemClock,
        })
    }

    pub fn repo(&self) -> &dyn VocabRepository {
        &self.storage
    }

    pub fn list_tables(&self) -> Result<Vec<VocabTable>> {
        self.storage.list_tables().context("Failed to list tables")
    }

    /// Find a table by id or name (case-insensitive prefix match)
    pub fn find_table(&self, key: &str) -> Result<VocabTable> {
        let tables = self.list_tables()?;
        resolve(&tables, key, "table", |t| t.id, |t| t.name.as_str()).cloned()
    }

    pub fn find_tables(&self, keys: &[String]) -> Result<Vec<VocabTable>> {
        keys.iter().map(|key| self.find_table(key)).collect()
    }

    pub fn find_review(&self, key: &str) -> Result<ConfidenceProgress> {
        let reviews = self
            .storage
            .list_confidence()
            .context("Failed to list confidence reviews")?;
        resolve(&reviews, key, "review", |r| r.id, |r| r.name.as_str()).cloned()
    }

    pub fn find_deck(&self, key: &str) -> Result<AnkiProgress> {
        let decks = self.storage.list_anki_decks().context("Failed to list decks")?;
        resolve(&decks, key, "deck", |d| d.id, |d| d.name.as_str()).cloned()
    }

    pub fn find_settings(&self, key: &str) -> Result<StudySettings> {
        let settings = self
            .storage
            .list_study_settings()
            .context("Failed to list study settings")?;
        resolve(&settings, key, "study settings", |s| s.id, |s| s.name.as_str()).cloned()
    }

    /// Sessions have no name; match the id or its prefix
    pub fn find_session(&self, key: &str) -> Result<StudyProgress> {
        let sessions = self
            .storage
            .list_study_progress()
            .context("Failed to list sessions")?;
        let key_lower = key.to_lowercase();
        let matches: Vec<&StudyProgress> = sessions
            .iter()
            .filter(|s| s.id.to_string().starts_with(&key_lower))
            .collect();

        match matches.len() {
            0 => bail!("No session matching '{}'", key),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous session id '{}'", key),
        }
    }

    /// Find a row of a table by id or by the value of any of its cells
    pub fn find_row(&self, table: &VocabTable, key: &str) -> Result<Uuid> {
        if let Ok(uuid) = Uuid::parse_str(key) {
            if table.row(uuid).is_some() {
                return Ok(uuid);
            }
        }
        let key_lower = key.trim().to_lowercase();
        table
            .rows
            .iter()
            .find(|row| row.cols.values().any(|v| v.trim().to_lowercase() == key_lower))
            .map(|row| row.id)
            .with_context(|| format!("No row matching '{}' in {}", key, table.name))
    }

    /// Find a row across several tables
    pub fn find_row_in(&self, tables: &[VocabTable], key: &str) -> Result<Uuid> {
        for table in tables {
            if let Ok(id) = self.find_row(table, key) {
                return Ok(id);
            }
        }
        bail!("No row matching '{}'", key)
    }
}
