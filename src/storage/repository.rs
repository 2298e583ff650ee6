//! Repository interface over persisted study data

use uuid::Uuid;

use super::file_storage::Result;
use crate::anki::AnkiProgress;
use crate::confidence::ConfidenceProgress;
use crate::study::{StudyProgress, StudySettings};
use crate::vocab::VocabTable;

/// Everything the command layer loads and saves. Core functions never see
/// this trait; they take the loaded values as parameters.
pub trait VocabRepository {
    fn list_tables(&self) -> Result<Vec<VocabTable>>;
    fn get_table(&self, table_id: Uuid) -> Result<VocabTable>;
    fn save_table(&self, table: &VocabTable) -> Result<()>;

    fn list_confidence(&self) -> Result<Vec<ConfidenceProgress>>;
    fn get_confidence(&self, progress_id: Uuid) -> Result<ConfidenceProgress>;
    fn save_confidence(&self, progress: &ConfidenceProgress) -> Result<()>;

    fn list_anki_decks(&self) -> Result<Vec<AnkiProgress>>;
    fn get_anki_deck(&self, deck_id: Uuid) -> Result<AnkiProgress>;
    fn save_anki_deck(&self, deck: &AnkiProgress) -> Result<()>;

    fn list_study_settings(&self) -> Result<Vec<StudySettings>>;
    fn get_study_settings(&self, settings_id: Uuid) -> Result<StudySettings>;
    fn save_study_settings(&self, settings: &StudySettings) -> Result<()>;

    fn list_study_progress(&self) -> Result<Vec<StudyProgress>>;
    fn get_study_progress(&self, progress_id: Uuid) -> Result<StudyProgress>;
    fn save_study_progress(&self, progress: &StudyProgress) -> Result<()>;

    /// Load several tables, failing on the first missing one
    fn get_tables(&self, table_ids: &[Uuid]) -> Result<Vec<VocabTable>> {
        table_ids.iter().map(|id| self.get_table(*id)).collect()
    }
}
