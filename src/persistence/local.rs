//! Browser LocalStorage store

use super::{PersistError, ProgressStore, decode, encode, save_key};
use crate::progress::ProgressRecord;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistError::Unavailable("localStorage is not accessible".to_string()))
    }
}

impl ProgressStore for LocalStorageStore {
    fn load(&self, player: &str) -> Result<Option<ProgressRecord>, PersistError> {
        let storage = Self::storage()?;
        let json = storage
            .get_item(&save_key(player))
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))?;
        json.as_deref().map(decode).transpose()
    }

    fn save(&mut self, player: &str, record: &ProgressRecord) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        let json = encode(record)?;
        storage
            .set_item(&save_key(player), &json)
            .map_err(|e| PersistError::Unavailable(format!("{e:?}")))
    }
}
