//! One JSON file per player under a save directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistError, ProgressStore, decode, encode, save_key};
use crate::progress::ProgressRecord;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, player: &str) -> PathBuf {
        self.dir.join(format!("{}.json", save_key(&escape_id(player))))
    }
}

impl ProgressStore for FileStore {
    fn load(&self, player: &str) -> Result<Option<ProgressRecord>, PersistError> {
        match fs::read_to_string(self.path_for(player)) {
            Ok(json) => decode(&json).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a temp file first, then rename over the old save
    fn save(&mut self, player: &str, record: &ProgressRecord) -> Result<(), PersistError> {
        let json = encode(record)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(player);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        log::debug!("Saved progress to {}", path.display());
        Ok(())
    }
}

/// Keep player ids inside the save directory. Anything outside
/// `[A-Za-z0-9-]` becomes `_` plus the hex of each UTF-8 byte, so distinct
/// ids never share a file.
fn escape_id(player: &str) -> String {
    let mut out = String::with_capacity(player.len());
    for c in player.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("_{byte:02x}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::CharacterId;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("juizo-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = temp_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        assert!(store.load("ana").unwrap().is_none());

        let mut record = ProgressRecord::new(CharacterId::Davi);
        record.last_checkpoint_x = 6000;
        store.save("ana", &record).unwrap();
        assert_eq!(store.load("ana").unwrap(), Some(record));
        assert!(!dir.join("juizo_save_ana.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_player_id_is_sanitized() {
        let dir = temp_dir("sanitize");
        let store = FileStore::new(&dir);
        let path = store.path_for("../evil");
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("juizo_save__2e_2e_2fevil.json"));
    }

    #[test]
    fn test_similar_ids_keep_separate_saves() {
        let dir = temp_dir("distinct");
        let mut store = FileStore::new(&dir);
        assert_ne!(store.path_for("a.b"), store.path_for("a_b"));
        assert_ne!(store.path_for("a_b"), store.path_for("a_5fb_"));

        let mut first = ProgressRecord::new(CharacterId::Davi);
        first.currency = 10;
        let mut second = ProgressRecord::new(CharacterId::Elias);
        second.currency = 20;
        store.save("a.b", &first).unwrap();
        store.save("a_b", &second).unwrap();
        assert_eq!(store.load("a.b").unwrap(), Some(first));
        assert_eq!(store.load("a_b").unwrap(), Some(second));

        let _ = fs::remove_dir_all(&dir);
    }
}
