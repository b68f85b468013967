//! Flat-file persistence for placement counts.
//!
//! The on-disk format is one `name=count` line per tracked display name,
//! in no particular order. Names are written verbatim with no escaping, so
//! a display name containing `=` will not survive a round trip; the loader
//! skips any line that does not split into exactly two fields.

use crate::error::StorageError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};

/// File name of the persisted counts inside the plugin data directory.
pub const COUNTS_FILE: &str = "counts.txt";

/// Reads and writes the count file.
#[derive(Debug, Clone)]
pub struct CountStore {
    path: PathBuf,
}

impl CountStore {
    /// Creates a store over `<data_dir>/counts.txt`, creating the data
    /// directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(&data_dir) {
                error!("failed to create data directory {}: {e}", data_dir.display());
            }
        }
        Self {
            path: data_dir.join(COUNTS_FILE),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Loads all counts from the file.
    ///
    /// Malformed lines (wrong field count after splitting on `=`, or a
    /// second field that is not an unsigned integer) are skipped with a
    /// warning; the rest of the file still loads. A missing file is
    /// [`StorageError::NotFound`] so the caller can start empty.
    pub async fn load(&self) -> Result<HashMap<String, u64>, StorageError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.clone()))
            }
            Err(e) => return Err(StorageError::Read(self.path.clone(), e)),
        };

        let mut counts = HashMap::new();
        for line in text.lines() {
            let fields: Vec<&str> = line.split('=').collect();
            if fields.len() != 2 {
                warn!("bad line syntax {line:?}");
                continue;
            }
            match fields[1].parse::<u64>() {
                Ok(count) => {
                    counts.insert(fields[0].to_string(), count);
                }
                Err(_) => warn!("bad number in line {line:?}"),
            }
        }

        debug!("loaded {} counts from {}", counts.len(), self.path.display());
        Ok(counts)
    }

    /// Writes the whole map, replacing the file in one rename.
    pub async fn save(&self, counts: &HashMap<String, u64>) -> Result<(), StorageError> {
        let mut contents = String::new();
        for (name, count) in counts {
            contents.push_str(name);
            contents.push('=');
            contents.push_str(&count.to_string());
            contents.push('\n');
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StorageError::FileCreate(temp_path.clone(), e))?;
        file.write_all(contents.as_bytes())
            .await
            .map_err(|e| StorageError::FileWrite(temp_path.clone(), e))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::FileSync(temp_path.clone(), e))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::FileRename(temp_path, self.path.clone(), e))?;

        debug!("saved {} counts to {}", counts.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::new(dir.path());

        let mut counts = HashMap::new();
        counts.insert("Alice".to_string(), 7u64);
        counts.insert("Bob the Builder".to_string(), 0u64);
        counts.insert("Zed".to_string(), 123_456u64);

        store.save(&counts).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, counts);
    }

    #[tokio::test]
    async fn missing_file_is_a_distinguishable_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::new(dir.path());

        let err = store.load().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::new(dir.path());
        tokio::fs::write(
            store.path(),
            "Alice=3\nBob:5\nCarol=abc\nDave=9\nEve=1=2\n",
        )
        .await
        .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["Alice"], 3);
        assert_eq!(loaded["Dave"], 9);
        assert!(!loaded.contains_key("Bob:5"));
        assert!(!loaded.contains_key("Carol"));
        assert!(!loaded.contains_key("Eve"));
    }

    #[tokio::test]
    async fn save_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::new(dir.path());

        let mut first = HashMap::new();
        first.insert("Old".to_string(), 5u64);
        store.save(&first).await.unwrap();

        let mut second = HashMap::new();
        second.insert("New".to_string(), 1u64);
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn empty_map_saves_to_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CountStore::new(dir.path());

        store.save(&HashMap::new()).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert!(loaded.is_empty());
    }
}
