//! # Collection Snapshots
//!
//! After each insert the store can hand the whole collection of the
//! inserted kind to a [`SnapshotSink`]. The sink runs under the store lock,
//! so it sees a collection that no other caller is mutating.
//!
//! [`JsonDirSink`] writes one JSON document per collection:
//!
//! ```text
//! <dir>/players.json
//! <dir>/rooms.json
//! <dir>/boards.json
//! <dir>/games.json
//! ```
//!
//! Each document is written to a `.tmp` sibling first and renamed over the
//! previous one.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::entity::{Entity, EntityKind};
use crate::error::{StoreError, StoreResult};

/// Destination for collection snapshots.
pub trait SnapshotSink: Send + Sync {
    /// Saves the complete current collection of `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be persisted.
    fn save(&self, kind: EntityKind, entries: &[Entity]) -> StoreResult<()>;
}

/// Writes each collection as a pretty-printed JSON array in one directory.
#[derive(Clone, Debug)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    /// Creates the sink, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Returns the directory snapshots are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the document path for `kind`.
    #[must_use]
    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.collection_name()))
    }
}

impl JsonDirSink {
    fn write_tmp(tmp: &Path, kind: EntityKind, entries: &[Entity]) -> StoreResult<()> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: tmp.to_path_buf(),
            source,
        };

        let file = File::create(tmp).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)
            .map_err(|source| StoreError::Encode { kind, source })?;
        writer.flush().map_err(io_err)
    }
}

impl SnapshotSink for JsonDirSink {
    fn save(&self, kind: EntityKind, entries: &[Entity]) -> StoreResult<()> {
        let path = self.path_for(kind);
        let tmp = path.with_extension("json.tmp");

        let written = Self::write_tmp(&tmp, kind, entries).and_then(|()| {
            fs::rename(&tmp, &path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })
        });
        if written.is_err() {
            fs::remove_file(&tmp).ok();
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EntityStore;
    use goban_model::{Board, Player};
    use std::sync::Arc;

    fn temp_snapshot_dir() -> PathBuf {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("test_goban_snapshots_{id}"))
    }

    #[test]
    fn test_json_dir_sink_writes_collection() {
        let dir = temp_snapshot_dir();
        let sink = Arc::new(JsonDirSink::new(&dir).unwrap());
        let store = EntityStore::with_sink(Arc::clone(&sink) as Arc<dyn SnapshotSink>);

        store.insert(&mut Player::new("alice"));
        store.insert(&mut Player::new("bob"));
        store.insert(&mut Board::new(3).unwrap());

        let players: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(sink.path_for(EntityKind::Player)).unwrap())
                .unwrap();
        let players = players.as_array().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0]["id"], 1);
        assert_eq!(players[1]["name"], "bob");

        let boards: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(sink.path_for(EntityKind::Board)).unwrap())
                .unwrap();
        assert_eq!(boards[0]["size"], 3);
        assert_eq!(boards[0]["cells"].as_array().unwrap().len(), 9);

        assert!(!sink.path_for(EntityKind::Game).exists());
        assert!(!sink.path_for(EntityKind::Player).with_extension("json.tmp").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_failed_save_leaves_no_tmp() {
        let dir = temp_snapshot_dir();
        let sink = JsonDirSink::new(&dir).unwrap();

        // A non-empty directory where the document should go makes the rename fail.
        let blocked = sink.path_for(EntityKind::Room);
        fs::create_dir_all(blocked.join("occupied")).unwrap();

        let entries = vec![Entity::from(goban_model::Room::new("r"))];
        let result = sink.save(EntityKind::Room, &entries);

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(!blocked.with_extension("json.tmp").exists());
        assert!(blocked.is_dir());

        fs::remove_dir_all(&dir).ok();
    }
}
