//! # Entity Store
//!
//! ## Architecture
//!
//! ```text
//!   Domain layer ──┐
//!   Pipeline     ──┼──> [ Mutex<Tables> ] ──> optional SnapshotSink
//!   Transport    ──┘      players │ rooms │ boards │ games
//!                         next_id │ next_id │ ...
//! ```
//!
//! Every public method acquires the one mutex for its whole critical
//! section. Insertion assigns the identity, appends, and (when a sink is
//! configured) saves the kind's collection, all inside the same lock hold,
//! so concurrent inserts of one kind always receive distinct, gap-free
//! identities starting at 1.
//!
//! Lookups are linear scans. There is no secondary index.

use std::sync::Arc;

use goban_model::EntityId;
use parking_lot::Mutex;

use crate::entity::{Entity, EntityKind, EntityUpdate, Record};
use crate::error::StoreResult;
use crate::snapshot::SnapshotSink;

/// One collection plus its identity counter.
#[derive(Debug)]
struct Collection {
    /// Identity the next insert receives.
    next_id: EntityId,
    /// Records in insertion order.
    entries: Vec<Entity>,
}

impl Collection {
    const fn new() -> Self {
        Self {
            next_id: EntityId::FIRST,
            entries: Vec::new(),
        }
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }
}

/// All collections, indexed by [`EntityKind::index`].
#[derive(Debug)]
struct Tables {
    collections: [Collection; EntityKind::COUNT],
}

impl Tables {
    const fn new() -> Self {
        Self {
            collections: [
                Collection::new(),
                Collection::new(),
                Collection::new(),
                Collection::new(),
            ],
        }
    }

    #[inline]
    fn get(&self, kind: EntityKind) -> &Collection {
        &self.collections[kind.index()]
    }

    #[inline]
    fn get_mut(&mut self, kind: EntityKind) -> &mut Collection {
        &mut self.collections[kind.index()]
    }
}

/// Per-kind record counts read in one lock acquisition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts([usize; EntityKind::COUNT]);

impl KindCounts {
    /// Creates counts from raw values in [`EntityKind::ALL`] order.
    #[must_use]
    pub const fn new(counts: [usize; EntityKind::COUNT]) -> Self {
        Self(counts)
    }

    /// Returns the count for one kind.
    #[inline]
    #[must_use]
    pub const fn get(&self, kind: EntityKind) -> usize {
        self.0[kind.index()]
    }

    /// Returns the sum over all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Iterates `(kind, count)` pairs in [`EntityKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, usize)> + '_ {
        EntityKind::ALL.iter().map(move |kind| (*kind, self.get(*kind)))
    }
}

/// Thread-safe store of players, rooms, boards and games.
pub struct EntityStore {
    /// The single lock guarding every collection and counter.
    tables: Mutex<Tables>,
    /// Where collection snapshots go after each insert.
    sink: Option<Arc<dyn SnapshotSink>>,
}

impl EntityStore {
    /// Creates an empty store with no snapshot sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::new()),
            sink: None,
        }
    }

    /// Creates an empty store that saves a kind's whole collection to
    /// `sink` after every insert of that kind.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            tables: Mutex::new(Tables::new()),
            sink: Some(sink),
        }
    }

    /// Inserts any entity, assigning the next identity of its kind.
    ///
    /// The identity is written into `entity` so the caller keeps a usable
    /// copy. A snapshot failure is logged and does not undo the insert.
    pub fn insert_entity(&self, entity: &mut Entity) -> EntityId {
        let kind = entity.kind();
        let mut tables = self.tables.lock();
        let collection = tables.get_mut(kind);

        let id = collection.next_id;
        collection.next_id = id.next();
        entity.assign_id(id);
        collection.entries.push(entity.clone());

        if let Some(sink) = &self.sink {
            if let Err(err) = sink.save(kind, &collection.entries) {
                tracing::warn!(%kind, %id, error = %err, "snapshot save failed");
            }
        }
        drop(tables);

        tracing::debug!(%kind, %id, "entity inserted");
        id
    }

    /// Inserts a typed record, writing the assigned identity back into it.
    pub fn insert<R: Record>(&self, record: &mut R) -> EntityId {
        let mut entity = record.clone().into_entity();
        let id = self.insert_entity(&mut entity);
        record.assign_id(id);
        id
    }

    /// Returns a copy of the first entity of `kind` with identity `id`.
    #[must_use]
    pub fn get_by_id(&self, kind: EntityKind, id: EntityId) -> Option<Entity> {
        let tables = self.tables.lock();
        let collection = tables.get(kind);
        collection
            .position(id)
            .map(|i| collection.entries[i].clone())
    }

    /// Returns a copy of the typed record with identity `id`.
    #[must_use]
    pub fn get<R: Record>(&self, id: EntityId) -> Option<R> {
        let tables = self.tables.lock();
        tables
            .get(R::KIND)
            .entries
            .iter()
            .find(|e| e.id() == id)
            .and_then(R::from_entity)
            .cloned()
    }

    /// Returns a snapshot copy of a whole collection, in insertion order.
    #[must_use]
    pub fn get_all(&self, kind: EntityKind) -> Vec<Entity> {
        self.tables.lock().get(kind).entries.clone()
    }

    /// Returns a snapshot copy of every record of type `R`.
    #[must_use]
    pub fn all<R: Record>(&self) -> Vec<R> {
        let tables = self.tables.lock();
        tables
            .get(R::KIND)
            .entries
            .iter()
            .filter_map(R::from_entity)
            .cloned()
            .collect()
    }

    /// Returns the number of records of `kind`.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.tables.lock().get(kind).entries.len()
    }

    /// Returns all four counts from a single lock acquisition.
    #[must_use]
    pub fn counts(&self) -> KindCounts {
        let tables = self.tables.lock();
        KindCounts(EntityKind::ALL.map(|kind| tables.get(kind).entries.len()))
    }

    /// Removes the first entity of `kind` with identity `id`.
    ///
    /// Returns `false` if nothing matched. The identity is not reused.
    pub fn delete_by_id(&self, kind: EntityKind, id: EntityId) -> bool {
        let mut tables = self.tables.lock();
        let collection = tables.get_mut(kind);
        let Some(i) = collection.position(id) else {
            return false;
        };
        collection.entries.remove(i);
        drop(tables);

        tracing::debug!(%kind, %id, "entity deleted");
        true
    }

    /// Applies `update` in place to the entity with identity `id`.
    ///
    /// The kind is taken from the update variant. Returns `Ok(false)` if no
    /// such entity exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Model`](crate::StoreError::Model) if the record
    /// rejects the new value; the record is left unchanged.
    pub fn update_by_id(&self, id: EntityId, update: &EntityUpdate) -> StoreResult<bool> {
        let kind = update.kind();
        let mut tables = self.tables.lock();
        let collection = tables.get_mut(kind);
        let Some(i) = collection.position(id) else {
            return Ok(false);
        };
        let applied = update.apply(&mut collection.entries[i])?;
        drop(tables);

        if applied {
            tracing::debug!(%kind, %id, "entity updated");
        }
        Ok(applied)
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("counts", &self.counts())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
