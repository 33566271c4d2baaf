//! # GOBAN Store
//!
//! In-memory storage for players, rooms, boards and games.
//!
//! ## Design Principles
//!
//! 1. **One lock** - all four collections and their identity counters live
//!    behind a single mutex; every operation holds it for its whole critical
//!    section
//! 2. **Identities per kind** - each kind counts from 1, one step per insert,
//!    and a deleted identity is never handed out again
//! 3. **Copies out** - reads return clones, so nothing outside the lock can
//!    observe a collection mid-mutation
//!
//! ## Thread Safety
//!
//! [`EntityStore`] is `Send + Sync`. Share it with `Arc` between the domain
//! layer, the generation pipeline and any transport layer.
//!
//! ## Example
//!
//! ```rust
//! use goban_model::Player;
//! use goban_store::{EntityKind, EntityStore};
//!
//! let store = EntityStore::new();
//! let mut player = Player::new("player123");
//! let id = store.insert(&mut player);
//!
//! assert_eq!(id.get(), 1);
//! assert_eq!(player.id(), id);
//! assert_eq!(store.count(EntityKind::Player), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod entity;
pub mod error;
pub mod snapshot;
pub mod store;

pub use entity::{Entity, EntityKind, EntityUpdate, Record};
pub use error::{StoreError, StoreResult};
pub use snapshot::{JsonDirSink, SnapshotSink};
pub use store::{EntityStore, KindCounts};
