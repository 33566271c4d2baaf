//! # GOBAN
//!
//! Go game domain model with a concurrent, identity-assigning entity store
//! and a background pipeline that keeps feeding it.
//!
//! ## Crates
//!
//! - [`model`] - boards, games, players, rooms
//! - [`store`] - thread-safe per-kind collections with monotonic ids
//! - [`pipeline`] - generator, inserter and monitor threads
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use goban::{start_pipeline, EntityStore};
//!
//! let store = Arc::new(EntityStore::new());
//! let handle = start_pipeline(Arc::clone(&store), Duration::from_millis(100))?;
//! std::thread::sleep(Duration::from_secs(2));
//! let report = handle.shutdown()?;
//! println!("{report:?} {:?}", store.counts());
//! # Ok::<(), goban::PipelineError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub use goban_model as model;
pub use goban_pipeline as pipeline;
pub use goban_store as store;

pub use goban_model::{
    Board, CellState, EntityId, Game, GameOptions, GameStatus, ModelError, Player, PlayerRef,
    Room,
};
pub use goban_pipeline::{
    start_pipeline, PipelineBuilder, PipelineConfig, PipelineError, PipelineHandle,
    PipelineReport, TaskKind, TaskState,
};
pub use goban_store::{Entity, EntityKind, EntityStore, EntityUpdate, KindCounts, StoreError};
