//! # GOBAN Pipeline
//!
//! Background synthesis of domain entities with throughput reporting.
//!
//! ## Architecture
//!
//! ```text
//!   tick(generation) ──> [Generator] ══ rendezvous ══> [Inserter] ──> EntityStore
//!                                                                        │
//!   tick(monitor)    ──> [Monitor] <──────────── counts() ───────────────┘
//!                            │
//!                            └──> info!("new rooms added: 3")
//!
//!   CancelToken ──> all three, observed at every timer wait and channel op
//! ```
//!
//! Each task moves `Running -> Draining -> Stopped`. The
//! [`PipelineHandle`] owns the three threads and joins all of them before
//! [`PipelineHandle::join`] returns.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use goban_pipeline::start_pipeline;
//! use goban_store::EntityStore;
//!
//! let store = Arc::new(EntityStore::new());
//! let handle = start_pipeline(Arc::clone(&store), Duration::from_millis(50))?;
//!
//! std::thread::sleep(Duration::from_secs(1));
//! let report = handle.shutdown()?;
//! assert_eq!(report.inserted as usize, store.counts().total());
//! # Ok::<(), goban_pipeline::PipelineError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cancel;
pub mod config;
pub mod error;
pub mod factory;
pub mod monitor;
pub mod pipeline;
pub mod task;

pub use cancel::CancelToken;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use factory::EntityFactory;
pub use monitor::{Monitor, MonitorEvent};
pub use pipeline::{start_pipeline, PipelineBuilder, PipelineHandle, PipelineReport};
pub use task::{TaskKind, TaskState};
