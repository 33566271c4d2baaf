//! # Pipeline Error Types
//!
//! Cancellation is the normal way for a task to end and is never an error.

use std::io;
use std::path::PathBuf;

use goban_model::ModelError;
use thiserror::Error;

use crate::task::TaskKind;

/// Errors that can occur while configuring or running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`PipelineConfig`](crate::PipelineConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Building an entity failed.
    #[error("entity construction failed: {0}")]
    Model(#[from] ModelError),

    /// A task thread could not be started.
    #[error("failed to spawn {task} thread: {source}")]
    Spawn {
        /// Task that failed to start.
        task: TaskKind,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A task thread panicked.
    #[error("{task} task panicked")]
    TaskPanicked {
        /// Task that panicked.
        task: TaskKind,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
