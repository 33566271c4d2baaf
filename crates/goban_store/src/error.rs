//! # Store Error Types
//!
//! Missing identities are not errors: lookups answer `None`, deletes and
//! updates answer `false`.

use std::io;
use std::path::PathBuf;

use goban_model::ModelError;
use thiserror::Error;

use crate::entity::EntityKind;

/// Errors that can occur in the entity store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An update carried a value the record rejects.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Snapshot file or directory could not be written.
    #[error("snapshot I/O failed at {path}: {source}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A collection could not be encoded.
    #[error("failed to encode {kind} snapshot: {source}")]
    Encode {
        /// Kind of the collection being saved.
        kind: EntityKind,
        /// Underlying encoder error.
        source: serde_json::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
