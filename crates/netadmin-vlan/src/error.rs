use std::path::PathBuf;

use crate::model::VlanId;
use crate::validation::ValidationError;

/// Errors from VLAN store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The operation targets an id that is not in the store.
    #[error("vlan not found: {0}")]
    NotFound(VlanId),

    /// The record breaks one or more admission rules.
    #[error("invalid vlan: {0}")]
    Validation(#[from] ValidationError),

    /// A record in the store file breaks an admission rule.
    #[error("invalid VLAN {id} in {}: {source}", path.display())]
    InvalidRecord {
        path: PathBuf,
        id: VlanId,
        source: ValidationError,
    },

    /// The store file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The store file is not a JSON array of VLAN records.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The collection could not be serialized.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The collection could not be written back to disk.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StoreError {
    /// Returns `true` for failures of the backing file rather than of the
    /// request itself.
    pub fn is_persistence(&self) -> bool {
        !matches!(self, Self::NotFound(_) | Self::Validation(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
