//! Core type definitions for the tycoon engine.
//!
//! This crate defines the plain value types every other crate depends on:
//! - Item, actor and scene-node identifiers
//! - [`TycoonRecord`], the immutable snapshot of all item data of one tycoon
//!
//! Nothing here knows about lock states, signals or the scene graph; those
//! live in `tycoon-engine`.

mod ids;
mod record;

pub use ids::{ActorId, ItemId, NodeId};
pub use record::TycoonRecord;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid item id: {0}")]
    InvalidItemId(String),
}
