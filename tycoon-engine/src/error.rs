//! Error types for the tycoon engine.

use thiserror::Error;
use tycoon_types::{ActorId, ItemId, NodeId};

#[derive(Debug, Error)]
pub enum TycoonError {
    #[error("tycoon already owned by {0}")]
    AlreadyOwned(ActorId),

    #[error("tycoon is not owned")]
    NotOwned,

    #[error("tycoon has been destroyed")]
    TycoonDestroyed,

    #[error("tycoon items are already initialized")]
    AlreadyInitialized,

    #[error("item '{0}' is locked")]
    ItemLocked(ItemId),

    #[error("item '{0}' has been destroyed")]
    ItemDestroyed(ItemId),

    #[error("item id '{id}' of {node} is already in use")]
    DuplicateItemId { id: ItemId, node: NodeId },

    #[error("item '{0}' is unlocked but has no data")]
    MissingItemData(ItemId),

    #[error("invalid data for item '{id}': {source}")]
    InvalidData {
        id: ItemId,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} has no name to derive an item id from")]
    UnnamedNode(NodeId),

    #[error("item kind '{0}' has no data guard")]
    MissingDataGuard(String),

    #[error("item kind already registered: {0}")]
    DuplicateKind(String),

    #[error("tag '{tag}' is claimed by both '{existing}' and '{incoming}'")]
    TagCollision {
        tag: String,
        existing: String,
        incoming: String,
    },

    #[error("item kind '{kind}' extends unknown kind '{parent}'")]
    UnknownParentKind { kind: String, parent: String },

    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TycoonError>;
