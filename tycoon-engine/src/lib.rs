//! Ownership and item-lifecycle engine for claimable tycoon structures.
//!
//! A [`Tycoon`] is a root scene node that at most one actor owns at a time.
//! Tagged descendants become items ([`ItemHandle`]) that toggle between a
//! locked state (parked, no data) and an unlocked state (in place, data in the
//! tycoon's [`TycoonRecord`](tycoon_types::TycoonRecord)).
//!
//! Everything is single-threaded: handles are `Rc`-based, notifications are
//! delivered synchronously through [`Signal`]s before the triggering call
//! returns, and no internal borrow is held while listeners or item hooks run.

mod behavior;
mod config;
mod error;
mod item;
mod kinds;
mod owner;
mod registry;
mod scene;
mod service;
mod signal;
mod tycoon;

pub use behavior::ItemBehavior;
pub use config::{DEFAULT_ID_ATTRIBUTE, DEFAULT_LOCK_ITEM_TAG, EngineConfig};
pub use error::{Result, TycoonError};
pub use item::{ItemHandle, LockState};
pub use kinds::{DEFAULT_ITEM_KIND, DEFAULT_ITEM_TAG, StaticData, default_item_kind};
pub use owner::OwnerProfile;
pub use registry::{ItemKind, ItemRegistry};
pub use scene::{MemoryScene, SceneGraph};
pub use service::TycoonService;
pub use signal::{Connection, Signal, SubscriptionSet};
pub use tycoon::{DataChange, ItemQualifier, TYCOON_COMPONENT, Tycoon};

pub use tycoon_model::{DataGuard, ItemSchema, SchemaField};
pub use tycoon_types::{ActorId, ItemId, NodeId, TycoonRecord};
