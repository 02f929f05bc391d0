//! The immutable snapshot of a tycoon's item data.
//!
//! Every mutation produces a new record; the previous value is never touched,
//! so a subscriber holding `(new, previous)` always sees a consistent pair.
//! The item map sits behind an `Arc`, making snapshots cheap to clone and
//! hand out.

use crate::ItemId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// All persisted item data of one tycoon at one point in time.
///
/// Keys are the ids of unlocked items; a missing key means the item is
/// locked and has no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TycoonRecord {
    #[serde(default)]
    items: Arc<BTreeMap<ItemId, Value>>,
}

impl TycoonRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from existing item data (e.g. a loaded save).
    #[must_use]
    pub fn from_items(items: BTreeMap<ItemId, Value>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Returns the stored data of one item.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Value> {
        self.items.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    #[must_use]
    pub fn items(&self) -> &BTreeMap<ItemId, Value> {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns a new record with `id` set to `value`.
    #[must_use]
    pub fn with_item(&self, id: ItemId, value: Value) -> Self {
        let mut items = BTreeMap::clone(&self.items);
        items.insert(id, value);
        Self::from_items(items)
    }

    /// Returns a new record without `id`, or `None` if `id` was absent.
    #[must_use]
    pub fn without_item(&self, id: &ItemId) -> Option<Self> {
        if !self.items.contains_key(id) {
            return None;
        }
        let mut items = BTreeMap::clone(&self.items);
        items.remove(id);
        Some(Self::from_items(items))
    }

    /// Returns true if both records share the same underlying map.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Serializes the record to JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes a record from JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
