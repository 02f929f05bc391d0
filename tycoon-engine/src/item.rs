//! Per-item lock state machine.
//!
//! An item is either `Unlocked` (node at its original place, data present in
//! the tycoon record) or `Locked` (node parked in the holding container, no
//! data). A destroyed item ignores every transition.

use crate::behavior::ItemBehavior;
use crate::error::{Result, TycoonError};
use crate::registry::ItemKind;
use crate::signal::{Signal, SubscriptionSet};
use crate::tycoon::{Tycoon, WeakTycoon};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};
use tycoon_model::reconcile;
use tycoon_types::{ItemId, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    Locked,
    Unlocked,
}

struct ItemInner {
    id: ItemId,
    node: NodeId,
    kind: Rc<ItemKind>,
    behavior: Rc<dyn ItemBehavior>,
    tycoon: WeakTycoon,
    base_parent: Option<NodeId>,
    locked: Cell<bool>,
    destroyed: Cell<bool>,
    lock_changed: Signal<LockState>,
    subscriptions: SubscriptionSet,
}

/// Shared handle to one item of a tycoon.
#[derive(Clone)]
pub struct ItemHandle {
    inner: Rc<ItemInner>,
}

impl ItemHandle {
    /// Builds the item for `node`. Nothing is materialized until `setup`.
    pub(crate) fn new(tycoon: &Tycoon, node: NodeId, id: ItemId, kind: Rc<ItemKind>) -> Self {
        let behavior = kind.build_behavior(node);
        Self {
            inner: Rc::new(ItemInner {
                id,
                node,
                base_parent: tycoon.scene().parent(node),
                kind,
                behavior,
                tycoon: tycoon.downgrade(),
                locked: Cell::new(true),
                destroyed: Cell::new(false),
                lock_changed: Signal::new(),
                subscriptions: SubscriptionSet::new(),
            }),
        }
    }

    /// Second construction phase: runs once every sibling exists.
    pub(crate) fn setup(&self, tycoon: &Tycoon) {
        if self.is_destroyed() {
            return;
        }
        debug!(item_id = %self.inner.id, "Item starting");

        self.init_lock_state();

        let weak = Rc::downgrade(&self.inner);
        self.inner
            .subscriptions
            .add(tycoon.data_reset().connect(move |_| {
                if let Some(inner) = weak.upgrade() {
                    ItemHandle { inner }.reevaluate();
                }
            }));

        self.validate_data(tycoon);
        debug!(item_id = %self.inner.id, kind = %self.inner.kind.name(), "Item created");
    }

    /// Runs on every record reset: the new record may hold data for this item
    /// that no longer matches its kind.
    fn reevaluate(&self) {
        self.init_lock_state();
        if let Some(tycoon) = self.tycoon() {
            self.validate_data(&tycoon);
        }
    }

    /// Re-derives the lock state from the current record.
    ///
    /// Stored data wins and is kept as is; otherwise the lock tag decides
    /// between locked and unlocked-with-defaults. The state flag is forced to
    /// the opposite value first, so the transition and its hooks always run.
    fn init_lock_state(&self) {
        if self.is_destroyed() {
            return;
        }
        let Some(tycoon) = self.tycoon() else {
            return;
        };

        if self.try_data().is_some() {
            self.inner.locked.set(true);
            self.enter_unlocked(&tycoon, false);
            return;
        }

        if tycoon
            .scene()
            .has_tag(self.inner.node, &tycoon.config().lock_item_tag)
        {
            self.inner.locked.set(false);
            self.lock();
            return;
        }

        self.inner.locked.set(true);
        self.enter_unlocked(&tycoon, true);
    }

    fn validate_data(&self, tycoon: &Tycoon) {
        if self.is_destroyed() {
            return;
        }
        let Some(data) = self.try_data() else {
            return;
        };
        let Some(guard) = self.inner.kind.guard() else {
            return;
        };
        let Err(error) = guard.check(&data) else {
            return;
        };

        let repaired = reconcile(&data, &self.inner.behavior.generate_data());
        warn!(item_id = %self.inner.id, %error, "Stored item data failed validation, reconciling");
        tycoon.mutate_item_data(&self.inner.id, repaired);
    }

    /// Parks the item and drops its data. No-op if locked or destroyed.
    pub fn lock(&self) {
        if self.inner.locked.get() || self.is_destroyed() {
            return;
        }
        let Some(tycoon) = self.tycoon() else {
            return;
        };

        self.inner.locked.set(true);
        if let Some(container) = tycoon.container() {
            tycoon.scene().set_parent(self.inner.node, container);
        }
        tycoon.clear_item_data(&self.inner.id);
        debug!(item_id = %self.inner.id, "Item locked");

        self.inner.lock_changed.fire(&LockState::Locked);
        self.inner.behavior.on_locked(self);
    }

    /// Restores the item with fresh default data. No-op if unlocked or destroyed.
    pub fn unlock(&self) {
        if !self.inner.locked.get() || self.is_destroyed() {
            return;
        }
        let Some(tycoon) = self.tycoon() else {
            return;
        };
        self.enter_unlocked(&tycoon, true);
    }

    fn enter_unlocked(&self, tycoon: &Tycoon, generate: bool) {
        if !self.inner.locked.get() || self.is_destroyed() {
            return;
        }

        self.inner.locked.set(false);
        if let Some(parent) = self.inner.base_parent {
            tycoon.scene().set_parent(self.inner.node, parent);
        }
        if generate {
            tycoon.mutate_item_data(&self.inner.id, self.inner.behavior.generate_data());
        }
        debug!(item_id = %self.inner.id, "Item unlocked");

        self.inner.lock_changed.fire(&LockState::Unlocked);
        self.inner.behavior.on_unlocked(self);
    }

    /// Current data of an unlocked item.
    pub fn data(&self) -> Result<Value> {
        self.ensure_unlocked()?;
        let tycoon = self.tycoon().ok_or(TycoonError::TycoonDestroyed)?;
        tycoon
            .data()
            .item(&self.inner.id)
            .cloned()
            .ok_or_else(|| TycoonError::MissingItemData(self.inner.id.clone()))
    }

    /// Stored data if there is any, regardless of lock state.
    pub fn try_data(&self) -> Option<Value> {
        self.tycoon()?.data().item(&self.inner.id).cloned()
    }

    /// Replaces the data of an unlocked item.
    pub fn mutate_data(&self, value: Value) -> Result<()> {
        self.ensure_unlocked()?;
        let tycoon = self.tycoon().ok_or(TycoonError::TycoonDestroyed)?;
        tycoon.mutate_item_data(&self.inner.id, value);
        Ok(())
    }

    pub fn data_as<D: DeserializeOwned>(&self) -> Result<D> {
        serde_json::from_value(self.data()?).map_err(|source| TycoonError::InvalidData {
            id: self.inner.id.clone(),
            source,
        })
    }

    pub fn mutate_data_as<D: Serialize>(&self, data: &D) -> Result<()> {
        let value = serde_json::to_value(data).map_err(|source| TycoonError::InvalidData {
            id: self.inner.id.clone(),
            source,
        })?;
        self.mutate_data(value)
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(TycoonError::ItemDestroyed(self.inner.id.clone()));
        }
        if self.inner.locked.get() {
            return Err(TycoonError::ItemLocked(self.inner.id.clone()));
        }
        Ok(())
    }

    /// Stops the item for good. Safe to call more than once.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }

        self.inner.subscriptions.release();
        self.inner.lock_changed.disconnect_all();
        self.inner.behavior.on_destroyed(self);

        if let Some(tycoon) = self.tycoon() {
            tycoon.forget_item(&self.inner.id, self.inner.node);
            tycoon
                .scene()
                .detach_component(self.inner.node, self.inner.kind.name());
        }
        debug!(item_id = %self.inner.id, "Item destroyed");
    }

    pub fn id(&self) -> &ItemId {
        &self.inner.id
    }

    pub fn node(&self) -> NodeId {
        self.inner.node
    }

    pub fn kind_name(&self) -> &str {
        self.inner.kind.name()
    }

    pub fn state(&self) -> LockState {
        if self.inner.locked.get() {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }

    pub fn is_locked(&self) -> bool {
        self.inner.locked.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Fires after every committed lock transition.
    pub fn lock_changed(&self) -> &Signal<LockState> {
        &self.inner.lock_changed
    }

    /// The owning tycoon, unless it has been dropped.
    pub fn tycoon(&self) -> Option<Tycoon> {
        self.inner.tycoon.upgrade()
    }

    pub fn ptr_eq(&self, other: &ItemHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemHandle")
            .field("id", &self.inner.id)
            .field("node", &self.inner.node)
            .field("kind", &self.inner.kind.name())
            .field("state", &self.state())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
