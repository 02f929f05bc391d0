//! The tycoon: ownership state, the item data store and its items.
//!
//! A [`Tycoon`] exclusively owns the current [`TycoonRecord`] and every item
//! built from its root's descendants. The record is only ever replaced
//! wholesale; each replacement is published on `data_changed` as a
//! `(new, previous)` pair before the mutating call returns.

use crate::config::EngineConfig;
use crate::error::{Result, TycoonError};
use crate::item::ItemHandle;
use crate::owner::OwnerProfile;
use crate::registry::{ItemKind, ItemRegistry};
use crate::scene::SceneGraph;
use crate::signal::Signal;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};
use tycoon_types::{ActorId, ItemId, NodeId, TycoonRecord};

/// Component name the tycoon registers on its root node.
pub const TYCOON_COMPONENT: &str = "Tycoon";

/// One published record replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChange {
    pub new: TycoonRecord,
    pub previous: TycoonRecord,
}

/// How to address an item: by id or by its scene node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemQualifier {
    Id(ItemId),
    Node(NodeId),
}

impl From<ItemId> for ItemQualifier {
    fn from(id: ItemId) -> Self {
        Self::Id(id)
    }
}

impl From<&ItemId> for ItemQualifier {
    fn from(id: &ItemId) -> Self {
        Self::Id(id.clone())
    }
}

impl From<&str> for ItemQualifier {
    fn from(id: &str) -> Self {
        Self::Id(ItemId::from(id))
    }
}

impl From<NodeId> for ItemQualifier {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

#[derive(Default)]
struct TycoonSignals {
    data_changed: Signal<DataChange>,
    owner_changed: Signal<Option<ActorId>>,
    claimed: Signal<ActorId>,
    unclaimed: Signal<()>,
    data_reset: Signal<()>,
}

impl TycoonSignals {
    fn disconnect_all(&self) {
        self.data_changed.disconnect_all();
        self.owner_changed.disconnect_all();
        self.claimed.disconnect_all();
        self.unclaimed.disconnect_all();
        self.data_reset.disconnect_all();
    }
}

struct TycoonInner {
    root: NodeId,
    scene: Rc<dyn SceneGraph>,
    registry: Rc<ItemRegistry>,
    config: EngineConfig,
    container: Cell<Option<NodeId>>,
    record: RefCell<TycoonRecord>,
    owner: RefCell<Option<OwnerProfile>>,
    items: RefCell<HashMap<ItemId, ItemHandle>>,
    items_by_node: RefCell<HashMap<NodeId, ItemHandle>>,
    initialized: Cell<bool>,
    destroyed: Cell<bool>,
    signals: TycoonSignals,
}

/// Shared handle to a tycoon.
#[derive(Clone)]
pub struct Tycoon {
    inner: Rc<TycoonInner>,
}

/// Non-owning back-reference held by items.
#[derive(Clone)]
pub(crate) struct WeakTycoon(Weak<TycoonInner>);

impl WeakTycoon {
    pub(crate) fn upgrade(&self) -> Option<Tycoon> {
        self.0.upgrade().map(|inner| Tycoon { inner })
    }
}

impl Tycoon {
    /// Creates a tycoon rooted at `root` and registers it on the root node.
    /// Items are built by [`Tycoon::initialize`].
    pub fn new(
        root: NodeId,
        scene: Rc<dyn SceneGraph>,
        registry: Rc<ItemRegistry>,
        config: EngineConfig,
    ) -> Self {
        scene.attach_component(root, TYCOON_COMPONENT);
        Self {
            inner: Rc::new(TycoonInner {
                root,
                scene,
                registry,
                config,
                container: Cell::new(None),
                record: RefCell::new(TycoonRecord::new()),
                owner: RefCell::new(None),
                items: RefCell::new(HashMap::new()),
                items_by_node: RefCell::new(HashMap::new()),
                initialized: Cell::new(false),
                destroyed: Cell::new(false),
                signals: TycoonSignals::default(),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakTycoon {
        WeakTycoon(Rc::downgrade(&self.inner))
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.inner.destroyed.get() {
            return Err(TycoonError::TycoonDestroyed);
        }
        Ok(())
    }

    // ================================================================
    // Initialization
    // ================================================================

    /// Discovers, constructs and sets up every item below the root.
    ///
    /// All items are constructed before any of them is set up, so setup code
    /// can look up any sibling. A duplicate item id aborts initialization and
    /// tears down everything constructed so far.
    pub fn initialize(&self) -> Result<()> {
        self.ensure_alive()?;
        if self.inner.initialized.replace(true) {
            return Err(TycoonError::AlreadyInitialized);
        }

        self.inner.record.replace(TycoonRecord::new());
        if self.inner.container.get().is_none() {
            let name = self.inner.scene.name(self.inner.root).unwrap_or_default();
            self.inner
                .container
                .set(Some(self.inner.scene.create_container(&name)));
        }

        let mut constructed = Vec::new();
        for node in self.inner.scene.descendants(self.inner.root) {
            let Some(kind) = self.classify(node) else {
                continue;
            };
            match self.construct_item(node, kind) {
                Ok(item) => constructed.push(item),
                Err(e) => {
                    warn!(node = %node, error = %e, "Item construction failed, aborting initialization");
                    for item in constructed {
                        item.destroy();
                    }
                    return Err(e);
                }
            }
        }

        for item in &constructed {
            item.setup(self);
        }

        info!(root = %self.inner.root, items = constructed.len(), "Initialized items");
        Ok(())
    }

    /// Picks the item kind for `node` from its tags. Nodes with several item
    /// tags are skipped rather than guessed.
    fn classify(&self, node: NodeId) -> Option<Rc<ItemKind>> {
        let tags: Vec<String> = self
            .inner
            .scene
            .tags(node)
            .into_iter()
            .filter(|t| self.inner.registry.is_registered_tag(t))
            .collect();

        match tags.as_slice() {
            [] => None,
            [tag] => self.inner.registry.kind_for_tag(tag),
            _ => {
                warn!(node = %node, tags = %tags.join(", "), "Node has more than one item tag, skipping");
                None
            }
        }
    }

    fn construct_item(&self, node: NodeId, kind: Rc<ItemKind>) -> Result<ItemHandle> {
        let id = self.resolve_item_id(node)?;
        if self.inner.items.borrow().contains_key(&id) {
            return Err(TycoonError::DuplicateItemId { id, node });
        }

        let item = ItemHandle::new(self, node, id.clone(), kind);
        self.inner.scene.attach_component(node, item.kind_name());
        self.inner.items.borrow_mut().insert(id, item.clone());
        self.inner
            .items_by_node
            .borrow_mut()
            .insert(node, item.clone());
        Ok(item)
    }

    /// Explicit id attribute, else the names on the path from the root.
    fn resolve_item_id(&self, node: NodeId) -> Result<ItemId> {
        let scene = &self.inner.scene;
        if let Some(id) = scene.string_attribute(node, &self.inner.config.id_attribute) {
            return Ok(ItemId::new(id));
        }

        let mut segments = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.inner.root {
                break;
            }
            segments.push(scene.name(n).ok_or(TycoonError::UnnamedNode(n))?);
            current = scene.parent(n);
        }
        segments.reverse();
        Ok(ItemId::from_path(segments))
    }

    // ================================================================
    // Ownership
    // ================================================================

    /// Makes `actor` the owner and resets the record to `data` (or empty).
    ///
    /// Fires `owner_changed`, then `claimed`, then the reset notifications.
    pub fn claim(&self, actor: ActorId, data: Option<TycoonRecord>) -> Result<OwnerProfile> {
        self.ensure_alive()?;
        if let Some(owner) = self.inner.owner.borrow().as_ref() {
            return Err(TycoonError::AlreadyOwned(owner.actor()));
        }

        let profile = OwnerProfile::new(actor, self);
        self.inner.owner.replace(Some(profile.clone()));

        self.inner.signals.owner_changed.fire(&Some(actor));
        self.inner.signals.claimed.fire(&actor);

        self.reset_data(data)?;

        info!(actor = %actor, "Claimed");
        Ok(profile)
    }

    /// Ends the current claim. Fires `owner_changed(None)`, then `unclaimed`.
    pub fn unclaim(&self) -> Result<()> {
        self.ensure_alive()?;
        let profile = self
            .inner
            .owner
            .borrow_mut()
            .take()
            .ok_or(TycoonError::NotOwned)?;
        profile.destroy();

        self.inner.signals.owner_changed.fire(&None);
        self.inner.signals.unclaimed.fire(&());

        info!(actor = %profile.actor(), "Unclaimed");
        Ok(())
    }

    pub fn owner(&self) -> Option<OwnerProfile> {
        self.inner.owner.borrow().clone()
    }

    pub fn has_owner(&self) -> bool {
        self.inner.owner.borrow().is_some()
    }

    /// Returns true if `actor` is the current owner.
    pub fn verify_owner(&self, actor: ActorId) -> bool {
        self.inner
            .owner
            .borrow()
            .as_ref()
            .is_some_and(|owner| owner.actor() == actor)
    }

    /// Returns true if the actor controlling `node` is the current owner.
    pub fn verify_owner_by_proxy(&self, node: NodeId) -> bool {
        self.inner
            .scene
            .actor_for_node(node)
            .is_some_and(|actor| self.verify_owner(actor))
    }

    // ================================================================
    // Data
    // ================================================================

    /// The latest snapshot.
    pub fn data(&self) -> TycoonRecord {
        self.inner.record.borrow().clone()
    }

    /// Replaces the whole record and fires `data_reset`, letting every item
    /// re-derive its lock state.
    pub fn reset_data(&self, data: Option<TycoonRecord>) -> Result<()> {
        self.ensure_alive()?;
        self.replace_record(data.unwrap_or_default());
        self.inner.signals.data_reset.fire(&());

        info!(items = self.inner.record.borrow().len(), "Reset data");
        Ok(())
    }

    pub(crate) fn mutate_item_data(&self, id: &ItemId, value: Value) {
        let next = self.inner.record.borrow().with_item(id.clone(), value);
        self.replace_record(next);
        debug!(item_id = %id, "Mutated item data");
    }

    pub(crate) fn clear_item_data(&self, id: &ItemId) {
        let next = self.inner.record.borrow().without_item(id);
        if let Some(next) = next {
            self.replace_record(next);
            debug!(item_id = %id, "Cleared item data");
        }
    }

    fn replace_record(&self, new: TycoonRecord) {
        let previous = self.inner.record.replace(new.clone());
        self.inner
            .signals
            .data_changed
            .fire(&DataChange { new, previous });
    }

    // ================================================================
    // Items
    // ================================================================

    pub fn item(&self, qualifier: impl Into<ItemQualifier>) -> Option<ItemHandle> {
        match qualifier.into() {
            ItemQualifier::Id(id) => self.inner.items.borrow().get(&id).cloned(),
            ItemQualifier::Node(node) => self.inner.items_by_node.borrow().get(&node).cloned(),
        }
    }

    /// Like [`Tycoon::item`], but only if the item is of `kind` or a kind
    /// descending from it.
    pub fn item_of_kind(&self, qualifier: impl Into<ItemQualifier>, kind: &str) -> Option<ItemHandle> {
        self.item(qualifier)
            .filter(|item| self.inner.registry.is_kind_of(item.kind_name(), kind))
    }

    /// All items, ordered by id.
    pub fn items(&self) -> Vec<ItemHandle> {
        let mut items: Vec<ItemHandle> = self.inner.items.borrow().values().cloned().collect();
        items.sort_by(|a, b| a.id().cmp(b.id()));
        items
    }

    pub(crate) fn forget_item(&self, id: &ItemId, node: NodeId) {
        self.inner.items.borrow_mut().remove(id);
        self.inner.items_by_node.borrow_mut().remove(&node);
    }

    // ================================================================
    // Teardown
    // ================================================================

    /// Destroys every item, ends any claim and detaches the tycoon.
    /// Safe to call more than once.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }

        let items: Vec<ItemHandle> = self.inner.items.borrow_mut().drain().map(|(_, item)| item).collect();
        self.inner.items_by_node.borrow_mut().clear();
        for item in items {
            item.destroy();
        }

        let owner = self.inner.owner.borrow_mut().take();
        if let Some(profile) = owner {
            profile.destroy();
        }
        self.inner.signals.disconnect_all();

        if let Some(container) = self.inner.container.take() {
            self.inner.scene.destroy_container(container);
        }
        self.inner
            .scene
            .detach_component(self.inner.root, TYCOON_COMPONENT);

        info!(root = %self.inner.root, "Destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    // ================================================================
    // Accessors
    // ================================================================

    pub fn root(&self) -> NodeId {
        self.inner.root
    }

    /// Holding container for locked items; set by `initialize`.
    pub fn container(&self) -> Option<NodeId> {
        self.inner.container.get()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn scene(&self) -> &Rc<dyn SceneGraph> {
        &self.inner.scene
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.inner.registry
    }

    /// Every record replacement, as `(new, previous)`.
    pub fn data_changed(&self) -> &Signal<DataChange> {
        &self.inner.signals.data_changed
    }

    pub fn owner_changed(&self) -> &Signal<Option<ActorId>> {
        &self.inner.signals.owner_changed
    }

    pub fn claimed(&self) -> &Signal<ActorId> {
        &self.inner.signals.claimed
    }

    pub fn unclaimed(&self) -> &Signal<()> {
        &self.inner.signals.unclaimed
    }

    /// Fired after the record was replaced by `reset_data` or `claim`.
    pub fn data_reset(&self) -> &Signal<()> {
        &self.inner.signals.data_reset
    }

    pub fn ptr_eq(&self, other: &Tycoon) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Tycoon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tycoon")
            .field("root", &self.inner.root)
            .field("owner", &self.owner().map(|o| o.actor()))
            .field("items", &self.inner.items.borrow().len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
