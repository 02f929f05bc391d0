//! Item kinds and the tag → kind lookup table.
//!
//! Built once at startup from a list of [`ItemKind`] descriptors. A kind is
//! matched against scene nodes by its tag; kinds without a tag are abstract and
//! only serve as ancestors for kind-compatibility checks.

use crate::behavior::ItemBehavior;
use crate::error::{Result, TycoonError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use tracing::info;
use tycoon_model::DataGuard;
use tycoon_types::NodeId;

type BehaviorFactory = Rc<dyn Fn(NodeId) -> Rc<dyn ItemBehavior>>;

/// Descriptor of one item kind.
#[derive(Clone)]
pub struct ItemKind {
    name: String,
    tag: Option<String>,
    parent: Option<String>,
    guard: Option<DataGuard>,
    factory: BehaviorFactory,
}

impl ItemKind {
    /// Creates a kind whose behavior is built per node by `factory`.
    pub fn new<F, B>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(NodeId) -> B + 'static,
        B: ItemBehavior + 'static,
    {
        Self {
            name: name.into(),
            tag: None,
            parent: None,
            guard: None,
            factory: Rc::new(move |node| Rc::new(factory(node)) as Rc<dyn ItemBehavior>),
        }
    }

    /// Sets the scene tag this kind is matched by.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Declares `parent` as this kind's base kind.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_guard(mut self, guard: DataGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The registered data guard; always present once the kind is registered.
    pub fn guard(&self) -> Option<&DataGuard> {
        self.guard.as_ref()
    }

    pub(crate) fn build_behavior(&self, node: NodeId) -> Rc<dyn ItemBehavior> {
        (self.factory)(node)
    }
}

impl fmt::Debug for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemKind")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("parent", &self.parent)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

/// Lookup table from scene tag to item kind.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    kinds: HashMap<String, Rc<ItemKind>>,
    by_tag: BTreeMap<String, Rc<ItemKind>>,
}

impl ItemRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every kind in order; parents must come before their children.
    pub fn build(kinds: impl IntoIterator<Item = ItemKind>) -> Result<Self> {
        let mut registry = Self::new();
        for kind in kinds {
            registry.register(kind)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, kind: ItemKind) -> Result<()> {
        if kind.guard.is_none() {
            return Err(TycoonError::MissingDataGuard(kind.name));
        }
        if self.kinds.contains_key(&kind.name) {
            return Err(TycoonError::DuplicateKind(kind.name));
        }
        if let Some(parent) = &kind.parent {
            if !self.kinds.contains_key(parent) {
                return Err(TycoonError::UnknownParentKind {
                    kind: kind.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
        if let Some(existing) = kind.tag.as_ref().and_then(|t| self.by_tag.get(t)) {
            return Err(TycoonError::TagCollision {
                tag: kind.tag.clone().unwrap_or_default(),
                existing: existing.name.clone(),
                incoming: kind.name.clone(),
            });
        }

        let kind = Rc::new(kind);
        if let Some(tag) = &kind.tag {
            self.by_tag.insert(tag.clone(), Rc::clone(&kind));
            info!(tag = %tag, kind = %kind.name, "Registered item kind");
        }
        self.kinds.insert(kind.name.clone(), kind);
        Ok(())
    }

    pub fn kind(&self, name: &str) -> Option<Rc<ItemKind>> {
        self.kinds.get(name).cloned()
    }

    pub fn kind_for_tag(&self, tag: &str) -> Option<Rc<ItemKind>> {
        self.by_tag.get(tag).cloned()
    }

    pub fn is_registered_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// All matchable tags, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Returns true if `actual` is `wanted` or descends from it.
    pub fn is_kind_of(&self, actual: &str, wanted: &str) -> bool {
        let mut current = Some(actual);
        while let Some(name) = current {
            if name == wanted {
                return true;
            }
            current = self.kinds.get(name).and_then(|k| k.parent());
        }
        false
    }
}
