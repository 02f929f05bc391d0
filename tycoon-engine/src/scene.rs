//! The host scene graph, seen through the narrow contract the engine needs.
//!
//! The engine never walks or mutates the object tree directly. It asks a
//! [`SceneGraph`] to enumerate descendants, read tags and attributes, move a
//! node between its original parent and the tycoon's holding container, and
//! record which components are attached to which nodes.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use tycoon_types::{ActorId, NodeId};

/// Scene operations consumed by the engine.
///
/// Implementations are single-threaded and take `&self`; they are expected to
/// use interior mutability for the mutating calls.
pub trait SceneGraph {
    fn name(&self, node: NodeId) -> Option<String>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Every node below `root`, parents before children.
    fn descendants(&self, root: NodeId) -> Vec<NodeId>;

    fn tags(&self, node: NodeId) -> Vec<String>;

    fn has_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tags(node).iter().any(|t| t == tag)
    }

    fn string_attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_parent(&self, node: NodeId, parent: NodeId);

    /// Creates a detached holding container for locked items.
    fn create_container(&self, name: &str) -> NodeId;

    fn destroy_container(&self, container: NodeId);

    /// The actor controlling `node`, if any (e.g. the player owning a character).
    fn actor_for_node(&self, node: NodeId) -> Option<ActorId>;

    /// Called when a component of `kind` is attached to `node`.
    fn attach_component(&self, node: NodeId, kind: &str) {
        let _ = (node, kind);
    }

    /// Called when a component of `kind` is removed from `node`.
    fn detach_component(&self, node: NodeId, kind: &str) {
        let _ = (node, kind);
    }
}

#[derive(Debug, Clone, Default)]
struct SceneNode {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    tags: Vec<String>,
    attributes: HashMap<String, String>,
    actor: Option<ActorId>,
}

#[derive(Debug, Default)]
struct SceneState {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
    components: Vec<(NodeId, String)>,
}

impl SceneState {
    fn insert(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId::from_raw(self.next_id);
        self.nodes.insert(
            id,
            SceneNode {
                name: name.to_string(),
                parent,
                ..SceneNode::default()
            },
        );
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(id);
        }
        id
    }

    fn detach(&mut self, node: NodeId) {
        let old_parent = self.nodes.get(&node).and_then(|n| n.parent);
        if let Some(parent) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = None;
        }
    }
}

/// In-memory [`SceneGraph`] for tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryScene {
    state: RefCell<SceneState>,
}

impl MemoryScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parentless node.
    pub fn add_root(&self, name: &str) -> NodeId {
        self.state.borrow_mut().insert(name, None)
    }

    pub fn add_child(&self, parent: NodeId, name: &str) -> NodeId {
        self.state.borrow_mut().insert(name, Some(parent))
    }

    pub fn add_tag(&self, node: NodeId, tag: &str) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            if !n.tags.iter().any(|t| t == tag) {
                n.tags.push(tag.to_string());
            }
        }
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Marks `node` as controlled by `actor`.
    pub fn bind_actor(&self, node: NodeId, actor: ActorId) {
        if let Some(n) = self.state.borrow_mut().nodes.get_mut(&node) {
            n.actor = Some(actor);
        }
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.state
            .borrow()
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.state.borrow().nodes.contains_key(&node)
    }

    /// Returns true if a component of `kind` is currently attached to `node`.
    #[must_use]
    pub fn is_attached(&self, node: NodeId, kind: &str) -> bool {
        self.state
            .borrow()
            .components
            .iter()
            .any(|(n, k)| *n == node && k == kind)
    }

    #[must_use]
    pub fn attached_count(&self) -> usize {
        self.state.borrow().components.len()
    }
}

impl SceneGraph for MemoryScene {
    fn name(&self, node: NodeId) -> Option<String> {
        self.state.borrow().nodes.get(&node).map(|n| n.name.clone())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.state.borrow().nodes.get(&node).and_then(|n| n.parent)
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let state = self.state.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = state
            .nodes
            .get(&root)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(node) = stack.pop() {
            out.push(node);
            if let Some(n) = state.nodes.get(&node) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    fn tags(&self, node: NodeId) -> Vec<String> {
        self.state
            .borrow()
            .nodes
            .get(&node)
            .map(|n| n.tags.clone())
            .unwrap_or_default()
    }

    fn string_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .nodes
            .get(&node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    fn set_parent(&self, node: NodeId, parent: NodeId) {
        let mut state = self.state.borrow_mut();
        if !state.nodes.contains_key(&parent) || !state.nodes.contains_key(&node) {
            return;
        }
        state.detach(node);
        if let Some(n) = state.nodes.get_mut(&node) {
            n.parent = Some(parent);
        }
        if let Some(p) = state.nodes.get_mut(&parent) {
            p.children.push(node);
        }
    }

    fn create_container(&self, name: &str) -> NodeId {
        self.state.borrow_mut().insert(name, None)
    }

    fn destroy_container(&self, container: NodeId) {
        let mut state = self.state.borrow_mut();
        let children = state
            .nodes
            .get(&container)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            state.detach(child);
        }
        state.nodes.remove(&container);
    }

    fn actor_for_node(&self, node: NodeId) -> Option<ActorId> {
        self.state.borrow().nodes.get(&node).and_then(|n| n.actor)
    }

    fn attach_component(&self, node: NodeId, kind: &str) {
        self.state
            .borrow_mut()
            .components
            .push((node, kind.to_string()));
    }

    fn detach_component(&self, node: NodeId, kind: &str) {
        let mut state = self.state.borrow_mut();
        if let Some(pos) = state
            .components
            .iter()
            .position(|(n, k)| *n == node && k == kind)
        {
            state.components.remove(pos);
        }
    }
}
