//! Shared fixtures for tycoon engine tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::cell::RefCell;
use std::rc::Rc;
use tycoon_engine::{
    DataGuard, EngineConfig, ItemBehavior, ItemHandle, ItemKind, ItemRegistry, ItemSchema,
    MemoryScene, NodeId, SchemaField, Tycoon,
};

pub type HookLog = Rc<RefCell<Vec<String>>>;

pub fn hook_log() -> HookLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Behavior that records every hook as `"<hook>:<item id>"`.
pub struct Recorder {
    pub template: Value,
    pub log: HookLog,
}

impl ItemBehavior for Recorder {
    fn generate_data(&self) -> Value {
        self.template.clone()
    }

    fn on_unlocked(&self, item: &ItemHandle) {
        self.log.borrow_mut().push(format!("unlocked:{}", item.id()));
    }

    fn on_locked(&self, item: &ItemHandle) {
        self.log.borrow_mut().push(format!("locked:{}", item.id()));
    }

    fn on_destroyed(&self, item: &ItemHandle) {
        self.log.borrow_mut().push(format!("destroyed:{}", item.id()));
    }
}

/// A `chest` kind (tag `chest`) whose data is `{"gold": 0, "open": false}`.
pub fn chest_kind(log: &HookLog) -> ItemKind {
    let log = Rc::clone(log);
    ItemKind::new("chest", move |_| Recorder {
        template: json!({"gold": 0, "open": false}),
        log: Rc::clone(&log),
    })
    .with_tag("chest")
    .with_guard(DataGuard::schema(ItemSchema::new(vec![
        SchemaField::integer("/gold"),
        SchemaField::bool("/open"),
    ])))
}

/// An abstract `machine` kind plus a `dropper` (tag `dropper`) extending it.
pub fn machine_kinds(log: &HookLog) -> Vec<ItemKind> {
    let log = Rc::clone(log);
    vec![
        ItemKind::new("machine", |_| tycoon_engine::StaticData::new(json!({})))
            .with_guard(DataGuard::AnyObject),
        ItemKind::new("dropper", move |_| Recorder {
            template: json!({"rate": 1}),
            log: Rc::clone(&log),
        })
        .with_tag("dropper")
        .with_parent("machine")
        .with_guard(DataGuard::AnyObject),
    ]
}

pub fn kinds(log: &HookLog) -> Vec<ItemKind> {
    let mut kinds = vec![chest_kind(log)];
    kinds.extend(machine_kinds(log));
    kinds
}

pub fn registry(log: &HookLog) -> Rc<ItemRegistry> {
    Rc::new(ItemRegistry::build(kinds(log)).unwrap())
}

pub struct Fixture {
    pub scene: Rc<MemoryScene>,
    pub root: NodeId,
    pub log: HookLog,
}

impl Fixture {
    pub fn new() -> Self {
        let scene = Rc::new(MemoryScene::new());
        let root = scene.add_root("Tycoon");
        Self {
            scene,
            root,
            log: hook_log(),
        }
    }

    /// Adds a tagged node under `parent`.
    pub fn add(&self, parent: NodeId, name: &str, tags: &[&str]) -> NodeId {
        let node = self.scene.add_child(parent, name);
        for tag in tags {
            self.scene.add_tag(node, tag);
        }
        node
    }

    pub fn tycoon(&self) -> Tycoon {
        Tycoon::new(
            self.root,
            self.scene.clone(),
            registry(&self.log),
            EngineConfig::default(),
        )
    }

    /// Builds and initializes the tycoon, failing the test on error.
    pub fn build(&self) -> Tycoon {
        let tycoon = self.tycoon();
        tycoon.initialize().unwrap();
        tycoon
    }

    pub fn hooks(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn clear_hooks(&self) {
        self.log.borrow_mut().clear();
    }
}
