//! Scene files and the lock script driven by the `tycoon-sim` binary.
//!
//! A scene file describes one tycoon as a node tree plus the item kinds its
//! tags refer to:
//!
//! ```toml
//! [tycoon]
//! name = "Plot"
//!
//! [[tycoon.children]]
//! name = "Dropper"
//! tags = ["dropper", "LockedItem"]
//!
//! [[kinds]]
//! name = "dropper"
//! tag = "dropper"
//! data = { rate = 1 }
//! required = ["rate"]
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info};
use tycoon_engine::{
    ActorId, DataGuard, EngineConfig, ItemId, ItemKind, ItemRegistry, ItemSchema, MemoryScene,
    NodeId, SchemaField, StaticData, TycoonRecord, TycoonService, default_item_kind,
};

/// A parsed scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    pub tycoon: NodeDef,
    #[serde(default)]
    pub kinds: Vec<KindDef>,
}

/// One node of the scene tree.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

/// An item kind whose data is a fixed template.
#[derive(Debug, Clone, Deserialize)]
pub struct KindDef {
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default = "empty_object")]
    pub data: Value,
    /// Fields stored data must carry, as names or JSON pointers.
    #[serde(default)]
    pub required: Vec<String>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl SceneFile {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid scene file")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Builds the node tree in a fresh scene and returns it with the root node.
    pub fn build_scene(&self) -> (Rc<MemoryScene>, NodeId) {
        let scene = Rc::new(MemoryScene::new());
        let root = scene.add_root(&self.tycoon.name);
        decorate(&scene, root, &self.tycoon);
        (scene, root)
    }

    /// The built-in kind followed by every declared kind, in file order.
    pub fn build_registry(&self) -> Result<ItemRegistry> {
        let mut registry = ItemRegistry::new();
        registry.register(default_item_kind())?;
        for def in &self.kinds {
            registry
                .register(def.to_kind())
                .with_context(|| format!("Failed to register kind {:?}", def.name))?;
        }
        Ok(registry)
    }
}

fn decorate(scene: &MemoryScene, node: NodeId, def: &NodeDef) {
    for tag in &def.tags {
        scene.add_tag(node, tag);
    }
    for (name, value) in &def.attributes {
        scene.set_attribute(node, name, value);
    }
    for child in &def.children {
        let id = scene.add_child(node, &child.name);
        decorate(scene, id, child);
    }
}

impl KindDef {
    fn to_kind(&self) -> ItemKind {
        let template = self.data.clone();
        let mut kind = ItemKind::new(self.name.clone(), move |_| StaticData::new(template.clone()));
        if let Some(tag) = &self.tag {
            kind = kind.with_tag(tag.clone());
        }
        if let Some(parent) = &self.parent {
            kind = kind.with_parent(parent.clone());
        }

        let guard = if self.required.is_empty() {
            DataGuard::AnyObject
        } else {
            let fields = self
                .required
                .iter()
                .map(|field| {
                    if field.starts_with('/') {
                        SchemaField::any(field)
                    } else {
                        SchemaField::any(&format!("/{field}"))
                    }
                })
                .collect();
            DataGuard::schema(ItemSchema::new(fields))
        };
        kind.with_guard(guard)
    }
}

/// Lock script applied after the claim: unlocks first, then locks.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub unlock: Vec<ItemId>,
    pub lock: Vec<ItemId>,
}

/// Everything one simulation run needs.
#[derive(Debug, Clone)]
pub struct Run {
    pub scene: SceneFile,
    pub config: EngineConfig,
    pub actor: ActorId,
    pub saved: Option<TycoonRecord>,
    pub script: Script,
}

/// Builds the tycoon, claims it, applies the script and returns the record
/// as it stood before the tycoon was released.
pub fn run(run: &Run) -> Result<TycoonRecord> {
    let (scene, root) = run.scene.build_scene();
    let registry = run.scene.build_registry()?;
    let service = TycoonService::new(scene, registry, run.config.clone());

    let tycoon = service.create(root).context("Failed to initialize tycoon")?;
    info!(items = tycoon.items().len(), "Tycoon built");

    tycoon.claim(run.actor, run.saved.clone())?;
    info!(actor = %run.actor, "Tycoon claimed");

    let outcome = apply(&tycoon, &run.script);
    let snapshot = tycoon.data();
    tycoon.unclaim()?;
    tycoon.destroy();
    outcome?;

    Ok(snapshot)
}

fn apply(tycoon: &tycoon_engine::Tycoon, script: &Script) -> Result<()> {
    for id in &script.unlock {
        let Some(item) = tycoon.item(id) else {
            bail!("No item with id {id}");
        };
        item.unlock();
        debug!(item_id = %id, "Unlocked by script");
    }
    for id in &script.lock {
        let Some(item) = tycoon.item(id) else {
            bail!("No item with id {id}");
        };
        item.lock();
        debug!(item_id = %id, "Locked by script");
    }
    Ok(())
}

/// Reads a saved record from a JSON file.
pub fn load_record(path: impl AsRef<Path>) -> Result<TycoonRecord> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read saved data {}", path.display()))?;
    TycoonRecord::from_json(&contents)
        .with_context(|| format!("Invalid saved data in {}", path.display()))
}
