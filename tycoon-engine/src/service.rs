use crate::config::EngineConfig;
use crate::error::Result;
use crate::registry::ItemRegistry;
use crate::scene::SceneGraph;
use crate::tycoon::Tycoon;
use std::cell::RefCell;
use std::rc::Rc;
use tycoon_types::NodeId;

/// Entry point that wires a scene, an item registry and a config together
/// and builds tycoons from root nodes.
pub struct TycoonService {
    scene: Rc<dyn SceneGraph>,
    registry: Rc<ItemRegistry>,
    config: RefCell<EngineConfig>,
}

impl TycoonService {
    pub fn new(scene: Rc<dyn SceneGraph>, registry: ItemRegistry, config: EngineConfig) -> Self {
        Self {
            scene,
            registry: Rc::new(registry),
            config: RefCell::new(config),
        }
    }

    /// Builds and initializes a tycoon rooted at `root`.
    pub fn create(&self, root: NodeId) -> Result<Tycoon> {
        let tycoon = Tycoon::new(
            root,
            Rc::clone(&self.scene),
            Rc::clone(&self.registry),
            self.config.borrow().clone(),
        );
        if let Err(e) = tycoon.initialize() {
            tycoon.destroy();
            return Err(e);
        }
        Ok(tycoon)
    }

    pub fn lock_item_tag(&self) -> String {
        self.config.borrow().lock_item_tag.clone()
    }

    /// Changes the lock tag used by tycoons created from now on.
    pub fn set_lock_item_tag(&self, tag: impl Into<String>) {
        self.config.borrow_mut().lock_item_tag = tag.into();
    }

    pub fn config(&self) -> EngineConfig {
        self.config.borrow().clone()
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &Rc<dyn SceneGraph> {
        &self.scene
    }
}
