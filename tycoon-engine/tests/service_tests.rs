mod common;

use common::{Fixture, hook_log, kinds};
use std::rc::Rc;
use tycoon_engine::{
    EngineConfig, ItemRegistry, MemoryScene, SceneGraph, TYCOON_COMPONENT, TycoonError,
    TycoonService,
};

fn service(scene: &Rc<MemoryScene>) -> TycoonService {
    let registry = ItemRegistry::build(kinds(&hook_log())).unwrap();
    TycoonService::new(scene.clone(), registry, EngineConfig::default())
}

#[test]
fn create_builds_an_initialized_tycoon() {
    let fx = Fixture::new();
    fx.add(fx.root, "Chest", &["chest"]);
    let service = service(&fx.scene);

    let tycoon = service.create(fx.root).unwrap();
    assert!(tycoon.item("Chest").is_some());
    assert!(tycoon.container().is_some());
    assert!(fx.scene.is_attached(fx.root, TYCOON_COMPONENT));
    assert!(matches!(tycoon.initialize(), Err(TycoonError::AlreadyInitialized)));
}

#[test]
fn lock_tag_change_applies_to_later_tycoons() {
    let scene = Rc::new(MemoryScene::new());
    let first = scene.add_root("First");
    let second = scene.add_root("Second");
    for root in [first, second] {
        let chest = scene.add_child(root, "Chest");
        scene.add_tag(chest, "chest");
        scene.add_tag(chest, "Sealed");
    }
    let service = service(&scene);

    let before = service.create(first).unwrap();
    service.set_lock_item_tag("Sealed");
    assert_eq!(service.lock_item_tag(), "Sealed");
    let after = service.create(second).unwrap();

    assert!(!before.item("Chest").unwrap().is_locked());
    assert!(after.item("Chest").unwrap().is_locked());
    assert_eq!(before.config().lock_item_tag, "LockedItem");
}

#[test]
fn failed_create_tears_the_tycoon_down() {
    let fx = Fixture::new();
    let a = fx.add(fx.root, "A", &["chest"]);
    let b = fx.add(fx.root, "B", &["chest"]);
    fx.scene.set_attribute(a, "Id", "Same");
    fx.scene.set_attribute(b, "Id", "Same");
    let service = service(&fx.scene);

    let err = service.create(fx.root).unwrap_err();
    assert!(matches!(err, TycoonError::DuplicateItemId { .. }));
    assert!(!fx.scene.is_attached(fx.root, TYCOON_COMPONENT));
    assert_eq!(fx.scene.attached_count(), 0);
}

#[test]
fn service_exposes_its_parts() {
    let scene = Rc::new(MemoryScene::new());
    let root = scene.add_root("Plot");
    let service = TycoonService::new(scene.clone(), ItemRegistry::new(), EngineConfig::default());

    assert!(service.registry().is_empty());
    assert_eq!(service.scene().name(root).as_deref(), Some("Plot"));
    assert_eq!(service.config(), EngineConfig::default());
}
