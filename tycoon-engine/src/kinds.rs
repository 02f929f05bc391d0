//! Built-in item behaviors.

use crate::behavior::ItemBehavior;
use crate::registry::ItemKind;
use serde_json::{Value, json};
use tycoon_model::DataGuard;

/// Tag of the built-in item kind.
pub const DEFAULT_ITEM_TAG: &str = "TycoonItem";

/// Kind name of the built-in item kind.
pub const DEFAULT_ITEM_KIND: &str = "tycoon_item";

/// Behavior whose data is a fixed template and whose hooks do nothing.
#[derive(Debug, Clone)]
pub struct StaticData {
    template: Value,
}

impl StaticData {
    pub fn new(template: Value) -> Self {
        Self { template }
    }
}

impl ItemBehavior for StaticData {
    fn generate_data(&self) -> Value {
        self.template.clone()
    }
}

/// The plain item: empty-object data, accepts any object.
pub fn default_item_kind() -> ItemKind {
    ItemKind::new(DEFAULT_ITEM_KIND, |_| StaticData::new(json!({})))
        .with_tag(DEFAULT_ITEM_TAG)
        .with_guard(DataGuard::AnyObject)
}
