use crate::item::ItemHandle;
use serde_json::Value;

/// Kind-specific behavior of a tycoon item.
///
/// The engine owns the lock state machine; a behavior only supplies the
/// default data for its kind and reacts to transitions. Hooks run after the
/// transition has been committed and published, so calling back into the
/// item from a hook (e.g. unlocking again from `on_locked`) sees the new
/// state.
///
/// Behaviors must not keep a strong [`crate::Tycoon`] handle; reach the
/// tycoon through [`ItemHandle::tycoon`] instead.
pub trait ItemBehavior {
    /// Fresh data written when the item unlocks, and the template used to
    /// repair stored data that fails validation.
    fn generate_data(&self) -> Value;

    fn on_unlocked(&self, item: &ItemHandle) {
        let _ = item;
    }

    fn on_locked(&self, item: &ItemHandle) {
        let _ = item;
    }

    /// Called once, after the item stopped accepting transitions.
    fn on_destroyed(&self, item: &ItemHandle) {
        let _ = item;
    }
}
