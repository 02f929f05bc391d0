use crate::signal::{Signal, SubscriptionSet};
use crate::tycoon::{DataChange, Tycoon};
use std::fmt;
use std::rc::Rc;
use tycoon_types::ActorId;

struct ProfileInner {
    actor: ActorId,
    data_changed: Signal<DataChange>,
    subscriptions: SubscriptionSet,
}

/// The owner of a tycoon for the duration of one claim.
///
/// Re-exposes the tycoon's data changes on a signal of its own that falls
/// silent once the claim ends, so listeners attached to one claim never
/// hear about the next.
#[derive(Clone)]
pub struct OwnerProfile {
    inner: Rc<ProfileInner>,
}

impl OwnerProfile {
    pub(crate) fn new(actor: ActorId, tycoon: &Tycoon) -> Self {
        let data_changed = Signal::new();
        let subscriptions = SubscriptionSet::new();

        let forward = data_changed.clone();
        subscriptions.add(
            tycoon
                .data_changed()
                .connect(move |change: &DataChange| forward.fire(change)),
        );

        Self {
            inner: Rc::new(ProfileInner {
                actor,
                data_changed,
                subscriptions,
            }),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.inner.actor
    }

    /// Data changes published while this claim is active.
    pub fn data_changed(&self) -> &Signal<DataChange> {
        &self.inner.data_changed
    }

    /// False once the claim has ended.
    pub fn is_active(&self) -> bool {
        !self.inner.subscriptions.is_empty()
    }

    pub(crate) fn destroy(&self) {
        self.inner.subscriptions.release();
        self.inner.data_changed.disconnect_all();
    }
}

impl fmt::Debug for OwnerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnerProfile")
            .field("actor", &self.inner.actor)
            .field("active", &self.is_active())
            .finish()
    }
}
