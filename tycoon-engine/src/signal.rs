//! Synchronous single-threaded pub-sub.
//!
//! A [`Signal`] delivers each fired value to every connected listener before
//! `fire` returns. Listeners are invoked without any internal borrow held, so
//! a listener may connect, disconnect, or fire other signals re-entrantly.
//! Delivery works on a snapshot of the listener list, but each listener's
//! liveness is re-checked right before it is called: a listener disconnected
//! halfway through a fire is never invoked afterwards.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    id: u64,
    live: Rc<Cell<bool>>,
    callback: Callback<T>,
}

struct SignalInner<T> {
    slots: RefCell<Vec<Slot<T>>>,
    next_id: Cell<u64>,
}

/// A broadcast point with any number of scoped listeners.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SignalInner {
                slots: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Registers `callback`; it stays attached until the returned
    /// [`Connection`] is disconnected or the signal is cleared.
    pub fn connect<F>(&self, callback: F) -> Connection
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let live = Rc::new(Cell::new(true));
        self.inner.slots.borrow_mut().push(Slot {
            id,
            live: Rc::clone(&live),
            callback: Rc::new(callback),
        });

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Connection {
            live,
            remove: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.slots.borrow_mut().retain(|slot| slot.id != id);
                }
            })),
        }
    }

    /// Delivers `value` to every live listener, in connection order.
    pub fn fire(&self, value: &T) {
        let snapshot: Vec<(Rc<Cell<bool>>, Callback<T>)> = self
            .inner
            .slots
            .borrow()
            .iter()
            .map(|slot| (Rc::clone(&slot.live), Rc::clone(&slot.callback)))
            .collect();

        for (live, callback) in snapshot {
            if live.get() {
                callback(value);
            }
        }
    }

    /// Detaches every listener.
    pub fn disconnect_all(&self) {
        let slots = std::mem::take(&mut *self.inner.slots.borrow_mut());
        for slot in slots {
            slot.live.set(false);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.inner.slots.borrow().len())
            .finish()
    }
}

/// Handle to one listener registered on a [`Signal`].
///
/// Dropping a connection leaves the listener attached; teardown is explicit,
/// usually through a [`SubscriptionSet`].
#[must_use = "dropping a Connection leaves the listener attached"]
pub struct Connection {
    live: Rc<Cell<bool>>,
    remove: Option<Box<dyn FnOnce()>>,
}

impl Connection {
    /// Detaches the listener. Calling this more than once is harmless.
    pub fn disconnect(&mut self) {
        self.live.set(false);
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.live.get()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Connections owned by one component, released together when it is torn down.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    connections: RefCell<Vec<Connection>>,
}

impl SubscriptionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, connection: Connection) {
        self.connections.borrow_mut().push(connection);
    }

    /// Disconnects everything added so far.
    pub fn release(&self) {
        let connections = std::mem::take(&mut *self.connections.borrow_mut());
        for mut connection in connections {
            connection.disconnect();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_connection_order() {
        let signal = Signal::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = Rc::clone(&seen);
        let _c1 = signal.connect(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        let _c2 = signal.connect(move |v| b.borrow_mut().push(("b", *v)));

        signal.fire(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn disconnected_listener_is_not_called() {
        let signal = Signal::<()>::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let mut conn = signal.connect(move |_| c.set(c.get() + 1));

        signal.fire(&());
        conn.disconnect();
        signal.fire(&());

        assert_eq!(count.get(), 1);
        assert_eq!(signal.listener_count(), 0);
        assert!(!conn.is_connected());
    }

    #[test]
    fn listener_disconnected_mid_fire_is_skipped() {
        let signal = Signal::<()>::new();
        let later_calls = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Connection>>> = Rc::new(RefCell::new(None));

        let v = Rc::clone(&victim);
        let _first = signal.connect(move |_| {
            if let Some(mut conn) = v.borrow_mut().take() {
                conn.disconnect();
            }
        });
        let l = Rc::clone(&later_calls);
        *victim.borrow_mut() = Some(signal.connect(move |_| l.set(l.get() + 1)));

        signal.fire(&());
        assert_eq!(later_calls.get(), 0);
    }

    #[test]
    fn listener_may_connect_during_fire() {
        let signal = Signal::<()>::new();
        let keep = Rc::new(RefCell::new(Vec::new()));
        let s = signal.clone();
        let k = Rc::clone(&keep);
        let _conn = signal.connect(move |_| {
            k.borrow_mut().push(s.connect(|_| {}));
        });

        signal.fire(&());
        assert_eq!(signal.listener_count(), 2);
    }

    #[test]
    fn subscription_set_releases_all() {
        let signal = Signal::<()>::new();
        let set = SubscriptionSet::new();
        set.add(signal.connect(|_| {}));
        set.add(signal.connect(|_| {}));
        assert_eq!(set.len(), 2);

        set.release();
        assert!(set.is_empty());
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn disconnect_after_signal_dropped_is_harmless() {
        let signal = Signal::<()>::new();
        let mut conn = signal.connect(|_| {});
        drop(signal);
        conn.disconnect();
        assert!(!conn.is_connected());
    }
}
