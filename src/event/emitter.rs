//! Emitter<T>: synchronous, FIFO listener lists.
//!
//! Every event the framework exposes (`on_loaded`, `on_push`, `on_click`, ...)
//! is an [`Emitter`]. Listeners run in registration order, synchronously, on
//! the emitting call. The listener list is snapshotted before dispatch so a
//! listener may add or remove listeners, or mutate the view tree, without
//! tripping a `RefCell` borrow.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Handle returned by [`Emitter::on`], used to unregister a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<T> {
    id: ListenerId,
    once: bool,
    callback: Rc<dyn Fn(&T)>,
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            once: self.once,
            callback: Rc::clone(&self.callback),
        }
    }
}

/// A named event with an ordered list of listeners.
pub struct Emitter<T> {
    name: &'static str,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T> Emitter<T> {
    /// Create an emitter. The name only shows up in traces and `Debug`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// The emitter's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a listener that runs on every emission.
    pub fn on(&self, callback: impl Fn(&T) + 'static) -> ListenerId {
        self.register(false, Rc::new(callback))
    }

    /// Register a listener that runs on the next emission only.
    pub fn once(&self, callback: impl Fn(&T) + 'static) -> ListenerId {
        self.register(true, Rc::new(callback))
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke every listener with `value`, in registration order.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = {
            let mut listeners = self.listeners.borrow_mut();
            let snapshot = listeners.clone();
            listeners.retain(|l| !l.once);
            snapshot
        };
        trace!(event = self.name, listeners = snapshot.len(), "emit");
        for listener in snapshot {
            (listener.callback)(value);
        }
    }

    fn register(&self, once: bool, callback: Rc<dyn Fn(&T)>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push(Listener { id, once, callback });
        id
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("name", &self.name)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
