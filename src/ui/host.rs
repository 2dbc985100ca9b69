//! Host document: the process-wide input listener registry and the
//! scroll-lock flag shared by overlays.
//!
//! Overlays never touch the registry directly. They acquire a [`Subscription`],
//! which owns every listener it registered plus the scroll lock and gives them
//! back exactly once, either on [`Subscription::release`] or when dropped
//! (including while unwinding).
//!
use crossterm::event::KeyEvent;
use ratatui::layout::Position;
use std::cell::RefCell;
use std::rc::Rc;

/// Callback invoked for every key press dispatched to the document.
pub type KeyListener = Rc<dyn Fn(&KeyEvent)>;
/// Callback invoked for every pointer press dispatched to the document.
pub type PointerListener = Rc<dyn Fn(Position)>;

/// Handle identifying one registered listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Document-level scrolling behavior. `Hidden` is the scroll lock.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Auto,
    Hidden,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    key: Vec<(ListenerId, KeyListener)>,
    pointer: Vec<(ListenerId, PointerListener)>,
    overflow: Overflow,
}

impl Registry {
    fn allocate(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }
}

/// Shared handle to the host document. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct Document {
    inner: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reg = self.inner.borrow();
        f.debug_struct("Document")
            .field("key_listeners", &reg.key.len())
            .field("pointer_listeners", &reg.pointer.len())
            .field("overflow", &reg.overflow)
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key_listener(&self, listener: impl Fn(&KeyEvent) + 'static) -> ListenerId {
        let mut reg = self.inner.borrow_mut();
        let id = reg.allocate();
        reg.key.push((id, Rc::new(listener)));
        id
    }

    pub fn add_pointer_listener(&self, listener: impl Fn(Position) + 'static) -> ListenerId {
        let mut reg = self.inner.borrow_mut();
        let id = reg.allocate();
        reg.pointer.push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener of either kind. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut reg = self.inner.borrow_mut();
        let before = reg.key.len() + reg.pointer.len();
        reg.key.retain(|(k, _)| *k != id);
        reg.pointer.retain(|(k, _)| *k != id);
        before != reg.key.len() + reg.pointer.len()
    }

    pub fn key_listener_count(&self) -> usize {
        self.inner.borrow().key.len()
    }

    pub fn pointer_listener_count(&self) -> usize {
        self.inner.borrow().pointer.len()
    }

    pub fn overflow(&self) -> Overflow {
        self.inner.borrow().overflow
    }

    /// Set the overflow value and return the one it replaced.
    pub fn set_overflow(&self, value: Overflow) -> Overflow {
        std::mem::replace(&mut self.inner.borrow_mut().overflow, value)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.overflow() == Overflow::Hidden
    }

    /// Deliver a key press to the registered key listeners, in registration order.
    ///
    /// A listener removed by an earlier listener during the same dispatch is
    /// skipped. Returns the number of listeners invoked.
    pub fn dispatch_key(&self, key: &KeyEvent) -> usize {
        let ids: Vec<ListenerId> = self.inner.borrow().key.iter().map(|(id, _)| *id).collect();
        let mut delivered = 0;
        for id in ids {
            let listener = lookup(&self.inner.borrow().key, id);
            if let Some(listener) = listener {
                listener(key);
                delivered += 1;
            }
        }
        delivered
    }

    /// Deliver a pointer press to the registered pointer listeners.
    ///
    /// Same ordering and removal rules as [`Document::dispatch_key`].
    pub fn dispatch_pointer(&self, at: Position) -> usize {
        let ids: Vec<ListenerId> = self
            .inner
            .borrow()
            .pointer
            .iter()
            .map(|(id, _)| *id)
            .collect();
        let mut delivered = 0;
        for id in ids {
            let listener = lookup(&self.inner.borrow().pointer, id);
            if let Some(listener) = listener {
                listener(at);
                delivered += 1;
            }
        }
        delivered
    }
}

fn lookup<L: ?Sized>(list: &[(ListenerId, Rc<L>)], id: ListenerId) -> Option<Rc<L>> {
    list.iter()
        .find(|(k, _)| *k == id)
        .map(|(_, listener)| Rc::clone(listener))
}

/// Scoped ownership of document listeners and the scroll lock.
///
/// Everything acquired through the builder methods is given back exactly once:
/// by [`Subscription::release`] or by `Drop`.
#[must_use = "dropping a Subscription immediately releases what it acquired"]
pub struct Subscription {
    document: Document,
    listeners: Vec<ListenerId>,
    restore_overflow: Option<Overflow>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("listeners", &self.listeners)
            .field("restore_overflow", &self.restore_overflow)
            .finish()
    }
}

impl Subscription {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            listeners: Vec::new(),
            restore_overflow: None,
        }
    }

    pub fn on_key(mut self, listener: impl Fn(&KeyEvent) + 'static) -> Self {
        let id = self.document.add_key_listener(listener);
        self.listeners.push(id);
        self
    }

    pub fn on_pointer(mut self, listener: impl Fn(Position) + 'static) -> Self {
        let id = self.document.add_pointer_listener(listener);
        self.listeners.push(id);
        self
    }

    /// Apply the scroll lock, remembering the overflow value it replaces.
    /// Locking twice through the same subscription keeps the first saved value.
    pub fn lock_scroll(mut self) -> Self {
        if self.restore_overflow.is_none() {
            self.restore_overflow = Some(self.document.set_overflow(Overflow::Hidden));
        }
        self
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn holds_scroll_lock(&self) -> bool {
        self.restore_overflow.is_some()
    }

    /// Give everything back now instead of at the end of scope.
    pub fn release(self) {
        drop(self);
    }

    fn release_all(&mut self) {
        for id in self.listeners.drain(..) {
            self.document.remove_listener(id);
        }
        if let Some(previous) = self.restore_overflow.take() {
            self.document.set_overflow(previous);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_all();
    }
}
