//! Store contract and a reference synchronous store
//!
//! Connected components only depend on [`StoreApi`]. [`Store`] is a small
//! implementation of it: a reducer, a middleware chain and a listener list,
//! all driven synchronously on the calling thread.

use crate::error::Result;
use crate::middleware::{Dispatcher, Middleware};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Callback invoked after every state transition
pub type Listener = Rc<dyn Fn() -> Result<()>>;

/// Pure state transition function
pub type Reducer<S, A> = fn(S, &A) -> S;

/// Minimal contract a store must satisfy to be connected to
pub trait StoreApi<S, A> {
    /// Latest state, always reflecting every completed dispatch
    fn get_state(&self) -> Rc<S>;

    /// Apply `action` and notify every active listener before returning.
    ///
    /// A failing listener does not keep the others from being notified; the
    /// first error is returned unchanged once all of them ran.
    fn dispatch(&self, action: A) -> Result<()>;

    /// Register a listener until the returned subscription is released
    fn subscribe(&self, listener: Listener) -> Subscription;
}

impl<S, A, T> StoreApi<S, A> for Rc<T>
where
    T: StoreApi<S, A> + ?Sized,
{
    fn get_state(&self) -> Rc<S> {
        (**self).get_state()
    }

    fn dispatch(&self, action: A) -> Result<()> {
        (**self).dispatch(action)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        (**self).subscribe(listener)
    }
}

/// Handle to an active store subscription.
///
/// Unsubscribing is synchronous: once [`Subscription::unsubscribe`] returns
/// (or the handle is dropped) the listener is never called again, even by a
/// notification round that is already running.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Cloneable handle that forwards actions to a store
pub struct Dispatch<A> {
    inner: Rc<dyn Fn(A) -> Result<()>>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> Dispatch<A> {
    pub fn new(f: impl Fn(A) -> Result<()> + 'static) -> Self {
        Self { inner: Rc::new(f) }
    }

    pub fn from_store<S: 'static>(store: Rc<dyn StoreApi<S, A>>) -> Self {
        Self::new(move |action| store.dispatch(action))
    }

    pub fn dispatch(&self, action: A) -> Result<()> {
        (self.inner)(action)
    }
}

struct ListenerEntry {
    id: u64,
    active: Rc<Cell<bool>>,
    listener: Listener,
}

struct StoreInner<S, A> {
    state: RefCell<Rc<S>>,
    reducer: Reducer<S, A>,
    middleware: RefCell<Vec<Box<dyn Middleware<S, A>>>>,
    dispatcher: Dispatcher<A>,
    listeners: RefCell<Vec<ListenerEntry>>,
    next_listener_id: Cell<u64>,
}

/// Store - holds state and runs the dispatch loop
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Clone + 'static, A: 'static> Store<S, A> {
    pub fn new(initial_state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(Rc::new(initial_state)),
                reducer,
                middleware: RefCell::new(Vec::new()),
                dispatcher: Dispatcher::new(),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    /// Add middleware to the store (runs in insertion order)
    pub fn add_middleware(&self, middleware: Box<dyn Middleware<S, A>>) {
        self.inner.middleware.borrow_mut().push(middleware);
    }

    /// Get the current state
    pub fn state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Get the dispatcher shared with middleware
    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.inner.dispatcher
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Run the middleware chain, returning whether the reducer should run
    fn run_middleware(&self, action: &A) -> Option<bool> {
        // A middleware dispatching directly lands here while the chain is borrowed
        let mut middleware = self.inner.middleware.try_borrow_mut().ok()?;
        let state = self.state();
        for m in middleware.iter_mut() {
            if !m.handle(action, &state, &self.inner.dispatcher) {
                return Some(false);
            }
        }
        Some(true)
    }

    fn notify(&self) -> Result<()> {
        let snapshot: Vec<(Rc<Cell<bool>>, Listener)> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.listener)))
            .collect();

        let mut first_error = None;
        for (active, listener) in snapshot {
            if !active.get() {
                continue;
            }
            if let Err(err) = listener() {
                if first_error.is_none() {
                    first_error = Some(err);
                } else {
                    log::warn!("Store: further listener error: {}", err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<S: Clone + 'static, A: 'static> StoreApi<S, A> for Store<S, A> {
    fn get_state(&self) -> Rc<S> {
        self.state()
    }

    /// Process an action through middleware chain, reducer and listeners
    fn dispatch(&self, action: A) -> Result<()> {
        let Some(should_reduce) = self.run_middleware(&action) else {
            log::debug!("Store: dispatch from inside middleware, queueing action");
            self.inner.dispatcher.dispatch(action);
            return Ok(());
        };

        if should_reduce {
            let current = self.state();
            let next = (self.inner.reducer)(S::clone(&current), &action);
            *self.inner.state.borrow_mut() = Rc::new(next);
            self.notify()?;
        }

        // Process any actions queued by middleware
        while let Some(action) = self.inner.dispatcher.next_pending() {
            self.dispatch(action)?;
        }
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        let active = Rc::new(Cell::new(true));
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            active: Rc::clone(&active),
            listener,
        });
        log::debug!("Store: listener {} subscribed", id);

        let store: Weak<StoreInner<S, A>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            active.set(false);
            if let Some(store) = store.upgrade() {
                // The entry is dropped outside the borrow, its listener may own subscriptions
                let removed = {
                    let mut listeners = store.listeners.borrow_mut();
                    listeners
                        .iter()
                        .position(|entry| entry.id == id)
                        .map(|index| listeners.remove(index))
                };
                drop(removed);
            }
            log::debug!("Store: listener {} unsubscribed", id);
        })
    }
}
