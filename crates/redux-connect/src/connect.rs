//! The connection core
//!
//! ```text
//! connect(selector, actions) → Connect
//!     .wrap(ctor)            → ConnectedComponent   (a component type)
//!     .create(store, props)  → ConnectedInstance    (one live instance)
//! ```
//!
//! Every instance owns a `Connection`: its resolved selector, its
//! property namespace and its single store subscription.

use crate::actions::DispatchToActions;
use crate::component::{Component, DefaultComponent};
use crate::error::{ConnectError, Result};
use crate::lifecycle::ConnectedInstance;
use crate::props::{PropMap, Props};
use crate::selector::{ResolvedSelector, Selector};
use crate::store::{Listener, StoreApi, Subscription};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Describe how components read from and write to a store.
///
/// Both arguments are optional: `connect(None, None)` connects a component
/// without derived or action properties.
///
/// ```ignore
/// let counter = connect(
///     Selector::typed(|state: &AppState, _own| CountProps { count: state.count }),
///     ActionMap::new()
///         .action("increment", |_| Action::Increment)
///         .action("decrement", |_| Action::Decrement),
/// )
/// .wrap(Counter::default);
///
/// let instance = counter.create(store.clone(), PropMap::new())?;
/// ```
pub fn connect<S, A>(
    selector: impl Into<Option<Selector<S>>>,
    actions: impl Into<Option<DispatchToActions<A>>>,
) -> Connect<S, A> {
    Connect {
        selector: selector.into(),
        actions: actions.into().map(Rc::new),
    }
}

/// A selector and action mapping waiting to be applied to a component type
pub struct Connect<S, A> {
    selector: Option<Selector<S>>,
    actions: Option<Rc<DispatchToActions<A>>>,
}

impl<S, A> Clone for Connect<S, A> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Connect<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connect")
            .field("selector", &self.selector)
            .field("actions", &self.actions)
            .finish()
    }
}

impl<S: 'static, A: 'static> Connect<S, A> {
    /// Wrap a component type, given as the constructor of its instances
    pub fn wrap<C, F>(&self, ctor: F) -> ConnectedComponent<S, A, C>
    where
        C: Component,
        F: Fn() -> C + 'static,
    {
        ConnectedComponent {
            selector: self.selector.clone(),
            actions: self.actions.clone(),
            ctor: Rc::new(ctor),
        }
    }

    /// Wrap the [`DefaultComponent`], for connecting bare selectors
    pub fn wrap_default(&self) -> ConnectedComponent<S, A, DefaultComponent> {
        self.wrap(DefaultComponent::default)
    }
}

/// A component type connected to a store
pub struct ConnectedComponent<S, A, C> {
    pub(crate) selector: Option<Selector<S>>,
    pub(crate) actions: Option<Rc<DispatchToActions<A>>>,
    pub(crate) ctor: Rc<dyn Fn() -> C>,
}

impl<S, A, C> Clone for ConnectedComponent<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            actions: self.actions.clone(),
            ctor: Rc::clone(&self.ctor),
        }
    }
}

impl<S: 'static, A: 'static, C: Component> ConnectedComponent<S, A, C> {
    /// Create a live instance bound to `store`
    pub fn create(
        &self,
        store: impl StoreApi<S, A> + 'static,
        own_props: PropMap,
    ) -> Result<ConnectedInstance<S, A, C>> {
        ConnectedInstance::create(self, Rc::new(store), own_props)
    }
}

/// Per-instance connection state.
///
/// Kept behind an `Rc` so the store listener can reach it through a weak
/// reference; the instance itself stays the only strong owner.
pub(crate) struct Connection<S, A> {
    pub(crate) store: Rc<dyn StoreApi<S, A>>,
    selector: Option<RefCell<ResolvedSelector<S>>>,
    pub(crate) props: Props,
    context: RefCell<PropMap>,
    selector_calls: Cell<u64>,
    subscription: RefCell<Option<Subscription>>,
}

impl<S: 'static, A: 'static> Connection<S, A> {
    /// Fails when a selector factory fails
    pub(crate) fn new(
        store: Rc<dyn StoreApi<S, A>>,
        selector: Option<&Selector<S>>,
        own_props: PropMap,
        context: PropMap,
    ) -> Result<Self> {
        let selector = match selector {
            Some(selector) => Some(RefCell::new(selector.resolve()?)),
            None => None,
        };
        Ok(Self {
            store,
            selector,
            props: Props::new(own_props),
            context: RefCell::new(context),
            selector_calls: Cell::new(0),
            subscription: RefCell::new(None),
        })
    }

    pub(crate) fn set_context(&self, context: PropMap) {
        *self.context.borrow_mut() = context;
    }

    /// Own props overlaid on the component context
    fn selector_input(&self) -> PropMap {
        let mut input = self.props.own();
        for (name, value) in self.context.borrow().iter() {
            if !input.contains_key(name) {
                input.insert(name.clone(), value.clone());
            }
        }
        input
    }

    /// Run the selector against the latest state and apply what changed.
    ///
    /// Returns the names of the derived properties that changed.
    pub(crate) fn recompute(&self) -> Result<Vec<String>> {
        let Some(selector) = &self.selector else {
            return Ok(Vec::new());
        };
        let mut selector = selector
            .try_borrow_mut()
            .map_err(|_| ConnectError::ReentrantSelector)?;

        let state = self.store.get_state();
        let input = self.selector_input();
        self.selector_calls.set(self.selector_calls.get() + 1);
        let derived = selector.select(&state, &input)?;
        drop(selector);

        let changed = self.props.apply_derived(derived);
        if changed.is_empty() {
            log::trace!("Connection: derived props unchanged");
        } else {
            log::trace!("Connection: derived props changed: {:?}", changed);
        }
        Ok(changed)
    }

    /// Register the store listener for this connection
    pub(crate) fn subscribe(this: &Rc<Self>) {
        let connection = Rc::downgrade(this);
        let listener: Listener = Rc::new(move || -> Result<()> {
            match connection.upgrade() {
                Some(connection) => connection.recompute().map(|_| ()),
                None => Ok(()),
            }
        });
        let subscription = this.store.subscribe(listener);
        let previous = this.subscription.borrow_mut().replace(subscription);
        if let Some(previous) = previous {
            previous.unsubscribe();
        }
    }

    pub(crate) fn unsubscribe(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    pub(crate) fn is_subscribed(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    pub(crate) fn selector_calls(&self) -> u64 {
        self.selector_calls.get()
    }
}
