//! Lifecycle adapter
//!
//! Maps the host's create / attrs-changed / destroy events onto the
//! connection, then chains to the wrapped component's own hooks:
//!
//! ```text
//! create   → build component → resolve selector → select → bind actions → subscribe → init
//! update   → merge own props  → select (rolled back on error)    → did_update_attrs
//! notified → select (store listener, no component hook)
//! destroy  → unsubscribe                                          → will_destroy
//! ```

use crate::actions::bind_actions;
use crate::component::Component;
use crate::connect::{ConnectedComponent, Connection};
use crate::error::{ConnectError, Result};
use crate::props::{OwnChange, PropMap, Props};
use crate::store::{Dispatch, StoreApi};
use ratatui::text::Text;
use serde_json::Value;
use std::rc::Rc;

/// One live instance of a connected component
pub struct ConnectedInstance<S: 'static, A: 'static, C: Component> {
    connection: Rc<Connection<S, A>>,
    component: C,
    destroyed: bool,
}

impl<S: 'static, A: 'static, C: Component> ConnectedInstance<S, A, C> {
    pub(crate) fn create(
        component_type: &ConnectedComponent<S, A, C>,
        store: Rc<dyn StoreApi<S, A>>,
        own_props: PropMap,
    ) -> Result<Self> {
        let mut component = (component_type.ctor)();
        let connection = Rc::new(Connection::new(
            store,
            component_type.selector.as_ref(),
            own_props,
            component.context(),
        )?);
        connection.recompute()?;

        let dispatch = Dispatch::from_store(Rc::clone(&connection.store));
        let actions = bind_actions(component_type.actions.as_deref(), &dispatch);
        connection.props.set_actions(actions);

        Connection::subscribe(&connection);
        log::debug!("ConnectedInstance: created and subscribed");

        component.init(&connection.props);

        Ok(Self {
            connection,
            component,
            destroyed: false,
        })
    }

    /// The host reports new caller-supplied properties.
    ///
    /// Names missing from `own_props` keep their previous value; use
    /// [`ConnectedInstance::replace_own_props`] to drop them. Nothing is
    /// recomputed when every value is unchanged. When the selector fails the
    /// update is rolled back, so retrying it recomputes again.
    pub fn update_own_props(&mut self, own_props: PropMap) -> Result<()> {
        self.ensure_live()?;
        let changes = self.connection.props.merge_own(own_props);
        self.own_props_changed(changes)
    }

    /// Like [`ConnectedInstance::update_own_props`], but names missing from
    /// `own_props` are removed.
    pub fn replace_own_props(&mut self, own_props: PropMap) -> Result<()> {
        self.ensure_live()?;
        let changes = self.connection.props.replace_own(own_props);
        self.own_props_changed(changes)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.destroyed {
            return Err(ConnectError::Destroyed);
        }
        Ok(())
    }

    fn own_props_changed(&mut self, changes: Vec<OwnChange>) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        log::trace!(
            "ConnectedInstance: own props changed: {:?}",
            changes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );

        self.connection.set_context(self.component.context());
        if let Err(err) = self.connection.recompute() {
            log::debug!("ConnectedInstance: selector failed, rolling back own props");
            self.connection.props.rollback_own(changes);
            return Err(err);
        }
        self.component.did_update_attrs(&self.connection.props);
        Ok(())
    }

    /// Stop listening to the store, then run the component's teardown.
    ///
    /// Calling this more than once has no further effect.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.connection.unsubscribe();
        log::debug!("ConnectedInstance: unsubscribed, tearing down");
        self.component.will_destroy(&self.connection.props);
    }

    pub fn render(&self) -> Text<'static> {
        self.component.render(&self.connection.props)
    }

    pub fn props(&self) -> &Props {
        &self.connection.props
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.connection.props.get(name)
    }

    /// Write a local property; connected properties are rejected
    pub fn try_set(&self, name: &str, value: Value) -> Result<()> {
        self.connection.props.try_set(name, value)
    }

    /// Write a local property, asserting it is not a connected property
    pub fn set(&self, name: &str, value: Value) {
        self.connection.props.set(name, value)
    }

    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<()> {
        self.connection.props.invoke(name, args)
    }

    /// Incremented whenever a visible property changes; hosts re-render on change
    pub fn revision(&self) -> u64 {
        self.connection.props.revision()
    }

    /// How many times this instance's selector has run
    pub fn selector_calls(&self) -> u64 {
        self.connection.selector_calls()
    }

    pub fn is_subscribed(&self) -> bool {
        self.connection.is_subscribed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }
}

impl<S: 'static, A: 'static, C: Component> Drop for ConnectedInstance<S, A, C> {
    fn drop(&mut self) {
        self.destroy();
    }
}
