//! Bindings between ratatui components and a redux-style store
//!
//! This crate provides:
//! - The store contract ([`StoreApi`]) and a synchronous reference [`Store`]
//!   with middleware
//! - Selectors, shared or built per instance by an explicit factory
//! - Action binding from an [`ActionMap`] or a bind function
//! - [`connect`], which turns a component type into a connected one whose
//!   derived properties are recomputed exactly once per store notification
//!   or own-props change and can only be changed by dispatching
//!
//! ```ignore
//! let count_list = connect(
//!     Selector::typed(|state: &AppState, _own| CountProps { low: state.low }),
//!     ActionMap::new().action("up", |_| Action::Up),
//! )
//! .wrap(CountList::default);
//!
//! let mut instance = count_list.create(store.clone(), PropMap::new())?;
//! instance.invoke("up", &[])?;
//! ```

pub mod actions;
pub mod component;
pub mod connect;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod props;
pub mod selector;
pub mod store;

pub use actions::{bind_actions, ActionMap, DispatchToActions};
pub use component::{display_value, plain_text, Component, DefaultComponent};
pub use connect::{connect, Connect, ConnectedComponent};
pub use error::{ConnectError, Result};
pub use lifecycle::ConnectedInstance;
pub use middleware::{Dispatcher, LoggingMiddleware, Middleware};
pub use props::{to_prop_map, ActionProps, BoundAction, PropMap, Props};
pub use selector::Selector;
pub use store::{Dispatch, Listener, Reducer, Store, StoreApi, Subscription};
