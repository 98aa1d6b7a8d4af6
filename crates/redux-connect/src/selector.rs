//! Selectors and per-instance selector resolution
//!
//! A [`Selector`] is either a shared pure function or an explicitly tagged
//! factory. Factories run once per connected instance and hand back a
//! selector owned by that instance alone, so it may keep memoization state.

use crate::error::{ConnectError, Result};
use crate::props::{to_prop_map, PropMap};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Shared selector function
pub type SelectorFn<S> = dyn Fn(&S, &PropMap) -> anyhow::Result<PropMap>;

/// Selector owned by a single connected instance
pub type InstanceSelectorFn<S> = dyn FnMut(&S, &PropMap) -> anyhow::Result<PropMap>;

type SelectorFactory<S> = dyn Fn() -> anyhow::Result<Box<InstanceSelectorFn<S>>>;

/// Maps `(state, own props)` to derived props
pub enum Selector<S> {
    /// Pure function shared by every instance
    Static(Rc<SelectorFn<S>>),
    /// Invoked once per instance to build that instance's selector
    Factory(Rc<SelectorFactory<S>>),
}

impl<S> Clone for Selector<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(f) => Self::Static(Rc::clone(f)),
            Self::Factory(f) => Self::Factory(Rc::clone(f)),
        }
    }
}

impl<S> fmt::Debug for Selector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Selector::Static"),
            Self::Factory(_) => f.write_str("Selector::Factory"),
        }
    }
}

impl<S: 'static> Selector<S> {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&S, &PropMap) -> PropMap + 'static,
    {
        Self::Static(Rc::new(
            move |state: &S, own: &PropMap| -> anyhow::Result<PropMap> { Ok(f(state, own)) },
        ))
    }

    pub fn try_from_fn<F>(f: F) -> Self
    where
        F: Fn(&S, &PropMap) -> anyhow::Result<PropMap> + 'static,
    {
        Self::Static(Rc::new(f))
    }

    /// Selector returning any value that serializes to an object
    pub fn typed<T, F>(f: F) -> Self
    where
        T: Serialize,
        F: Fn(&S, &PropMap) -> T + 'static,
    {
        Self::Static(Rc::new(
            move |state: &S, own: &PropMap| -> anyhow::Result<PropMap> {
                Ok(to_prop_map(&f(state, own))?)
            },
        ))
    }

    /// Per-instance selector.
    ///
    /// `factory` runs once for every connected instance; the selector it
    /// returns is private to that instance.
    pub fn factory<F, G>(factory: F) -> Self
    where
        F: Fn() -> G + 'static,
        G: FnMut(&S, &PropMap) -> PropMap + 'static,
    {
        Self::Factory(Rc::new(
            move || -> anyhow::Result<Box<InstanceSelectorFn<S>>> {
                let mut select = factory();
                Ok(Box::new(
                    move |state: &S, own: &PropMap| -> anyhow::Result<PropMap> {
                        Ok(select(state, own))
                    },
                ))
            },
        ))
    }

    /// Per-instance selector whose factory and selector may both fail.
    ///
    /// A factory error fails the creation of the instance.
    pub fn try_factory<F, G>(factory: F) -> Self
    where
        F: Fn() -> anyhow::Result<G> + 'static,
        G: FnMut(&S, &PropMap) -> anyhow::Result<PropMap> + 'static,
    {
        Self::Factory(Rc::new(
            move || -> anyhow::Result<Box<InstanceSelectorFn<S>>> { Ok(Box::new(factory()?)) },
        ))
    }

    pub fn is_factory(&self) -> bool {
        matches!(self, Self::Factory(_))
    }

    /// Obtain the selector a new instance will use for its whole lifetime
    pub(crate) fn resolve(&self) -> Result<ResolvedSelector<S>> {
        match self {
            Self::Static(f) => Ok(ResolvedSelector::Shared(Rc::clone(f))),
            Self::Factory(make) => {
                log::trace!("Resolving selector factory for new instance");
                let select = make().map_err(ConnectError::Selector)?;
                Ok(ResolvedSelector::Owned(select))
            }
        }
    }
}

pub(crate) enum ResolvedSelector<S> {
    Shared(Rc<SelectorFn<S>>),
    Owned(Box<InstanceSelectorFn<S>>),
}

impl<S> ResolvedSelector<S> {
    pub(crate) fn select(&mut self, state: &S, own: &PropMap) -> Result<PropMap> {
        let derived = match self {
            Self::Shared(f) => f(state, own),
            Self::Owned(f) => f(state, own),
        };
        derived.map_err(ConnectError::Selector)
    }
}
