//! Binding of action creators to a store's dispatch

use crate::error::ConnectError;
use crate::props::{ActionProps, BoundAction};
use crate::store::Dispatch;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Builds an action from the arguments an action property was invoked with
pub type ActionCreator<A> = Rc<dyn Fn(&[Value]) -> anyhow::Result<A>>;

/// Named action creators whose results are dispatched automatically
pub struct ActionMap<A> {
    creators: BTreeMap<String, ActionCreator<A>>,
}

impl<A> Clone for ActionMap<A> {
    fn clone(&self) -> Self {
        Self {
            creators: self.creators.clone(),
        }
    }
}

impl<A> Default for ActionMap<A> {
    fn default() -> Self {
        Self {
            creators: BTreeMap::new(),
        }
    }
}

impl<A> fmt::Debug for ActionMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.creators.keys()).finish()
    }
}

impl<A: 'static> ActionMap<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an infallible action creator
    pub fn action<F>(self, name: impl Into<String>, creator: F) -> Self
    where
        F: Fn(&[Value]) -> A + 'static,
    {
        self.try_action(name, move |args: &[Value]| -> anyhow::Result<A> {
            Ok(creator(args))
        })
    }

    /// Add an action creator that may fail
    pub fn try_action<F>(mut self, name: impl Into<String>, creator: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<A> + 'static,
    {
        self.creators.insert(name.into(), Rc::new(creator));
        self
    }

    pub fn len(&self) -> usize {
        self.creators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creators.is_empty()
    }
}

type BindFn<A> = dyn Fn(Dispatch<A>) -> ActionProps;

/// How a connected component turns dispatch into action properties
pub enum DispatchToActions<A> {
    /// Called once per instance with dispatch; the result is used verbatim
    Bind(Rc<BindFn<A>>),
    /// Every creator result is dispatched when the property is invoked
    Map(ActionMap<A>),
}

impl<A> Clone for DispatchToActions<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Bind(f) => Self::Bind(Rc::clone(f)),
            Self::Map(map) => Self::Map(map.clone()),
        }
    }
}

impl<A> fmt::Debug for DispatchToActions<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(_) => f.write_str("DispatchToActions::Bind"),
            Self::Map(map) => f.debug_tuple("DispatchToActions::Map").field(map).finish(),
        }
    }
}

impl<A: 'static> DispatchToActions<A> {
    pub fn bind<F>(f: F) -> Self
    where
        F: Fn(Dispatch<A>) -> ActionProps + 'static,
    {
        Self::Bind(Rc::new(f))
    }
}

impl<A> From<ActionMap<A>> for DispatchToActions<A> {
    fn from(map: ActionMap<A>) -> Self {
        Self::Map(map)
    }
}

impl<A> From<ActionMap<A>> for Option<DispatchToActions<A>> {
    fn from(map: ActionMap<A>) -> Self {
        Some(DispatchToActions::Map(map))
    }
}

/// Turn a dispatch mapping into callable action properties
pub fn bind_actions<A: 'static>(
    actions: Option<&DispatchToActions<A>>,
    dispatch: &Dispatch<A>,
) -> ActionProps {
    match actions {
        None => ActionProps::new(),
        Some(DispatchToActions::Bind(bind)) => bind(dispatch.clone()),
        Some(DispatchToActions::Map(map)) => map
            .creators
            .iter()
            .map(|(name, creator)| {
                let creator = Rc::clone(creator);
                let dispatch = dispatch.clone();
                let action = BoundAction::new(move |args| {
                    let action = creator(args).map_err(ConnectError::ActionCreator)?;
                    dispatch.dispatch(action)
                });
                (name.clone(), action)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum CounterAction {
        Up,
        Add(i64),
    }

    fn recording_dispatch() -> (Dispatch<CounterAction>, Rc<RefCell<Vec<CounterAction>>>) {
        let dispatched = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&dispatched);
        let dispatch = Dispatch::new(move |action| -> Result<()> {
            sink.borrow_mut().push(action);
            Ok(())
        });
        (dispatch, dispatched)
    }

    #[test]
    fn test_absent_mapping_binds_nothing() {
        let (dispatch, _) = recording_dispatch();
        assert!(bind_actions(None, &dispatch).is_empty());
    }

    #[test]
    fn test_map_auto_dispatches_exactly_once() {
        let (dispatch, dispatched) = recording_dispatch();
        let actions = DispatchToActions::from(ActionMap::new().action("up", |_| CounterAction::Up));

        let props = bind_actions(Some(&actions), &dispatch);
        props["up"].call(&[]).unwrap();

        assert_eq!(*dispatched.borrow(), vec![CounterAction::Up]);
    }

    #[test]
    fn test_map_forwards_arguments() {
        let (dispatch, dispatched) = recording_dispatch();
        let actions = DispatchToActions::from(ActionMap::new().action("add", |args| {
            CounterAction::Add(args.first().and_then(Value::as_i64).unwrap_or(0))
        }));

        let props = bind_actions(Some(&actions), &dispatch);
        props["add"].call(&[json!(4)]).unwrap();

        assert_eq!(*dispatched.borrow(), vec![CounterAction::Add(4)]);
    }

    #[test]
    fn test_failing_creator_dispatches_nothing() {
        let (dispatch, dispatched) = recording_dispatch();
        let actions = DispatchToActions::from(
            ActionMap::<CounterAction>::new()
                .try_action("up", |_| Err(anyhow::anyhow!("not allowed"))),
        );

        let props = bind_actions(Some(&actions), &dispatch);
        let err = props["up"].call(&[]).unwrap_err();

        assert!(matches!(err, ConnectError::ActionCreator(_)));
        assert_eq!(err.to_string(), "not allowed");
        assert!(dispatched.borrow().is_empty());
    }

    #[test]
    fn test_bind_function_used_verbatim() {
        let (dispatch, dispatched) = recording_dispatch();
        let calls = Rc::new(RefCell::new(0));
        let calls_in_bind = Rc::clone(&calls);
        let actions = DispatchToActions::bind(move |dispatch: Dispatch<CounterAction>| {
            *calls_in_bind.borrow_mut() += 1;
            let mut props = ActionProps::new();
            props.insert(
                "twice".to_string(),
                BoundAction::new(move |_| {
                    dispatch.dispatch(CounterAction::Up)?;
                    dispatch.dispatch(CounterAction::Up)
                }),
            );
            props
        });

        let props = bind_actions(Some(&actions), &dispatch);
        assert_eq!(*calls.borrow(), 1);
        props["twice"].call(&[]).unwrap();

        assert_eq!(
            *dispatched.borrow(),
            vec![CounterAction::Up, CounterAction::Up]
        );
    }

    #[test]
    fn test_dispatch_failure_propagates() {
        let dispatch = Dispatch::new(|_action: CounterAction| -> Result<()> {
            Err(ConnectError::Store(anyhow::anyhow!("store is closed")))
        });
        let actions = DispatchToActions::from(ActionMap::new().action("up", |_| CounterAction::Up));

        let props = bind_actions(Some(&actions), &dispatch);
        let err = props["up"].call(&[]).unwrap_err();
        assert_eq!(err.to_string(), "store is closed");
    }
}
