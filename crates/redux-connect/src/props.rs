//! Property namespace of a connected instance
//!
//! A connected instance exposes one namespace made of three layers:
//!
//! ```text
//! own props  <  local writes  <  derived props  <  action props
//! ```
//!
//! Own props come from the caller. Local writes by the component sit on top
//! of them but are never seen by the selector; a later caller update of the
//! same name replaces the local value. Derived props are computed by the
//! selector and action props are bound by the connection. The last two are
//! read-only from the outside.

use crate::error::{ConnectError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Mapping from property name to value
pub type PropMap = serde_json::Map<String, Value>;

/// Action properties keyed by name
pub type ActionProps = BTreeMap<String, BoundAction>;

/// Convert any serializable value into a property map.
///
/// The value must serialize to a JSON object.
pub fn to_prop_map<T: Serialize>(value: &T) -> Result<PropMap> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(ConnectError::NotAnObject {
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A callable property that dispatches an action when invoked
#[derive(Clone)]
pub struct BoundAction(Rc<dyn Fn(&[Value]) -> Result<()>>);

impl BoundAction {
    pub fn new(f: impl Fn(&[Value]) -> Result<()> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the action with the given arguments
    pub fn call(&self, args: &[Value]) -> Result<()> {
        (self.0)(args)
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoundAction")
    }
}

/// One caller-supplied property that changed, with what it replaced
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OwnChange {
    pub(crate) name: String,
    previous: Option<Value>,
    previous_local: Option<Value>,
}

#[derive(Debug, Default)]
struct PropsInner {
    own: PropMap,
    local: PropMap,
    derived: PropMap,
    actions: ActionProps,
    revision: u64,
}

impl PropsInner {
    fn is_connected(&self, name: &str) -> bool {
        self.derived.contains_key(name) || self.actions.contains_key(name)
    }

    fn write_own(&mut self, name: &str, value: Option<Value>) -> Option<OwnChange> {
        if self.own.get(name) == value.as_ref() {
            return None;
        }
        if value.is_some() && self.is_connected(name) {
            log::warn!("Own property \"{}\" is shadowed by a connected property", name);
        }
        let previous = match value {
            Some(value) => self.own.insert(name.to_string(), value),
            None => self.own.remove(name),
        };
        Some(OwnChange {
            name: name.to_string(),
            previous,
            previous_local: self.local.remove(name),
        })
    }
}

/// Shared view over the merged property namespace.
///
/// Cloning is cheap and every clone observes the same properties. No borrow
/// is held across user callbacks, so actions may be invoked from lifecycle
/// hooks.
#[derive(Debug, Clone, Default)]
pub struct Props {
    inner: Rc<RefCell<PropsInner>>,
}

impl Props {
    pub(crate) fn new(own: PropMap) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PropsInner {
                own,
                ..PropsInner::default()
            })),
        }
    }

    /// Look up a value property.
    ///
    /// Derived values win over own values. Names bound to actions have no value.
    pub fn get(&self, name: &str) -> Option<Value> {
        let inner = self.inner.borrow();
        if inner.actions.contains_key(name) {
            return None;
        }
        inner
            .derived
            .get(name)
            .or_else(|| inner.local.get(name))
            .or_else(|| inner.own.get(name))
            .cloned()
    }

    /// Look up a value property and deserialize it
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.get(name) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Look up an action property
    pub fn action(&self, name: &str) -> Option<BoundAction> {
        self.inner.borrow().actions.get(name).cloned()
    }

    /// Invoke the action property `name` with `args`
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<()> {
        let action = self.action(name).ok_or_else(|| ConnectError::UnknownAction {
            name: name.to_string(),
        })?;
        action.call(args)
    }

    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.borrow();
        inner.is_connected(name) || inner.local.contains_key(name) || inner.own.contains_key(name)
    }

    /// Whether `name` is owned by the connection (derived or action)
    pub fn is_connected(&self, name: &str) -> bool {
        self.inner.borrow().is_connected(name)
    }

    /// All value properties after precedence is applied, sorted by name
    pub fn values(&self) -> BTreeMap<String, Value> {
        let inner = self.inner.borrow();
        inner
            .own
            .iter()
            .chain(inner.local.iter())
            .chain(inner.derived.iter())
            .filter(|(name, _)| !inner.actions.contains_key(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Names of all action properties
    pub fn action_names(&self) -> Vec<String> {
        self.inner.borrow().actions.keys().cloned().collect()
    }

    /// Snapshot of the caller-supplied properties, as the selector sees them
    pub fn own(&self) -> PropMap {
        self.inner.borrow().own.clone()
    }

    /// Snapshot of the properties written locally through [`Props::try_set`]
    pub fn local(&self) -> PropMap {
        self.inner.borrow().local.clone()
    }

    /// Snapshot of the selector-derived properties
    pub fn derived(&self) -> PropMap {
        self.inner.borrow().derived.clone()
    }

    /// Incremented whenever a visible property value changes
    pub fn revision(&self) -> u64 {
        self.inner.borrow().revision
    }

    /// Write a local property.
    ///
    /// Fails for properties owned by the connection. Local values are not
    /// passed to the selector.
    pub fn try_set(&self, name: &str, value: Value) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.is_connected(name) {
            return Err(ConnectError::ReadOnlyProperty {
                name: name.to_string(),
            });
        }
        let current = inner.local.get(name).or_else(|| inner.own.get(name));
        if current != Some(&value) {
            inner.local.insert(name.to_string(), value);
            inner.revision += 1;
        }
        Ok(())
    }

    /// Write a local property, asserting it is not owned by the connection.
    ///
    /// # Panics
    ///
    /// Panics when `name` is a derived or action property.
    pub fn set(&self, name: &str, value: Value) {
        if let Err(err) = self.try_set(name, value) {
            panic!("Assertion Failed: {err}");
        }
    }

    /// Merge caller-supplied properties; names absent from `next` keep their value
    pub(crate) fn merge_own(&self, next: PropMap) -> Vec<OwnChange> {
        let mut inner = self.inner.borrow_mut();
        let changes: Vec<OwnChange> = next
            .into_iter()
            .filter_map(|(name, value)| inner.write_own(&name, Some(value)))
            .collect();
        if !changes.is_empty() {
            inner.revision += 1;
        }
        changes
    }

    /// Replace all caller-supplied properties; names absent from `next` are removed
    pub(crate) fn replace_own(&self, next: PropMap) -> Vec<OwnChange> {
        let mut inner = self.inner.borrow_mut();
        let removed: Vec<String> = inner
            .own
            .keys()
            .filter(|name| !next.contains_key(*name))
            .cloned()
            .collect();
        let mut changes: Vec<OwnChange> = removed
            .iter()
            .filter_map(|name| inner.write_own(name, None))
            .collect();
        changes.extend(
            next.into_iter()
                .filter_map(|(name, value)| inner.write_own(&name, Some(value))),
        );
        if !changes.is_empty() {
            inner.revision += 1;
        }
        changes
    }

    /// Undo changes returned by [`Props::merge_own`] or [`Props::replace_own`]
    pub(crate) fn rollback_own(&self, changes: Vec<OwnChange>) {
        if changes.is_empty() {
            return;
        }
        let mut inner = self.inner.borrow_mut();
        for change in changes.into_iter().rev() {
            match change.previous {
                Some(value) => inner.own.insert(change.name.clone(), value),
                None => inner.own.remove(&change.name),
            };
            if let Some(local) = change.previous_local {
                inner.local.insert(change.name, local);
            }
        }
        inner.revision += 1;
    }

    /// Replace the derived properties, touching only values that differ.
    ///
    /// Returns the names that were added, changed or removed.
    pub(crate) fn apply_derived(&self, next: PropMap) -> Vec<String> {
        let mut inner = self.inner.borrow_mut();
        let mut changed: Vec<String> = inner
            .derived
            .keys()
            .filter(|name| !next.contains_key(*name))
            .cloned()
            .collect();
        for name in &changed {
            inner.derived.remove(name);
        }
        for (name, value) in next {
            if inner.derived.get(&name) == Some(&value) {
                continue;
            }
            if !inner.derived.contains_key(&name)
                && (inner.own.contains_key(&name) || inner.local.contains_key(&name))
            {
                log::warn!("Own property \"{}\" is shadowed by a derived property", name);
            }
            changed.push(name.clone());
            inner.derived.insert(name, value);
        }
        if !changed.is_empty() {
            inner.revision += 1;
        }
        changed
    }

    pub(crate) fn set_actions(&self, actions: ActionProps) {
        let mut inner = self.inner.borrow_mut();
        for name in actions.keys() {
            if inner.own.contains_key(name)
                || inner.local.contains_key(name)
                || inner.derived.contains_key(name)
            {
                log::warn!("Property \"{}\" is shadowed by an action property", name);
            }
        }
        inner.actions = actions;
        inner.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn map(value: Value) -> PropMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_derived_wins_over_own() {
        let props = Props::new(map(json!({"count": 1, "name": "Dustin"})));
        props.apply_derived(map(json!({"count": 5})));

        assert_eq!(props.get("count"), Some(json!(5)));
        assert_eq!(props.get("name"), Some(json!("Dustin")));
    }

    #[test]
    fn test_actions_win_over_values() {
        let props = Props::new(map(json!({"up": 1})));
        let mut actions = ActionProps::new();
        actions.insert("up".to_string(), BoundAction::new(|_| Ok(())));
        props.set_actions(actions);

        assert_eq!(props.get("up"), None);
        assert!(props.action("up").is_some());
        assert!(!props.values().contains_key("up"));
    }

    #[test]
    fn test_apply_derived_reports_only_changes() {
        let props = Props::new(PropMap::new());
        let changed = props.apply_derived(map(json!({"a": 1, "b": [1, 2]})));
        assert_eq!(changed.len(), 2);
        let revision = props.revision();

        let changed = props.apply_derived(map(json!({"a": 1, "b": [1, 2]})));
        assert!(changed.is_empty());
        assert_eq!(props.revision(), revision);

        let changed = props.apply_derived(map(json!({"a": 2})));
        assert_eq!(changed, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(props.get("b"), None);
        assert_eq!(props.revision(), revision + 1);
    }

    #[test]
    fn test_try_set_rejects_derived() {
        let props = Props::new(PropMap::new());
        props.apply_derived(map(json!({"low": 0})));

        let err = props.try_set("low", json!(3)).unwrap_err();
        assert!(matches!(err, ConnectError::ReadOnlyProperty { ref name } if name == "low"));
        assert_eq!(props.get("low"), Some(json!(0)));
    }

    #[test]
    fn test_try_set_rejects_actions() {
        let props = Props::new(PropMap::new());
        let mut actions = ActionProps::new();
        actions.insert("up".to_string(), BoundAction::new(|_| Ok(())));
        props.set_actions(actions);

        assert!(props.try_set("up", json!(null)).is_err());
    }

    #[test]
    fn test_try_set_writes_local() {
        let props = Props::new(PropMap::new());
        props.try_set("color", json!("blue")).unwrap();
        assert_eq!(props.get("color"), Some(json!("blue")));
        assert_eq!(props.local().get("color"), Some(&json!("blue")));
        assert!(props.own().is_empty());
    }

    #[test]
    fn test_local_write_is_replaced_by_caller_update() {
        let props = Props::new(map(json!({"name": "Dustin"})));
        props.try_set("name", json!("Tom")).unwrap();
        assert_eq!(props.get("name"), Some(json!("Tom")));
        assert_eq!(props.own().get("name"), Some(&json!("Dustin")));

        props.merge_own(map(json!({"name": "Toran"})));
        assert_eq!(props.get("name"), Some(json!("Toran")));
        assert!(props.local().is_empty());
    }

    #[test]
    #[should_panic(
        expected = "Assertion Failed: Cannot set redux property \"low\". Try dispatching a redux action instead."
    )]
    fn test_set_asserts_on_derived() {
        let props = Props::new(PropMap::new());
        props.apply_derived(map(json!({"low": 0})));
        props.set("low", json!(1));
    }

    #[test]
    fn test_merge_own_skips_identical_values() {
        let props = Props::new(map(json!({"name": "Dustin"})));
        assert!(props.merge_own(map(json!({"name": "Dustin"}))).is_empty());
        let changes = props.merge_own(map(json!({"name": "Toran", "mood": "ok"})));
        let names: Vec<&str> = changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["mood", "name"]);
        assert_eq!(props.get("name"), Some(json!("Toran")));
    }

    #[test]
    fn test_merge_own_keeps_absent_names() {
        let props = Props::new(map(json!({"name": "Dustin", "mood": "ok"})));
        props.merge_own(map(json!({"name": "Toran"})));
        assert_eq!(props.own(), map(json!({"name": "Toran", "mood": "ok"})));
    }

    #[test]
    fn test_replace_own_removes_absent_names() {
        let props = Props::new(map(json!({"name": "Dustin", "mood": "ok"})));
        let revision = props.revision();

        let changes = props.replace_own(map(json!({"name": "Dustin"})));

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "mood");
        assert_eq!(props.own(), map(json!({"name": "Dustin"})));
        assert_eq!(props.get("mood"), None);
        assert_eq!(props.revision(), revision + 1);
        assert!(props.replace_own(map(json!({"name": "Dustin"}))).is_empty());
    }

    #[test]
    fn test_rollback_own_restores_previous_values() {
        let props = Props::new(map(json!({"name": "Dustin", "mood": "ok"})));
        props.try_set("name", json!("Tom")).unwrap();

        let changes = props.replace_own(map(json!({"name": "Toran", "extra": 1})));
        assert_eq!(props.get("name"), Some(json!("Toran")));

        props.rollback_own(changes);
        assert_eq!(props.own(), map(json!({"name": "Dustin", "mood": "ok"})));
        assert_eq!(props.get("name"), Some(json!("Tom")));
    }

    #[test]
    fn test_invoke_unknown_action() {
        let props = Props::new(PropMap::new());
        let err = props.invoke("missing", &[]).unwrap_err();
        assert!(matches!(err, ConnectError::UnknownAction { .. }));
    }

    #[test]
    fn test_invoke_passes_arguments() {
        let props = Props::new(PropMap::new());
        let seen = Rc::new(Cell::new(0));
        let seen_in_action = Rc::clone(&seen);
        let mut actions = ActionProps::new();
        actions.insert(
            "add".to_string(),
            BoundAction::new(move |args| {
                seen_in_action.set(args.len());
                Ok(())
            }),
        );
        props.set_actions(actions);

        props.invoke("add", &[json!(1), json!(2)]).unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_get_as_deserializes() {
        let props = Props::new(map(json!({"count": 7})));
        assert_eq!(props.get_as::<i64>("count").unwrap(), Some(7));
        assert_eq!(props.get_as::<i64>("missing").unwrap(), None);
    }

    #[test]
    fn test_to_prop_map_requires_object() {
        assert!(to_prop_map(&json!({"a": 1})).is_ok());
        let err = to_prop_map(&42).unwrap_err();
        assert!(matches!(err, ConnectError::NotAnObject { found: "a number" }));
    }
}
