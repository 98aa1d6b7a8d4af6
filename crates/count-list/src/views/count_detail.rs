//! Child view: shows the `high` counter and can count it down

use crate::actions::Action;
use crate::state::AppState;
use ratatui::text::Text;
use redux_connect::{
    connect, display_value, ActionProps, BoundAction, Component, ConnectedComponent, Dispatch,
    DispatchToActions, PropMap, Props, Selector,
};
use serde_json::json;

pub type ConnectedCountDetail = ConnectedComponent<AppState, Action, CountDetail>;

/// Every instance gets its own selector, which hands back the previous
/// props while `high` is unchanged.
fn high_selector() -> Selector<AppState> {
    Selector::factory(|| {
        let mut last: Option<(i64, PropMap)> = None;
        move |state: &AppState, _own: &PropMap| -> PropMap {
            if let Some((high, props)) = &last {
                if *high == state.high {
                    return props.clone();
                }
            }
            let props = json!({ "high": state.high })
                .as_object()
                .cloned()
                .unwrap_or_default();
            last = Some((state.high, props.clone()));
            props
        }
    })
}

fn down_action() -> DispatchToActions<Action> {
    DispatchToActions::bind(|dispatch: Dispatch<Action>| {
        let mut actions = ActionProps::new();
        actions.insert(
            "down".to_string(),
            BoundAction::new(move |_args| dispatch.dispatch(Action::Down)),
        );
        actions
    })
}

pub fn connected() -> ConnectedCountDetail {
    connect(high_selector(), down_action()).wrap(CountDetail::default)
}

#[derive(Debug, Default)]
pub struct CountDetail;

impl Component for CountDetail {
    fn render(&self, props: &Props) -> Text<'static> {
        let high = props.get("high").map(|v| display_value(&v)).unwrap_or_default();
        Text::from(format!("high: {}", high))
    }
}
