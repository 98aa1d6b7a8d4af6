//! Parent view: greets the user and shows the `low` counter in the picked color

use crate::actions::Action;
use crate::state::AppState;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use redux_connect::{
    connect, display_value, ActionMap, Component, ConnectedComponent, PropMap, Props, Selector,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct CountListProps {
    low: i64,
    color: String,
}

pub type ConnectedCountList = ConnectedComponent<AppState, Action, CountList>;

/// Count list connected to `low` and `color`, with `up` and `random` actions.
///
/// `random` takes an optional seed argument; the clock is used otherwise.
pub fn connected() -> ConnectedCountList {
    connect(
        Selector::typed(|state: &AppState, _own: &PropMap| CountListProps {
            low: state.low,
            color: state.color.clone(),
        }),
        ActionMap::new()
            .action("up", |_| Action::Up)
            .action("random", |args| {
                Action::Random(args.first().and_then(Value::as_u64).unwrap_or_else(clock_seed))
            }),
    )
    .wrap(CountList::default)
}

fn clock_seed() -> u64 {
    u64::from(chrono::Local::now().timestamp_subsec_nanos())
}

#[derive(Debug, Default)]
pub struct CountList;

impl Component for CountList {
    fn init(&mut self, props: &Props) {
        log::debug!("CountList: init with actions {:?}", props.action_names());
    }

    fn render(&self, props: &Props) -> Text<'static> {
        let name = props.get("name").map(|v| display_value(&v)).unwrap_or_default();
        let low = props.get("low").map(|v| display_value(&v)).unwrap_or_default();
        let color = props
            .get_as::<String>("color")
            .ok()
            .flatten()
            .and_then(|c| c.parse::<Color>().ok())
            .unwrap_or(Color::Reset);

        Text::from(vec![
            Line::from(format!("Welcome back, {}!", name)),
            Line::from(vec![
                Span::raw("low: "),
                Span::styled(low, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ]),
        ])
    }
}
