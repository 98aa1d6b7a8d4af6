//! Host component contract
//!
//! Components are plain structs with optional lifecycle hooks. The
//! connection never replaces a hook: it runs its own work first and then
//! delegates to the component.

use crate::props::{PropMap, Props};
use ratatui::text::{Line, Text};
use serde_json::Value;

/// Component trait - the hooks a host drives over an instance's lifetime
pub trait Component {
    /// Values the selector reads next to the own props, such as an injected service.
    ///
    /// Taken when the instance is created and again on every own-props
    /// update. Own props win over context values with the same name.
    fn context(&self) -> PropMap {
        PropMap::new()
    }

    /// Called once after the instance's properties are in place
    fn init(&mut self, _props: &Props) {}

    /// Called after caller-supplied properties changed and were recomputed
    fn did_update_attrs(&mut self, _props: &Props) {}

    /// Called once after the instance stopped listening to the store
    fn will_destroy(&mut self, _props: &Props) {}

    /// Render the component from its merged properties
    fn render(&self, props: &Props) -> Text<'static>;
}

/// Component used when none is given: renders every value property on its own line
#[derive(Debug, Clone, Default)]
pub struct DefaultComponent;

impl Component for DefaultComponent {
    fn render(&self, props: &Props) -> Text<'static> {
        let lines: Vec<Line<'static>> = props
            .values()
            .values()
            .map(|value| Line::from(display_value(value)))
            .collect();
        Text::from(lines)
    }
}

/// Format a property value the way a template would interpolate it
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten rendered text into a plain string, one line per row
pub fn plain_text(text: &Text<'_>) -> String {
    text.lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("blue")), "blue");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_default_component_renders_values_in_order() {
        let own: PropMap = json!({"b": 2, "a": "first"}).as_object().cloned().unwrap();
        let props = Props::new(own);
        let text = DefaultComponent.render(&props);
        assert_eq!(plain_text(&text), "first\n2");
    }

    #[test]
    fn test_plain_text_joins_spans() {
        let text = Text::from(vec![
            Line::from(vec!["Welcome ".into(), "back".into()]),
            Line::from("!"),
        ]);
        assert_eq!(plain_text(&text), "Welcome back\n!");
    }
}
