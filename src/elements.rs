//! Ready-made element factories.
//!
//! Plain containers only carry the shared `click`/`dblclick` streams. Form
//! controls add the ports that make them useful:
//!
//! | factory    | behaviors | streams                              |
//! |------------|-----------|--------------------------------------|
//! | `input`    | `value`   | `click`, `dblclick`, `input`, `keyup` |
//! | `checkbox` | `checked` | `click`, `dblclick`, `checkedChange`  |
//! | `textarea` | `value`   | `click`, `dblclick`, `input`          |
//! | `form`     |           | `click`, `dblclick`, `submit`         |

use crate::engine::{NativeEvent, Node};
use crate::primitives::{
    default_properties, BehaviorDescription, ElementFactory, Properties, StreamDescription,
};
use crate::types::Value;

macro_rules! plain_elements {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Factory for `<", stringify!($name), ">`.")]
            pub fn $name() -> ElementFactory {
                ElementFactory::from_parts(stringify!($name), Properties::new())
            }
        )*
    };
}

plain_elements!(
    div, span, p, h1, h2, h3, ul, ol, li, label, a, button, section, article, header, footer,
    nav, strong, em,
);

/// Shared streams followed by `extra`.
fn streams_with(props: Properties, extra: Vec<StreamDescription>) -> Properties {
    let mut streams = default_properties().streams.unwrap_or_default();
    streams.extend(extra);
    Properties {
        streams: Some(streams),
        ..props
    }
}

/// Current text of a form control: its `value` property, else its `value` attribute.
fn current_text(node: &Node) -> Value {
    match node.property("value") {
        Value::Null => Value::Text(node.attribute("value").unwrap_or_default()),
        value => value,
    }
}

fn target_text(event: &NativeEvent) -> Value {
    event.target().map(|node| current_text(&node)).unwrap_or_default()
}

fn is_checked(node: &Node) -> Value {
    match node.property("checked") {
        Value::Bool(checked) => Value::Bool(checked),
        _ => Value::Bool(node.has_attribute("checked")),
    }
}

fn value_behavior() -> BehaviorDescription {
    BehaviorDescription::new("input", "value", target_text, current_text)
}

/// Text input with a `value` behavior.
pub fn input() -> ElementFactory {
    let props = Properties::new().behavior(value_behavior());
    ElementFactory::from_parts(
        "input",
        streams_with(
            props,
            vec![
                StreamDescription::new("input", "input", target_text),
                StreamDescription::identity("keyup", "keyup"),
            ],
        ),
    )
}

/// `input[type=checkbox]` with a `checked` behavior.
pub fn checkbox() -> ElementFactory {
    let checked = |event: &NativeEvent| event.target().map(|node| is_checked(&node)).unwrap_or_default();
    let props = Properties::new()
        .attr("type", "checkbox")
        .behavior(BehaviorDescription::new("change", "checked", checked, is_checked));
    ElementFactory::from_parts(
        "input",
        streams_with(
            props,
            vec![StreamDescription::new("change", "checkedChange", checked)],
        ),
    )
}

pub fn textarea() -> ElementFactory {
    let props = Properties::new().behavior(value_behavior());
    ElementFactory::from_parts(
        "textarea",
        streams_with(props, vec![StreamDescription::new("input", "input", target_text)]),
    )
}

pub fn form() -> ElementFactory {
    ElementFactory::from_parts(
        "form",
        streams_with(
            Properties::new(),
            vec![StreamDescription::identity("submit", "submit")],
        ),
    )
}
