//! Core types shared by the engine and the element builder.
//!
//! [`Value`] is the dynamic payload carried by attributes, DOM properties,
//! custom actions and event extractors. It is deliberately small: the node
//! surface only ever needs to store it, compare it and turn it into a string.

use std::fmt;

use crate::engine::NativeEvent;

// =============================================================================
// Value
// =============================================================================

/// A dynamic value flowing through bindings and output ports.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value (`undefined` property, missing event detail).
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A raw native event, as produced by identity extractors.
    Event(NativeEvent),
}

impl Value {
    /// Borrow the text content, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the native event, if this value wraps one.
    pub fn as_event(&self) -> Option<&NativeEvent> {
        match self {
            Value::Event(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// String form used when a value is written as an attribute.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Event(e) => write!(f, "[event {}]", e.name),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NativeEvent> for Value {
    fn from(value: NativeEvent) -> Self {
        Value::Event(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("submit").to_string(), "submit");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::from(7).as_number(), Some(7.0));
        assert!(Value::default().is_null());
        assert!(Value::from(1).as_str().is_none());
    }
}
