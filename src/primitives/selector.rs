//! Selector parsing - `tag#id.class[attr=value]` descriptions.
//!
//! A tag description is split into segments in front of every `#`, `.` and
//! `[` outside an attribute bracket. The first segment is the tag name; each
//! following segment contributes a property default:
//!
//! ```text
//! div#main.card.wide[role=region]
//! └┬┘└─┬─┘└─┬─┘└─┬─┘└─────┬─────┘
//! tag  props.id  classToggle   attrs
//! ```

use thiserror::Error;

use super::types::{Properties, PropValue};
use crate::types::Value;

/// Failure to parse a tag description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("tag description {description:?} has no tag name")]
    EmptyTag { description: String },

    #[error("unknown selector token {token:?}")]
    UnknownToken { token: String },

    #[error("selector token {token:?} has no name")]
    EmptyName { token: String },

    #[error("attribute selector {token:?} is missing its closing ']'")]
    UnclosedAttribute { token: String },
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '-' | '_' | ':')
}

/// Split a description into its tag segment and modifier segments.
///
/// Any character that cannot appear in a name opens a new segment, so
/// stray symbols surface as unknown tokens instead of being swallowed.
fn segments(description: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;

    for (i, ch) in description.char_indices() {
        if in_brackets {
            if ch == ']' {
                in_brackets = false;
            }
            continue;
        }
        if is_name_char(ch) {
            continue;
        }
        if i > 0 {
            parts.push(&description[start..i]);
        }
        start = i;
        in_brackets = ch == '[';
    }
    parts.push(&description[start..]);
    parts
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted { &value[1..value.len() - 1] } else { value }
}

/// Parse a tag description into its tag name and the property defaults it implies.
///
/// ```ignore
/// let (tag, props) = parse_selector("span[flag]")?;
/// assert_eq!(tag, "span");
/// // props.attrs == { "flag": "" }
/// ```
pub fn parse_selector(description: &str) -> Result<(String, Properties), SelectorError> {
    let parts = segments(description);
    let tag = parts[0];
    if !tag.chars().next().is_some_and(is_name_char) {
        return Err(SelectorError::EmptyTag {
            description: description.to_string(),
        });
    }

    let mut props = Properties::new();
    for token in &parts[1..] {
        let Some(marker) = token.chars().next() else {
            continue;
        };
        let name = &token[marker.len_utf8()..];
        match marker {
            '#' | '.' | '[' if name.is_empty() => {
                return Err(SelectorError::EmptyName {
                    token: token.to_string(),
                });
            }
            '#' => props = props.prop("id", name),
            '.' => props = props.class_toggle(name, true),
            '[' => {
                let Some(inner) = name.strip_suffix(']') else {
                    return Err(SelectorError::UnclosedAttribute {
                        token: token.to_string(),
                    });
                };
                let (key, value) = match inner.split_once('=') {
                    Some((key, value)) => (key, unquote(value)),
                    None => (inner, ""),
                };
                if key.is_empty() {
                    return Err(SelectorError::EmptyName {
                        token: token.to_string(),
                    });
                }
                props = props.attr(key, PropValue::Static(Value::from(value)));
            }
            _ => {
                return Err(SelectorError::UnknownToken {
                    token: token.to_string(),
                });
            }
        }
    }

    Ok((tag.to_string(), props))
}
