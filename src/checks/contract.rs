//! Response shape matching.
//!
//! Every check classifies a response by status code and body shape. This
//! module turns "is the status right and are these fields there" into a
//! tagged [`Shape`] the checks can match on.

use serde_json::{Map, Value};

/// Kind a required field must have to count as present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Any,
    Array,
    Object,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

pub const fn field(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Any,
    }
}

pub const fn array(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Array,
    }
}

pub const fn object(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Object,
    }
}

impl Field {
    fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            FieldKind::Any => true,
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
        }
    }
}

/// Outcome of matching a response against an expected status and field set.
#[derive(Debug, PartialEq)]
pub enum Shape<'a> {
    Matched(&'a Map<String, Value>),
    MissingField(&'static str),
    UnexpectedStatus(u16),
}

/// Match `body` against the expected status and required fields, in order.
/// A field of the wrong kind counts as missing.
pub fn expect<'a>(status: u16, expected: u16, body: &'a Value, fields: &[Field]) -> Shape<'a> {
    if status != expected {
        return Shape::UnexpectedStatus(status);
    }

    let Some(map) = body.as_object() else {
        return Shape::MissingField(fields.first().map(|f| f.name).unwrap_or("<object>"));
    };

    for required in fields {
        match map.get(required.name) {
            Some(value) if required.accepts(value) => {}
            _ => return Shape::MissingField(required.name),
        }
    }

    Shape::Matched(map)
}

/// `error` field of an error body, or the empty string.
pub fn error_text(body: &Value) -> &str {
    body.get("error").and_then(Value::as_str).unwrap_or_default()
}

/// Field rendered for a human-readable message; strings lose their quotes.
pub fn display_field(map: &Map<String, Value>, name: &str) -> String {
    match map.get(name) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "N/A".into(),
    }
}
