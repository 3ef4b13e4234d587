//! Response envelope validation.

use beanline_core::ContentDomain;
use serde_json::Value;

/// Result of unwrapping `{ "data": { "<key>": ... } }` for a domain.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// The nested array or object.
    Payload(Value),
    /// Key missing, `null`, or not a container. Not an error.
    NoData,
}

impl Envelope {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn into_payload(self) -> Option<Value> {
        match self {
            Self::Payload(v) => Some(v),
            Self::NoData => None,
        }
    }
}

/// Unwrap a response body for `domain`.
///
/// Only arrays and objects count as data, empty ones included.
pub fn parse_envelope(domain: ContentDomain, body: &Value) -> Envelope {
    match body
        .get("data")
        .and_then(|data| data.get(domain.envelope_key()))
    {
        Some(value @ (Value::Array(_) | Value::Object(_))) => Envelope::Payload(value.clone()),
        _ => Envelope::NoData,
    }
}
