//! Payload and outcome types shared by the executor and resource clients.
//!
//! # Design
//! `Outcome` replaces a loosely typed success/error map with two variants.
//! Its `Serialize` impl still emits the flat `{"success": …}` shape so the
//! outcome can be forwarded as JSON unchanged.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Request payload. An empty map means no request body is sent.
pub type Payload = Map<String, Value>;

/// Convert typed attributes into a `Payload`.
///
/// The value must serialize to a JSON object.
pub fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Payload, ApiError> {
    match serde_json::to_value(value).map_err(ApiError::Serialization)? {
        Value::Object(map) => Ok(map),
        other => Err(ApiError::PayloadNotObject {
            kind: json_kind(&other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalized result of one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Status 200 or 201; `data` is the parsed response body.
    Success { data: Value },
    /// Any other status; `error` is the reason phrase and `details` the raw,
    /// unparsed response body.
    Failure { error: String, details: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Outcome::Success { data } => Some(data),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<Value> {
        match self {
            Outcome::Success { data } => Some(data),
            Outcome::Failure { .. } => None,
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Success { data } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            Outcome::Failure { error, details } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("details", details)?;
                map.end()
            }
        }
    }
}

/// Attributes accepted by the user create and update operations. Fields left
/// as `None` are omitted from the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
