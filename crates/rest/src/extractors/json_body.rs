//! JSON object body extractor.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::RestError;

const BAD_DATA: &str = "bad data";

/// A request body that must be a JSON object.
///
/// Malformed JSON and non-object bodies are rejected with 400 before the
/// handler runs. Fields are interpreted later by the model decoders.
#[derive(Debug, Default)]
pub struct JsonBody(pub Map<String, Value>);

impl JsonBody {
    /// Returns a string field, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns a trimmed, non-empty string field.
    pub fn required_str(&self, key: &str) -> Option<&str> {
        self.str_field(key).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Consumes the extractor and returns the object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Parses body bytes; an empty body is an empty object.
pub(crate) fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, RestError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RestError::bad_request(BAD_DATA)),
        Err(e) => {
            debug!(error = %e, "Rejecting malformed JSON body");
            Err(RestError::bad_request(BAD_DATA))
        }
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RestError::PayloadTooLarge
            } else {
                RestError::bad_request(e.body_text())
            }
        })?;
        parse_object(&bytes).map(JsonBody)
    }
}
