// src/backend/envelope.rs - Uniform `{ status, data | message }` response envelope
//
// Every HTTP exchange is folded into an envelope before callers see it:
//   2xx, object with boolean status -> unwrapped as-is
//   2xx, any other body             -> status=true, data=body
//   non-2xx with a `message` field -> status=false, message=<verbatim>
//   non-2xx without one            -> transport error (no structured body)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::infra::errors::{DishHubError, GENERIC_FAILURE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub status: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            status: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        Self {
            status: false,
            data: None,
            message,
        }
    }

    /// Fold a raw HTTP response into an envelope.
    ///
    /// Returns `Err` only for failures with no structured body, which are
    /// transport errors rather than backend rejections.
    pub fn from_http(status_code: u16, body: &[u8]) -> Result<Self, DishHubError> {
        let success = (200..300).contains(&status_code);
        let parsed = parse_body(body);

        if success {
            return match parsed {
                Ok(value) => Ok(as_envelope(&value).unwrap_or_else(|| Self::ok(value))),
                Err(e) => Err(DishHubError::Decode(e.to_string())),
            };
        }

        match parsed.ok().and_then(|v| message_of(&v)) {
            Some(message) => Ok(Self::rejected(Some(message))),
            None => Err(DishHubError::transport(format!(
                "{GENERIC_FAILURE} (HTTP {status_code})"
            ))),
        }
    }

    /// Success payload, or the rejection mapped to an error.
    /// `data` absent on success is returned as JSON null.
    pub fn into_result(self) -> Result<Value, DishHubError> {
        if self.status {
            Ok(self.data.unwrap_or(Value::Null))
        } else {
            Err(DishHubError::rejection(self.message))
        }
    }
}

fn parse_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

/// Any object with a boolean `status` is an envelope. A string `status`
/// (history records) is plain data.
fn as_envelope(value: &Value) -> Option<ApiEnvelope> {
    let obj = value.as_object()?;
    let status = obj.get("status")?.as_bool()?;
    Some(ApiEnvelope {
        status,
        data: obj.get("data").cloned(),
        message: obj.get("message").and_then(Value::as_str).map(str::to_string),
    })
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
