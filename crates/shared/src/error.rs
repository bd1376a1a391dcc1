use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body returned with a non-2xx status.
///
/// `detail` is usually a string, but request-validation failures report a list
/// of objects, so the raw value is kept and only string details are surfaced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    /// The human-readable detail, if the server supplied a non-empty string.
    pub fn message(&self) -> Option<&str> {
        match &self.detail {
            Some(Value::String(text)) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}
