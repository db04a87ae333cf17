//! Envelope types
//!
//! Every API response wraps its payload:
//!
//! ```json
//! { "replyCode": 0, "replyText": "OK", "data": { ... } }
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::value::RawValue;

/// Outer wrapper of every API response
///
/// `data` is kept as raw JSON until the caller's target type is known.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Application status; 0 means success
    pub reply_code: i64,
    /// Human-readable status
    #[serde(default)]
    pub reply_text: String,
    /// Undecoded payload
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

impl Envelope {
    /// Parse an envelope from a response body
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Whether the reply code signals success
    pub fn is_success(&self) -> bool {
        self.reply_code == 0
    }

    /// Decode `data` into `T`; a missing member decodes as `null`
    pub fn payload<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        let raw = self.data.as_deref().map_or("null", RawValue::get);
        serde_json::from_str(raw)
    }
}
