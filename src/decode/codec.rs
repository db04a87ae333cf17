//! Response classification
//!
//! The API reports failure two ways: a non-200 HTTP status, or a non-zero
//! reply code inside a 200 response. Both end up as [`Error::Api`] so callers
//! have one failure path. Retry decisions are made from the resulting error
//! via [`Error::is_retryable`].

use super::types::Envelope;
use crate::error::{ApiError, Error, Result};
use bytes::Bytes;
use serde::de::DeserializeOwned;

/// The only status that can carry a successful reply
pub const SUCCESS_STATUS: u16 = 200;

/// Decode a fully read response body into the caller's payload type
///
/// The body bytes are kept on every error path.
pub fn decode<T: DeserializeOwned>(status: u16, body: Bytes) -> Result<T> {
    let envelope = match Envelope::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(source) => {
            return Err(Error::EnvelopeDecode {
                status,
                body,
                source,
            })
        }
    };

    if status != SUCCESS_STATUS || !envelope.is_success() {
        let has_data = envelope.data.is_some();
        return Err(ApiError::new(
            status,
            envelope.reply_code,
            envelope.reply_text,
            body,
            has_data,
        )
        .into());
    }

    envelope
        .payload()
        .map_err(|source| Error::PayloadDecode {
            status,
            body,
            source,
        })
}
