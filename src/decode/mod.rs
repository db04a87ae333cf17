//! Response envelope module
//!
//! # Overview
//!
//! Decodes the `{replyCode, replyText, data}` wrapper and classifies the
//! response:
//!
//! | HTTP status | envelope | reply code | result |
//! |---|---|---|---|
//! | != 200 | parses | any | `Error::Api` (retryable) |
//! | != 200 | malformed | - | `Error::EnvelopeDecode` (retryable) |
//! | 200 | malformed | - | `Error::EnvelopeDecode` (permanent) |
//! | 200 | parses | != 0 | `Error::Api` (permanent) |
//! | 200 | parses | 0 | `data` decoded into `T`, else `Error::PayloadDecode` |

mod codec;
mod types;

pub use codec::{decode, SUCCESS_STATUS};
pub use types::Envelope;

#[cfg(test)]
mod tests;
