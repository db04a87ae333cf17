//! HTTP client module
//!
//! Provides the authenticated client with retry and backoff.
//!
//! # Features
//!
//! - **WSSE Signing**: Every attempt carries a freshly signed `X-WSSE` header
//! - **Automatic Retries**: Non-200 responses are retried with backoff
//! - **Envelope Decoding**: `data` is decoded into the caller's type
//! - **Pluggable Transport**: Swap reqwest for a test double

mod client;
mod request;
mod retry;
mod transport;

pub use client::{Client, JSON_CONTENT_TYPE};
pub use request::ApiRequest;
pub use retry::RetryPolicy;
pub use transport::{default_user_agent, ReqwestTransport, Transport, DEFAULT_TIMEOUT};
