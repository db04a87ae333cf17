//! Transport boundary
//!
//! The executor only needs "send this request, give me the response". Tests
//! swap in a scripted transport; production uses reqwest.

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use std::time::Duration;

/// Per-request timeout enforced by the default transport
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Sends one prepared request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute `request` and return the response with an unread body
    async fn send(&self, request: Request) -> Result<Response>;
}

/// reqwest-backed transport
///
/// Requires TLS 1.2 or newer.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport with the default timeout and user agent
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_TIMEOUT, &default_user_agent())
    }

    /// Transport with a custom timeout and user agent
    pub fn with_options(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        self.client.execute(request).await.map_err(Error::Http)
    }
}

/// `emarsys-client/<version>`
pub fn default_user_agent() -> String {
    format!("emarsys-client/{}", env!("CARGO_PKG_VERSION"))
}
