//! Authenticated API client
//!
//! Runs the request lifecycle:
//! - signs every attempt with a fresh WSSE header
//! - sends through the configured transport
//! - reads the whole body, then classifies it through the envelope codec
//! - retries non-200 responses with backoff, fails fast on everything else

use super::request::ApiRequest;
use super::retry::RetryPolicy;
use super::transport::{ReqwestTransport, Transport};
use crate::auth::WsseSigner;
use crate::config::{ClientConfig, API_PATH_BASE};
use crate::decode;
use crate::error::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Content type sent with every request
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Lowercase form of [`crate::auth::HEADER_NAME`]
const WSSE_HEADER: HeaderName = HeaderName::from_static("x-wsse");

/// Client for the Emarsys API
///
/// Cheap to share behind an `Arc`; calls do not contend on any lock.
pub struct Client {
    base_url: String,
    signer: WsseSigner,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    staging: bool,
}

impl Client {
    /// Create a client from a config
    pub fn new(config: ClientConfig) -> Result<Self> {
        let credentials = config.require_credentials()?.clone();

        // Fail on a malformed base URL now rather than on the first call
        Url::parse(&config.base_url)?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let signer = match config.clock {
            Some(clock) => WsseSigner::with_clock(credentials, clock),
            None => WsseSigner::new(credentials),
        };

        let transport: Arc<dyn Transport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::with_options(
                config.timeout,
                &config.user_agent,
            )?),
        };

        debug!(
            "Created client for {} as {} (staging: {})",
            base_url,
            signer.identity(),
            config.staging
        );

        Ok(Self {
            base_url,
            signer,
            transport,
            retry: config.retry,
            staging: config.staging,
        })
    }

    /// Create a client from `EMARSYS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Whether this client was configured as staging
    pub fn is_staging(&self) -> bool {
        self.staging
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Active retry policy
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// The signer used for every attempt
    pub fn signer(&self) -> &WsseSigner {
        &self.signer
    }

    /// GET `path` and decode `data`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(&ApiRequest::get(path)).await
    }

    /// POST `body` as JSON to `path` and decode `data`
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(&ApiRequest::post(path).json(body)?).await
    }

    /// PUT `body` as JSON to `path` and decode `data`
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(&ApiRequest::put(path).json(body)?).await
    }

    /// DELETE `path` and decode `data`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(&ApiRequest::delete(path)).await
    }

    /// Run `request` under the retry policy
    ///
    /// Returns the decoded payload, or the error of the last attempt.
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let max_retries = self.retry.max_retries;
        let mut attempt = 0;

        loop {
            match self.attempt(request).await {
                Ok(value) => {
                    debug!(
                        "Request succeeded: {} {} (attempt {})",
                        request.method,
                        request.path,
                        attempt + 1
                    );
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = self.retry.next_delay(attempt);
                    warn!(
                        "Request {} {} failed: {}, attempt {}/{}, retrying in {:?}",
                        request.method,
                        request.path,
                        e,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(
                        "Request {} {} failed permanently on attempt {}: {}",
                        request.method,
                        request.path,
                        attempt + 1,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }

    /// One signed send/read/decode cycle
    async fn attempt<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let http_request = self.build_request(request)?;
        let response = self.transport.send(http_request).await?;
        let status = response.status().as_u16();

        // Read to the end before classifying; dropping the response afterwards
        // hands the connection back to the pool on every path.
        let body = response.bytes().await?;
        debug!("Received HTTP {} ({} bytes)", status, body.len());

        decode::decode(status, body)
    }

    /// Full URL for a path under `/api/v2`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }

        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!(
            "{}{}/{}",
            self.base_url, API_PATH_BASE, path
        ))?)
    }

    /// Build a signed reqwest request for one attempt
    fn build_request(&self, request: &ApiRequest) -> Result<Request> {
        let mut url = self.endpoint(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let mut http_request = Request::new(request.method.clone(), url);
        let headers = http_request.headers_mut();

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::invalid_value(key.as_str(), e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::invalid_value(key.as_str(), e.to_string()))?;
            headers.insert(name, value);
        }

        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

        let wsse = HeaderValue::from_str(&self.signer.header_value())
            .map_err(|e| Error::invalid_value("credentials", e.to_string()))?;
        headers.insert(WSSE_HEADER, wsse);

        *http_request.body_mut() = request.body.clone().map(reqwest::Body::from);

        Ok(http_request)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("signer", &self.signer)
            .field("retry", &self.retry)
            .field("staging", &self.staging)
            .finish_non_exhaustive()
    }
}
