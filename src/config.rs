//! Client configuration
//!
//! Configuration is assembled with [`ClientConfig::builder`] or read from the
//! environment with [`ClientConfig::from_env`]. Everything has a default
//! except the credentials.

use crate::auth::{Clock, FixedClock};
use crate::error::{Error, Result};
use crate::http::{default_user_agent, RetryPolicy, Transport, DEFAULT_TIMEOUT};
use crate::types::{BackoffType, Credentials};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Endpoints
// ============================================================================

/// Production API host
pub const PRODUCTION_URL: &str = "https://api.emarsys.net";

/// Hosted mock of the API
pub const MOCK_URL: &str = "https://stoplight.io/mocks/emarsys-sap/emarsys-api/182542";

/// Path prefix of every endpoint
pub const API_PATH_BASE: &str = "/api/v2";

// ============================================================================
// Environment variables
// ============================================================================

/// API user name
pub const ENV_USER: &str = "EMARSYS_USER";
/// API secret
pub const ENV_SECRET: &str = "EMARSYS_SECRET";
/// Base URL override
pub const ENV_BASE_URL: &str = "EMARSYS_BASE_URL";
/// Staging flag
pub const ENV_STAGING: &str = "EMARSYS_STAGING";

/// Configuration for [`Client`](crate::http::Client)
#[derive(Clone)]
pub struct ClientConfig {
    /// Scheme and host (optionally a path prefix) of the API
    pub base_url: String,
    /// User name and secret
    pub credentials: Option<Credentials>,
    /// Per-request timeout of the default transport
    pub timeout: Duration,
    /// User agent of the default transport
    pub user_agent: String,
    /// Retry and backoff
    pub retry: RetryPolicy,
    /// Marks traffic from non-production deployments
    pub staging: bool,
    /// Clock override, for tests
    pub clock: Option<Arc<dyn Clock>>,
    /// Transport override
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: PRODUCTION_URL.to_string(),
            credentials: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: default_user_agent(),
            retry: RetryPolicy::default(),
            staging: false,
            clock: None,
            transport: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read credentials, base URL and staging flag from the environment
    ///
    /// Uses `EMARSYS_USER`, `EMARSYS_SECRET`, `EMARSYS_BASE_URL` and
    /// `EMARSYS_STAGING`.
    pub fn from_env() -> Result<Self> {
        let identity =
            std::env::var(ENV_USER).map_err(|_| Error::missing_field(ENV_USER))?;
        let secret =
            std::env::var(ENV_SECRET).map_err(|_| Error::missing_field(ENV_SECRET))?;

        let mut builder = Self::builder()
            .credentials(identity, secret)
            .staging_from_env(ENV_STAGING);
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            builder = builder.base_url(url);
        }

        Ok(builder.build())
    }

    /// Credentials, or an error naming the missing field
    pub fn require_credentials(&self) -> Result<&Credentials> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::missing_field("credentials"))?;
        if credentials.identity.is_empty() {
            return Err(Error::invalid_value(
                "credentials",
                "identity must not be empty",
            ));
        }
        Ok(credentials)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("retry", &self.retry)
            .field("staging", &self.staging)
            .field("has_clock", &self.clock.is_some())
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Target the hosted mock instead of production
    pub fn mock(self) -> Self {
        self.base_url(MOCK_URL)
    }

    /// Set user name and secret
    pub fn credentials(mut self, identity: impl Into<String>, secret: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::new(identity, secret));
        self
    }

    /// Set the staging flag
    pub fn staging(mut self, staging: bool) -> Self {
        self.config.staging = staging;
        self
    }

    /// Set the staging flag from a boolean environment variable
    ///
    /// Unset or unparsable means not staging.
    pub fn staging_from_env(mut self, var: &str) -> Self {
        self.config.staging = std::env::var(var)
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Replace the retry policy
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.retry.backoff_type = backoff_type;
        self.config.retry.initial_interval = initial;
        self.config.retry.max_interval = max;
        self
    }

    /// Read time from `clock`
    ///
    /// Signatures become deterministic for a given instant; only use this in
    /// tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.config.clock = Some(clock);
        self
    }

    /// Freeze the clock at `at`
    pub fn fixed_time(self, at: DateTime<Utc>) -> Self {
        self.clock(Arc::new(FixedClock(at)))
    }

    /// Use a custom transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Boolean spellings accepted in environment variables
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
