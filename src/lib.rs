// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]

//! # Emarsys API client
//!
//! An authenticated client for the Emarsys REST API: WSSE request signing,
//! response envelope decoding and a retrying request executor.
//!
//! ## Features
//!
//! - **WSSE Signing**: Fresh `X-WSSE` header per attempt, reproducible under a fixed clock
//! - **Envelope Decoding**: `replyCode`/`replyText`/`data` unwrapped into your own types
//! - **Retries**: Non-200 responses retried with jittered exponential backoff
//! - **Pluggable Transport**: reqwest by default, any [`http::Transport`] in tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use emarsys_client::{Client, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ClientConfig::builder()
//!         .credentials("my-user", "my-secret")
//!         .build();
//!     let client = Client::new(config)?;
//!
//!     let settings: serde_json::Value = client.get("settings").await?;
//!     println!("{settings}");
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Client::execute(request)                │
//! │        attempt loop bounded by RetryPolicy                │
//! └───────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────────┬──────────┴─────────┬───────────────────┐
//! │       Auth       │      Transport     │      Decode       │
//! ├──────────────────┼────────────────────┼───────────────────┤
//! │ WsseSigner       │ reqwest (rustls)   │ Envelope          │
//! │ LaggedFibonacci  │ custom doubles     │ success / ApiError│
//! │ Clock            │                    │ malformed         │
//! └──────────────────┴────────────────────┴───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// WSSE request signing
pub mod auth;

/// HTTP client with retry and backoff
pub mod http;

/// Response envelope decoding
pub mod decode;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ApiError, Error, Result};
pub use types::*;

// Re-export commonly used types
pub use auth::{UsernameToken, WsseSigner};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use http::{ApiRequest, Client, RetryPolicy, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
