//! Common types used throughout the client
//!
//! This module contains shared type definitions and type aliases used
//! across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Credentials
// ============================================================================

/// API user name and shared secret
///
/// The secret never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// API user name (sent as `Username`)
    pub identity: String,
    /// Shared secret mixed into the password digest
    pub secret: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
