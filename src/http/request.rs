//! Prepared API requests
//!
//! An [`ApiRequest`] is everything the caller decides about a call. It is
//! turned into a fresh `reqwest::Request` for every attempt so each one gets
//! its own signature.

use crate::error::Result;
use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use std::collections::HashMap;

/// Method, path, query, headers and body of one API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API base (`/api/v2`), or an absolute URL
    pub path: String,
    /// Query parameters in order
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: HashMap<String, String>,
    /// Serialized JSON body
    pub body: Option<Bytes>,
}

impl ApiRequest {
    /// Create a request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Use pre-serialized JSON as the body
    #[must_use]
    pub fn raw_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}
