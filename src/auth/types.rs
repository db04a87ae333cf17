//! Auth types
//!
//! The clock abstraction the signer reads time from, and the parsed form of
//! an `X-WSSE` header value.

use super::wsse::password_digest;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Clock
// ============================================================================

/// Source of the current instant
///
/// Injected so tests can pin the timestamp (and with it the nonce seed).
pub trait Clock: Send + Sync {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Utc> + Send + Sync,
{
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

// ============================================================================
// UsernameToken
// ============================================================================

const TOKEN_PREFIX: &str = "UsernameToken ";

/// The four fields of a WSSE `UsernameToken`
///
/// `Display` renders the exact header value; `FromStr` parses it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameToken {
    /// API user name
    pub username: String,
    /// base64 of the lowercase hex SHA-1 digest
    pub password_digest: String,
    /// 36 ASCII letters
    pub nonce: String,
    /// RFC 3339 timestamp, second precision
    pub created: String,
}

impl UsernameToken {
    /// Recompute the digest with `secret` and compare
    pub fn verify(&self, secret: &str) -> bool {
        password_digest(&self.nonce, &self.created, secret) == self.password_digest
    }
}

impl fmt::Display for UsernameToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{TOKEN_PREFIX}Username={},PasswordDigest={},Nonce={},Created={}",
            Quoted(&self.username),
            Quoted(&self.password_digest),
            Quoted(&self.nonce),
            Quoted(&self.created),
        )
    }
}

impl FromStr for UsernameToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut rest = s
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| Error::invalid_value("X-WSSE", "missing UsernameToken prefix"))?;

        let mut fields = [String::new(), String::new(), String::new(), String::new()];
        let names = ["Username", "PasswordDigest", "Nonce", "Created"];

        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                rest = rest
                    .strip_prefix(',')
                    .ok_or_else(|| Error::invalid_value("X-WSSE", "expected ','"))?;
            }
            rest = rest
                .strip_prefix(name)
                .and_then(|r| r.strip_prefix('='))
                .ok_or_else(|| Error::invalid_value("X-WSSE", format!("expected {name}=")))?;

            let (value, remaining) = unquote(rest)?;
            fields[i] = value;
            rest = remaining;
        }

        if !rest.is_empty() {
            return Err(Error::invalid_value("X-WSSE", "trailing characters"));
        }

        let [username, password_digest, nonce, created] = fields;
        Ok(Self {
            username,
            password_digest,
            nonce,
            created,
        })
    }
}

/// Double-quoted rendering with `\` and `"` escaped
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

/// Read one quoted value from the front of `s`, returning it and the remainder
fn unquote(s: &str) -> Result<(String, &str)> {
    let body = s
        .strip_prefix('"')
        .ok_or_else(|| Error::invalid_value("X-WSSE", "expected opening quote"))?;

    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &body[i + 1..])),
            '\\' => match chars.next() {
                Some((_, escaped)) => value.push(escaped),
                None => break,
            },
            c => value.push(c),
        }
    }

    Err(Error::invalid_value("X-WSSE", "unterminated quoted value"))
}
