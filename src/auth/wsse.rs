//! WSSE `UsernameToken` signing
//!
//! Every request carries a header of the form
//!
//! ```text
//! X-WSSE: UsernameToken Username="<user>",PasswordDigest="<digest>",Nonce="<nonce>",Created="<timestamp>"
//! ```
//!
//! where the digest is `base64(hex(sha1(nonce ++ created ++ secret)))`. The
//! header is time-bound, so it is rebuilt for every attempt.

use super::rng::{LaggedFibonacci, RandomSource};
use super::types::{Clock, SystemClock, UsernameToken};
use crate::types::Credentials;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use sha1::{Digest, Sha1};
use std::sync::Arc;

/// Header carrying the signed token
pub const HEADER_NAME: &str = "X-WSSE";

/// Number of letters in a nonce
pub const NONCE_LEN: usize = 36;

const NONCE_ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Build a signed header value
///
/// `rng` is reseeded from `now` before the nonce is drawn, so a fixed
/// instant always yields the same header.
pub fn sign<R>(identity: &str, secret: &str, now: DateTime<Utc>, rng: &mut R) -> String
where
    R: RandomSource + ?Sized,
{
    token(identity, secret, now, rng).to_string()
}

/// Like [`sign`], returning the structured token
pub fn token<R>(identity: &str, secret: &str, now: DateTime<Utc>, rng: &mut R) -> UsernameToken
where
    R: RandomSource + ?Sized,
{
    rng.reseed(unix_nanos(now));

    let created = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let nonce = nonce(rng);
    let password_digest = password_digest(&nonce, &created, secret);

    UsernameToken {
        username: identity.to_string(),
        password_digest,
        nonce,
        created,
    }
}

/// `base64(lowercase_hex(sha1(nonce ++ created ++ secret)))`
pub fn password_digest(nonce: &str, created: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce.as_bytes());
    hasher.update(created.as_bytes());
    hasher.update(secret.as_bytes());
    let hashed = hex::encode(hasher.finalize());

    base64::engine::general_purpose::STANDARD.encode(hashed.as_bytes())
}

fn nonce<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    (0..NONCE_LEN)
        .map(|_| {
            let idx = rng.next_i63() % NONCE_ALPHABET.len() as i64;
            NONCE_ALPHABET[idx as usize] as char
        })
        .collect()
}

fn unix_nanos(now: DateTime<Utc>) -> i64 {
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().wrapping_mul(1_000))
}

/// Per-client signer
///
/// Holds the credentials and clock, and creates a private generator for
/// each call so concurrent callers never share random state.
#[derive(Clone)]
pub struct WsseSigner {
    credentials: Credentials,
    clock: Arc<dyn Clock>,
    salt: i64,
}

impl WsseSigner {
    /// Signer on the wall clock, salted from the thread RNG
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            clock: Arc::new(SystemClock),
            salt: rand::random(),
        }
    }

    /// Signer on an injected clock with no salt
    ///
    /// Output depends only on the clock, credentials and call time.
    pub fn with_clock(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials,
            clock,
            salt: 0,
        }
    }

    /// Override the seed salt
    #[must_use]
    pub fn salt(mut self, salt: i64) -> Self {
        self.salt = salt;
        self
    }

    /// The identity sent as `Username`
    pub fn identity(&self) -> &str {
        &self.credentials.identity
    }

    /// Fresh header value for the current instant
    pub fn header_value(&self) -> String {
        self.token().to_string()
    }

    /// Fresh token for the current instant
    pub fn token(&self) -> UsernameToken {
        let now = self.clock.now();
        let mut rng = LaggedFibonacci::salted(0, self.salt);
        token(
            &self.credentials.identity,
            &self.credentials.secret,
            now,
            &mut rng,
        )
    }
}

impl std::fmt::Debug for WsseSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsseSigner")
            .field("credentials", &self.credentials)
            .field("salted", &(self.salt != 0))
            .finish_non_exhaustive()
    }
}
