//! Authentication module
//!
//! Builds the WSSE `UsernameToken` header the API requires on every request.
//!
//! The signer is deterministic for a given clock instant: the nonce generator
//! is reseeded from the instant's nanoseconds on every call. Production
//! signers additionally salt the seed with per-client entropy so two clients
//! signing in the same nanosecond still produce different nonces.

mod rng;
mod types;
mod wsse;

pub use rng::{LaggedFibonacci, RandomSource};
pub use types::{Clock, FixedClock, SystemClock, UsernameToken};
pub use wsse::{password_digest, sign, token, WsseSigner, HEADER_NAME, NONCE_LEN};

#[cfg(test)]
mod tests;
