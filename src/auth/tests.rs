//! Tests for the auth module

use super::*;
use crate::types::Credentials;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use test_case::test_case;

fn feb_6() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 2, 6, 0, 0, 0).unwrap()
}

fn fixed_signer(identity: &str, secret: &str, at: DateTime<Utc>) -> WsseSigner {
    WsseSigner::with_clock(Credentials::new(identity, secret), Arc::new(FixedClock(at)))
}

#[test]
fn test_sign_known_vector() {
    let mut rng = LaggedFibonacci::new(0);
    let header = sign("userX", "passY", feb_6(), &mut rng);

    let token: UsernameToken = header.parse().unwrap();
    assert_eq!(
        token,
        UsernameToken {
            username: "userX".to_string(),
            password_digest: "NGE4MWNkMWUwZDVjYjlhNjVkOWMzODk3ZGRmNGMwODlmYWMzMWMwNg=="
                .to_string(),
            nonce: "VqRNlECxJcvmZpKDdXKpZNoXZeNZLAJbSZiP".to_string(),
            created: "2023-02-06T00:00:00Z".to_string(),
        }
    );
}

#[test]
fn test_sign_exact_header_string() {
    let header = fixed_signer("userX", "passY", feb_6()).header_value();
    assert_eq!(
        header,
        "UsernameToken Username=\"userX\",\
         PasswordDigest=\"NGE4MWNkMWUwZDVjYjlhNjVkOWMzODk3ZGRmNGMwODlmYWMzMWMwNg==\",\
         Nonce=\"VqRNlECxJcvmZpKDdXKpZNoXZeNZLAJbSZiP\",\
         Created=\"2023-02-06T00:00:00Z\""
    );
}

#[test]
fn test_sign_subsecond_instant() {
    // Nanoseconds feed the seed but are dropped from the timestamp
    let at = Utc
        .with_ymd_and_hms(2024, 5, 17, 12, 34, 56)
        .unwrap()
        .checked_add_signed(chrono::Duration::nanoseconds(123_456_789))
        .unwrap();
    let token = fixed_signer("api_user", "s3cr3t", at).token();

    assert_eq!(token.created, "2024-05-17T12:34:56Z");
    assert_eq!(token.nonce, "KqOHXSBhEsGkjiZKRxsnLlogElLVvRkREqBj");
    assert_eq!(
        token.password_digest,
        "ZWU4ZDAwNTNmODQ4YmRmZGE1NzZmMWZmODdmMGIwNjQ0YjQxMGFmNA=="
    );
}

#[test]
fn test_sign_is_deterministic_for_fixed_clock() {
    let signer = fixed_signer("userX", "passY", feb_6());
    assert_eq!(signer.header_value(), signer.header_value());

    // The previous state of the generator does not matter
    let mut used = LaggedFibonacci::new(99);
    for _ in 0..1000 {
        used.next_i63();
    }
    assert_eq!(
        sign("userX", "passY", feb_6(), &mut used),
        signer.header_value()
    );
}

#[test]
fn test_salt_changes_nonce_not_format() {
    let plain = fixed_signer("userX", "passY", feb_6()).token();
    let salted = fixed_signer("userX", "passY", feb_6()).salt(42).token();

    assert_ne!(plain.nonce, salted.nonce);
    assert_eq!(plain.created, salted.created);
    assert!(salted.verify("passY"));
}

#[test]
fn test_production_signers_differ() {
    let a = WsseSigner::new(Credentials::new("u", "s"));
    let b = WsseSigner::new(Credentials::new("u", "s"));
    // Salts come from the thread RNG; a collision across 64 bits is not a concern
    assert_ne!(a.token().nonce, b.token().nonce);
}

#[test_case(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap() ; "epoch")]
#[test_case(Utc.with_ymd_and_hms(2023, 2, 6, 0, 0, 0).unwrap() ; "known vector day")]
#[test_case(Utc.with_ymd_and_hms(2031, 12, 31, 23, 59, 59).unwrap() ; "future")]
#[test_case(Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 40).unwrap() ; "before epoch")]
fn test_nonce_shape(at: DateTime<Utc>) {
    let token = fixed_signer("user", "secret", at).token();

    assert_eq!(token.nonce.len(), NONCE_LEN);
    assert!(token.nonce.bytes().all(|b| b.is_ascii_alphabetic()));
}

#[test_case("" ; "empty secret")]
#[test_case("passY" ; "short secret")]
#[test_case("a much longer shared secret with spaces and ünïcödé" ; "long secret")]
fn test_password_digest_is_base64_hex(secret: &str) {
    let token = fixed_signer("user", secret, feb_6()).token();

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(&token.password_digest)
        .unwrap();
    let hex = String::from_utf8(decoded).unwrap();

    assert_eq!(hex.len(), 40);
    assert!(hex
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    assert!(token.verify(secret));
}

#[test]
fn test_verify_rejects_wrong_secret() {
    let token = fixed_signer("userX", "passY", feb_6()).token();
    assert!(token.verify("passY"));
    assert!(!token.verify("passZ"));
}

#[test]
fn test_password_digest_concatenation_order() {
    use sha1::{Digest, Sha1};

    let expected = hex::encode(Sha1::digest(b"nonce2023-02-06T00:00:00Zsecret"));
    let expected = base64::engine::general_purpose::STANDARD.encode(expected);
    assert_eq!(
        password_digest("nonce", "2023-02-06T00:00:00Z", "secret"),
        expected
    );
}

#[test]
fn test_concurrent_signing_is_not_torn() {
    let signer = Arc::new(fixed_signer("userX", "passY", feb_6()));
    let expected = signer.header_value();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let signer = Arc::clone(&signer);
            std::thread::spawn(move || {
                (0..200)
                    .map(|_| signer.header_value())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for header in handle.join().unwrap() {
            assert_eq!(header, expected);
        }
    }
}

#[test]
fn test_signer_tracks_clock() {
    use std::sync::atomic::{AtomicI64, Ordering};

    let seconds = Arc::new(AtomicI64::new(feb_6().timestamp()));
    let ticks = Arc::clone(&seconds);
    let clock = move || {
        Utc.timestamp_opt(ticks.fetch_add(1, Ordering::SeqCst), 0)
            .unwrap()
    };
    let signer = WsseSigner::with_clock(Credentials::new("u", "s"), Arc::new(clock));

    let first = signer.token();
    let second = signer.token();
    assert_eq!(first.created, "2023-02-06T00:00:00Z");
    assert_eq!(second.created, "2023-02-06T00:00:01Z");
    assert_ne!(first.nonce, second.nonce);
}

#[test]
fn test_signer_debug_hides_secret() {
    let signer = fixed_signer("userX", "passY", feb_6());
    let debug = format!("{signer:?}");
    assert!(debug.contains("WsseSigner"));
    assert!(!debug.contains("passY"));
    assert_eq!(signer.identity(), "userX");
}
