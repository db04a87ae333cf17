//! Tests for the decode module

use super::*;
use crate::error::Error;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Setting {
    id: u32,
    name: String,
}

fn body(value: serde_json::Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&value).unwrap())
}

#[test]
fn test_decode_success() {
    let raw = body(json!({
        "replyCode": 0,
        "replyText": "OK",
        "data": {"id": 7, "name": "newsletter"}
    }));

    let setting: Setting = decode(200, raw).unwrap();
    assert_eq!(
        setting,
        Setting {
            id: 7,
            name: "newsletter".to_string()
        }
    );
}

#[test]
fn test_decode_success_into_value() {
    let raw = body(json!({"replyCode": 0, "replyText": "OK", "data": [1, 2, 3]}));
    let data: serde_json::Value = decode(200, raw).unwrap();
    assert_eq!(data, json!([1, 2, 3]));
}

#[test]
fn test_decode_reply_code_on_200() {
    let raw = body(json!({
        "replyCode": 1003,
        "replyText": "Invalid field value",
        "data": ""
    }));

    let err = decode::<Setting>(200, raw.clone()).unwrap_err();
    match &err {
        Error::Api(api) => {
            assert_eq!(api.status, 200);
            assert_eq!(api.reply_code, 1003);
            assert_eq!(api.reply_text, "Invalid field value");
            assert_eq!(api.body, raw);
            assert!(api.has_data());
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(!err.is_retryable());
}

#[test]
fn test_decode_error_status_keeps_body() {
    let raw = body(json!({"replyCode": 2004, "replyText": "Bad request"}));

    let err = decode::<Setting>(400, raw.clone()).unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.reply_code(), Some(2004));
    assert_eq!(err.body(), Some(&raw));
    assert!(err.is_retryable());

    let Error::Api(api) = err else {
        panic!("expected Api error");
    };
    assert!(!api.has_data());
}

#[test]
fn test_decode_error_status_with_zero_reply_code() {
    let raw = body(json!({"replyCode": 0, "replyText": "OK", "data": {"id": 1, "name": "x"}}));
    let err = decode::<Setting>(503, raw).unwrap_err();
    assert!(matches!(err, Error::Api(ref api) if api.status == 503 && api.reply_code == 0));
}

#[test]
fn test_decode_malformed_on_200_is_permanent() {
    let raw = Bytes::from_static(b"<html>gateway</html>");

    let err = decode::<Setting>(200, raw.clone()).unwrap_err();
    assert!(matches!(err, Error::EnvelopeDecode { status: 200, .. }));
    assert_eq!(err.body(), Some(&raw));
    assert!(!err.is_retryable());
}

#[test]
fn test_decode_malformed_on_error_status_is_retryable() {
    let raw = Bytes::from_static(b"Service Unavailable");

    let err = decode::<Setting>(503, raw.clone()).unwrap_err();
    assert!(matches!(err, Error::EnvelopeDecode { status: 503, .. }));
    assert_eq!(err.body(), Some(&raw));
    assert!(err.is_retryable());
}

#[test]
fn test_decode_missing_reply_code_is_malformed() {
    let raw = body(json!({"replyText": "OK", "data": {}}));
    let err = decode::<serde_json::Value>(200, raw).unwrap_err();
    assert!(matches!(err, Error::EnvelopeDecode { .. }));
}

#[test]
fn test_decode_payload_mismatch() {
    let raw = body(json!({"replyCode": 0, "replyText": "OK", "data": {"id": "seven"}}));

    let err = decode::<Setting>(200, raw.clone()).unwrap_err();
    assert!(matches!(err, Error::PayloadDecode { status: 200, .. }));
    assert_eq!(err.body(), Some(&raw));
    assert!(!err.is_retryable());
}

#[test]
fn test_decode_missing_data_is_null() {
    let raw = body(json!({"replyCode": 0, "replyText": "OK"}));
    let unit: Option<Setting> = decode(200, raw.clone()).unwrap();
    assert_eq!(unit, None);

    let err = decode::<Setting>(200, raw).unwrap_err();
    assert!(matches!(err, Error::PayloadDecode { .. }));
}

#[test]
fn test_decode_ignores_status_field_in_body() {
    let raw = body(json!({
        "httpStatusCode": 500,
        "replyCode": 0,
        "replyText": "OK",
        "data": {"id": 1, "name": "a"}
    }));
    let setting: Setting = decode(200, raw).unwrap();
    assert_eq!(setting.id, 1);
}

#[test]
fn test_envelope_payload() {
    let envelope =
        Envelope::from_slice(br#"{"replyCode":0,"replyText":"OK","data":{"id":3,"name":"c"}}"#)
            .unwrap();
    assert!(envelope.is_success());
    assert_eq!(envelope.reply_text, "OK");
    assert_eq!(envelope.payload::<Setting>().unwrap().name, "c");

    let envelope = Envelope::from_slice(br#"{"replyCode":1}"#).unwrap();
    assert!(!envelope.is_success());
    assert_eq!(envelope.reply_text, "");
    assert!(envelope.data.is_none());
}
