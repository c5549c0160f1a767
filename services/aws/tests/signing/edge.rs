// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use super::signature_of;
use crate::{edge_signer, static_context, API_HOST};
use edgesign_aws::{BodyAction, BodyEncoding, RequestDescriptor};
use edgesign_core::{Context, ErrorKind, Result, StaticEnv};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn slack_request() -> RequestDescriptor {
    serde_json::from_value(json!({
        "clientIp": "203.0.113.178",
        "method": "POST",
        "uri": "/slack/events",
        "querystring": "",
        "headers": {
            "host": [{"key": "Host", "value": "d111111abcdef8.cloudfront.net"}],
            "x-slack-signature": [{"key": "X-Slack-Signature", "value": "v0=a2114d57b48eac39b9ad189dd8316235a7b4a8d21a10bd27519666489c69b503"}],
            "x-slack-request-timestamp": [{"key": "X-Slack-Request-Timestamp", "value": "1531420618"}]
        },
        "body": {
            "action": "read-only",
            "data": "eyJ0eXBlIjoidXJsX3ZlcmlmaWNhdGlvbiJ9",
            "encoding": "base64",
            "inputTruncated": false
        }
    }))
    .expect("valid edge request")
}

#[tokio::test]
async fn test_sign_is_deterministic() -> Result<()> {
    let ctx = static_context(Some("session-token"));
    let signer = edge_signer(&ctx);

    let mut a = slack_request();
    let mut b = slack_request();
    signer.sign(&mut a, "{\"type\":\"url_verification\"}").await?;
    signer.sign(&mut b, "{\"type\":\"url_verification\"}").await?;

    assert_eq!(a, b);
    Ok(())
}

#[tokio::test]
async fn test_headers_are_lowercase_without_duplicates() -> Result<()> {
    let ctx = static_context(Some("session-token"));
    let mut req = slack_request().with_header("X-Amz-Date", "19700101T000000Z");

    edge_signer(&ctx).sign(&mut req, "{}").await?;

    for (name, entries) in req.headers.iter() {
        assert_eq!(name, name.to_ascii_lowercase());
        assert_eq!(entries.len(), 1, "header {name} must have one value");
    }
    for name in [
        "authorization",
        "host",
        "content-length",
        "x-amz-date",
        "x-amz-region-set",
        "x-amz-security-token",
    ] {
        let entry = &req.headers.get(name).expect("signed header must be set")[0];
        assert_eq!(entry.key, name);
    }
    assert_eq!(req.headers.first("x-amz-date"), Some("20240501T083000Z"));
    assert_eq!(req.headers.first("x-amz-region-set"), Some("*"));
    assert_eq!(req.headers.first("x-amz-security-token"), Some("session-token"));
    Ok(())
}

#[tokio::test]
async fn test_caller_headers_are_preserved() -> Result<()> {
    let ctx = static_context(None);
    let mut req = slack_request();

    edge_signer(&ctx).sign(&mut req, "{}").await?;

    assert_eq!(req.headers.first("host"), Some(API_HOST));
    assert_eq!(req.headers.first("x-slack-request-timestamp"), Some("1531420618"));
    let signature = &req.headers.get("x-slack-signature").expect("must be kept")[0];
    assert_eq!(signature.key, "X-Slack-Signature");
    assert!(req.headers.get("x-amz-security-token").is_none());
    assert_eq!(req.extra["clientIp"], "203.0.113.178");
    Ok(())
}

#[tokio::test]
async fn test_body_is_replaced() -> Result<()> {
    let ctx = static_context(None);
    let mut req = slack_request();
    let body = "{\"type\":\"url_verification\",\"challenge\":\"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P\"}";

    edge_signer(&ctx).sign(&mut req, body).await?;

    let out = req.body.expect("body must be set");
    assert_eq!(out.action, BodyAction::Replace);
    assert_eq!(out.encoding, BodyEncoding::Text);
    assert_eq!(out.data, body);
    assert_eq!(req.headers.first("content-length"), Some(body.len().to_string().as_str()));
    Ok(())
}

#[test_case("a=1&a=2", "a=2"; "duplicated key")]
#[test_case("a=1&b=2&a=3", "a=3&b=2"; "duplicated key keeps first position")]
#[test_case("b=2&a=1", "a=1&b=2"; "order does not matter")]
#[tokio::test]
async fn test_querystring_last_key_wins(left: &str, right: &str) -> Result<()> {
    let ctx = static_context(None);
    let signer = edge_signer(&ctx);

    let mut a = RequestDescriptor::new("GET", "/v1/items", left);
    let mut b = RequestDescriptor::new("GET", "/v1/items", right);
    signer.sign(&mut a, "").await?;
    signer.sign(&mut b, "").await?;

    assert_eq!(signature_of(&a), signature_of(&b));
    Ok(())
}

#[tokio::test]
async fn test_query_is_signed() -> Result<()> {
    let ctx = static_context(None);
    let signer = edge_signer(&ctx);

    let mut a = RequestDescriptor::new("GET", "/v1/items", "limit=10");
    let mut b = RequestDescriptor::new("GET", "/v1/items", "limit=11");
    signer.sign(&mut a, "").await?;
    signer.sign(&mut b, "").await?;

    assert_ne!(signature_of(&a), signature_of(&b));
    Ok(())
}

#[tokio::test]
async fn test_missing_credential_leaves_descriptor_untouched() {
    let ctx = Context::new().with_env(StaticEnv::from_pairs([("AWS_API_HOST", API_HOST)]));
    let mut req = slack_request();
    let before = req.clone();

    let err = edge_signer(&ctx).sign(&mut req, "{}").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CredentialsUnavailable);
    assert_eq!(req, before);
}

#[test_case("G ET", "/"; "invalid method")]
#[test_case("GET", "items"; "relative uri")]
#[test_case("GET", ""; "empty uri")]
#[tokio::test]
async fn test_malformed_descriptor(method: &str, uri: &str) {
    let ctx = static_context(None);
    let mut req = RequestDescriptor::new(method, uri, "");
    let before = req.clone();

    let err = edge_signer(&ctx).sign(&mut req, "").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedRequest);
    assert_eq!(req, before);
}
