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
use crate::{edge_signer, static_context, ACCESS_KEY_ID, API_HOST, SECRET_ACCESS_KEY};
use edgesign_aws::{generate_signing_key, RequestDescriptor};
use edgesign_core::hash::{hex_sha256, EMPTY_STRING_SHA256};
use edgesign_core::Result;
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};
use pretty_assertions::assert_eq;

fn verify(string_to_sign: &str, signature: &str) {
    let key = generate_signing_key(ACCESS_KEY_ID, SECRET_ACCESS_KEY).expect("key must derive");
    let signature = Signature::from_der(&hex::decode(signature).expect("signature must be hex"))
        .expect("signature must be DER");
    VerifyingKey::from(&key)
        .verify(string_to_sign.as_bytes(), &signature)
        .expect("signature must verify");
}

fn string_to_sign(canonical_request: &str) -> String {
    format!(
        "AWS4-ECDSA-P256-SHA256\n20240501T083000Z\n20240501/execute-api/aws4_request\n{}",
        hex_sha256(canonical_request.as_bytes())
    )
}

#[tokio::test]
async fn test_get_end_to_end() -> Result<()> {
    let ctx = static_context(None);
    let mut req = RequestDescriptor::new("GET", "/v1/items", "limit=10&q=hello%20world");

    edge_signer(&ctx).sign(&mut req, "").await?;

    let names: Vec<&str> = req.headers.iter().map(|(k, _)| k).collect();
    assert_eq!(
        names,
        vec!["authorization", "host", "x-amz-date", "x-amz-region-set"]
    );
    assert_eq!(
        req.headers.first("authorization").map(|v| v.split(", Signature=").next()),
        Some(Some(
            "AWS4-ECDSA-P256-SHA256 Credential=AKIDEXAMPLE/20240501/execute-api/aws4_request, \
             SignedHeaders=host;x-amz-date;x-amz-region-set"
        ))
    );

    let canonical_request = format!(
        "GET\n/v1/items\nlimit=10&q=hello%20world\n\
         host:{API_HOST}\nx-amz-date:20240501T083000Z\nx-amz-region-set:*\n\n\
         host;x-amz-date;x-amz-region-set\n{EMPTY_STRING_SHA256}"
    );
    verify(&string_to_sign(&canonical_request), &signature_of(&req));
    Ok(())
}

#[tokio::test]
async fn test_post_with_session_token_verifies() -> Result<()> {
    let ctx = static_context(Some("session-token"));
    let body = "{\"type\":\"event_callback\"}";
    let mut req = RequestDescriptor::new("POST", "/slack/./events", "")
        .with_header("content-type", "application/json");

    edge_signer(&ctx).sign(&mut req, body).await?;

    // content-type is a caller header, only the rebuilt request is signed.
    let canonical_request = format!(
        "POST\n/slack/events\n\n\
         content-length:{}\nhost:{API_HOST}\nx-amz-date:20240501T083000Z\n\
         x-amz-region-set:*\nx-amz-security-token:session-token\n\n\
         content-length;host;x-amz-date;x-amz-region-set;x-amz-security-token\n{}",
        body.len(),
        hex_sha256(body.as_bytes())
    );
    verify(&string_to_sign(&canonical_request), &signature_of(&req));
    assert_eq!(req.headers.first("content-type"), Some("application/json"));
    Ok(())
}
