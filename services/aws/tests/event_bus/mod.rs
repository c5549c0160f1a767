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

use crate::{fixed_time, static_context};
use async_trait::async_trait;
use bytes::Bytes;
use edgesign_aws::{Config, EnvCredentialProvider, EventBridgeClient, EventBus, EventEntry};
use edgesign_core::{ErrorKind, HttpSend, Result};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Records requests and answers with a fixed response.
#[derive(Debug)]
struct RecordingHttpSend {
    status: u16,
    body: &'static str,
    requests: Mutex<Vec<http::Request<Bytes>>>,
}

impl RecordingHttpSend {
    fn new(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl HttpSend for RecordingHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.requests.lock().unwrap().push(req);
        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from_static(self.body.as_bytes()))
            .unwrap())
    }
}

fn event_bus(http: Arc<RecordingHttpSend>) -> EventBus {
    let ctx = static_context(Some("session-token")).with_http_send(http);
    let config = Config::default().from_env(&ctx);
    let client = EventBridgeClient::new(EnvCredentialProvider::new()).with_time(fixed_time());
    EventBus::new(ctx, &config, client)
}

fn entry(v: Value) -> EventEntry {
    v.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_publish_sends_one_entry_batch() -> Result<()> {
    let http = RecordingHttpSend::new(
        200,
        r#"{"FailedEntryCount":0,"Entries":[{"EventId":"11710aed-b79e-4468-a20b-bb3c0c3b4860"}]}"#,
    );
    let bus = event_bus(http.clone());

    let output = bus
        .publish(entry(json!({
            "DetailType": "POST /slack/events",
            "Detail": "{\"type\":\"event_callback\"}"
        })))
        .await?;
    assert_eq!(output.failed_entry_count, 0);
    assert_eq!(
        output.entries[0].event_id.as_deref(),
        Some("11710aed-b79e-4468-a20b-bb3c0c3b4860")
    );

    let requests = http.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.uri().host(), Some("events.eu-west-1.amazonaws.com"));
    assert_eq!(req.headers()["x-amz-target"], "AWSEvents.PutEvents");
    assert_eq!(req.headers()["x-amz-security-token"], "session-token");
    assert!(req.headers()["authorization"]
        .to_str()
        .unwrap()
        .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/eu-west-1/events/aws4_request"));

    let sent: Value = serde_json::from_slice(req.body()).unwrap();
    assert_eq!(
        sent,
        json!({"Entries": [{
            "EventBusName": "slack",
            "Source": "slack.com",
            "DetailType": "POST /slack/events",
            "Detail": "{\"type\":\"event_callback\"}"
        }]})
    );
    Ok(())
}

#[tokio::test]
async fn test_partial_failure_is_returned_unmodified() -> Result<()> {
    let http = RecordingHttpSend::new(
        200,
        r#"{"FailedEntryCount":1,"Entries":[{"ErrorCode":"InternalFailure","ErrorMessage":"try again"}]}"#,
    );

    let output = event_bus(http).publish(entry(json!({"Detail": "{}"}))).await?;

    assert_eq!(output.failed_entry_count, 1);
    assert_eq!(output.entries[0].error_code.as_deref(), Some("InternalFailure"));
    assert_eq!(output.entries[0].error_message.as_deref(), Some("try again"));
    Ok(())
}

#[tokio::test]
async fn test_throttled_publish_is_retryable() {
    let http = RecordingHttpSend::new(
        400,
        r#"{"__type":"ThrottlingException","message":"Rate exceeded"}"#,
    );

    let err = event_bus(http.clone())
        .with_region("us-west-2")
        .publish(entry(json!({"Detail": "{}"})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PublishFailure);
    assert!(err.message().contains("Rate exceeded"));
    assert!(err.is_retryable());
    assert_eq!(
        http.requests.lock().unwrap()[0].uri().host(),
        Some("events.us-west-2.amazonaws.com")
    );
}

#[tokio::test]
async fn test_undecodable_response() {
    let http = RecordingHttpSend::new(200, "not json");

    let err = event_bus(http)
        .publish(entry(json!({"Detail": "{}"})))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PublishFailure);
}
