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

use super::types::ErrorResponse;
use crate::canonical::CanonicalRequest;
use crate::constants::X_AMZ_TARGET;
use crate::{
    Credential, PutEventsInput, PutEventsOutput, SigningAlgorithm, SigningConfig,
    StaticCredentialProvider,
};
use async_trait::async_trait;
use edgesign_core::time::DateTime;
use edgesign_core::{
    Context, Error, ProvideCredential, Result, SigningCredential, SigningMethod,
};
use http::{header, HeaderName, Method};
use log::debug;
use std::fmt::Debug;
use std::sync::Arc;

const EVENTS_SERVICE: &str = "events";
const PUT_EVENTS_TARGET: &str = "AWSEvents.PutEvents";
const AMZ_JSON_1_1: &str = "application/x-amz-json-1.1";

/// PutEvents is the seam between the event bus and the managed bus API.
#[async_trait]
pub trait PutEvents: Debug + Send + Sync + 'static {
    /// Put a batch of events to the bus in `region`.
    async fn put_events(
        &self,
        ctx: &Context,
        region: &str,
        input: PutEventsInput,
    ) -> Result<PutEventsOutput>;
}

#[async_trait]
impl<T: PutEvents + ?Sized> PutEvents for Arc<T> {
    async fn put_events(
        &self,
        ctx: &Context,
        region: &str,
        input: PutEventsInput,
    ) -> Result<PutEventsOutput> {
        self.as_ref().put_events(ctx, region, input).await
    }
}

/// EventBridgeClient calls `PutEvents` over the JSON protocol.
///
/// Requests are sent to `https://events.{region}.amazonaws.com/` with
/// [`Context::http_send`] and signed with SigV4.
#[derive(Debug, Clone)]
pub struct EventBridgeClient {
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,
    endpoint: Option<String>,

    time: Option<DateTime>,
}

impl EventBridgeClient {
    /// Create a new client resolving credentials from `provider` on every call.
    pub fn new(provider: impl ProvideCredential<Credential = Credential>) -> Self {
        Self {
            provider: Arc::new(provider),
            endpoint: None,
            time: None,
        }
    }

    /// Send requests to this host instead of the regional endpoint.
    pub fn with_endpoint(mut self, host: impl Into<String>) -> Self {
        self.endpoint = Some(host.into());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    fn host(&self, region: &str) -> String {
        match &self.endpoint {
            Some(host) => host.clone(),
            None => format!("events.{region}.amazonaws.com"),
        }
    }
}

#[async_trait]
impl PutEvents for EventBridgeClient {
    async fn put_events(
        &self,
        ctx: &Context,
        region: &str,
        input: PutEventsInput,
    ) -> Result<PutEventsOutput> {
        let host = self.host(region);
        let body = serde_json::to_vec(&input)?;

        let (mut parts, body) = CanonicalRequest::new(Method::POST, &host, "/")
            .with_header(header::CONTENT_TYPE, AMZ_JSON_1_1)
            .with_header(HeaderName::from_static(X_AMZ_TARGET), PUT_EVENTS_TARGET)
            .with_body(body)
            .build()?;

        let cred = self
            .provider
            .provide_credential(ctx)
            .await
            .map_err(|e| {
                Error::credentials_unavailable("failed to resolve credential").with_source(e)
            })?
            .filter(|c| c.is_valid())
            .ok_or_else(|| Error::credentials_unavailable("no usable credential available"))?;

        SigningConfig {
            algorithm: SigningAlgorithm::V4,
            method: SigningMethod::Header,
            provider: StaticCredentialProvider::from(cred),
            region: region.to_string(),
            service: EVENTS_SERVICE.to_string(),
            time: self.time,
        }
        .sign(ctx, &mut parts)
        .await?;

        let resp = ctx
            .http_send(http::Request::from_parts(parts, body))
            .await
            .map_err(|e| {
                let retryable = e.is_retryable();
                Error::publish_failure("failed to send PutEvents request")
                    .with_source(e)
                    .with_context(format!("host: {host}"))
                    .set_retryable(retryable)
            })?;

        let status = resp.status();
        debug!("PutEvents responded with status {status}");
        if !status.is_success() {
            let err: ErrorResponse = serde_json::from_slice(resp.body()).unwrap_or_default();
            let throttled = err.code().is_some_and(|c| c.starts_with("Throttling"));
            let mut e = Error::publish_failure(format!(
                "PutEvents failed: {}",
                err.message.as_deref().unwrap_or("unknown error")
            ))
            .with_context(format!("status: {status}"))
            .set_retryable(throttled || status.is_server_error() || status.as_u16() == 429);
            if let Some(code) = err.code() {
                e = e.with_context(format!("code: {code}"));
            }
            return Err(e);
        }

        serde_json::from_slice(resp.body()).map_err(|e| {
            Error::publish_failure("failed to decode PutEvents response")
                .with_source(e)
                .with_context(format!("host: {host}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use edgesign_core::{ErrorKind, HttpSend};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct MockHttpSend {
        status: u16,
        body: &'static str,
        requests: Mutex<Vec<http::Request<Bytes>>>,
    }

    #[async_trait]
    impl HttpSend for MockHttpSend {
        async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
            self.requests.lock().unwrap().push(req);
            Ok(http::Response::builder()
                .status(self.status)
                .body(Bytes::from_static(self.body.as_bytes()))
                .unwrap())
        }
    }

    fn input() -> PutEventsInput {
        let entry = json!({"EventBusName": "default", "Source": "slack.com", "Detail": "{}"});
        PutEventsInput {
            entries: vec![entry.as_object().unwrap().clone()],
        }
    }

    #[tokio::test]
    async fn test_put_events_request() -> Result<()> {
        let http = Arc::new(MockHttpSend {
            status: 200,
            body: r#"{"FailedEntryCount":0,"Entries":[{"EventId":"id-1"}]}"#,
            requests: Mutex::new(Vec::new()),
        });
        let ctx = Context::new().with_http_send(http.clone());
        let client = EventBridgeClient::new(StaticCredentialProvider::new("ak", "sk"));

        let output = client.put_events(&ctx, "eu-west-1", input()).await?;
        assert_eq!(output.entries[0].event_id.as_deref(), Some("id-1"));

        let requests = http.requests.lock().unwrap();
        let req = &requests[0];
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri().to_string(), "https://events.eu-west-1.amazonaws.com/");
        assert_eq!(req.headers()[X_AMZ_TARGET], PUT_EVENTS_TARGET);
        assert_eq!(req.headers()[header::CONTENT_TYPE], AMZ_JSON_1_1);
        assert!(req.headers()[header::AUTHORIZATION]
            .to_str()
            .unwrap()
            .contains("/eu-west-1/events/aws4_request"));

        let sent: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
        assert_eq!(sent["Entries"][0]["Source"], "slack.com");
        Ok(())
    }

    #[tokio::test]
    async fn test_put_events_error_status() {
        let ctx = Context::new().with_http_send(MockHttpSend {
            status: 400,
            body: r#"{"__type":"ResourceNotFoundException","message":"Event bus missing does not exist."}"#,
            requests: Mutex::new(Vec::new()),
        });
        let client = EventBridgeClient::new(StaticCredentialProvider::new("ak", "sk"));

        let err = client
            .put_events(&ctx, "us-east-1", input())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PublishFailure);
        assert!(err.message().contains("does not exist"));
        assert!(err.context().contains(&"code: ResourceNotFoundException".to_string()));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_put_events_transport_error() {
        let client = EventBridgeClient::new(StaticCredentialProvider::new("ak", "sk"));

        let err = client
            .put_events(&Context::new(), "us-east-1", input())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PublishFailure);
    }
}
