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

mod client;
pub use client::{EventBridgeClient, PutEvents};

mod types;
pub use types::{EventEntry, PutEventsInput, PutEventsOutput, PutEventsResultEntry};

use crate::Config;
use edgesign_core::{Context, Error, Result};
use log::info;
use serde_json::Value;
use std::sync::Arc;

/// Source attached to every published event.
pub const EVENT_SOURCE: &str = "slack.com";

/// EventBus publishes events to one named bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    ctx: Context,
    client: Arc<dyn PutEvents>,
    name: String,
    region: String,
}

impl EventBus {
    /// Create an event bus with name and region from `config`.
    pub fn new(ctx: Context, config: &Config, client: impl PutEvents) -> Self {
        Self {
            ctx,
            client: Arc::new(client),
            name: config.event_bus_name.clone(),
            region: config.event_bus_region.clone(),
        }
    }

    /// Override the bus name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the bus region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Name of the bus.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region of the bus.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Publish one event.
    ///
    /// `EventBusName` and `Source` are filled in before `entry`, so fields of
    /// `entry` win. The bus output is returned as is, including per entry
    /// failures.
    pub async fn publish(&self, entry: EventEntry) -> Result<PutEventsOutput> {
        if self.name.is_empty() || self.region.is_empty() {
            return Err(Error::config_invalid(
                "event bus name and region must not be empty",
            ));
        }

        let mut event = EventEntry::new();
        event.insert("EventBusName".to_string(), Value::from(self.name.as_str()));
        event.insert("Source".to_string(), Value::from(EVENT_SOURCE));
        event.extend(entry);

        let input = PutEventsInput {
            entries: vec![event],
        };
        info!("events:PutEvents {}", serde_json::to_string(&input)?);

        self.client.put_events(&self.ctx, &self.region, input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct MockPutEvents {
        calls: Mutex<Vec<(String, PutEventsInput)>>,
    }

    #[async_trait]
    impl PutEvents for MockPutEvents {
        async fn put_events(
            &self,
            _: &Context,
            region: &str,
            input: PutEventsInput,
        ) -> Result<PutEventsOutput> {
            self.calls
                .lock()
                .unwrap()
                .push((region.to_string(), input));
            Ok(PutEventsOutput {
                failed_entry_count: 0,
                entries: vec![PutEventsResultEntry {
                    event_id: Some("id-1".to_string()),
                    ..Default::default()
                }],
            })
        }
    }

    fn entry(v: Value) -> EventEntry {
        v.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_publish_merges_entry() -> Result<()> {
        let client = Arc::new(MockPutEvents::default());
        let bus = EventBus::new(Context::new(), &Config::default(), client.clone())
            .with_name("slack")
            .with_region("eu-west-1");

        let output = bus
            .publish(entry(json!({"DetailType": "POST /events", "Detail": "{}"})))
            .await?;
        assert_eq!(output.entries[0].event_id.as_deref(), Some("id-1"));

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (region, input) = &calls[0];
        assert_eq!(region, "eu-west-1");
        assert_eq!(
            input.entries,
            vec![entry(json!({
                "EventBusName": "slack",
                "Source": "slack.com",
                "DetailType": "POST /events",
                "Detail": "{}"
            }))]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_entry_fields_win() -> Result<()> {
        let client = Arc::new(MockPutEvents::default());
        let bus = EventBus::new(Context::new(), &Config::default(), client.clone());
        assert_eq!(bus.name(), "default");
        assert_eq!(bus.region(), "us-east-1");

        bus.publish(entry(json!({"Source": "custom", "Detail": "{}"})))
            .await?;

        let calls = client.calls.lock().unwrap();
        let event = &calls[0].1.entries[0];
        assert_eq!(event["Source"], "custom");
        assert_eq!(event["EventBusName"], "default");
        Ok(())
    }

    #[tokio::test]
    async fn test_publish_without_bus_name() {
        let client = Arc::new(MockPutEvents::default());
        let bus = EventBus::new(Context::new(), &Config::default(), client.clone()).with_name("");

        let err = bus
            .publish(entry(json!({"Detail": "{}"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), edgesign_core::ErrorKind::ConfigInvalid);
        assert!(client.calls.lock().unwrap().is_empty());
    }
}
