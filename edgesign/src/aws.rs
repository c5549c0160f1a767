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

//! AWS support with convenience APIs
//!
//! This module re-exports the edge signer and event bus along with
//! constructors wired to the default context.

pub use edgesign_aws::*;

#[cfg(feature = "default-context")]
use crate::default_context;

/// Create an edge signer with standard configuration
///
/// This function creates a signer with:
/// - Default context (reqwest HTTP client, OS environment)
/// - [`Config`] loaded from `AWS_API_HOST`
/// - Default credential provider (reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`
///   and `AWS_SESSION_TOKEN` on every sign)
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> edgesign_core::Result<()> {
/// use edgesign::aws::{default_edge_signer, RequestDescriptor};
///
/// let signer = default_edge_signer();
/// let mut req = RequestDescriptor::new("POST", "/slack/events", "");
/// signer.sign(&mut req, "{}").await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_edge_signer() -> EdgeSigner {
    let ctx = default_context();
    let config = Config::default().from_env(&ctx);
    EdgeSigner::new(ctx, config, DefaultCredentialProvider::new())
}

/// Create an event bus with standard configuration
///
/// Bus name and region are loaded from `AWS_EVENT_BUS_NAME` and
/// `AWS_EVENT_BUS_REGION`, events are sent with an [`EventBridgeClient`].
///
/// # Example
///
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> edgesign_core::Result<()> {
/// use edgesign::aws::default_event_bus;
///
/// let bus = default_event_bus().with_name("slack");
/// let mut entry = edgesign::aws::EventEntry::new();
/// entry.insert("DetailType".to_string(), "POST /slack/events".into());
/// entry.insert("Detail".to_string(), "{}".into());
/// bus.publish(entry).await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_event_bus() -> EventBus {
    let ctx = default_context();
    let config = Config::default().from_env(&ctx);
    let client = EventBridgeClient::new(DefaultCredentialProvider::new());
    EventBus::new(ctx, &config, client)
}
