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

//! AWS SigV4A edge signer and EventBridge publisher.
//!
//! This crate signs requests an edge function forwards to a region agnostic
//! API gateway, and publishes events to an EventBridge bus.
//!
//! ## Quick Start
//!
//! ```no_run
//! use edgesign_aws::{
//!     Config, DefaultCredentialProvider, EdgeSigner, EventBridgeClient, EventBus,
//!     RequestDescriptor,
//! };
//! use edgesign_core::{Context, OsEnv};
//! use serde_json::json;
//!
//! # async fn example() -> edgesign_core::Result<()> {
//! let ctx = Context::new().with_env(OsEnv);
//! let config = Config::default().from_env(&ctx);
//!
//! let signer = EdgeSigner::new(ctx.clone(), config.clone(), DefaultCredentialProvider::new());
//! let mut req = RequestDescriptor::new("POST", "/slack/events", "");
//! signer.sign(&mut req, "{\"type\":\"event_callback\"}").await?;
//!
//! let bus = EventBus::new(ctx, &config, EventBridgeClient::new(DefaultCredentialProvider::new()));
//! let entry = json!({"DetailType": "POST /slack/events", "Detail": "{}"});
//! bus.publish(entry.as_object().cloned().unwrap_or_default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Credential Sources
//!
//! - [`EnvCredentialProvider`]: `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`
//! - [`StaticCredentialProvider`]: fixed credentials
//! - [`ProvideCredentialChain`]: try providers in order
//! - [`DefaultCredentialProvider`]: the env provider wrapped in a chain

mod constants;
pub use constants::{EXECUTE_API, REGION_WILDCARD};

mod config;
pub use config::{Config, DEFAULT_API_HOST, DEFAULT_EVENT_BUS_NAME, DEFAULT_EVENT_BUS_REGION};

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::*;

mod key;
pub use key::generate_signing_key;

mod sign_request;
pub use sign_request::{PayloadHash, RequestSigner, SigningAlgorithm};

mod signing_config;
pub use signing_config::SigningConfig;

mod canonical;
pub use canonical::{parse_query, CanonicalRequest};

mod descriptor;
pub use descriptor::{
    BodyAction, BodyDescriptor, BodyEncoding, HeaderEntry, Headers, RequestDescriptor,
};

mod edge_signer;
pub use edge_signer::EdgeSigner;

mod event_bus;
pub use event_bus::{
    EventBridgeClient, EventBus, EventEntry, PutEvents, PutEventsInput, PutEventsOutput,
    PutEventsResultEntry, EVENT_SOURCE,
};
