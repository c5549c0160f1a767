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

//! Sign edge requests for multi-region API gateways and publish events.
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> edgesign::Result<()> {
//! use edgesign::aws::{default_edge_signer, RequestDescriptor};
//!
//! let signer = default_edge_signer();
//! let mut req = RequestDescriptor::new("GET", "/v1/items", "limit=10");
//! signer.sign(&mut req, "").await?;
//! # Ok(())
//! # }
//! ```

pub use edgesign_core::*;

#[cfg(feature = "default-context")]
mod context;
#[cfg(feature = "default-context")]
pub use context::{default_context, DefaultContext};

pub mod aws;
