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

use crate::constants::{AWS_API_HOST, AWS_EVENT_BUS_NAME, AWS_EVENT_BUS_REGION};
use edgesign_core::{Context, Error, Result};

/// Default API host used when `AWS_API_HOST` is not set.
pub const DEFAULT_API_HOST: &str = "localhost";
/// Default event bus name used when `AWS_EVENT_BUS_NAME` is not set.
pub const DEFAULT_EVENT_BUS_NAME: &str = "default";
/// Default event bus region used when `AWS_EVENT_BUS_REGION` is not set.
pub const DEFAULT_EVENT_BUS_REGION: &str = "us-east-1";

/// Process-wide configuration shared by the edge signer and the event bus.
///
/// Resolve it once at startup with [`Config::from_env`] and pass it into the
/// component constructors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Hostname of the API gateway every signed request targets.
    ///
    /// Loaded from env `AWS_API_HOST`.
    pub api_host: String,
    /// Name of the event bus events are published to.
    ///
    /// Loaded from env `AWS_EVENT_BUS_NAME`.
    pub event_bus_name: String,
    /// Region of the event bus.
    ///
    /// Loaded from env `AWS_EVENT_BUS_REGION`.
    pub event_bus_region: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            event_bus_name: DEFAULT_EVENT_BUS_NAME.to_string(),
            event_bus_region: DEFAULT_EVENT_BUS_REGION.to_string(),
        }
    }
}

impl Config {
    /// Load config from env, falling back to the current values.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        let envs = ctx.env_vars();

        if let Some(v) = envs.get(AWS_API_HOST).filter(|v| !v.is_empty()) {
            self.api_host = v.clone();
        }
        if let Some(v) = envs.get(AWS_EVENT_BUS_NAME).filter(|v| !v.is_empty()) {
            self.event_bus_name = v.clone();
        }
        if let Some(v) = envs.get(AWS_EVENT_BUS_REGION).filter(|v| !v.is_empty()) {
            self.event_bus_region = v.clone();
        }

        self
    }

    /// Set the API host.
    pub fn with_api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Set the event bus name.
    pub fn with_event_bus_name(mut self, name: impl Into<String>) -> Self {
        self.event_bus_name = name.into();
        self
    }

    /// Set the event bus region.
    pub fn with_event_bus_region(mut self, region: impl Into<String>) -> Self {
        self.event_bus_region = region.into();
        self
    }

    /// Check that the api host can be used as an URI authority.
    pub fn validate_api_host(&self) -> Result<()> {
        if self.api_host.is_empty() {
            return Err(Error::config_invalid("api host must not be empty"));
        }
        self.api_host
            .parse::<http::uri::Authority>()
            .map_err(|e| {
                Error::config_invalid("api host is not a valid authority")
                    .with_source(e)
                    .with_context(format!("api_host: {}", self.api_host))
            })?;

        Ok(())
    }
}
