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

use crate::canonical::{parse_query, CanonicalRequest};
use crate::constants::{EXECUTE_API, REGION_WILDCARD};
use crate::{
    BodyDescriptor, Config, Credential, RequestDescriptor, SigningAlgorithm, SigningConfig,
    StaticCredentialProvider,
};
use edgesign_core::time::DateTime;
use edgesign_core::{
    Context, Error, ProvideCredential, Result, SigningCredential, SigningMethod,
};
use log::debug;
use std::sync::Arc;

/// EdgeSigner signs edge requests for a region agnostic API gateway.
///
/// Requests are signed with SigV4A for service `execute-api` and region set
/// `*`, so one signature is accepted by every regional deployment behind
/// the gateway host.
///
/// ```no_run
/// use edgesign_aws::{Config, DefaultCredentialProvider, EdgeSigner, RequestDescriptor};
/// use edgesign_core::{Context, OsEnv};
///
/// # async fn example() -> edgesign_core::Result<()> {
/// let ctx = Context::new().with_env(OsEnv);
/// let config = Config::default().from_env(&ctx);
/// let signer = EdgeSigner::new(ctx, config, DefaultCredentialProvider::new());
///
/// let mut req = RequestDescriptor::new("GET", "/v1/items", "limit=10");
/// signer.sign(&mut req, "").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EdgeSigner {
    ctx: Context,
    config: Arc<Config>,
    provider: Arc<dyn ProvideCredential<Credential = Credential>>,

    time: Option<DateTime>,
}

impl EdgeSigner {
    /// Create a new edge signer.
    pub fn new(
        ctx: Context,
        config: Config,
        provider: impl ProvideCredential<Credential = Credential>,
    ) -> Self {
        Self {
            ctx,
            config: Arc::new(config),
            provider: Arc::new(provider),

            time: None,
        }
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

    /// Config used by this signer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign the request in place.
    ///
    /// On success every header of the signed request is written into
    /// `request.headers` and the body is replaced by `body` as text. On error
    /// `request` is left untouched.
    pub async fn sign(&self, request: &mut RequestDescriptor, body: &str) -> Result<()> {
        self.config.validate_api_host()?;
        request.validate()?;
        let method = request.http_method()?;

        let (mut parts, _) =
            CanonicalRequest::new(method, &self.config.api_host, &request.uri)
                .with_params(parse_query(&request.querystring))
                .with_body(body.to_string())
                .build()?;

        let cred = self
            .provider
            .provide_credential(&self.ctx)
            .await
            .map_err(|e| {
                Error::credentials_unavailable("failed to resolve credential").with_source(e)
            })?
            .filter(|c| c.is_valid())
            .ok_or_else(|| Error::credentials_unavailable("no usable credential available"))?;

        let config = SigningConfig {
            algorithm: SigningAlgorithm::V4Asymmetric,
            method: SigningMethod::Header,
            provider: StaticCredentialProvider::from(cred),
            region: REGION_WILDCARD.to_string(),
            service: EXECUTE_API.to_string(),
            time: self.time,
        };
        config.sign(&self.ctx, &mut parts).await?;

        let mut signed = Vec::with_capacity(parts.headers.len());
        for (name, value) in parts.headers.iter() {
            let value = value.to_str().map_err(|e| {
                Error::signing_failure("signed header is not visible ascii")
                    .with_source(e)
                    .with_context(format!("header: {name}"))
            })?;
            signed.push((name.as_str(), value));
        }

        for (name, value) in signed {
            request.headers.insert(name, value);
        }
        request.body = Some(BodyDescriptor::replace_text(body));
        debug!(
            "signed edge request {} {} for {}",
            request.method, request.uri, self.config.api_host
        );

        Ok(())
    }
}
