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

use crate::{RequestSigner, SigningAlgorithm, StaticCredentialProvider};
use edgesign_core::time::DateTime;
use edgesign_core::{
    Context, Error, ErrorKind, ProvideCredential, Result, SignRequest, SigningCredential,
    SigningMethod,
};
use http::request::Parts;

/// Everything needed to sign one request.
///
/// A config is built for a single operation around the credential snapshot
/// of that operation and dropped afterwards.
#[derive(Debug)]
pub struct SigningConfig {
    /// Signing algorithm.
    pub algorithm: SigningAlgorithm,
    /// Where the signature is placed.
    pub method: SigningMethod,
    /// Provider of the credential snapshot.
    pub provider: StaticCredentialProvider,
    /// Region, or region set for [`SigningAlgorithm::V4Asymmetric`].
    pub region: String,
    /// Service name used in the credential scope.
    pub service: String,
    /// Fixed signing time, current time when absent.
    pub time: Option<DateTime>,
}

impl SigningConfig {
    /// Sign the request in place.
    ///
    /// Credential errors are returned as is, every other failure is reported
    /// as [`ErrorKind::SigningFailure`].
    pub async fn sign(&self, ctx: &Context, req: &mut Parts) -> Result<()> {
        self.sign_inner(ctx, req).await.map_err(|err| {
            if err.is_credential_error() || err.kind() == ErrorKind::SigningFailure {
                return err;
            }
            Error::signing_failure("failed to sign request")
                .with_source(err)
                .with_context(format!("service: {}", self.service))
        })
    }

    async fn sign_inner(&self, ctx: &Context, req: &mut Parts) -> Result<()> {
        let cred = self.provider.provide_credential(ctx).await?;
        let Some(cred) = cred.filter(|c| c.is_valid()) else {
            return Err(Error::credentials_unavailable(
                "credential for signing is empty or expired",
            ));
        };

        RequestSigner::new(&self.service, &self.region)
            .with_algorithm(self.algorithm)
            .with_time(self.time)
            .sign_request(ctx, req, Some(&cred), self.method)
            .await
    }
}
