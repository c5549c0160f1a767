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

use crate::constants::{
    AWS4_ECDSA_P256_SHA256, AWS4_HMAC_SHA256, AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET,
    X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_REGION_SET, X_AMZ_SECURITY_TOKEN,
};
use crate::key::generate_signing_key;
use crate::Credential;
use async_trait::async_trait;
use edgesign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256, EMPTY_STRING_SHA256};
use edgesign_core::time::{format_date, format_iso8601, now, DateTime};
use edgesign_core::{Context, Error, Result, SignRequest, SigningMethod, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::Signature;
use percent_encoding::utf8_percent_encode;
use std::fmt::Write;

/// Signing algorithm of the AWS signature family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// `AWS4-HMAC-SHA256`: HMAC signature pinned to one region.
    V4,
    /// `AWS4-ECDSA-P256-SHA256`: ECDSA signature valid for a region set.
    V4Asymmetric,
}

impl SigningAlgorithm {
    /// Name of the algorithm as it appears in the authorization header.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::V4 => AWS4_HMAC_SHA256,
            SigningAlgorithm::V4Asymmetric => AWS4_ECDSA_P256_SHA256,
        }
    }
}

/// Hex encoded SHA256 of the body that will be sent with the request.
///
/// Stored in the request extensions by the canonical request builder. When
/// absent, the `x-amz-content-sha256` header is used, and then the hash of an
/// empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadHash(pub String);

impl PayloadHash {
    /// Hash the given body.
    pub fn of(body: &[u8]) -> Self {
        Self(hex_sha256(body))
    }
}

/// RequestSigner that implement AWS SigV4 and SigV4A.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
/// - [SigV4A](https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html#create-sigv4a-string-to-sign)
///
/// Paths are canonicalized with the rules of every service but S3: dot
/// segments are removed and the already encoded path is encoded once more.
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,
    algorithm: SigningAlgorithm,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new builder for AWS V4 signer.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            algorithm: SigningAlgorithm::V4,

            time: None,
        }
    }

    /// Create a new builder for AWS V4A signer.
    ///
    /// `region_set` is sent as `x-amz-region-set`, use `*` for every region.
    pub fn new_v4a(service: &str, region_set: &str) -> Self {
        Self::new(service, region_set).with_algorithm(SigningAlgorithm::V4Asymmetric)
    }

    /// Set the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: Option<DateTime>) -> Self {
        self.time = time;
        self
    }

    fn scope(&self, now: DateTime) -> String {
        match self.algorithm {
            // Scope: "20220313/<region>/<service>/aws4_request"
            SigningAlgorithm::V4 => format!(
                "{}/{}/{}/aws4_request",
                format_date(now),
                self.region,
                self.service
            ),
            // Scope: "20220313/<service>/aws4_request"
            SigningAlgorithm::V4Asymmetric => {
                format!("{}/{}/aws4_request", format_date(now), self.service)
            }
        }
    }

    fn calculate_signature(
        &self,
        cred: &Credential,
        now: DateTime,
        string_to_sign: &str,
    ) -> Result<String> {
        match self.algorithm {
            SigningAlgorithm::V4 => {
                let signing_key =
                    generate_v4_signing_key(&cred.secret_access_key, now, &self.region, &self.service);
                Ok(hex_hmac_sha256(&signing_key, string_to_sign.as_bytes()))
            }
            SigningAlgorithm::V4Asymmetric => {
                let signing_key =
                    generate_signing_key(&cred.access_key_id, &cred.secret_access_key)?;
                let signature: Signature = signing_key
                    .try_sign(string_to_sign.as_bytes())
                    .map_err(|e| Error::signing_failure("ECDSA signing failed").with_source(e))?;
                Ok(hex::encode(signature.to_der().as_bytes()))
            }
        }
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        credential: Option<&Self::Credential>,
        method: SigningMethod,
    ) -> Result<()> {
        let Some(cred) = credential else {
            return Ok(());
        };

        let now = self.time.unwrap_or_else(now);
        let payload_hash = payload_hash(req)?;
        let mut signed_req = SigningRequest::build(req)?;
        let scope = self.scope(now);
        debug!("calculated scope: {scope}");

        // canonicalize context
        canonicalize_header(&mut signed_req, cred, method, now, self.algorithm, &self.region)?;
        canonicalize_query(
            &mut signed_req,
            cred,
            method,
            now,
            self.algorithm,
            &self.region,
            &scope,
        );

        // build canonical request and string to sign.
        let creq = canonical_request_string(&signed_req, &payload_hash)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // StringToSign:
        //
        // AWS4-HMAC-SHA256 | AWS4-ECDSA-P256-SHA256
        // 20220313T072004Z
        // <scope>
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{}", self.algorithm.as_str())?;
            writeln!(f, "{}", format_iso8601(now))?;
            writeln!(f, "{}", &scope)?;
            write!(f, "{}", &encoded_req)?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signature = self.calculate_signature(cred, now, &string_to_sign)?;

        match method {
            SigningMethod::Query(_) => {
                signed_req.query_push("X-Amz-Signature", signature);
            }
            SigningMethod::Header => {
                let mut authorization = HeaderValue::from_str(&format!(
                    "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                    self.algorithm.as_str(),
                    cred.access_key_id,
                    scope,
                    signed_req.header_name_to_vec_sorted().join(";"),
                    signature
                ))
                .map_err(|e| {
                    Error::signing_failure("failed to create authorization header").with_source(e)
                })?;
                authorization.set_sensitive(true);

                signed_req
                    .headers
                    .insert(header::AUTHORIZATION, authorization);
            }
        }

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn payload_hash(req: &Parts) -> Result<String> {
    if let Some(v) = req.headers.get(X_AMZ_CONTENT_SHA_256) {
        return Ok(v.to_str()?.to_string());
    }
    if let Some(PayloadHash(v)) = req.extensions.get::<PayloadHash>() {
        return Ok(v.clone());
    }
    Ok(EMPTY_STRING_SHA256.to_string())
}

fn canonical_request_string(ctx: &SigningRequest, payload_hash: &str) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)?;
    // Insert encoded path
    writeln!(f, "{}", canonical_uri(&ctx.path))?;
    // Insert query, already encoded and sorted.
    writeln!(f, "{}", SigningRequest::query_to_string(&ctx.query))?;
    // Insert signed headers
    let signed_headers = ctx.header_name_to_vec_sorted();
    for name in signed_headers.iter() {
        let mut values = Vec::new();
        for value in ctx.headers.get_all(*name) {
            values.push(value.to_str()?);
        }
        writeln!(f, "{}:{}", name, values.join(","))?;
    }
    writeln!(f)?;
    writeln!(f, "{}", signed_headers.join(";"))?;
    write!(f, "{payload_hash}")?;

    Ok(f)
}

/// Normalize the path with RFC 3986 dot segment removal and encode it.
///
/// The input is the path as sent on the wire, so `%` gets encoded again.
fn canonical_uri(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let raw: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let last = raw.len() - 1;
    for (idx, segment) in raw.iter().enumerate() {
        match *segment {
            "." => {
                if idx == last {
                    segments.push("");
                }
            }
            ".." => {
                segments.pop();
                if idx == last {
                    segments.push("");
                }
            }
            s => segments.push(s),
        }
    }

    let normalized = format!("/{}", segments.join("/"));
    utf8_percent_encode(&normalized, &AWS_URI_ENCODE_SET).to_string()
}

fn canonicalize_header(
    ctx: &mut SigningRequest,
    cred: &Credential,
    method: SigningMethod,
    now: DateTime,
    algorithm: SigningAlgorithm,
    region: &str,
) -> Result<()> {
    // Signing an already signed request must not sign the old signature.
    ctx.headers.remove(header::AUTHORIZATION);

    // Header names and values need to be normalized according to Step 4 of https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers
            .insert(header::HOST, ctx.authority.as_str().parse()?);
    }

    if method == SigningMethod::Header {
        ctx.headers
            .insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

        if algorithm == SigningAlgorithm::V4Asymmetric {
            ctx.headers
                .insert(X_AMZ_REGION_SET, HeaderValue::from_str(region)?);
        }

        // Insert X_AMZ_SECURITY_TOKEN header if security token exists.
        if let Some(token) = &cred.session_token {
            let mut value = HeaderValue::from_str(token)?;
            // Set token value sensitive to valid leaking.
            value.set_sensitive(true);

            ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
        }
    }

    Ok(())
}

fn canonicalize_query(
    ctx: &mut SigningRequest,
    cred: &Credential,
    method: SigningMethod,
    now: DateTime,
    algorithm: SigningAlgorithm,
    region: &str,
    scope: &str,
) {
    if let SigningMethod::Query(expire) = method {
        ctx.query_push("X-Amz-Algorithm", algorithm.as_str());
        ctx.query_push(
            "X-Amz-Credential",
            format!("{}/{}", cred.access_key_id, scope),
        );
        ctx.query_push("X-Amz-Date", format_iso8601(now));
        ctx.query_push("X-Amz-Expires", expire.as_secs().to_string());
        if algorithm == SigningAlgorithm::V4Asymmetric {
            ctx.query_push("X-Amz-Region-Set", region);
        }
        let signed_headers = ctx.header_name_to_vec_sorted().join(";");
        ctx.query_push("X-Amz-SignedHeaders", signed_headers);

        if let Some(token) = &cred.session_token {
            ctx.query_push("X-Amz-Security-Token", token.as_str());
        }
    }

    let mut query: Vec<(String, String)> = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    // Sort by encoded param name, then value.
    query.sort();
    ctx.query = query;
}

fn generate_v4_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}
