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

use crate::constants::AWS_QUERY_ENCODE_SET;
use crate::PayloadHash;
use bytes::Bytes;
use edgesign_core::{Error, Result};
use http::request::Parts;
use http::{header, HeaderName, HeaderValue, Method};
use percent_encoding::utf8_percent_encode;

/// Parse a raw querystring into decoded pairs.
///
/// Duplicated keys collapse into one pair holding the last value, placed
/// where the key first appeared. Blank values are kept.
pub fn parse_query(querystring: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (k, v) in form_urlencoded::parse(querystring.trim_start_matches('?').as_bytes()) {
        match pairs.iter_mut().find(|(key, _)| key.as_str() == k) {
            Some(pair) => pair.1 = v.into_owned(),
            None => pairs.push((k.into_owned(), v.into_owned())),
        }
    }
    pairs
}

/// Builder of the request that gets signed.
///
/// The built request carries the `host` header, the `content-length` header
/// for methods other than GET, HEAD and OPTIONS, and the [`PayloadHash`] of the body
/// in its extensions.
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    method: Method,
    host: String,
    path: String,
    params: Vec<(String, String)>,
    headers: Vec<(HeaderName, String)>,
    body: Bytes,
}

impl CanonicalRequest {
    /// Create a request for `https://{host}{path}`.
    pub fn new(method: Method, host: &str, path: &str) -> Self {
        Self {
            method,
            host: host.to_string(),
            path: path.to_string(),
            params: Vec::new(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Set decoded query params.
    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    /// Add an extra header.
    pub fn with_header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the request parts and the body to send with them.
    pub fn build(self) -> Result<(Parts, Bytes)> {
        if !self.path.starts_with('/') {
            return Err(Error::malformed_request("request path must start with '/'")
                .with_context(format!("path: {}", self.path)));
        }

        let mut url = format!("https://{}{}", self.host, self.path);
        if !self.params.is_empty() {
            url.push('?');
            for (idx, (k, v)) in self.params.iter().enumerate() {
                if idx != 0 {
                    url.push('&');
                }
                url.push_str(&utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string());
                url.push('=');
                url.push_str(&utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string());
            }
        }

        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(url)
            .header(header::HOST, self.host.as_str());
        for (name, value) in self.headers {
            builder = builder.header(name, HeaderValue::from_str(&value)?);
        }
        if !is_bodyless(&self.method) {
            builder = builder.header(header::CONTENT_LENGTH, self.body.len());
        }

        let (mut parts, _) = builder.body(())?.into_parts();
        parts.extensions.insert(PayloadHash::of(&self.body));

        Ok((parts, self.body))
    }
}

fn is_bodyless(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}
