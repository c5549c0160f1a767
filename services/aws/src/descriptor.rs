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

//! Request descriptor in the shape a CDN edge function receives it.

use edgesign_core::hash::base64_decode;
use edgesign_core::{Error, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Request seen by an edge function.
///
/// Fields the signer does not know about (`clientIp`, `origin`, ...) are kept
/// in `extra` and written back on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Request path, starting with `/`.
    pub uri: String,
    /// Raw querystring without the leading `?`, possibly empty.
    #[serde(default)]
    pub querystring: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Headers,
    /// Request body, absent when the distribution does not expose it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyDescriptor>,
    /// Unknown fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RequestDescriptor {
    /// Create a descriptor without headers or body.
    pub fn new(method: &str, uri: &str, querystring: &str) -> Self {
        Self {
            method: method.to_string(),
            uri: uri.to_string(),
            querystring: querystring.to_string(),
            headers: Headers::default(),
            body: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Set a header, replacing existing values.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Parse the method as an HTTP verb.
    pub fn http_method(&self) -> Result<Method> {
        Method::from_str(&self.method).map_err(|e| {
            Error::malformed_request("request method is not a valid http method")
                .with_source(e)
                .with_context(format!("method: {}", self.method))
        })
    }

    /// Check the fields the signer relies on.
    pub fn validate(&self) -> Result<()> {
        self.http_method()?;
        if !self.uri.starts_with('/') {
            return Err(Error::malformed_request("request uri must start with '/'")
                .with_context(format!("uri: {}", self.uri)));
        }
        Ok(())
    }
}

/// One header value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header name.
    pub key: String,
    /// Header value.
    pub value: String,
}

/// Headers keyed by lowercase name, each holding its ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<HeaderEntry>>")]
pub struct Headers(BTreeMap<String, Vec<HeaderEntry>>);

impl From<BTreeMap<String, Vec<HeaderEntry>>> for Headers {
    fn from(map: BTreeMap<String, Vec<HeaderEntry>>) -> Self {
        let mut headers = Headers::default();
        for (name, entries) in map {
            headers
                .0
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(entries);
        }
        headers
    }
}

impl Headers {
    /// Get all values of the header.
    pub fn get(&self, name: &str) -> Option<&[HeaderEntry]> {
        self.0.get(&name.to_ascii_lowercase()).map(|v| v.as_slice())
    }

    /// Get the first value of the header.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|v| v.first())
            .map(|e| e.value.as_str())
    }

    /// Replace the header with one `{key, value}` entry, key lowercased.
    pub fn insert(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        self.0.insert(
            key.clone(),
            vec![HeaderEntry {
                key,
                value: value.to_string(),
            }],
        );
    }

    /// Append a value to the header.
    pub fn append(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        self.0.entry(key.clone()).or_default().push(HeaderEntry {
            key,
            value: value.to_string(),
        });
    }

    /// Remove the header.
    pub fn remove(&mut self, name: &str) -> Option<Vec<HeaderEntry>> {
        self.0.remove(&name.to_ascii_lowercase())
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there is no header.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate headers by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[HeaderEntry])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// What the CDN does with the body after the function returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyAction {
    /// Forward the original body.
    ReadOnly,
    /// Forward `data` instead of the original body.
    Replace,
}

/// Encoding of `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyEncoding {
    /// Base64 encoded bytes.
    Base64,
    /// Plain text.
    Text,
}

/// Body of a [`RequestDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    /// Body action.
    pub action: BodyAction,
    /// Body encoding.
    pub encoding: BodyEncoding,
    /// Body payload.
    pub data: String,
    /// Set when the CDN truncated the body it exposed.
    #[serde(rename = "inputTruncated", default)]
    pub input_truncated: bool,
}

impl BodyDescriptor {
    /// Body that replaces the original one with `data` as text.
    pub fn replace_text(data: &str) -> Self {
        Self {
            action: BodyAction::Replace,
            encoding: BodyEncoding::Text,
            data: data.to_string(),
            input_truncated: false,
        }
    }

    /// Decode `data` into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        match self.encoding {
            BodyEncoding::Text => Ok(self.data.as_bytes().to_vec()),
            BodyEncoding::Base64 => base64_decode(&self.data),
        }
    }
}
