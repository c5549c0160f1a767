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

use bytes::Bytes;
use edgesign_aws::{Config, DefaultCredentialProvider, EdgeSigner, RequestDescriptor};
use edgesign_core::{Context, OsEnv, Result};
use edgesign_http_send_reqwest::ReqwestHttpSend;
use log::{debug, warn};
use std::env;

/// Context against a real gateway, configured through `AWS_*` envs.
fn init_live_test() -> Option<(Context, EdgeSigner, String)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("EDGESIGN_AWS_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::default());
    let config = Config::default().from_env(&ctx);
    let path = env::var("EDGESIGN_AWS_PATH").unwrap_or_else(|_| "/".to_string());
    let signer = EdgeSigner::new(ctx.clone(), config, DefaultCredentialProvider::new());

    Some((ctx, signer, path))
}

#[tokio::test]
async fn test_gateway_accepts_signature() -> Result<()> {
    let Some((ctx, signer, path)) = init_live_test() else {
        warn!("EDGESIGN_AWS_TEST is not set, skipped");
        return Ok(());
    };

    let mut req = RequestDescriptor::new("GET", &path, "");
    signer.sign(&mut req, "").await?;

    let mut builder = http::Request::builder()
        .method(req.method.as_str())
        .uri(format!("https://{}{}", signer.config().api_host, req.uri));
    for (name, entries) in req.headers.iter() {
        for entry in entries {
            builder = builder.header(name, entry.value.as_str());
        }
    }
    let resp = ctx.http_send(builder.body(Bytes::new())?).await?;
    debug!("gateway responded: {:?}", resp.body());

    // A rejected signature is answered with 403 before reaching the integration.
    assert_ne!(resp.status(), http::StatusCode::FORBIDDEN);
    Ok(())
}
