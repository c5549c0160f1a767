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

use edgesign::aws::{default_edge_signer, default_event_bus, RequestDescriptor};
use edgesign::Result;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Request as received by the edge function.
    let mut req: RequestDescriptor = serde_json::from_value(json!({
        "clientIp": "203.0.113.178",
        "method": "POST",
        "uri": "/slack/events",
        "querystring": "",
        "headers": {
            "host": [{"key": "Host", "value": "d111111abcdef8.cloudfront.net"}],
            "content-type": [{"key": "Content-Type", "value": "application/json"}]
        },
        "body": {
            "action": "read-only",
            "data": "eyJ0eXBlIjoidXJsX3ZlcmlmaWNhdGlvbiJ9",
            "encoding": "base64",
            "inputTruncated": false
        }
    }))?;

    let body = match &req.body {
        Some(b) => String::from_utf8(b.decode()?)?,
        None => String::new(),
    };

    // Sign the request for the API gateway.
    let signer = default_edge_signer();
    signer.sign(&mut req, &body).await?;
    println!("{}", serde_json::to_string_pretty(&req)?);

    // Publish the request as an event.
    if std::env::var("EDGESIGN_PUBLISH").ok().as_deref() == Some("on") {
        let entry = json!({
            "DetailType": format!("{} {}", req.method, req.uri),
            "Detail": body,
        });
        let output = default_event_bus()
            .publish(entry.as_object().cloned().unwrap_or_default())
            .await?;
        println!("failed entries: {}", output.failed_entry_count);
    }

    Ok(())
}
