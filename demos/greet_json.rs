// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! JSON edge function: greets whoever the query string names.
//!
//! ```bash
//! cargo run --example greet-json
//! curl 'http://127.0.0.1:8000/?name=river'
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::header::{self, HeaderValue};
use hyper::{Request, Response};

use skiff::runtime::{serve, Handler, ServeOptions};

struct GreetJson;

fn name_from_query(query: Option<&str>) -> &str {
    query
        .and_then(|q| {
            q.split('&')
                .find_map(|pair| pair.strip_prefix("name="))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or("world")
}

#[async_trait]
impl Handler for GreetJson {
    async fn handle(&self, request: Request<Incoming>) -> Response<Full<Bytes>> {
        let name = name_from_query(request.uri().query());
        let body = serde_json::json!({ "greeting": format!("hello, {name}") });

        let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serve(&ServeOptions::default(), Arc::new(GreetJson)).await?;
    Ok(())
}
