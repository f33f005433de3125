// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! The smallest possible edge function: every request gets a greeting.
//!
//! ```bash
//! cargo run --example hello
//! curl http://127.0.0.1:8000/
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};

use skiff::runtime::{serve, Handler, ServeOptions};

struct Hello;

#[async_trait]
impl Handler for Hello {
    async fn handle(&self, _request: Request<Incoming>) -> Response<Full<Bytes>> {
        Response::new(Full::new(Bytes::from_static(b"Hello, World!\n")))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    serve(&ServeOptions::default(), Arc::new(Hello)).await?;
    Ok(())
}
