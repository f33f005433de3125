// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Edge function with background work: a timer ticks once a second and
//! requests report the current count.
//!
//! ```bash
//! cargo run --example ticker
//! curl http://127.0.0.1:8000/
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::{Request, Response};

use skiff::runtime::{serve, Handler, ServeOptions};

struct Ticker {
    ticks: Arc<AtomicU64>,
}

#[async_trait]
impl Handler for Ticker {
    async fn handle(&self, _request: Request<Incoming>) -> Response<Full<Bytes>> {
        let count = self.ticks.load(Ordering::Relaxed);
        Response::new(Full::new(Bytes::from(format!("ticks: {count}\n"))))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ticks = Arc::new(AtomicU64::new(0));

    let background = Arc::clone(&ticks);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            let count = background.fetch_add(1, Ordering::Relaxed) + 1;
            if count % 10 == 0 {
                println!("still ticking: {count}");
            }
        }
    });

    serve(&ServeOptions::default(), Arc::new(Ticker { ticks })).await?;
    Ok(())
}
