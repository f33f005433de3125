// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! skiff CLI - deploy tooling for edge functions
//!
//! This is the main entry point for the skiff binary.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::{Cli, Commands};
use skiff::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute the command
    match &cli.command {
        Commands::Serve(args) => commands::serve::run(args, &cli).await,
        Commands::Bundle(args) => commands::bundle::run(args, &cli).await,
        Commands::Tokens(command) => commands::tokens::run(command, &cli).await,
        Commands::Version(args) => commands::version::run(args, &cli).await,
    }
}
