// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for skiff.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// skiff - deploy tooling for edge functions
#[derive(Parser, Debug)]
#[command(name = "skiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve a directory of static assets through the local handler loop
    Serve(ServeArgs),

    /// Bundle an entrypoint and its relative imports into a single file
    Bundle(BundleArgs),

    /// Manage the stored access token
    #[command(subcommand)]
    Tokens(TokensCommand),

    /// Print the CLI version, optionally checking release metadata
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory to serve
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,

    /// Log filesystem changes under the served directory
    #[arg(long)]
    pub watch: bool,
}

#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Entrypoint module
    #[arg(value_name = "ENTRYPOINT")]
    pub entrypoint: PathBuf,

    /// Output file (defaults to `<entrypoint stem>.bundle.js`)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum TokensCommand {
    /// Store an access token
    Set(SetTokenArgs),

    /// Print the stored access token
    Get,

    /// Delete the stored access token
    #[command(alias = "rm")]
    Remove,
}

#[derive(Args, Debug)]
pub struct SetTokenArgs {
    /// The token value
    #[arg(value_name = "TOKEN")]
    pub token: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Release metadata file (JSONC with a top-level "version" field)
    #[arg(long, value_name = "FILE")]
    pub check: Option<PathBuf>,
}
