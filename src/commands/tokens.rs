// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Tokens command implementation.

use owo_colors::OwoColorize;

use skiff::error::Result;
use skiff::token_store;

use crate::cli::{Cli, TokensCommand};

pub async fn run(command: &TokensCommand, cli: &Cli) -> Result<()> {
    let store = token_store::provider();

    match command {
        TokensCommand::Set(args) => {
            store.store(&args.token)?;
            if !cli.quiet {
                println!("{}", "Token stored".green());
            }
        }
        TokensCommand::Get => match store.get()? {
            // Print the bare token so it can be captured by scripts.
            Some(token) => println!("{token}"),
            None => {
                eprintln!("{}", "No token stored".yellow());
            }
        },
        TokensCommand::Remove => {
            store.remove()?;
            if !cli.quiet {
                println!("{}", "Token removed".green());
            }
        }
    }
    Ok(())
}
