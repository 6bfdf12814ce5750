// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `zonys`: the CLI binary. Parses argv, opens the namespace named by
//! `-n/--namespace` (default `zroot/zonys`, overridable via
//! `ZONYS_NAMESPACE`), dispatches to the `zone`/`service` command modules,
//! and is the sole place that calls `std::process::exit`.

mod args;
mod cli;
mod commands;
mod exit_error;

use clap::Parser;
use cli::{Cli, Command};
use exit_error::ExitError;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zonys_adapters::command::SystemCommandRunner;
use zonys_core::{FileSystemIdentifier, Result};
use zonys_engine::Namespace;

fn init_logging() {
    let filter = EnvFilter::try_from_env("ZONYS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(cli: Cli) -> Result<()> {
    let identifier = FileSystemIdentifier::parse(&cli.namespace)?;
    let runner = Arc::new(SystemCommandRunner);
    let mut namespace = Namespace::open(runner, identifier)?;

    match cli.command {
        Command::Zone(zone_command) => {
            let span = tracing::info_span!("zone_command", namespace = %cli.namespace);
            let _enter = span.enter();
            commands::zone::run(&mut namespace, zone_command)
        }
        Command::Service(service_command) => {
            let span = tracing::info_span!("service_command", namespace = %cli.namespace);
            let _enter = span.enter();
            commands::service::run(&namespace, service_command)
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        let exit_error: ExitError = err.into();
        eprintln!("error: {exit_error}");
        std::process::exit(exit_error.code);
    }
}
