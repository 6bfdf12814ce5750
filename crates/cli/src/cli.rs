// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clap command-line surface. Grounded on `original_source/zonys/cli.py`'s
//! `click` group/command tree: one `zone` group and one `service` group
//! under a global `-n/--namespace` option, ported verb-for-verb.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "zonys", about = "Manage lightweight OS-level jail zones on CoW-FS", version)]
pub struct Cli {
    /// Root CoW-FS dataset of the namespace to operate on.
    #[arg(short = 'n', long = "namespace", env = "ZONYS_NAMESPACE", default_value = "zroot/zonys", global = true)]
    pub namespace: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage zones.
    #[command(subcommand)]
    Zone(ZoneCommand),
    /// Manage this namespace's host service registration.
    #[command(subcommand)]
    Service(ServiceCommand),
}

#[derive(Debug, Subcommand)]
pub enum ZoneCommand {
    /// Show the zone status table.
    Status,
    /// Create a new zone. ARGS are `--key value` pairs, or a single `-` to
    /// read a send-stream from stdin as `base`.
    Create {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create and start a new temporary zone.
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Create and start a new zone.
    Deploy {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Destroy and recreate a zone in place.
    Replace {
        identifier: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Undeploy a zone and deploy a new zone.
    Redeploy {
        identifier: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Stop and destroy a zone.
    Undeploy { identifier: String },
    /// Destroy a zone.
    Destroy { identifier: String },
    /// Start a zone.
    Start { identifier: String },
    /// Stop a zone.
    Stop { identifier: String },
    /// Stop and start a zone.
    Restart { identifier: String },
    /// Start a zone if it is not running.
    Up { identifier: String },
    /// Stop a zone if it is running.
    Down { identifier: String },
    /// Stop a zone if running, then start it.
    Reup { identifier: String },
    /// Send a zone's snapshot to a destination path, or stdout if omitted.
    Send {
        #[arg(short = 'd', long = "destination")]
        destination: Option<String>,
        /// Compress the send-stream.
        #[arg(long)]
        compress: bool,
        identifier: String,
    },
    /// Print the filesystem path of a zone.
    Path { identifier: String },
    /// Start an interactive console inside a zone's jail.
    Console { identifier: String },
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// Register the namespace as a host service.
    Enable,
    /// Unregister the namespace as a host service.
    Disable,
    /// Start the service for the given namespaces (default: this one).
    Start { namespaces: Vec<String> },
    /// Stop the service for the given namespaces.
    Stop { namespaces: Vec<String> },
    /// Restart the service for the given namespaces.
    Restart { namespaces: Vec<String> },
    /// Show service status.
    Status,
}
