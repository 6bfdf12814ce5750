// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `service` subcommand handlers — register/unregister this namespace with
//! the host's `rc.d` service manager and dispatch start/stop/restart/status
//! to it. Ported from `original_source/zonys/cli.py`'s `_service` group.

use crate::cli::ServiceCommand;
use zonys_core::Result;
use zonys_engine::Namespace;

pub fn run(namespace: &Namespace, command: ServiceCommand) -> Result<()> {
    let service = namespace.service();
    match command {
        ServiceCommand::Enable => service.enable(),
        ServiceCommand::Disable => service.disable(),
        ServiceCommand::Start { namespaces } => service.start(&namespaces),
        ServiceCommand::Stop { namespaces } => service.stop(&namespaces),
        ServiceCommand::Restart { namespaces } => service.restart(&namespaces),
        ServiceCommand::Status => {
            let output = service.status()?;
            print!("{}", String::from_utf8_lossy(&output));
            Ok(())
        }
    }
}
