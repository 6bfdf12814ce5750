// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `zone` subcommand handlers. Ported verb-for-verb from
//! `original_source/zonys/cli.py`'s `_zone` group; each handler is a thin
//! wrapper that parses `--key value` args (where present) and calls
//! straight through to `zonys_engine::ZoneStore`/`Zone`.

use crate::args;
use crate::cli::ZoneCommand;
use std::io::Write;
use zonys_core::Result;
use zonys_engine::{Namespace, Zone};

fn status_row(zone: &Zone) -> Result<(String, String, String, String, &'static str)> {
    let base = match zone.parent()? {
        Some(parent) => format!("{}@initial", parent.display_identifier()),
        None => String::new(),
    };
    let snapshots = zone.snapshot_names()?.join(", ");
    let status = if zone.is_running()? { "Up" } else { "Down" };
    Ok((zone.uuid().to_string(), zone.name().unwrap_or_default(), base, snapshots, status))
}

pub fn run(namespace: &mut Namespace, command: ZoneCommand) -> Result<()> {
    match command {
        ZoneCommand::Status => {
            let mut rows = Vec::new();
            for zone in namespace.zone_store().list() {
                rows.push(status_row(zone)?);
            }
            print_status_table(&rows);
            Ok(())
        }
        ZoneCommand::Create { args } => {
            let spec = args::parse(&args)?;
            let zone = namespace.zone_store_mut().create(spec)?;
            println!("{}", zone.display_identifier());
            Ok(())
        }
        ZoneCommand::Run { args } => {
            let spec = args::parse(&args)?;
            let zone = namespace.zone_store_mut().run(spec)?;
            println!("{}", zone.display_identifier());
            Ok(())
        }
        ZoneCommand::Deploy { args } => {
            let spec = args::parse(&args)?;
            let zone = namespace.zone_store_mut().deploy(spec)?;
            println!("{}", zone.display_identifier());
            Ok(())
        }
        ZoneCommand::Replace { identifier, args } => {
            let spec = args::parse(&args)?;
            let zone = namespace.zone_store_mut().replace(&identifier, spec)?;
            println!("{}", zone.display_identifier());
            Ok(())
        }
        ZoneCommand::Redeploy { identifier, args } => {
            let spec = args::parse(&args)?;
            let zone = namespace.zone_store_mut().redeploy(&identifier, spec)?;
            println!("{}", zone.display_identifier());
            Ok(())
        }
        ZoneCommand::Undeploy { identifier } => namespace.zone_store_mut().undeploy(&identifier),
        ZoneCommand::Destroy { identifier } => namespace.zone_store_mut().destroy(&identifier),
        ZoneCommand::Start { identifier } => namespace.zone_store_mut().start(&identifier),
        ZoneCommand::Stop { identifier } => namespace.zone_store_mut().stop(&identifier),
        ZoneCommand::Restart { identifier } => namespace.zone_store_mut().restart(&identifier),
        ZoneCommand::Up { identifier } => namespace.zone_store_mut().up(&identifier),
        ZoneCommand::Down { identifier } => namespace.zone_store_mut().down(&identifier),
        ZoneCommand::Reup { identifier } => namespace.zone_store_mut().reup(&identifier),
        ZoneCommand::Send {
            destination,
            compress,
            identifier,
        } => match destination {
            Some(path) => {
                let mut file = std::fs::File::create(&path)?;
                namespace.zone_store().send(&identifier, &mut file, compress)
            }
            None => {
                let mut stdout = std::io::stdout();
                let result = namespace.zone_store().send(&identifier, &mut stdout, compress);
                let _ = stdout.flush();
                result
            }
        },
        ZoneCommand::Path { identifier } => {
            let zone = namespace.zone_store().match_one(&identifier)?;
            println!("{}", zone.path().display());
            Ok(())
        }
        ZoneCommand::Console { identifier } => {
            namespace.zone_store().console(&identifier)?;
            Ok(())
        }
    }
}

fn print_status_table(rows: &[(String, String, String, String, &'static str)]) {
    print!("{}", render_status_table(rows));
}

fn render_status_table(rows: &[(String, String, String, String, &'static str)]) -> String {
    let headers = ["UUID", "Name", "Base", "Snapshots", "Status"];
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        widths[0] = widths[0].max(row.0.len());
        widths[1] = widths[1].max(row.1.len());
        widths[2] = widths[2].max(row.2.len());
        widths[3] = widths[3].max(row.3.len());
        widths[4] = widths[4].max(row.4.len());
    }
    let mut out = String::new();
    out.push_str(&render_row(&[headers[0], headers[1], headers[2], headers[3], headers[4]], &widths));
    for row in rows {
        out.push_str(&render_row(&[&row.0, &row.1, &row.2, &row.3, row.4], &widths));
    }
    out
}

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", line.join("  ").trim_end())
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod tests;
