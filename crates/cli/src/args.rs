// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns the free-form `--key value` pairs trailing `zone create`/`run`/
//! `deploy`/`replace`/`redeploy` into a zone spec [`Value`].
//!
//! Grounded on `original_source/zonys/cli.py`'s `_zone_handle_configuration`:
//! a single bare `-` sets `base` to "read a send-stream from stdin" (there
//! is no real file descriptor to carry through a YAML value, so `base: 0`
//! is the sentinel the `base` handler's integer branch matches on); every
//! other pair is `--key value`, with `value` parsed as a YAML scalar so
//! `--temporary true` and `--replicas 3` land as `bool`/`i64` rather than
//! strings, matching how each built-in handler's schema expects them.

use zonys_core::{Error, Result, Value};

pub fn parse(arguments: &[String]) -> Result<Value> {
    let mut mapping = serde_yaml::Mapping::new();
    let mut i = 0;
    while i < arguments.len() {
        let arg = &arguments[i];
        if arg == "-" {
            mapping.insert(Value::from("base"), Value::from(0));
            i += 1;
            continue;
        }
        let Some(rest) = arguments.get(i + 1) else {
            return Err(Error::InvalidConfiguration(format!(
                "`{arg}` is missing its value"
            )));
        };
        let key = arg.strip_prefix("--").unwrap_or(arg);
        let value = serde_yaml::from_str(rest).unwrap_or_else(|_| Value::from(rest.as_str()));
        mapping.insert(Value::from(key), value);
        i += 2;
    }
    Ok(Value::Mapping(mapping))
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
