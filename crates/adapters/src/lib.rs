// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! zonys-adapters: the thin, testable wrappers around the native `zfs`,
//! `jail`/`jexec`/`jls`, and `mount`/`umount`/`devfs` utilities that the rest
//! of the workspace builds on. Every adapter is generic over (or holds a
//! trait object of) [`command::CommandRunner`] so it can be exercised on a
//! host without ZFS or jail support.

pub mod command;
pub mod cow_fs;
pub mod jail;
pub mod mount;

pub use command::{CommandRunner, SystemCommandRunner};
