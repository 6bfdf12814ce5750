// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The subprocess seam every adapter shells out through.
//!
//! The CoW-FS, jail, and mount adapters are, at bottom, wrappers around the
//! `zfs`, `jail`/`jexec`/`jls`, and `mount`/`umount`/`devfs` command line
//! utilities. Routing every invocation through [`CommandRunner`] keeps the
//! adapters testable on a host without ZFS or jail support: production code
//! always uses [`SystemCommandRunner`]; tests use a fake that records argv
//! and returns scripted output.

use std::process::Output;
use tracing::debug;
use zonys_core::{Error, Result};

pub trait CommandRunner: std::fmt::Debug + Send + Sync {
    /// Run `argv[0]` with the remaining elements as arguments, returning its
    /// captured output. Implementations do not interpret the exit status;
    /// callers use [`CommandRunner::run_checked`] when a non-zero exit
    /// should become an [`Error::ExternalCommand`].
    fn run(&self, argv: &[&str]) -> Result<Output>;

    /// Like [`CommandRunner::run`], but a non-zero exit status becomes
    /// `Err(Error::ExternalCommand)`. Returns captured stdout on success.
    fn run_checked(&self, argv: &[&str]) -> Result<Vec<u8>> {
        let output = self.run(argv)?;
        if !output.status.success() {
            return Err(Error::external_command(
                argv,
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(output.stdout)
    }

    /// Run `argv`, streaming `input` to the child's stdin. Used by the
    /// CoW-FS adapter's `receive` operation, which reads an inbound
    /// send-stream from a caller-supplied byte source.
    fn run_checked_with_stdin(&self, argv: &[&str], input: &mut dyn std::io::Read) -> Result<Vec<u8>>;

    /// Run `argv`, draining the child's stdout into `sink` as it is
    /// produced rather than buffering the whole output. Used by the CoW-FS
    /// adapter's `send` operation, which streams a (potentially large)
    /// send-stream out to a caller-supplied sink.
    fn run_checked_streaming_stdout(&self, argv: &[&str], sink: &mut dyn std::io::Write) -> Result<()>;
}

/// The production [`CommandRunner`]: spawns a real subprocess and blocks
/// until it exits, matching the single-threaded, synchronous scheduling
/// model external utilities run under.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[&str]) -> Result<Output> {
        let [program, args @ ..] = argv else {
            return Err(Error::InvalidConfiguration("empty command".into()));
        };
        debug!(argv = ?argv, "running external command");
        Ok(std::process::Command::new(program).args(args).output()?)
    }

    fn run_checked_with_stdin(&self, argv: &[&str], input: &mut dyn std::io::Read) -> Result<Vec<u8>> {
        use std::io::{Read, Write};
        use std::process::Stdio;

        let [program, args @ ..] = argv else {
            return Err(Error::InvalidConfiguration("empty command".into()));
        };
        debug!(argv = ?argv, "running external command with piped stdin");

        let mut child = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        #[allow(clippy::expect_used)]
        let mut stdin = child.stdin.take().expect("stdin was piped");
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer)?;
        std::thread::spawn(move || {
            let _ = stdin.write_all(&buffer);
        });

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::external_command(
                argv,
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(output.stdout)
    }

    fn run_checked_streaming_stdout(&self, argv: &[&str], sink: &mut dyn std::io::Write) -> Result<()> {
        use nix::unistd::pipe;
        use std::fs::File;
        use std::io::Read;
        use std::process::Stdio;

        let [program, args @ ..] = argv else {
            return Err(Error::InvalidConfiguration("empty command".into()));
        };
        debug!(argv = ?argv, "running external command with streamed stdout");

        // The write end is handed to the child and dropped by us once
        // spawned, so the read end sees EOF as soon as the child exits.
        let (read_end, write_end) = pipe().map_err(std::io::Error::from)?;
        let mut child = std::process::Command::new(program)
            .args(args)
            .stdout(Stdio::from(write_end))
            .stderr(Stdio::piped())
            .spawn()?;

        let mut read_file = File::from(read_end);
        let mut buffer = [0u8; 8192];
        loop {
            let n = read_file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            sink.write_all(&buffer[..n])?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::external_command(
                argv,
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    /// A scripted [`CommandRunner`] for adapter tests. Each call to `run`
    /// pops the next scripted [`Output`] (or synthesizes a success with the
    /// next scripted stdout, via [`FakeCommandRunner::push_stdout`]) and
    /// records the argv it was invoked with.
    #[derive(Debug, Default)]
    pub struct FakeCommandRunner {
        scripted: Mutex<VecDeque<Output>>,
        invocations: Mutex<Vec<Vec<String>>>,
    }

    impl FakeCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_success(&self, stdout: impl Into<Vec<u8>>) {
            self.scripted.lock().push_back(Output {
                status: ExitStatus::from_raw(0),
                stdout: stdout.into(),
                stderr: Vec::new(),
            });
        }

        pub fn push_failure(&self, stderr: impl Into<Vec<u8>>) {
            self.scripted.lock().push_back(Output {
                status: ExitStatus::from_raw(1 << 8),
                stdout: Vec::new(),
                stderr: stderr.into(),
            });
        }

        pub fn invocations(&self) -> Vec<Vec<String>> {
            self.invocations.lock().clone()
        }
    }

    impl CommandRunner for FakeCommandRunner {
        fn run(&self, argv: &[&str]) -> Result<Output> {
            self.invocations
                .lock()
                .push(argv.iter().map(|s| s.to_string()).collect());
            Ok(self.scripted.lock().pop_front().unwrap_or(Output {
                status: ExitStatus::from_raw(0),
                stdout: Vec::new(),
                stderr: Vec::new(),
            }))
        }

        fn run_checked_with_stdin(
            &self,
            argv: &[&str],
            input: &mut dyn std::io::Read,
        ) -> Result<Vec<u8>> {
            use std::io::Read as _;
            let mut discard = Vec::new();
            input.read_to_end(&mut discard)?;
            let output = self.run(argv)?;
            if !output.status.success() {
                return Err(Error::external_command(
                    argv,
                    String::from_utf8_lossy(&output.stderr),
                ));
            }
            Ok(output.stdout)
        }

        fn run_checked_streaming_stdout(&self, argv: &[&str], sink: &mut dyn std::io::Write) -> Result<()> {
            let output = self.run(argv)?;
            if !output.status.success() {
                return Err(Error::external_command(
                    argv,
                    String::from_utf8_lossy(&output.stderr),
                ));
            }
            sink.write_all(&output.stdout)?;
            Ok(())
        }
    }
}
