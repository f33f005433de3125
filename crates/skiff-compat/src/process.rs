// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Child process spawning.
//!
//! [`Command`] describes what to run; [`Child`] wraps the running process
//! and its piped streams. Exit information is normalized into
//! [`ExitStatus`], including the terminating signal on unix.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio as StdStdio;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{CompatError, Result};
use crate::resource::IoHandle;

/// How one of the child's standard streams is wired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stdio {
    /// Share the parent's stream.
    #[default]
    Inherit,
    /// Connect a pipe readable/writable from the parent.
    Piped,
    /// Discard.
    Null,
}

impl Stdio {
    fn to_std(self) -> StdStdio {
        match self {
            Self::Inherit => StdStdio::inherit(),
            Self::Piped => StdStdio::piped(),
            Self::Null => StdStdio::null(),
        }
    }
}

/// Normalized exit information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    /// Whether the process exited with code 0.
    pub success: bool,
    /// Exit code, absent when killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal number (unix only).
    pub signal: Option<i32>,
}

impl ExitStatus {
    fn from_std(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            success: status.success(),
            code: status.code(),
            signal,
        }
    }

    /// Name of the terminating signal, e.g. `"SIGKILL"` (unix only).
    pub fn signal_name(&self) -> Option<&'static str> {
        #[cfg(unix)]
        {
            self.signal
                .and_then(|s| nix::sys::signal::Signal::try_from(s).ok())
                .map(|s| s.as_str())
        }
        #[cfg(not(unix))]
        {
            None
        }
    }
}

/// Captured output of a finished process.
#[derive(Debug)]
pub struct Output {
    /// Exit information.
    pub status: ExitStatus,
    /// Captured stdout.
    pub stdout: Vec<u8>,
    /// Captured stderr.
    pub stderr: Vec<u8>,
}

/// Builder describing a process to spawn.
#[derive(Debug)]
pub struct Command {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    env_clear: bool,
    cwd: Option<PathBuf>,
    stdin: Stdio,
    stdout: Stdio,
    stderr: Stdio,
}

impl Command {
    /// Describe running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            env_clear: false,
            cwd: None,
            stdin: Stdio::Inherit,
            stdout: Stdio::Inherit,
            stderr: Stdio::Inherit,
        }
    }

    /// Append one argument.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set one environment variable for the child.
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Start the child from an empty environment.
    pub fn env_clear(&mut self) -> &mut Self {
        self.env_clear = true;
        self
    }

    /// Working directory of the child.
    pub fn current_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Wire up the child's stdin.
    pub fn stdin(&mut self, stdio: Stdio) -> &mut Self {
        self.stdin = stdio;
        self
    }

    /// Wire up the child's stdout.
    pub fn stdout(&mut self, stdio: Stdio) -> &mut Self {
        self.stdout = stdio;
        self
    }

    /// Wire up the child's stderr.
    pub fn stderr(&mut self, stdio: Stdio) -> &mut Self {
        self.stderr = stdio;
        self
    }

    fn build(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        if self.env_clear {
            command.env_clear();
        }
        command.envs(&self.env);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
            .stdin(self.stdin.to_std())
            .stdout(self.stdout.to_std())
            .stderr(self.stderr.to_std());
        command
    }

    /// Spawn the child. A missing program is `NotFound`.
    pub fn spawn(&self) -> Result<Child> {
        let mut command = self.build();
        let inner = command
            .spawn()
            .map_err(|e| CompatError::io("spawn", &self.program, e))?;
        Ok(Child { inner })
    }

    /// Run to completion with stdout/stderr captured.
    pub async fn output(&self) -> Result<Output> {
        let mut command = self.build();
        command.stdout(StdStdio::piped()).stderr(StdStdio::piped());
        let output = command
            .output()
            .await
            .map_err(|e| CompatError::io("spawn", &self.program, e))?;
        Ok(Output {
            status: ExitStatus::from_std(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Run to completion, inheriting the parent's streams.
    pub async fn status(&self) -> Result<ExitStatus> {
        let mut command = self.build();
        let status = command
            .status()
            .await
            .map_err(|e| CompatError::io("spawn", &self.program, e))?;
        Ok(ExitStatus::from_std(status))
    }
}

/// A running child process.
#[derive(Debug)]
pub struct Child {
    inner: tokio::process::Child,
}

impl Child {
    /// OS process id, if the child is still running.
    pub fn id(&self) -> Option<u32> {
        self.inner.id()
    }

    /// Take the writable stdin pipe (requires [`Stdio::Piped`]).
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.inner.stdin.take().map(|inner| ChildStdin { inner })
    }

    /// Take the readable stdout pipe (requires [`Stdio::Piped`]).
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.inner.stdout.take().map(|inner| ChildStdout { inner })
    }

    /// Take the readable stderr pipe (requires [`Stdio::Piped`]).
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.inner.stderr.take().map(|inner| ChildStderr { inner })
    }

    /// Wait for the child to exit.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self
            .inner
            .wait()
            .await
            .map_err(|e| CompatError::stream("wait", e))?;
        Ok(ExitStatus::from_std(status))
    }

    /// Check for exit without blocking.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>> {
        let status = self
            .inner
            .try_wait()
            .map_err(|e| CompatError::stream("wait", e))?;
        Ok(status.map(ExitStatus::from_std))
    }

    /// Kill the child (SIGKILL) and wait for it to be reaped.
    pub async fn kill(&mut self) -> Result<()> {
        self.inner
            .kill()
            .await
            .map_err(|e| CompatError::stream("kill", e))
    }

    /// Wait with stdout/stderr collected from previously piped streams.
    pub async fn wait_with_output(self) -> Result<Output> {
        let output = self
            .inner
            .wait_with_output()
            .await
            .map_err(|e| CompatError::stream("wait", e))?;
        Ok(Output {
            status: ExitStatus::from_std(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Writable pipe to a child's stdin.
#[derive(Debug)]
pub struct ChildStdin {
    inner: tokio::process::ChildStdin,
}

impl ChildStdin {
    /// Write all of `buf` to the child.
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner
            .write_all(buf)
            .await
            .map_err(|e| CompatError::stream("write", e))
    }

    /// Flush and close the pipe so the child observes EOF.
    pub async fn close(mut self) -> Result<()> {
        self.inner
            .shutdown()
            .await
            .map_err(|e| CompatError::stream("shutdown", e))
    }
}

#[async_trait]
impl IoHandle for ChildStdin {
    fn handle_name(&self) -> Cow<'static, str> {
        "childStdin".into()
    }

    async fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Err(CompatError::invalid_input("read", "stdin pipe is write-only"))
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.inner
            .write(buf)
            .await
            .map_err(|e| CompatError::stream("write", e))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.inner
            .shutdown()
            .await
            .map_err(|e| CompatError::stream("shutdown", e))
    }
}

macro_rules! read_pipe {
    ($name:ident, $inner:ty, $label:literal) => {
        /// Readable pipe from a child's output stream.
        #[derive(Debug)]
        pub struct $name {
            inner: $inner,
        }

        impl $name {
            /// Read into `buf`, returning the number of bytes read (0 at EOF).
            pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
                self.inner
                    .read(buf)
                    .await
                    .map_err(|e| CompatError::stream("read", e))
            }

            /// Read until EOF.
            pub async fn read_to_end(&mut self) -> Result<Vec<u8>> {
                let mut out = Vec::new();
                self.inner
                    .read_to_end(&mut out)
                    .await
                    .map_err(|e| CompatError::stream("read", e))?;
                Ok(out)
            }
        }

        #[async_trait]
        impl IoHandle for $name {
            fn handle_name(&self) -> Cow<'static, str> {
                $label.into()
            }

            async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
                $name::read(self, buf).await
            }

            async fn write(&mut self, _buf: &[u8]) -> Result<usize> {
                Err(CompatError::invalid_input("write", "output pipe is read-only"))
            }
        }
    };
}

read_pipe!(ChildStdout, tokio::process::ChildStdout, "childStdout");
read_pipe!(ChildStderr, tokio::process::ChildStderr, "childStderr");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_output_captures_stdout() {
        let output = Command::new("echo").arg("hello").output().await.unwrap();
        assert!(output.status.success);
        assert_eq!(output.status.code, Some(0));
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let err = Command::new("skiff-no-such-binary").output().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_nonzero_exit_code() {
        let output = Command::new("sh")
            .args(["-c", "exit 3"])
            .output()
            .await
            .unwrap();
        assert!(!output.status.success);
        assert_eq!(output.status.code, Some(3));
        assert_eq!(output.status.signal, None);
    }

    #[tokio::test]
    async fn test_piped_stdin_round_trip() {
        let mut child = Command::new("cat")
            .stdin(Stdio::Piped)
            .stdout(Stdio::Piped)
            .stderr(Stdio::Null)
            .spawn()
            .unwrap();

        let stdin = child.take_stdin().unwrap();
        let mut stdout = child.take_stdout().unwrap();

        let writer = tokio::spawn(async move {
            let mut stdin = stdin;
            stdin.write_all(b"through the pipe").await.unwrap();
            stdin.close().await.unwrap();
        });

        let echoed = stdout.read_to_end().await.unwrap();
        writer.await.unwrap();
        assert_eq!(echoed, b"through the pipe");
        assert!(child.wait().await.unwrap().success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_kill_reports_signal() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::Null)
            .spawn()
            .unwrap();
        assert!(child.id().is_some());

        child.kill().await.unwrap();
        let status = child.wait().await.unwrap();
        assert!(!status.success);
        assert_eq!(status.code, None);
        assert_eq!(status.signal_name(), Some("SIGKILL"));
    }

    #[tokio::test]
    async fn test_env_and_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let output = Command::new("sh")
            .args(["-c", "echo $SKIFF_TEST_MARK && pwd"])
            .env("SKIFF_TEST_MARK", "mark-42")
            .current_dir(dir.path())
            .output()
            .await
            .unwrap();

        let text = String::from_utf8_lossy(&output.stdout);
        assert!(text.contains("mark-42"));
        let canonical = dir.path().canonicalize().unwrap();
        assert!(text.contains(&*canonical.to_string_lossy()));
    }
}
