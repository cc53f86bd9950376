//! External command execution
//!
//! Synchronous tool calls run to completion through [`ToolCommand::output`].
//! Long-running snapshot runs go through a [`ProcessRunner`], which reports
//! output lines and the exit code back to the control thread as events.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use crate::event::{ControlEvent, EventSender, OutputStream, RunId};
use crate::{Error, Result};

/// A fully substituted external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Build from an argv list whose first element is the program.
    pub fn from_argv(argv: Vec<String>, cwd: impl Into<PathBuf>) -> Option<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next()?;
        Some(Self::new(program, argv.collect(), cwd))
    }

    /// Human-readable command line, used in logs and errors.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.cwd);
        cmd
    }

    /// Run to completion and return stdout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolFailed`] if the command exits unsuccessfully, or an
    /// I/O error if it cannot be started.
    pub fn output(&self) -> Result<String> {
        tracing::debug!(command = %self.display(), "Running tool command");
        let output = self.command().stdin(Stdio::null()).output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(Error::ToolFailed {
                command: self.display(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

/// Starts managed subprocesses whose lifecycle is reported as events.
pub trait ProcessRunner {
    /// Start `command` as run `run`.
    ///
    /// Every output line must be delivered as [`ControlEvent::ProcessOutput`]
    /// and completion as exactly one [`ControlEvent::ProcessExited`].
    fn start(&mut self, run: RunId, command: ToolCommand, events: EventSender) -> Result<()>;
}

/// [`ProcessRunner`] backed by OS processes.
///
/// One reader thread per output stream forwards lines; a waiter thread sends
/// the exit event once both streams are drained, so output always precedes
/// the exit.
#[derive(Debug, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SubprocessRunner {
    fn start(&mut self, run: RunId, command: ToolCommand, events: EventSender) -> Result<()> {
        let mut child = command
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        tracing::debug!(run, pid = child.id(), command = %command.display(), "Started subprocess");

        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(forward_lines(run, OutputStream::Stdout, stdout, events.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(forward_lines(run, OutputStream::Stderr, stderr, events.clone()));
        }

        thread::spawn(move || {
            for reader in readers {
                let _ = reader.join();
            }
            let code = match child.wait() {
                Ok(status) => status.code().unwrap_or(-1),
                Err(e) => {
                    tracing::error!(run, "Failed to wait for subprocess: {}", e);
                    -1
                }
            };
            let _ = events.send(ControlEvent::ProcessExited { run, code });
        });

        Ok(())
    }
}

fn forward_lines<R: Read + Send + 'static>(
    run: RunId,
    stream: OutputStream,
    source: R,
    events: EventSender,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            let Ok(line) = line else { break };
            if events
                .send(ControlEvent::ProcessOutput { run, stream, line })
                .is_err()
            {
                break;
            }
        }
    })
}
