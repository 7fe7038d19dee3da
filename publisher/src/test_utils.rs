//! Shared test utilities for the publisher crate.

use crate::deps::CommandExecutor;
use crate::error::{PublisherError, Result};
use crate::registry::{RegistryClient, RegistryError};
use crate::status::StatusReporter;
use camino::Utf8Path;
use semver::Version;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    output_with_stdout("")
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn output_with_stdout(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Side effect run when a stubbed command is invoked.
pub type CallEffect = Box<dyn FnOnce()>;

/// Represents an expected command invocation for testing.
pub struct ExpectedCall {
    /// The command to execute (e.g., "git").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
    /// Work performed in place of the real command, such as writing the
    /// files a clone would produce.
    pub effect: Option<CallEffect>,
}

impl ExpectedCall {
    /// Expect `cmd args...` and answer with `result`.
    #[must_use]
    pub fn new<I, S>(cmd: &'static str, args: I, result: Result<Output>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cmd,
            args: args.into_iter().map(Into::into).collect(),
            result,
            effect: None,
        }
    }

    /// Run `effect` when the call is made.
    #[must_use]
    pub fn with_effect(mut self, effect: impl FnOnce() + 'static) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }
}

impl fmt::Debug for ExpectedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedCall")
            .field("cmd", &self.cmd)
            .field("args", &self.args)
            .field("result", &self.result)
            .field("effect", &self.effect.is_some())
            .finish()
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Number of expected calls not yet made.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.expected.borrow().len()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }

    fn take(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let call = self.expected.borrow_mut().pop_front();
        let Some(call) = call else {
            return Err(PublisherError::StubMismatch {
                message: format!("unexpected command invocation: {cmd} {}", args.join(" ")),
            });
        };

        if call.cmd != cmd || call.args != args {
            return Err(PublisherError::StubMismatch {
                message: format!(
                    "expected {} {}, got {cmd} {}",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        if let Some(effect) = call.effect {
            effect();
        }
        call.result
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.take(cmd, args)
    }

    fn run_streaming(&self, cmd: &str, args: &[&str], _cwd: &Utf8Path) -> Result<ExitStatus> {
        self.take(cmd, args).map(|output| output.status)
    }
}

/// A registry returning a fixed lookup result.
#[derive(Debug, Clone, Default)]
pub struct StubRegistry {
    latest: Option<Version>,
}

impl StubRegistry {
    /// A registry that has published `version`.
    #[must_use]
    pub const fn published(version: Version) -> Self {
        Self {
            latest: Some(version),
        }
    }

    /// A registry that has never seen the package.
    #[must_use]
    pub const fn unpublished() -> Self {
        Self { latest: None }
    }
}

impl RegistryClient for StubRegistry {
    fn latest_version(&self, package: &str) -> std::result::Result<Version, RegistryError> {
        self.latest.clone().ok_or_else(|| RegistryError::NotFound {
            url: format!("stub://{package}"),
        })
    }
}

/// An event recorded by [`RecordingStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// A task started.
    Start(String),
    /// The active task's detail changed.
    Update(String),
    /// The active task succeeded.
    Succeed,
    /// The active task closed with information.
    Info(String),
    /// The active task closed with a warning.
    Warn(String),
    /// The active task failed.
    Fail(String),
}

/// A `StatusReporter` that records every event.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    events: Vec<StatusEvent>,
    active: bool,
}

impl RecordingStatus {
    /// All recorded events in order.
    #[must_use]
    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// Every detail passed to `update`, in order.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                StatusEvent::Update(detail) => Some(detail.clone()),
                _ => None,
            })
            .collect()
    }

    /// Titles of every started task, in order.
    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                StatusEvent::Start(title) => Some(title.clone()),
                _ => None,
            })
            .collect()
    }
}

impl StatusReporter for RecordingStatus {
    fn start(&mut self, title: &str) {
        self.active = true;
        self.events.push(StatusEvent::Start(title.to_owned()));
    }

    fn update(&mut self, detail: &str) {
        self.events.push(StatusEvent::Update(detail.to_owned()));
    }

    fn succeed(&mut self) {
        self.active = false;
        self.events.push(StatusEvent::Succeed);
    }

    fn info(&mut self, message: &str) {
        self.active = false;
        self.events.push(StatusEvent::Info(message.to_owned()));
    }

    fn warn(&mut self, message: &str) {
        self.active = false;
        self.events.push(StatusEvent::Warn(message.to_owned()));
    }

    fn fail(&mut self, message: &str) {
        self.active = false;
        self.events.push(StatusEvent::Fail(message.to_owned()));
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
