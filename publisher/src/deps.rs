//! External command execution and npm dependency installation.
//!
//! Git and npm are driven through [`CommandExecutor`] so that the pipeline
//! can be exercised without touching the network or the package manager.

use crate::error::{PublisherError, Result};
use camino::Utf8Path;
use log::debug;
use std::process::{Command, ExitStatus, Output, Stdio};

/// Package manager binary used to install the staged package's dependencies.
#[cfg(windows)]
pub const NPM: &str = "npm.cmd";

/// Package manager binary used to install the staged package's dependencies.
#[cfg(not(windows))]
pub const NPM: &str = "npm";

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swagger_ui_scss_publisher::deps::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("git", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), swagger_ui_scss_publisher::error::PublisherError>(())
    /// ```
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output>;

    /// Runs a command in `cwd` with stdout and stderr forwarded live to the
    /// current process, returning its exit status.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or waiting on the
    /// command.
    fn run_streaming<'a>(
        &self,
        cmd: &str,
        args: &[&'a str],
        cwd: &Utf8Path,
    ) -> Result<ExitStatus>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        debug!("running {cmd} {}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(PublisherError::from)
    }

    fn run_streaming(&self, cmd: &str, args: &[&str], cwd: &Utf8Path) -> Result<ExitStatus> {
        debug!("running {cmd} {} in {cwd}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .current_dir(cwd.as_std_path())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(PublisherError::from)
    }
}

/// Installs the staged package's dependencies with `npm install`.
///
/// Output is streamed to the terminal as npm produces it.
///
/// # Errors
///
/// Returns `PublisherError::DependencyInstall` if npm exits unsuccessfully,
/// or an I/O error if it cannot be started.
pub fn install_dependencies(executor: &dyn CommandExecutor, staging_dir: &Utf8Path) -> Result<()> {
    let status = executor.run_streaming(NPM, &["install"], staging_dir)?;

    if !status.success() {
        return Err(PublisherError::DependencyInstall {
            tool: "npm",
            message: describe_exit(status),
        });
    }

    Ok(())
}

/// Describe a failed exit status for error messages.
fn describe_exit(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_owned(),
    }
}
