//! Operator-facing progress reporting.
//!
//! Each pipeline stage receives a [`StatusReporter`] and reports against the
//! task it was started with. [`TerminalStatus`] renders those events as
//! plain stderr lines; tests use a recording implementation instead.

use std::io::Write;

/// Sink for stage progress.
///
/// A task is active from [`start`](Self::start) until one of the terminal
/// calls (`succeed`, `info`, `warn`, `fail`) closes it.
pub trait StatusReporter {
    /// Begin a new task with the given title.
    fn start(&mut self, title: &str);

    /// Replace the detail shown alongside the active task.
    fn update(&mut self, detail: &str);

    /// Close the active task as successful.
    fn succeed(&mut self);

    /// Close the active task with an informational message.
    fn info(&mut self, message: &str);

    /// Close the active task with a warning.
    fn warn(&mut self, message: &str);

    /// Close the active task as failed.
    fn fail(&mut self, message: &str);

    /// Whether a task is still open.
    fn is_active(&self) -> bool;
}

/// Runs `task` as a titled unit of work.
///
/// A task that leaves its status open is closed as successful; a task that
/// returns an error without closing its status is closed as failed with the
/// error's message.
///
/// # Errors
///
/// Returns whatever error `task` returns.
pub fn run_task<T, E, F>(status: &mut dyn StatusReporter, title: &str, task: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnOnce(&mut dyn StatusReporter) -> Result<T, E>,
{
    status.start(title);
    match task(status) {
        Ok(value) => {
            if status.is_active() {
                status.succeed();
            }
            Ok(value)
        }
        Err(err) => {
            if status.is_active() {
                status.fail(&err.to_string());
            }
            Err(err)
        }
    }
}

/// Line-oriented reporter writing to a terminal stream.
///
/// In quiet mode only warnings and failures are written.
pub struct TerminalStatus<'a> {
    out: &'a mut dyn Write,
    quiet: bool,
    title: Option<String>,
    detail: Option<String>,
}

impl<'a> TerminalStatus<'a> {
    /// Create a reporter writing to `out`.
    #[must_use]
    pub const fn new(out: &'a mut dyn Write, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            title: None,
            detail: None,
        }
    }

    fn finish(&mut self, marker: &str, message: Option<&str>, always: bool) {
        let title = self.title.take().unwrap_or_default();
        let detail = self.detail.take();
        if self.quiet && !always {
            return;
        }
        let line = match (message, detail) {
            (Some(message), _) => format!("{marker} {title}: {message}"),
            (None, Some(detail)) => format!("{marker} {title} - {detail}"),
            (None, None) => format!("{marker} {title}"),
        };
        write_stderr_line(self.out, line);
    }
}

impl StatusReporter for TerminalStatus<'_> {
    fn start(&mut self, title: &str) {
        self.title = Some(title.to_owned());
        self.detail = None;
        if !self.quiet {
            write_stderr_line(self.out, format!("... {title}"));
        }
    }

    fn update(&mut self, detail: &str) {
        self.detail = Some(detail.to_owned());
        if !self.quiet {
            write_stderr_line(self.out, format!("    {detail}"));
        }
    }

    fn succeed(&mut self) {
        self.finish("[ok]", None, false);
    }

    fn info(&mut self, message: &str) {
        self.finish("[info]", Some(message), false);
    }

    fn warn(&mut self, message: &str) {
        self.finish("[warn]", Some(message), true);
    }

    fn fail(&mut self, message: &str) {
        self.finish("[fail]", Some(message), true);
    }

    fn is_active(&self) -> bool {
        self.title.is_some()
    }
}

/// Write a line to a stream, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn render<F>(quiet: bool, f: F) -> String
    where
        F: FnOnce(&mut dyn StatusReporter),
    {
        let mut buffer = Vec::new();
        {
            let mut status = TerminalStatus::new(&mut buffer, quiet);
            f(&mut status);
        }
        String::from_utf8(buffer).expect("status output was not UTF-8")
    }

    #[test]
    fn succeed_includes_last_detail() {
        let output = render(false, |status| {
            status.start("Checking versions");
            status.update("Ready to publish 5.2.0");
            status.succeed();
        });
        assert!(output.contains("[ok] Checking versions - Ready to publish 5.2.0"));
    }

    #[rstest]
    #[case::quiet(true)]
    #[case::verbose(false)]
    fn warnings_are_always_written(#[case] quiet: bool) {
        let output = render(quiet, |status| {
            status.start("Get package version");
            status.warn("registry unreachable");
        });
        assert!(output.contains("[warn] Get package version: registry unreachable"));
    }

    #[test]
    fn quiet_mode_hides_progress() {
        let output = render(true, |status| {
            status.start("Cloning");
            status.update("Deleting old clone");
            status.succeed();
        });
        assert!(output.is_empty());
    }

    #[test]
    fn terminal_calls_close_the_task() {
        let mut buffer = Vec::new();
        let mut status = TerminalStatus::new(&mut buffer, true);
        status.start("Checking versions");
        assert!(status.is_active());
        status.info("Versions are the same");
        assert!(!status.is_active());
    }

    #[test]
    fn run_task_succeeds_open_tasks() {
        let output = render(false, |status| {
            let value: Result<u8, String> = run_task(status, "Resolve", |_| Ok(3));
            assert_eq!(value, Ok(3));
        });
        assert!(output.contains("[ok] Resolve"));
    }

    #[test]
    fn run_task_fails_open_tasks_with_error_message() {
        let output = render(true, |status| {
            let value: Result<(), String> =
                run_task(status, "Clone", |_| Err("network unreachable".to_owned()));
            assert!(value.is_err());
        });
        assert!(output.contains("[fail] Clone: network unreachable"));
    }

    #[test]
    fn run_task_keeps_explicit_close() {
        let output = render(false, |status| {
            let value: Result<(), String> = run_task(status, "Check", |status| {
                status.info("nothing to do");
                Ok(())
            });
            assert!(value.is_ok());
        });
        assert!(output.contains("[info] Check: nothing to do"));
        assert!(!output.contains("[ok]"));
    }
}
