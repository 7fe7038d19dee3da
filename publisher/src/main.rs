//! swagger-ui SCSS publisher CLI entrypoint.
//!
//! This binary stages the newest swagger-ui release's stylesheets as an npm
//! package under `tmp/swagger-ui-scss`, ready for `npm publish`. Progress is
//! written to stderr; set `RUST_LOG=debug` to see every external command.

use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;
use swagger_ui_scss_publisher::cli::Cli;
use swagger_ui_scss_publisher::config::PublisherConfig;
use swagger_ui_scss_publisher::deps::SystemCommandExecutor;
use swagger_ui_scss_publisher::error::{PublisherError, Result};
use swagger_ui_scss_publisher::pipeline::{Pipeline, RunOutcome};
use swagger_ui_scss_publisher::registry::HttpRegistry;
use swagger_ui_scss_publisher::status::{TerminalStatus, write_stderr_line};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();

    let exit_code = match resolve_workdir(cli.workdir.clone()) {
        Ok(workdir) => {
            let config = cli.config(workdir);
            let outcome = run(&config, cli.quiet, &mut stderr);
            exit_code_for_outcome(&config, &outcome, cli.quiet, &mut stderr)
        }
        Err(err) => {
            write_stderr_line(&mut stderr, err);
            1
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Runs the pipeline against the production git, npm and registry services.
fn run(config: &PublisherConfig, quiet: bool, stderr: &mut dyn Write) -> Result<RunOutcome> {
    let executor = SystemCommandExecutor;
    let registry = HttpRegistry::new(config.registry_url.as_str());
    let mut status = TerminalStatus::new(stderr, quiet);
    Pipeline::new(config, &executor, &registry).run(&mut status)
}

/// Uses the requested working directory or falls back to the current one.
fn resolve_workdir(requested: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(workdir) = requested {
        return Ok(workdir);
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|e| PublisherError::NonUtf8Path {
        path: e.into_path_buf().display().to_string(),
    })
}

/// Maps a run outcome to the process exit code.
///
/// Stage failures have already been reported by the status reporter, so
/// only the staged summary is written here. An up-to-date registry exits
/// with 1 so that CI skips the publish step.
fn exit_code_for_outcome(
    config: &PublisherConfig,
    outcome: &Result<RunOutcome>,
    quiet: bool,
    stderr: &mut dyn Write,
) -> i32 {
    match outcome {
        Ok(RunOutcome::Staged { tag, staging_dir }) => {
            if !quiet {
                write_stderr_line(stderr, "");
                write_stderr_line(
                    stderr,
                    format!(
                        "Staged {} {} at {staging_dir}",
                        config.package_name,
                        tag.version()
                    ),
                );
                write_stderr_line(stderr, format!("Publish with: cd {staging_dir} && npm publish"));
            }
            0
        }
        Ok(RunOutcome::UpToDate { .. }) | Err(_) => 1,
    }
}
