//! Git operations against the upstream repository.
//!
//! Tag listing and cloning go through the `git` binary. The scratch
//! directory holding the clone is owned by a single run and rebuilt from
//! nothing each time.

use crate::deps::CommandExecutor;
use crate::error::{PublisherError, Result};
use crate::tags::ReleaseTag;
use camino::Utf8Path;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::process::Output;

/// Whether [`prepare_scratch_dir`] found and removed a previous tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchState {
    /// Nothing existed at the scratch path.
    Fresh,
    /// A previous scratch directory was deleted.
    Cleared,
}

/// List the remote's tags, highest version first as a hint.
///
/// # Errors
///
/// Returns `PublisherError::Git` if `git ls-remote` fails.
pub fn list_remote_tags(executor: &dyn CommandExecutor, remote: &str) -> Result<String> {
    let output = executor.run(
        "git",
        &["ls-remote", "--tags", "--sort=-v:refname", remote],
    )?;
    check_git_output(&output, "ls-remote")?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Remove a previous scratch directory so the run starts empty.
///
/// # Errors
///
/// Returns `PublisherError::ScratchNotDirectory` if something other than a
/// directory occupies `path`, or an I/O error if it cannot be inspected or
/// removed.
pub fn prepare_scratch_dir(path: &Utf8Path) -> Result<ScratchState> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ScratchState::Fresh),
        Err(err) => return Err(err.into()),
    };

    if !metadata.is_dir() {
        return Err(PublisherError::ScratchNotDirectory {
            path: path.to_owned(),
        });
    }

    debug!("removing previous scratch directory {path}");
    fs::remove_dir_all(path)?;
    Ok(ScratchState::Cleared)
}

/// Shallow-clone `remote` at `tag` into `target`.
///
/// Only the tagged commit is fetched: depth one, single branch.
///
/// # Errors
///
/// Returns `PublisherError::Git` if the clone fails.
pub fn clone_tag(
    executor: &dyn CommandExecutor,
    remote: &str,
    tag: &ReleaseTag,
    target: &Utf8Path,
) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let output = executor.run(
        "git",
        &[
            "clone",
            "--depth",
            "1",
            "--single-branch",
            "--branch",
            tag.name(),
            remote,
            target.as_str(),
        ],
    )?;
    check_git_output(&output, "clone")
}

fn check_git_output(output: &Output, operation: &'static str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(PublisherError::Git {
        operation,
        message: stderr.trim().to_owned(),
    })
}
