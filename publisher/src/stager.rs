//! Assembly of the staged package directory.
//!
//! The stager copies the style sources verbatim, the core tree through the
//! plugin stylesheet filter, and the licence, security policy and local
//! readme into a freshly created staging root.

use crate::error::{PublisherError, Result};
use crate::prune::{PluginCssFilter, copy_pruned, copy_tree};
use crate::status::StatusReporter;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

const STYLE_DIR: &str = "src/style";
const CORE_DIR: &str = "src/core";
const LICENSE_FILE: &str = "LICENSE";
const SECURITY_FILE: &str = "SECURITY.md";
const README_FILE: &str = "README.md";

/// Copies the package subset from an upstream clone into a staging root.
pub struct Stager {
    clone_dir: Utf8PathBuf,
    staging_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager reading from `clone_dir` and writing to `staging_dir`.
    #[must_use]
    pub const fn new(clone_dir: Utf8PathBuf, staging_dir: Utf8PathBuf) -> Self {
        Self {
            clone_dir,
            staging_dir,
        }
    }

    /// Create the staging root.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::StagingFailed` if the root already exists or
    /// cannot be created; staged trees are never merged.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir(&self.staging_dir).map_err(|e| PublisherError::StagingFailed {
            reason: format!("failed to create {}: {e}", self.staging_dir),
        })
    }

    /// Copy every part of the package, reporting progress as it goes.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::StagingFailed` on the first failed copy.
    pub fn stage_all(&self, readme: &Utf8Path, status: &mut dyn StatusReporter) -> Result<()> {
        status.update("Copying SCSS files");
        self.stage_style()?;

        status.update("Copying core dependencies");
        self.stage_core()?;

        status.update("Copying LICENSE");
        self.stage_file(&self.clone_dir.join(LICENSE_FILE), LICENSE_FILE)?;

        status.update("Copying SECURITY.md");
        self.stage_file(&self.clone_dir.join(SECURITY_FILE), SECURITY_FILE)?;

        status.update("Copying README.md");
        self.stage_file(readme, README_FILE)
    }

    /// Copy the upstream style sources without filtering.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::StagingFailed` if the copy fails.
    pub fn stage_style(&self) -> Result<usize> {
        let src = self.clone_dir.join(STYLE_DIR);
        let dst = self.staging_dir.join("style");
        let copied = copy_tree(&src, &dst).map_err(|e| copy_failed(&src, &dst, &e))?;
        debug!("copied {copied} style file(s) to {dst}");
        Ok(copied)
    }

    /// Copy the plugin stylesheets from the upstream core tree.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::StagingFailed` if the copy fails.
    pub fn stage_core(&self) -> Result<usize> {
        let src = self.clone_dir.join(CORE_DIR);
        let dst = self.staging_dir.join("core");
        let filter = PluginCssFilter::new(self.clone_dir.clone());
        let copied = copy_pruned(&src, &dst, &filter).map_err(|e| copy_failed(&src, &dst, &e))?;
        debug!("copied {copied} plugin stylesheet(s) to {dst}");
        Ok(copied)
    }

    /// Copy a single file into the staging root under `name`.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::StagingFailed` if the copy fails.
    pub fn stage_file(&self, src: &Utf8Path, name: &str) -> Result<()> {
        let dst = self.staging_dir.join(name);
        fs::copy(src, &dst).map_err(|e| copy_failed(src, &dst, &e))?;
        Ok(())
    }

    /// Return the staging root.
    #[must_use]
    pub fn staging_path(&self) -> &Utf8Path {
        &self.staging_dir
    }
}

fn copy_failed(src: &Utf8Path, dst: &Utf8Path, err: &std::io::Error) -> PublisherError {
    PublisherError::StagingFailed {
        reason: format!("failed to copy {src} to {dst}: {err}"),
    }
}
