//! Publish pipeline orchestration.
//!
//! Runs the stages in order, each as a titled status task: resolve the
//! upstream tag, look up the published version, gate, clone, then stage the
//! package, write its manifest and install its dependencies. Every stage
//! completes before the next begins and the first error ends the run.

use crate::config::PublisherConfig;
use crate::deps::{CommandExecutor, install_dependencies};
use crate::error::{PublisherError, Result};
use crate::gate::{PublishDecision, decide};
use crate::git::{ScratchState, clone_tag, list_remote_tags, prepare_scratch_dir};
use crate::manifest::{build_manifest, read_upstream_manifest, write_manifest};
use crate::registry::RegistryClient;
use crate::stager::Stager;
use crate::status::{StatusReporter, run_task};
use crate::tags::{ReleaseTag, resolve_latest_tag};
use camino::Utf8PathBuf;
use log::{debug, warn};
use semver::Version;

/// How a run that did not fail ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A package for `tag` was staged at `staging_dir`.
    Staged {
        /// The upstream release that was packaged.
        tag: ReleaseTag,
        /// Root of the staged package.
        staging_dir: Utf8PathBuf,
    },
    /// The registry already carries `version`; nothing was done.
    UpToDate {
        /// The version present both upstream and on the registry.
        version: Version,
    },
}

/// The publish pipeline and the services it drives.
pub struct Pipeline<'a> {
    config: &'a PublisherConfig,
    executor: &'a dyn CommandExecutor,
    registry: &'a dyn RegistryClient,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over the given configuration and services.
    #[must_use]
    pub const fn new(
        config: &'a PublisherConfig,
        executor: &'a dyn CommandExecutor,
        registry: &'a dyn RegistryClient,
    ) -> Self {
        Self {
            config,
            executor,
            registry,
        }
    }

    /// Run every stage, stopping at the first failure or at the gate.
    ///
    /// # Errors
    ///
    /// Returns the first stage error. An up-to-date registry is not an
    /// error; it is reported as [`RunOutcome::UpToDate`].
    pub fn run(&self, status: &mut dyn StatusReporter) -> Result<RunOutcome> {
        let tag = self.resolve_tag(status)?;
        let published = self.published_version(status);

        if self.check_versions(&tag, published.as_ref(), status)? == PublishDecision::UpToDate {
            return Ok(RunOutcome::UpToDate {
                version: tag.version().clone(),
            });
        }

        self.fetch(&tag, status)?;
        let staging_dir = self.assemble(status)?;

        Ok(RunOutcome::Staged { tag, staging_dir })
    }

    /// Resolve the highest release tag on the upstream remote.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::NoReleaseTag` if the remote has no release
    /// tag, or a git error if listing fails.
    pub fn resolve_tag(&self, status: &mut dyn StatusReporter) -> Result<ReleaseTag> {
        run_task(status, "Get latest tag from upstream", |status| {
            let listing = list_remote_tags(self.executor, &self.config.upstream_url)?;
            let tag =
                resolve_latest_tag(&listing).ok_or_else(|| PublisherError::NoReleaseTag {
                    remote: self.config.upstream_url.clone(),
                })?;
            status.update(&format!(
                "git effective latest tag name = {tag}, tagged version = {}",
                tag.version()
            ));
            Ok(tag)
        })
    }

    /// Look up the version currently on the registry.
    ///
    /// Lookup failures are reported as warnings and yield `None`.
    pub fn published_version(&self, status: &mut dyn StatusReporter) -> Option<Version> {
        let lookup: Result<Option<Version>> =
            run_task(status, "Get package version from npm registry", |status| {
                match self.registry.latest_version(&self.config.package_name) {
                    Ok(version) => {
                        status.update(&format!("Success, npm version = {version}"));
                        Ok(Some(version))
                    }
                    Err(err) => {
                        warn!("registry lookup for {} failed: {err}", self.config.package_name);
                        status.warn(&format!(
                            "Failed to get a version: {err}. \
                             The package may not have been published yet"
                        ));
                        Ok(None)
                    }
                }
            });
        lookup.ok().flatten()
    }

    /// Gate the run on the upstream and published versions.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::PublishedAhead` if the registry is ahead of
    /// upstream.
    pub fn check_versions(
        &self,
        tag: &ReleaseTag,
        published: Option<&Version>,
        status: &mut dyn StatusReporter,
    ) -> Result<PublishDecision> {
        run_task(status, "Checking versions", |status| {
            let decision = decide(tag.version(), published)?;
            match decision {
                PublishDecision::UpToDate => {
                    status.info("Versions are the same, no publishing required");
                }
                PublishDecision::Proceed => {
                    let current =
                        published.map_or_else(|| "unpublished".to_owned(), ToString::to_string);
                    status.update(&format!(
                        "Ready to publish version {} as newer than {current}",
                        tag.version()
                    ));
                }
            }
            Ok(decision)
        })
    }

    /// Clear the scratch directory and clone the tagged release into it.
    ///
    /// # Errors
    ///
    /// Returns `PublisherError::ScratchNotDirectory` if the scratch path is
    /// occupied by a file, or a git error if the clone fails.
    pub fn fetch(&self, tag: &ReleaseTag, status: &mut dyn StatusReporter) -> Result<()> {
        run_task(status, "Cloning the swagger-ui repository", |status| {
            let scratch = self.config.scratch_dir();
            if prepare_scratch_dir(&scratch)? == ScratchState::Cleared {
                status.update("Deleted old clone");
            }

            status.update(&format!("Cloning {}", self.config.upstream_url));
            clone_tag(
                self.executor,
                &self.config.upstream_url,
                tag,
                &self.config.clone_dir(),
            )
        })
    }

    /// Stage the package, write its manifest and install its dependencies.
    ///
    /// # Errors
    ///
    /// Returns the first copy, manifest or install failure.
    pub fn assemble(&self, status: &mut dyn StatusReporter) -> Result<Utf8PathBuf> {
        run_task(status, "Creating swagger-ui-scss version to push", |status| {
            let clone_dir = self.config.clone_dir();
            let stager = Stager::new(clone_dir.clone(), self.config.staging_dir());
            stager.prepare()?;
            stager.stage_all(&self.config.local_readme(), status)?;

            status.update("Creating package.json");
            let upstream = read_upstream_manifest(&clone_dir.join("package.json"))?;
            let manifest = build_manifest(self.config, &upstream)?;
            let manifest_path = stager.staging_path().join("package.json");
            write_manifest(&manifest, &manifest_path)?;
            debug!("wrote {manifest_path} for version {}", manifest.version);

            if self.config.skip_install {
                status.update("Skipping dependency installation");
            } else {
                status.update("Installing dependencies");
                install_dependencies(self.executor, stager.staging_path())?;
            }

            status.update("Done");
            Ok(stager.staging_path().to_owned())
        })
    }
}
