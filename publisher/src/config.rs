//! Fixed identities and derived paths for a publish run.
//!
//! The defaults describe the one package this tool exists to produce. Paths
//! are all rooted at a single working directory so tests can point a run at
//! a temporary tree.

use camino::Utf8PathBuf;

/// Upstream repository whose style sources are repackaged.
pub const UPSTREAM_REPO_URL: &str = "https://github.com/swagger-api/swagger-ui.git";

/// Name of the downstream npm package.
pub const PACKAGE_NAME: &str = "@createiq/swagger-ui-scss";

/// Repository that hosts the downstream package.
pub const DOWNSTREAM_REPO_URL: &str = "https://github.com/linklaterscreateiq/swagger-ui-scss";

/// Contributor appended to the upstream contributor list.
pub const DOWNSTREAM_CONTRIBUTOR: &str = "Mathew Mannion <mathew.mannion@linklaters.com>";

/// Entry point of the staged package.
pub const ENTRY_POINT: &str = "./style/main.scss";

/// Upstream development dependency that becomes the staged package's only
/// runtime dependency.
pub const PINNED_DEPENDENCY: &str = "tachyons-sass";

/// Public npm registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

const SCRATCH_DIR_NAME: &str = "tmp";
const CLONE_DIR_NAME: &str = "swagger-ui";
const STAGING_DIR_NAME: &str = "swagger-ui-scss";
const README_FILE: &str = "README.md";

/// Configuration for one publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Directory the scratch tree and local readme are resolved against.
    pub workdir: Utf8PathBuf,
    /// Git URL of the upstream repository.
    pub upstream_url: String,
    /// Base URL of the npm registry.
    pub registry_url: String,
    /// Name of the downstream package.
    pub package_name: String,
    /// URL recorded in the staged manifest's `repository` field.
    pub downstream_repo_url: String,
    /// Contributor appended to the staged manifest.
    pub contributor: String,
    /// Stop after writing the manifest instead of running `npm install`.
    pub skip_install: bool,
}

impl PublisherConfig {
    /// Create a configuration with production defaults rooted at `workdir`.
    ///
    /// # Example
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use swagger_ui_scss_publisher::config::PublisherConfig;
    ///
    /// let config = PublisherConfig::new(Utf8PathBuf::from("/work"));
    /// assert_eq!(config.scratch_dir(), "/work/tmp");
    /// assert_eq!(config.staging_dir(), "/work/tmp/swagger-ui-scss");
    /// ```
    #[must_use]
    pub fn new(workdir: Utf8PathBuf) -> Self {
        Self {
            workdir,
            upstream_url: UPSTREAM_REPO_URL.to_owned(),
            registry_url: DEFAULT_REGISTRY_URL.to_owned(),
            package_name: PACKAGE_NAME.to_owned(),
            downstream_repo_url: DOWNSTREAM_REPO_URL.to_owned(),
            contributor: DOWNSTREAM_CONTRIBUTOR.to_owned(),
            skip_install: false,
        }
    }

    /// Scratch directory deleted and recreated on every run.
    #[must_use]
    pub fn scratch_dir(&self) -> Utf8PathBuf {
        self.workdir.join(SCRATCH_DIR_NAME)
    }

    /// Destination of the shallow upstream clone.
    #[must_use]
    pub fn clone_dir(&self) -> Utf8PathBuf {
        self.scratch_dir().join(CLONE_DIR_NAME)
    }

    /// Root of the staged package.
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.scratch_dir().join(STAGING_DIR_NAME)
    }

    /// Readme maintained alongside this tool and shipped with the package.
    #[must_use]
    pub fn local_readme(&self) -> Utf8PathBuf {
        self.workdir.join(README_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_and_staging_live_under_scratch() {
        let config = PublisherConfig::new(Utf8PathBuf::from("/work"));
        assert!(config.clone_dir().starts_with(config.scratch_dir()));
        assert!(config.staging_dir().starts_with(config.scratch_dir()));
        assert_ne!(config.clone_dir(), config.staging_dir());
    }

    #[test]
    fn readme_is_read_from_workdir() {
        let config = PublisherConfig::new(Utf8PathBuf::from("/work"));
        assert_eq!(config.local_readme(), Utf8PathBuf::from("/work/README.md"));
    }

    #[test]
    fn defaults_target_public_registry() {
        let config = PublisherConfig::new(Utf8PathBuf::from("/work"));
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.package_name, PACKAGE_NAME);
        assert!(!config.skip_install);
    }
}
