//! Error types for the swagger-ui-scss publisher.
//!
//! Every variant is terminal for a run: the pipeline has no retries, so each
//! message carries enough context for the operator to act on it directly.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can end a publish run.
#[derive(Debug, Error)]
pub enum PublisherError {
    /// The upstream remote has no tag of the form `vX.Y.Z`.
    #[error("no release tag of the form vX.Y.Z found on {remote}")]
    NoReleaseTag {
        /// Remote URL that was listed.
        remote: String,
    },

    /// The registry already carries a version newer than the upstream tag.
    #[error(
        "published version {published} is newer than upstream version {upstream}; \
         the upstream tag list is behind the registry"
    )]
    PublishedAhead {
        /// Latest upstream release version.
        upstream: semver::Version,
        /// Version currently published to the registry.
        published: semver::Version,
    },

    /// Something other than a directory occupies the scratch path.
    #[error("existing scratch path {path} is not a directory; remove it and retry")]
    ScratchNotDirectory {
        /// The offending path.
        path: Utf8PathBuf,
    },

    /// A git operation exited unsuccessfully.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed (ls-remote, clone).
        operation: &'static str,
        /// Trimmed stderr from git.
        message: String,
    },

    /// Copying a file or directory into the staging tree failed.
    #[error("staging failed: {reason}")]
    StagingFailed {
        /// Description of the failed copy.
        reason: String,
    },

    /// The upstream manifest could not be read.
    #[error("failed to read manifest {path}")]
    ManifestRead {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The upstream manifest is not the JSON shape we expect.
    #[error("invalid manifest {path}: {source}")]
    ManifestParse {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The upstream manifest lacks the development dependency we pin.
    #[error("upstream manifest has no devDependencies entry for {name}")]
    MissingDevDependency {
        /// Name of the missing dependency.
        name: String,
    },

    /// The staged manifest could not be written.
    #[error("failed to write manifest {path}")]
    ManifestWrite {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The package manager exited unsuccessfully.
    #[error("failed to install dependencies with {tool}: {message}")]
    DependencyInstall {
        /// The package manager binary.
        tool: &'static str,
        /// Exit description.
        message: String,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the path.
        path: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`PublisherError`].
pub type Result<T> = std::result::Result<T, PublisherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_ahead_names_both_versions() {
        let err = PublisherError::PublishedAhead {
            upstream: semver::Version::new(1, 9, 0),
            published: semver::Version::new(2, 0, 0),
        };
        let msg = err.to_string();
        assert!(msg.contains("1.9.0"));
        assert!(msg.contains("2.0.0"));
    }

    #[test]
    fn scratch_not_directory_includes_path() {
        let err = PublisherError::ScratchNotDirectory {
            path: Utf8PathBuf::from("/work/tmp"),
        };
        assert!(err.to_string().contains("/work/tmp"));
    }

    #[test]
    fn git_error_includes_operation_and_message() {
        let err = PublisherError::Git {
            operation: "clone",
            message: "Remote branch v9.9.9 not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("clone"));
        assert!(msg.contains("v9.9.9"));
    }

    #[test]
    fn dependency_install_error_includes_exit_code() {
        let err = PublisherError::DependencyInstall {
            tool: "npm",
            message: "exited with status 1".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm"));
        assert!(msg.contains("status 1"));
    }

    #[test]
    fn manifest_read_preserves_source() {
        let err = PublisherError::ManifestRead {
            path: Utf8PathBuf::from("package.json"),
            source: std::io::Error::other("permission denied"),
        };
        assert!(err.to_string().contains("package.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
