//! npm registry lookup for the currently published version.
//!
//! A failed lookup never ends a run: the caller downgrades every
//! [`RegistryError`] to a warning and treats the package as unpublished.

use log::debug;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Media type for npm's abbreviated package metadata.
const ABBREVIATED_METADATA: &str = "application/vnd.npm.install-v1+json";

/// Source of the latest published version of a package.
#[cfg_attr(test, mockall::automock)]
pub trait RegistryClient {
    /// Fetch the version carried by the package's `latest` dist-tag.
    ///
    /// Any pre-release suffix is removed before parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the package is unknown, or the
    /// response does not carry a usable `latest` version.
    fn latest_version(&self, package: &str) -> Result<Version, RegistryError>;
}

/// Errors arising from registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// HTTP request failed.
    #[error("request to {url} failed: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The registry does not know the package (HTTP 404).
    #[error("package not found at {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The response body is not the expected JSON document.
    #[error("malformed registry response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document has no `latest` dist-tag.
    #[error("no latest dist-tag")]
    MissingLatest,

    /// The `latest` dist-tag is not a semantic version.
    #[error("latest dist-tag {value} is not a valid version")]
    InvalidVersion {
        /// The value found in the document.
        value: String,
    },
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: BTreeMap<String, String>,
}

/// Extract the `latest` dist-tag from a registry document.
///
/// The tag is truncated at the first `-` so that a pre-release such as
/// `5.2.0-1` compares as `5.2.0`.
///
/// # Errors
///
/// Returns an error if the body is not JSON, has no `latest` dist-tag, or
/// the truncated value does not parse as a version.
///
/// # Examples
///
/// ```
/// use swagger_ui_scss_publisher::registry::parse_latest_version;
///
/// let body = r#"{"dist-tags": {"latest": "5.2.0-1"}}"#;
/// let version = parse_latest_version(body)?;
/// assert_eq!(version.to_string(), "5.2.0");
/// # Ok::<(), swagger_ui_scss_publisher::registry::RegistryError>(())
/// ```
pub fn parse_latest_version(body: &str) -> Result<Version, RegistryError> {
    let document: PackageDocument = serde_json::from_str(body)?;
    let latest = document
        .dist_tags
        .get("latest")
        .ok_or(RegistryError::MissingLatest)?;
    let release = latest.split('-').next().unwrap_or_default();
    Version::parse(release).map_err(|_| RegistryError::InvalidVersion {
        value: latest.clone(),
    })
}

/// Registry client speaking HTTP via `ureq`.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    base_url: String,
}

impl HttpRegistry {
    /// Create a client for the registry at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Construct the document URL for a package.
    ///
    /// Scoped names keep their `@` and have the scope separator escaped, as
    /// npm clients do.
    ///
    /// # Examples
    ///
    /// ```
    /// use swagger_ui_scss_publisher::registry::HttpRegistry;
    ///
    /// let registry = HttpRegistry::new("https://registry.npmjs.org/");
    /// assert_eq!(
    ///     registry.package_url("@createiq/swagger-ui-scss"),
    ///     "https://registry.npmjs.org/@createiq%2fswagger-ui-scss"
    /// );
    /// ```
    #[must_use]
    pub fn package_url(&self, package: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            package.replace('/', "%2f")
        )
    }
}

impl RegistryClient for HttpRegistry {
    fn latest_version(&self, package: &str) -> Result<Version, RegistryError> {
        let url = self.package_url(package);
        debug!("fetching registry document {url}");
        let body = download_text(&url)?;
        parse_latest_version(&body)
    }
}

/// Fetch a URL and return the body as a string.
fn download_text(url: &str) -> Result<String, RegistryError> {
    let response = http_agent()
        .get(url)
        .header("Accept", ABBREVIATED_METADATA)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_string()
        .map_err(|e| RegistryError::Http {
            url: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Shared `ureq` agent.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a [`RegistryError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> RegistryError {
    match err {
        ureq::Error::StatusCode(404) => RegistryError::NotFound {
            url: url.to_owned(),
        },
        other => RegistryError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
