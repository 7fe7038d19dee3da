//! Staged `package.json` synthesis.
//!
//! The staged manifest copies a handful of fields from upstream and layers
//! fixed downstream identities over them. Key order in the output follows
//! field order in [`StagedManifest`].

use crate::config::{ENTRY_POINT, PINNED_DEPENDENCY, PublisherConfig};
use crate::error::{PublisherError, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;

/// The upstream fields the staged manifest is derived from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamManifest {
    /// Upstream release version.
    pub version: String,
    /// Project homepage.
    #[serde(default)]
    pub homepage: Option<String>,
    /// Contributors, as strings or person objects.
    pub contributors: Vec<Value>,
    /// SPDX licence expression.
    #[serde(default)]
    pub license: Option<String>,
    /// Development dependencies, name to version range.
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

/// The `repository` field of the staged manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Version control system.
    #[serde(rename = "type")]
    pub kind: String,
    /// Repository URL.
    pub url: String,
}

/// The manifest written into the staged package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedManifest {
    /// Downstream package name.
    pub name: String,
    /// Version copied from upstream.
    pub version: String,
    /// Entry stylesheet.
    pub main: String,
    /// Homepage copied from upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Downstream repository pointer.
    pub repository: Repository,
    /// Upstream contributors plus the downstream maintainer.
    pub contributors: Vec<Value>,
    /// Licence copied from upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// The single runtime dependency.
    pub dependencies: BTreeMap<String, String>,
}

/// Read and parse an upstream `package.json`.
///
/// # Errors
///
/// Returns `PublisherError::ManifestRead` if the file cannot be read and
/// `PublisherError::ManifestParse` if it is not a manifest.
pub fn read_upstream_manifest(path: &Utf8Path) -> Result<UpstreamManifest> {
    let contents = fs::read_to_string(path).map_err(|source| PublisherError::ManifestRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| PublisherError::ManifestParse {
        path: path.to_owned(),
        source,
    })
}

/// Derive the staged manifest from upstream's.
///
/// The only dependency is taken from upstream's development dependencies,
/// not its runtime ones.
///
/// # Errors
///
/// Returns `PublisherError::MissingDevDependency` if upstream does not pin
/// the dependency.
pub fn build_manifest(
    config: &PublisherConfig,
    upstream: &UpstreamManifest,
) -> Result<StagedManifest> {
    let pinned = upstream
        .dev_dependencies
        .get(PINNED_DEPENDENCY)
        .ok_or_else(|| PublisherError::MissingDevDependency {
            name: PINNED_DEPENDENCY.to_owned(),
        })?;

    let mut contributors = upstream.contributors.clone();
    contributors.push(Value::String(config.contributor.clone()));

    Ok(StagedManifest {
        name: config.package_name.clone(),
        version: upstream.version.clone(),
        main: ENTRY_POINT.to_owned(),
        homepage: upstream.homepage.clone(),
        repository: Repository {
            kind: "git".to_owned(),
            url: format!("git+{}", config.downstream_repo_url),
        },
        contributors,
        license: upstream.license.clone(),
        dependencies: BTreeMap::from([(PINNED_DEPENDENCY.to_owned(), pinned.clone())]),
    })
}

/// Render a manifest as two-space indented JSON with a trailing newline.
///
/// # Errors
///
/// Returns `PublisherError::ManifestWrite` if serialization fails.
pub fn render_manifest(manifest: &StagedManifest, path: &Utf8Path) -> Result<String> {
    let mut rendered =
        serde_json::to_string_pretty(manifest).map_err(|err| PublisherError::ManifestWrite {
            path: path.to_owned(),
            source: err.into(),
        })?;
    rendered.push('\n');
    Ok(rendered)
}

/// Write a manifest to `path`.
///
/// # Errors
///
/// Returns `PublisherError::ManifestWrite` if the file cannot be written.
pub fn write_manifest(manifest: &StagedManifest, path: &Utf8Path) -> Result<()> {
    let rendered = render_manifest(manifest, path)?;
    fs::write(path, rendered).map_err(|source| PublisherError::ManifestWrite {
        path: path.to_owned(),
        source,
    })
}
