//! Publish gating.
//!
//! Compares the resolved upstream release against the version already on
//! the registry and decides whether a new package needs staging.

use crate::error::{PublisherError, Result};
use semver::Version;
use std::cmp::Ordering;

/// Outcome of comparing upstream and published versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDecision {
    /// The registry already carries the upstream release.
    UpToDate,
    /// Upstream is newer, or nothing has been published yet.
    Proceed,
}

/// Decide whether `upstream` warrants a new publish.
///
/// Build metadata is ignored when comparing.
///
/// # Errors
///
/// Returns `PublisherError::PublishedAhead` when the registry holds a
/// version newer than upstream.
///
/// # Examples
///
/// ```
/// use semver::Version;
/// use swagger_ui_scss_publisher::gate::{PublishDecision, decide};
///
/// let upstream = Version::new(2, 0, 0);
/// assert_eq!(decide(&upstream, None)?, PublishDecision::Proceed);
/// assert_eq!(decide(&upstream, Some(&upstream))?, PublishDecision::UpToDate);
/// # Ok::<(), swagger_ui_scss_publisher::error::PublisherError>(())
/// ```
pub fn decide(upstream: &Version, published: Option<&Version>) -> Result<PublishDecision> {
    let Some(published) = published else {
        return Ok(PublishDecision::Proceed);
    };

    match upstream.cmp_precedence(published) {
        Ordering::Equal => Ok(PublishDecision::UpToDate),
        Ordering::Less => Err(PublisherError::PublishedAhead {
            upstream: upstream.clone(),
            published: published.clone(),
        }),
        Ordering::Greater => Ok(PublishDecision::Proceed),
    }
}
