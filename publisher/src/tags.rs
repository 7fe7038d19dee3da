//! Release tag selection.
//!
//! Upstream publishes many tag shapes (`v5.2.0`, `v5.2.0-rc.1`,
//! `v5.2.0+deno`, peeled `^{}` refs). Only plain `vMAJOR.MINOR.PATCH` tags
//! are considered releases.

use regex::Regex;
use semver::Version;
use std::fmt;
use std::sync::OnceLock;

/// A release tag in raw (`v5.2.0`) and parsed (`5.2.0`) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
    name: String,
    version: Version,
}

impl ReleaseTag {
    /// Raw tag name, including the leading `v`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version the tag names.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time literal")]
fn release_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+$").unwrap()
    })
}

#[expect(clippy::unwrap_used, reason = "pattern is a compile-time literal")]
fn ref_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^.*refs/tags/").unwrap()
    })
}

/// Strip everything up to and including the last `refs/tags/` segment.
///
/// # Examples
///
/// ```
/// use swagger_ui_scss_publisher::tags::strip_ref_prefix;
///
/// assert_eq!(strip_ref_prefix("abc123\trefs/tags/v5.2.0"), "v5.2.0");
/// assert_eq!(strip_ref_prefix("v5.2.0"), "v5.2.0");
/// ```
#[must_use]
pub fn strip_ref_prefix(line: &str) -> &str {
    ref_prefix_pattern()
        .find(line)
        .map_or(line, |prefix| line.get(prefix.end()..).unwrap_or_default())
}

/// Parse a tag name as a release tag.
///
/// Returns `None` unless the name is exactly `v<digits>.<digits>.<digits>`
/// and the remainder is a valid semantic version (no leading zeros).
///
/// # Examples
///
/// ```
/// use swagger_ui_scss_publisher::tags::parse_tag_name;
///
/// assert!(parse_tag_name("v5.2.0").is_some());
/// assert!(parse_tag_name("v5.2.0-rc.1").is_none());
/// assert!(parse_tag_name("5.2.0").is_none());
/// ```
#[must_use]
pub fn parse_tag_name(name: &str) -> Option<ReleaseTag> {
    let stripped = name.strip_prefix('v')?;
    let version = Version::parse(stripped).ok()?;
    if !release_tag_pattern().is_match(name) {
        return None;
    }
    Some(ReleaseTag {
        name: name.to_owned(),
        version,
    })
}

/// Pick the highest release tag from `git ls-remote --tags` output.
///
/// The remote's sort order is treated as a hint only; the highest version
/// wins regardless of position, and the first of equal versions is kept.
#[must_use]
pub fn resolve_latest_tag(listing: &str) -> Option<ReleaseTag> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_ref_prefix)
        .filter_map(parse_tag_name)
        .fold(None, |best: Option<ReleaseTag>, candidate| match best {
            Some(current) if current.version >= candidate.version => Some(current),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn listing(tags: &[&str]) -> String {
        tags.iter()
            .map(|tag| format!("0123456789abcdef\trefs/tags/{tag}\n"))
            .collect()
    }

    #[rstest]
    #[case::release("v5.2.0", true)]
    #[case::large_numbers("v10.20.300", true)]
    #[case::prerelease("v5.2.0-rc.1", false)]
    #[case::build_metadata("v5.2.0+deno", false)]
    #[case::two_components("v5.2", false)]
    #[case::no_prefix("5.2.0", false)]
    #[case::leading_zero("v05.2.0", false)]
    #[case::peeled("v5.2.0^{}", false)]
    #[case::uppercase_prefix("V5.2.0", false)]
    fn parse_tag_name_accepts_only_plain_releases(#[case] name: &str, #[case] accepted: bool) {
        assert_eq!(parse_tag_name(name).is_some(), accepted);
    }

    #[test]
    fn parse_tag_name_keeps_both_forms() {
        let tag = parse_tag_name("v5.2.0").expect("expected a release tag");
        assert_eq!(tag.name(), "v5.2.0");
        assert_eq!(tag.version(), &Version::new(5, 2, 0));
        assert_eq!(tag.to_string(), "v5.2.0");
    }

    #[rstest]
    #[case::plain("deadbeef\trefs/tags/v1.0.0", "v1.0.0")]
    #[case::nested("deadbeef\trefs/tags/refs/tags/v1.0.0", "v1.0.0")]
    #[case::bare("v1.0.0", "v1.0.0")]
    fn strip_ref_prefix_keeps_tag_name(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(strip_ref_prefix(line), expected);
    }

    #[test]
    fn resolve_latest_tag_ignores_list_order() {
        let tag = resolve_latest_tag(&listing(&["v1.0.0", "v2.0.0", "v1.5.0"]))
            .expect("expected a release tag");
        assert_eq!(tag.name(), "v2.0.0");
    }

    #[test]
    fn resolve_latest_tag_compares_numerically() {
        let tag = resolve_latest_tag(&listing(&["v5.9.0", "v5.10.0"]))
            .expect("expected a release tag");
        assert_eq!(tag.name(), "v5.10.0");
    }

    #[test]
    fn resolve_latest_tag_skips_prereleases_and_peeled_refs() {
        let tag = resolve_latest_tag(&listing(&[
            "v6.0.0-alpha.1",
            "v5.2.0^{}",
            "v5.2.0",
            "v5.1.9+deno",
        ]))
        .expect("expected a release tag");
        assert_eq!(tag.name(), "v5.2.0");
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_prereleases("abc\trefs/tags/v1.0.0-beta\nabc\trefs/tags/nightly\n")]
    fn resolve_latest_tag_returns_none_without_releases(#[case] output: &str) {
        assert!(resolve_latest_tag(output).is_none());
    }

    #[test]
    fn resolve_latest_tag_handles_crlf_output() {
        let tag = resolve_latest_tag("abc\trefs/tags/v3.0.0\r\nabc\trefs/tags/v3.1.0\r\n")
            .expect("expected a release tag");
        assert_eq!(tag.name(), "v3.1.0");
    }
}
