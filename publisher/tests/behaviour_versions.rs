//! Behaviour-driven tests for release selection and the publish gate.
//!
//! These scenarios cover which upstream tag is chosen and how it compares
//! with the version already on the registry.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use semver::Version;
use std::cell::RefCell;
use swagger_ui_scss_publisher::error::PublisherError;
use swagger_ui_scss_publisher::gate::{PublishDecision, decide};
use swagger_ui_scss_publisher::tags::{ReleaseTag, resolve_latest_tag};

// ---------------------------------------------------------------------------
// Tag resolution world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TagWorld {
    listing: RefCell<String>,
    resolved: RefCell<Option<ReleaseTag>>,
}

#[fixture]
fn tag_world() -> TagWorld {
    TagWorld::default()
}

fn listing_for(tags: &[&str]) -> String {
    tags.iter()
        .enumerate()
        .map(|(index, tag)| format!("{index:040x}\trefs/tags/{tag}\n"))
        .collect()
}

#[given("the upstream lists tags v1.0.0, v2.0.0 and v1.5.0")]
fn given_mixed_tags(tag_world: &TagWorld) {
    tag_world
        .listing
        .replace(listing_for(&["v1.0.0", "v2.0.0", "v1.5.0"]));
}

#[given("the upstream lists only pre-release tags")]
fn given_prerelease_tags(tag_world: &TagWorld) {
    tag_world
        .listing
        .replace(listing_for(&["v5.0.0-rc.1", "v5.1", "5.2.0", "v5.3.0^{}"]));
}

#[when("the latest release tag is resolved")]
fn when_tag_resolved(tag_world: &TagWorld) {
    let resolved = resolve_latest_tag(&tag_world.listing.borrow());
    tag_world.resolved.replace(resolved);
}

#[then("the resolved tag is {expected}")]
fn then_resolved_tag_is(tag_world: &TagWorld, expected: String) {
    let resolved = tag_world.resolved.borrow();
    let tag = resolved.as_ref().expect("expected a release tag");
    assert_eq!(tag.name(), expected);
}

#[then("no release tag is resolved")]
fn then_no_tag_resolved(tag_world: &TagWorld) {
    assert!(tag_world.resolved.borrow().is_none());
}

// ---------------------------------------------------------------------------
// Gate world
// ---------------------------------------------------------------------------

type DecisionResult = Result<PublishDecision, PublisherError>;

#[derive(Default)]
struct GateWorld {
    upstream: RefCell<Option<Version>>,
    published: RefCell<Option<Version>>,
    decision: RefCell<Option<DecisionResult>>,
}

#[fixture]
fn gate_world() -> GateWorld {
    GateWorld::default()
}

fn parse_version(text: &str) -> Version {
    Version::parse(text).expect("scenario version should parse")
}

#[given("upstream version {version}")]
fn given_upstream_version(gate_world: &GateWorld, version: String) {
    gate_world.upstream.replace(Some(parse_version(&version)));
}

#[given("published version {version}")]
fn given_published_version(gate_world: &GateWorld, version: String) {
    gate_world.published.replace(Some(parse_version(&version)));
}

#[given("no published version")]
fn given_no_published_version(gate_world: &GateWorld) {
    gate_world.published.replace(None);
}

#[when("the publish decision is made")]
fn when_decision_made(gate_world: &GateWorld) {
    let upstream = gate_world.upstream.borrow();
    let upstream = upstream.as_ref().expect("upstream version not set");
    let published = gate_world.published.borrow();
    let decision = decide(upstream, published.as_ref());
    gate_world.decision.replace(Some(decision));
}

fn decision(gate_world: &GateWorld) -> Option<PublishDecision> {
    let decision = gate_world.decision.borrow();
    match decision.as_ref().expect("decision not made") {
        Ok(decision) => Some(*decision),
        Err(_) => None,
    }
}

#[then("the package is up to date")]
fn then_up_to_date(gate_world: &GateWorld) {
    assert_eq!(decision(gate_world), Some(PublishDecision::UpToDate));
}

#[then("publishing proceeds")]
fn then_proceeds(gate_world: &GateWorld) {
    assert_eq!(decision(gate_world), Some(PublishDecision::Proceed));
}

#[then("the decision fails because the registry is ahead")]
fn then_registry_ahead(gate_world: &GateWorld) {
    let decision = gate_world.decision.borrow();
    let decision = decision.as_ref().expect("decision not made");
    assert!(
        matches!(decision, Err(PublisherError::PublishedAhead { .. })),
        "expected PublishedAhead, got {decision:?}"
    );
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/publisher.feature", index = 0)]
fn scenario_highest_release_tag(tag_world: TagWorld) {
    let _ = tag_world;
}

#[scenario(path = "tests/features/publisher.feature", index = 1)]
fn scenario_prerelease_tags_ignored(tag_world: TagWorld) {
    let _ = tag_world;
}

#[scenario(path = "tests/features/publisher.feature", index = 2)]
fn scenario_matching_versions(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/publisher.feature", index = 3)]
fn scenario_newer_upstream(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/publisher.feature", index = 4)]
fn scenario_registry_ahead(gate_world: GateWorld) {
    let _ = gate_world;
}

#[scenario(path = "tests/features/publisher.feature", index = 5)]
fn scenario_never_published(gate_world: GateWorld) {
    let _ = gate_world;
}
