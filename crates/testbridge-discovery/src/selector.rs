//! Engine version selection
//!
//! Tiers are consulted in precedence order and the first tier that yields an
//! acceptable candidate wins:
//!
//! 1. Developer: highest in-bounds version, never warns.
//! 2. Installed: exact match for the target version, else highest in-bounds.
//!    Pre-release or too-old picks are rejected with a warning.
//! 3. Default: highest in-bounds. Returned even when older than the target
//!    (with a warning). Nothing found here means nothing can run.
//!
//! Only candidates whose runtime is at or below the caller's runtime are
//! eligible. Within a tier the higher product version wins and ties go to the
//! higher runtime.

use testbridge_core::config::EngineConfig;
use testbridge_core::{EngineVersion, RuntimeVersion};

use crate::candidate::{EngineCandidate, Tier};
use crate::catalog::VersionCatalog;
use crate::policy::{SelectionPolicy, WarningMessages};
use crate::warning::WarningSink;

/// Picks one engine candidate from a catalog
#[derive(Debug, Clone, Default)]
pub struct VersionSelector {
    policy: SelectionPolicy,
    messages: WarningMessages,
}

impl VersionSelector {
    pub fn new(policy: SelectionPolicy, messages: WarningMessages) -> Self {
        Self { policy, messages }
    }

    pub fn from_config(engine: &EngineConfig) -> Self {
        Self::new(
            SelectionPolicy::from_config(engine),
            WarningMessages::from_config(engine),
        )
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Resolve the engine to drive a target built against `target`
    pub fn resolve(
        &self,
        catalog: &VersionCatalog,
        target: EngineVersion,
        runtime: &RuntimeVersion,
        sink: &mut dyn WarningSink,
    ) -> Option<EngineCandidate> {
        self.resolve_with_tier(catalog, target, runtime, sink)
            .map(|(_, candidate)| candidate)
    }

    /// Like [`resolve`](Self::resolve), also reporting the winning tier
    pub fn resolve_with_tier(
        &self,
        catalog: &VersionCatalog,
        target: EngineVersion,
        runtime: &RuntimeVersion,
        sink: &mut dyn WarningSink,
    ) -> Option<(Tier, EngineCandidate)> {
        if let Some(found) = self.pick_developer(catalog, runtime) {
            return Some((Tier::Developer, found));
        }
        if let Some(found) = self.pick_installed(catalog, target, runtime, sink) {
            return Some((Tier::Installed, found));
        }
        self.pick_default(catalog, target, runtime, sink)
            .map(|found| (Tier::Default, found))
    }

    fn pick_developer(
        &self,
        catalog: &VersionCatalog,
        runtime: &RuntimeVersion,
    ) -> Option<EngineCandidate> {
        self.highest(catalog.tier(Tier::Developer), runtime)
    }

    fn pick_installed(
        &self,
        catalog: &VersionCatalog,
        target: EngineVersion,
        runtime: &RuntimeVersion,
        sink: &mut dyn WarningSink,
    ) -> Option<EngineCandidate> {
        let candidates = catalog.tier(Tier::Installed);
        let found = exact(candidates, target, runtime).or_else(|| self.highest(candidates, runtime))?;

        if self.policy.is_prerelease(found.product_version()) {
            sink.warn(&self.messages.install_stable(self.policy.first_stable_version));
            return None;
        }

        if found.product_version() < target {
            sink.warn(&self.messages.upgrade_installed(target));
            return None;
        }

        Some(found)
    }

    fn pick_default(
        &self,
        catalog: &VersionCatalog,
        target: EngineVersion,
        runtime: &RuntimeVersion,
        sink: &mut dyn WarningSink,
    ) -> Option<EngineCandidate> {
        let Some(found) = self.highest(catalog.tier(Tier::Default), runtime) else {
            sink.warn(&self.messages.no_runner(runtime));
            return None;
        };

        if found.product_version() < target {
            sink.warn(&self.messages.bundled_outdated(target));
        }

        Some(found)
    }

    fn highest(
        &self,
        candidates: &[EngineCandidate],
        runtime: &RuntimeVersion,
    ) -> Option<EngineCandidate> {
        candidates
            .iter()
            .filter(|c| c.runtime_version().runs_on(runtime))
            .filter(|c| self.policy.in_bounds(c.product_version()))
            .max_by(|a, b| rank(a).cmp(&rank(b)))
            .cloned()
    }
}

fn exact(
    candidates: &[EngineCandidate],
    target: EngineVersion,
    runtime: &RuntimeVersion,
) -> Option<EngineCandidate> {
    candidates
        .iter()
        .filter(|c| c.runtime_version().runs_on(runtime))
        .filter(|c| c.product_version() == target)
        .max_by(|a, b| a.runtime_version().cmp(b.runtime_version()))
        .cloned()
}

fn rank(candidate: &EngineCandidate) -> (EngineVersion, &RuntimeVersion) {
    (candidate.product_version(), candidate.runtime_version())
}
