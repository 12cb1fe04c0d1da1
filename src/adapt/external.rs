use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::foundation::core::Basis;

/// Design parameters registered for a unit the app cannot modify (third-party screens).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExternalAdaptInfo {
    /// Axis that drives the ratio.
    pub basis: Basis,
    /// Design size along `basis` in dp; `<= 0` falls back to the global design size.
    pub size_in_dp: f32,
}

impl ExternalAdaptInfo {
    /// Parameters for `size_in_dp` along `basis`.
    pub fn new(basis: Basis, size_in_dp: f32) -> Self {
        Self { basis, size_in_dp }
    }
}

/// Registry of per-identity cancellations and overrides.
///
/// Registration switches the registry on; while it is off, lookups report nothing so the
/// orchestrator falls through to the unit's own capabilities.
#[derive(Debug, Default)]
pub struct ExternalAdaptRegistry {
    cancelled: RwLock<HashSet<String>>,
    overrides: RwLock<HashMap<String, ExternalAdaptInfo>>,
    run: AtomicBool,
}

impl ExternalAdaptRegistry {
    /// Empty, inactive registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opt `identity` out of adaptation.
    pub fn add_cancel(&self, identity: impl Into<String>) -> &Self {
        self.cancelled.write().insert(identity.into());
        self.set_run(true);
        self
    }

    /// Register design parameters for `identity`, replacing any previous ones.
    pub fn add_override(&self, identity: impl Into<String>, info: ExternalAdaptInfo) -> &Self {
        self.overrides.write().insert(identity.into(), info);
        self.set_run(true);
        self
    }

    /// Forget every registration for `identity`.
    pub fn remove(&self, identity: &str) {
        self.cancelled.write().remove(identity);
        self.overrides.write().remove(identity);
    }

    /// `identity` is registered as cancelled and the registry is active.
    pub fn is_cancel(&self, identity: &str) -> bool {
        self.is_run() && self.cancelled.read().contains(identity)
    }

    /// Registered parameters for `identity` while the registry is active.
    pub fn override_for(&self, identity: &str) -> Option<ExternalAdaptInfo> {
        if !self.is_run() {
            return None;
        }
        self.overrides.read().get(identity).copied()
    }

    /// Switch lookups on or off without dropping registrations.
    pub fn set_run(&self, run: bool) {
        self.run.store(run, Ordering::Release);
    }

    /// Whether lookups are active.
    pub fn is_run(&self) -> bool {
        self.run.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/adapt/external.rs"]
mod tests;
