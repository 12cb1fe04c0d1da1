use crate::foundation::core::Basis;

/// Design parameters a unit declares for itself.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CustomAdapt {
    /// Axis that drives the ratio for this unit.
    pub basis: Basis,
    /// Design size along `basis` in dp; `<= 0` falls back to the global design size.
    pub size_in_dp: f32,
}

impl CustomAdapt {
    /// Parameters for `size_in_dp` along `basis`.
    pub fn new(basis: Basis, size_in_dp: f32) -> Self {
        Self { basis, size_in_dp }
    }
}

/// A UI unit (screen, sub-screen, dialog host) that can be adapted.
///
/// Capabilities are queried, not inherited: a unit opts out by returning `true` from
/// [`AdaptTarget::cancels_adaptation`] and declares its own canvas through
/// [`AdaptTarget::custom_adapt`].
pub trait AdaptTarget {
    /// Stable identity used for registry lookups and diagnostics.
    fn identity(&self) -> &str;

    /// The unit opts out of adaptation entirely.
    fn cancels_adaptation(&self) -> bool {
        false
    }

    /// Unit-specific design parameters, if any.
    fn custom_adapt(&self) -> Option<CustomAdapt> {
        None
    }
}

/// Value-typed [`AdaptTarget`] for hosts that describe units as data.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetInfo {
    /// Unit identity.
    pub identity: String,
    /// Opt out of adaptation.
    #[serde(default)]
    pub cancel: bool,
    /// Unit-specific design parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<CustomAdapt>,
}

impl TargetInfo {
    /// Unit that uses the global defaults.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            cancel: false,
            custom: None,
        }
    }

    /// Mark the unit as opting out.
    pub fn cancelled(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Attach unit-specific design parameters.
    pub fn with_custom(mut self, custom: CustomAdapt) -> Self {
        self.custom = Some(custom);
        self
    }
}

impl AdaptTarget for TargetInfo {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn cancels_adaptation(&self) -> bool {
        self.cancel
    }

    fn custom_adapt(&self) -> Option<CustomAdapt> {
        self.custom
    }
}
