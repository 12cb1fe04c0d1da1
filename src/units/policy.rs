use crate::foundation::core::Basis;

/// Auxiliary physical-length unit that layouts may use instead of dp.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Subunits {
    /// No subunit; the xdpi channel is left untouched.
    #[default]
    None,
    /// Points (1/72 inch).
    Pt,
    /// Inches.
    In,
    /// Millimeters.
    Mm,
}

impl Subunits {
    /// Multiplier that turns a unit factor into the xdpi the platform expects.
    ///
    /// `None` for [`Subunits::None`].
    pub fn xdpi_factor(self) -> Option<f32> {
        match self {
            Self::None => None,
            Self::Pt => Some(72.0),
            Self::In => Some(1.0),
            Self::Mm => Some(25.4),
        }
    }
}

/// Which output channels of an adaptation are meaningful for the host.
///
/// This is a pure decision table: it holds configuration only and every query is a cheap
/// predicate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UnitPolicy {
    /// Active subunit.
    pub subunits: Subunits,
    /// Whether dp (density / densityDpi) is rewritten.
    pub supports_dp: bool,
    /// Whether sp (scaledDensity) is rewritten.
    pub supports_sp: bool,
    /// Whether the logical screen size in dp is rewritten (requires `supports_dp`).
    pub supports_screen_size_dp: bool,
    /// Design width expressed in subunits; `<= 0` falls back to the dp design size.
    pub design_width: f32,
    /// Design height expressed in subunits; `<= 0` falls back to the dp design size.
    pub design_height: f32,
}

impl Default for UnitPolicy {
    fn default() -> Self {
        Self {
            subunits: Subunits::None,
            supports_dp: true,
            supports_sp: true,
            supports_screen_size_dp: false,
            design_width: 0.0,
            design_height: 0.0,
        }
    }
}

impl UnitPolicy {
    /// Select the active subunit.
    pub fn with_subunits(mut self, subunits: Subunits) -> Self {
        self.subunits = subunits;
        self
    }

    /// Toggle dp support.
    pub fn with_dp(mut self, on: bool) -> Self {
        self.supports_dp = on;
        self
    }

    /// Toggle sp support.
    pub fn with_sp(mut self, on: bool) -> Self {
        self.supports_sp = on;
        self
    }

    /// Toggle logical-size-in-dp support.
    pub fn with_screen_size_dp(mut self, on: bool) -> Self {
        self.supports_screen_size_dp = on;
        self
    }

    /// Set the subunit design canvas.
    pub fn with_design_size(mut self, width: f32, height: f32) -> Self {
        self.design_width = width;
        self.design_height = height;
        self
    }

    /// `density` and `densityDpi` should be applied.
    pub fn applies_density(&self) -> bool {
        self.supports_dp
    }

    /// `scaledDensity` should be applied.
    pub fn applies_scaled_density(&self) -> bool {
        self.supports_sp
    }

    /// Logical width/height in dp should be applied.
    pub fn applies_screen_size_dp(&self) -> bool {
        self.supports_dp && self.supports_screen_size_dp
    }

    /// A subunit is active, so the unit factor (xdpi) should be applied.
    pub fn applies_unit_factor(&self) -> bool {
        self.subunits.xdpi_factor().is_some()
    }

    /// Raw subunit design size along `basis`; may be `<= 0` (meaning "unset").
    pub fn subunit_design_size(&self, basis: Basis) -> f32 {
        basis.pick(self.design_width, self.design_height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/units/policy.rs"]
mod tests;
