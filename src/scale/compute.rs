use crate::foundation::core::Basis;
use crate::foundation::error::{AutoSizeError, AutoSizeResult};
use crate::metrics::snapshot::MetricsSnapshot;
use crate::units::policy::UnitPolicy;

/// Baseline density the platform defines dpi against.
pub const DENSITY_DEFAULT_DPI: f32 = 160.0;

/// Inputs of one adaptation, already resolved by the orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdaptationRequest {
    /// Authored canvas extent along `basis`, in dp.
    pub design_size: f32,
    /// Axis that drives the ratio.
    pub basis: Basis,
    /// Canvas extent used for the subunit factor; `<= 0` means "same as `design_size`".
    #[serde(default)]
    pub subunit_design_size: f32,
    /// Leave the user's font scale out of the scaled density.
    #[serde(default)]
    pub exclude_font_scale: bool,
    /// Whether the baseline height was captured including the status bar.
    #[serde(default)]
    pub use_device_size: bool,
}

impl AdaptationRequest {
    /// Request with default flags for `design_size` along `basis`.
    pub fn new(design_size: f32, basis: Basis) -> Self {
        Self {
            design_size,
            basis,
            subunit_design_size: 0.0,
            exclude_font_scale: false,
            use_device_size: false,
        }
    }

    /// Set the subunit design size.
    pub fn with_subunit_design_size(mut self, size: f32) -> Self {
        self.subunit_design_size = size;
        self
    }

    /// Set font-scale exclusion.
    pub fn with_exclude_font_scale(mut self, on: bool) -> Self {
        self.exclude_font_scale = on;
        self
    }

    /// Set the device-size flag.
    pub fn with_use_device_size(mut self, on: bool) -> Self {
        self.use_device_size = on;
        self
    }

    /// Subunit design size with the fallback onto `design_size` applied.
    pub fn effective_subunit_design_size(&self) -> f32 {
        if self.subunit_design_size > 0.0 {
            self.subunit_design_size
        } else {
            self.design_size
        }
    }

    /// Fail with [`AutoSizeError::InvalidDesignSize`] unless the design size is finite and `> 0`.
    pub fn validate(&self) -> AutoSizeResult<()> {
        if !self.design_size.is_finite() || self.design_size <= 0.0 {
            return Err(AutoSizeError::InvalidDesignSize(self.design_size));
        }
        Ok(())
    }
}

/// Replacement scaling factors produced by one computation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleResult {
    /// Pixels per dp.
    pub density: f32,
    /// `density * 160`, truncated.
    pub density_dpi: i32,
    /// Pixels per sp.
    pub scaled_density: f32,
    /// Pixels per subunit design unit, before the unit-specific multiplier.
    pub unit_factor: f32,
    /// Screen width expressed in the new density, truncated.
    pub logical_width: i32,
    /// Screen height expressed in the new density, truncated.
    pub logical_height: i32,
}

/// Derive the replacement metrics for `request` against `baseline`.
///
/// Every integer is produced by truncation toward zero, in this order: base size, dpi,
/// logical width, logical height. The logical size always covers the full screen, even when
/// the base size came from a window override.
///
/// A base size that truncates to zero (for example a tiny window override) is rejected
/// rather than producing a zero density.
pub fn compute(
    request: &AdaptationRequest,
    baseline: &MetricsSnapshot,
) -> AutoSizeResult<ScaleResult> {
    request.validate()?;
    baseline.validate()?;

    let base_size = baseline.base_size(request.basis);
    if base_size <= 0 {
        return Err(AutoSizeError::validation(format!(
            "base size along {} must be > 0, got {base_size}",
            request.basis.as_str()
        )));
    }
    let subunit_design_size = request.effective_subunit_design_size();

    let density = base_size as f32 / request.design_size;
    let density_dpi = (density * DENSITY_DEFAULT_DPI) as i32;
    let font_scale = if request.exclude_font_scale {
        1.0
    } else {
        baseline.font_scale()
    };
    let scaled_density = density * font_scale;
    let unit_factor = base_size as f32 / subunit_design_size;
    let logical_width = (baseline.screen_width_px as f32 / density) as i32;
    let logical_height = (baseline.screen_height_px as f32 / density) as i32;

    Ok(ScaleResult {
        density,
        density_dpi,
        scaled_density,
        unit_factor,
        logical_width,
        logical_height,
    })
}

/// Result that puts the platform back to its pre-adaptation state.
///
/// The unit factor is the initial xdpi divided by the subunit multiplier, so the apply step
/// multiplies it back to the captured value.
pub fn restore_original(
    baseline: &MetricsSnapshot,
    policy: &UnitPolicy,
) -> AutoSizeResult<ScaleResult> {
    let unit_factor = match policy.subunits.xdpi_factor() {
        Some(factor) => {
            let xdpi = baseline.initial_xdpi.ok_or_else(|| {
                AutoSizeError::missing_baseline(format!(
                    "initial xdpi is required to restore {:?} subunits",
                    policy.subunits
                ))
            })?;
            xdpi / factor
        }
        None => baseline.initial_xdpi.unwrap_or_default(),
    };

    Ok(ScaleResult {
        density: baseline.initial_density,
        density_dpi: baseline.initial_density_dpi,
        scaled_density: baseline.initial_scaled_density,
        unit_factor,
        logical_width: baseline.initial_screen_width_dp,
        logical_height: baseline.initial_screen_height_dp,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scale/compute.rs"]
mod tests;
