use crate::foundation::core::PxSize;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::scale::compute::ScaleResult;
use crate::units::policy::UnitPolicy;

/// Host-side display metrics object that an adaptation is written into.
pub trait MetricsSurface {
    /// Pixels per dp.
    fn set_density(&mut self, density: f32);
    /// Density expressed in dpi.
    fn set_density_dpi(&mut self, density_dpi: i32);
    /// Pixels per sp.
    fn set_scaled_density(&mut self, scaled_density: f32);
    /// Horizontal dpi, repurposed as the subunit scale.
    fn set_xdpi(&mut self, xdpi: f32);
    /// Logical screen size in dp.
    fn set_screen_size_dp(&mut self, size: PxSize);
}

/// The subset of values a host should write, as decided by the unit policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsPatch {
    /// New density, when dp is supported.
    pub density: Option<f32>,
    /// New density dpi, when dp is supported.
    pub density_dpi: Option<i32>,
    /// New scaled density, when sp is supported.
    pub scaled_density: Option<f32>,
    /// New xdpi, when a subunit is active.
    pub xdpi: Option<f32>,
    /// New logical size, when dp and logical size are supported.
    pub screen_size_dp: Option<PxSize>,
}

impl MetricsPatch {
    /// Patch for an adapted result.
    pub fn from_result(result: &ScaleResult, policy: &UnitPolicy) -> Self {
        let dp = policy.applies_density();
        Self {
            density: dp.then_some(result.density),
            density_dpi: dp.then_some(result.density_dpi),
            scaled_density: policy
                .applies_scaled_density()
                .then_some(result.scaled_density),
            xdpi: policy
                .subunits
                .xdpi_factor()
                .map(|factor| result.unit_factor * factor),
            screen_size_dp: policy
                .applies_screen_size_dp()
                .then(|| PxSize::new(result.logical_width, result.logical_height)),
        }
    }

    /// Patch that puts the captured baseline back.
    ///
    /// The xdpi is taken from the baseline as-is rather than through a unit factor.
    pub fn restore(baseline: &MetricsSnapshot, policy: &UnitPolicy) -> Self {
        let dp = policy.applies_density();
        Self {
            density: dp.then_some(baseline.initial_density),
            density_dpi: dp.then_some(baseline.initial_density_dpi),
            scaled_density: policy
                .applies_scaled_density()
                .then_some(baseline.initial_scaled_density),
            xdpi: if policy.applies_unit_factor() {
                baseline.initial_xdpi
            } else {
                None
            },
            screen_size_dp: policy.applies_screen_size_dp().then(|| {
                PxSize::new(
                    baseline.initial_screen_width_dp,
                    baseline.initial_screen_height_dp,
                )
            }),
        }
    }

    /// Nothing would be written.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Write every present value into `surface`.
    pub fn apply_to<S: MetricsSurface + ?Sized>(&self, surface: &mut S) {
        if let Some(v) = self.density {
            surface.set_density(v);
        }
        if let Some(v) = self.density_dpi {
            surface.set_density_dpi(v);
        }
        if let Some(v) = self.scaled_density {
            surface.set_scaled_density(v);
        }
        if let Some(v) = self.xdpi {
            surface.set_xdpi(v);
        }
        if let Some(v) = self.screen_size_dp {
            surface.set_screen_size_dp(v);
        }
    }
}

/// Plain-value [`MetricsSurface`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlainMetrics {
    /// Pixels per dp.
    pub density: f32,
    /// Density dpi.
    pub density_dpi: i32,
    /// Pixels per sp.
    pub scaled_density: f32,
    /// Horizontal dpi.
    pub xdpi: Option<f32>,
    /// Logical size in dp.
    pub screen_size_dp: PxSize,
}

impl PlainMetrics {
    /// Metrics as they were before any adaptation.
    pub fn from_baseline(baseline: &MetricsSnapshot) -> Self {
        Self {
            density: baseline.initial_density,
            density_dpi: baseline.initial_density_dpi,
            scaled_density: baseline.initial_scaled_density,
            xdpi: baseline.initial_xdpi,
            screen_size_dp: PxSize::new(
                baseline.initial_screen_width_dp,
                baseline.initial_screen_height_dp,
            ),
        }
    }
}

impl MetricsSurface for PlainMetrics {
    fn set_density(&mut self, density: f32) {
        self.density = density;
    }

    fn set_density_dpi(&mut self, density_dpi: i32) {
        self.density_dpi = density_dpi;
    }

    fn set_scaled_density(&mut self, scaled_density: f32) {
        self.scaled_density = scaled_density;
    }

    fn set_xdpi(&mut self, xdpi: f32) {
        self.xdpi = Some(xdpi);
    }

    fn set_screen_size_dp(&mut self, size: PxSize) {
        self.screen_size_dp = size;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/adapt/apply.rs"]
mod tests;
