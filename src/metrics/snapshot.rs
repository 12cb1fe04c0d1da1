use crate::foundation::core::{Basis, PxSize};
use crate::foundation::error::{AutoSizeError, AutoSizeResult};

/// Raw display facts reported by the host metrics provider before any adaptation ran.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceScreen {
    /// Full display width including window decorations.
    pub real_width_px: i32,
    /// Full display height including window decorations.
    pub real_height_px: i32,
    /// Height of the status bar, subtracted from the height unless the device size is used.
    #[serde(default)]
    pub status_bar_height_px: i32,
    /// Platform density.
    pub density: f32,
    /// Platform scaled density (density times the user's font scale).
    pub scaled_density: f32,
    /// Platform density dpi.
    pub density_dpi: i32,
    /// Platform horizontal dpi, if the provider exposes it.
    #[serde(default)]
    pub xdpi: Option<f32>,
    /// Logical screen width in dp as reported by the platform configuration.
    #[serde(default)]
    pub screen_width_dp: i32,
    /// Logical screen height in dp as reported by the platform configuration.
    #[serde(default)]
    pub screen_height_dp: i32,
}

/// Immutable baseline used by every adaptation pass.
///
/// The `initial_*` fields are captured once and never rewritten: they are both the input to
/// the font-scale ratio and the restore target for cancellation. Only the current screen
/// dimensions and the per-call window override are replaced, always by building a new value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    /// Current screen width in pixels.
    pub screen_width_px: i32,
    /// Current screen height in pixels.
    pub screen_height_px: i32,
    /// Density before adaptation.
    pub initial_density: f32,
    /// Scaled density before adaptation.
    pub initial_scaled_density: f32,
    /// Density dpi before adaptation.
    pub initial_density_dpi: i32,
    /// Horizontal dpi before adaptation; required only when a subunit is active.
    #[serde(default)]
    pub initial_xdpi: Option<f32>,
    /// Logical width in dp before adaptation.
    #[serde(default)]
    pub initial_screen_width_dp: i32,
    /// Logical height in dp before adaptation.
    #[serde(default)]
    pub initial_screen_height_dp: i32,
    /// Intrinsic window size in dp for large-screen hosts, replacing the screen as ratio base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_override_dp: Option<PxSize>,
}

impl MetricsSnapshot {
    /// Capture the baseline from what the host reports at startup.
    ///
    /// Without `use_device_size` the status bar height is removed from the screen height.
    pub fn capture(screen: &DeviceScreen, use_device_size: bool) -> AutoSizeResult<Self> {
        let height = if use_device_size {
            screen.real_height_px
        } else {
            screen
                .real_height_px
                .saturating_sub(screen.status_bar_height_px)
                .max(0)
        };
        let snapshot = Self {
            screen_width_px: screen.real_width_px,
            screen_height_px: height,
            initial_density: screen.density,
            initial_scaled_density: screen.scaled_density,
            initial_density_dpi: screen.density_dpi,
            initial_xdpi: screen.xdpi,
            initial_screen_width_dp: screen.screen_width_dp,
            initial_screen_height_dp: screen.screen_height_dp,
            window_override_dp: None,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the invariants every computation relies on.
    pub fn validate(&self) -> AutoSizeResult<()> {
        if self.screen_width_px <= 0 || self.screen_height_px <= 0 {
            return Err(AutoSizeError::validation(format!(
                "screen size must be > 0, got {}x{}",
                self.screen_width_px, self.screen_height_px
            )));
        }
        if !self.initial_density.is_finite() || self.initial_density <= 0.0 {
            return Err(AutoSizeError::missing_baseline(format!(
                "initial density must be > 0, got {}",
                self.initial_density
            )));
        }
        if !self.initial_scaled_density.is_finite() || self.initial_scaled_density <= 0.0 {
            return Err(AutoSizeError::missing_baseline(format!(
                "initial scaled density must be > 0, got {}",
                self.initial_scaled_density
            )));
        }
        if let Some(xdpi) = self.initial_xdpi
            && (!xdpi.is_finite() || xdpi <= 0.0)
        {
            return Err(AutoSizeError::missing_baseline(format!(
                "initial xdpi must be > 0 when present, got {xdpi}"
            )));
        }
        Ok(())
    }

    /// Copy with new current screen dimensions; the baseline fields are carried over untouched.
    pub fn with_screen_size(self, width_px: i32, height_px: i32) -> Self {
        Self {
            screen_width_px: width_px,
            screen_height_px: height_px,
            ..self
        }
    }

    /// Copy with the per-call intrinsic window size (or without one).
    pub fn with_window_override(self, window_override_dp: Option<PxSize>) -> Self {
        Self {
            window_override_dp,
            ..self
        }
    }

    /// Current screen dimensions in pixels.
    pub fn screen_size(&self) -> PxSize {
        PxSize::new(self.screen_width_px, self.screen_height_px)
    }

    /// Ratio between the user's font preference and the plain density.
    pub fn font_scale(&self) -> f32 {
        self.initial_scaled_density / self.initial_density
    }

    /// Pixel extent along `basis` that the design size is stretched across.
    ///
    /// With a window override this is the override dimension converted to pixels using the
    /// initial density, truncated toward zero. Otherwise it is the screen dimension.
    pub fn base_size(&self, basis: Basis) -> i32 {
        match self.window_override_dp {
            Some(window) => (window.along(basis) as f32 * self.initial_density) as i32,
            None => self.screen_size().along(basis),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/snapshot.rs"]
mod tests;
