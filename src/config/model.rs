use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::Basis;
use crate::foundation::error::{AutoSizeError, AutoSizeResult};
use crate::scale::compute::AdaptationRequest;
use crate::units::policy::UnitPolicy;

/// Host configuration snapshot consumed by the adaptation engine.
///
/// This is a pure data model that can be built in code or loaded from JSON. The design sizes
/// are required; every other field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AutoSizeConfig {
    /// Global design canvas width in dp.
    pub design_width_dp: f32,
    /// Global design canvas height in dp.
    pub design_height_dp: f32,
    /// Global basis: width when `true`, height otherwise.
    #[serde(default = "default_true")]
    pub base_on_width: bool,
    /// Leave the system font scale out of the scaled density.
    #[serde(default)]
    pub exclude_font_scale: bool,
    /// Use the full device height (status bar included) as the baseline height.
    #[serde(default)]
    pub use_device_size: bool,
    /// Adapt sub-screen units (fragments) in addition to whole screens.
    #[serde(default)]
    pub custom_fragment: bool,
    /// Emit a diagnostic record for every adaptation.
    #[serde(default = "default_true")]
    pub log_enabled: bool,
    /// Unit channels and subunit canvas.
    #[serde(default)]
    pub units: UnitPolicy,
}

fn default_true() -> bool {
    true
}

impl AutoSizeConfig {
    /// Configuration with the given global design canvas and default flags.
    pub fn new(design_width_dp: f32, design_height_dp: f32) -> Self {
        Self {
            design_width_dp,
            design_height_dp,
            base_on_width: true,
            exclude_font_scale: false,
            use_device_size: false,
            custom_fragment: false,
            log_enabled: true,
            units: UnitPolicy::default(),
        }
    }

    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> AutoSizeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| AutoSizeError::serde(format!("parse config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AutoSizeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AutoSizeError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check that the global canvas can drive a computation.
    pub fn validate(&self) -> AutoSizeResult<()> {
        for (name, v) in [
            ("design_width_dp", self.design_width_dp),
            ("design_height_dp", self.design_height_dp),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(AutoSizeError::validation(format!(
                    "{name} must be a finite value > 0, got {v}"
                )));
            }
        }
        for (name, v) in [
            ("units.design_width", self.units.design_width),
            ("units.design_height", self.units.design_height),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(AutoSizeError::validation(format!(
                    "{name} must be a finite value >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Set the global basis.
    pub fn with_base_on_width(mut self, on: bool) -> Self {
        self.base_on_width = on;
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

    /// Enable sub-screen adaptation.
    pub fn with_custom_fragment(mut self, on: bool) -> Self {
        self.custom_fragment = on;
        self
    }

    /// Toggle diagnostic records.
    pub fn with_log_enabled(mut self, on: bool) -> Self {
        self.log_enabled = on;
        self
    }

    /// Replace the unit policy.
    pub fn with_units(mut self, units: UnitPolicy) -> Self {
        self.units = units;
        self
    }

    /// Global basis.
    pub fn basis(&self) -> Basis {
        Basis::from_width_flag(self.base_on_width)
    }

    /// Global design size along `basis`.
    pub fn design_size(&self, basis: Basis) -> f32 {
        basis.pick(self.design_width_dp, self.design_height_dp)
    }

    /// Full request for `design_size` along `basis`, carrying this configuration's flags.
    pub fn request(&self, design_size: f32, basis: Basis) -> AdaptationRequest {
        AdaptationRequest::new(design_size, basis)
            .with_subunit_design_size(self.units.subunit_design_size(basis))
            .with_exclude_font_scale(self.exclude_font_scale)
            .with_use_device_size(self.use_device_size)
    }

    /// Request built from the global defaults.
    pub fn global_request(&self) -> AdaptationRequest {
        let basis = self.basis();
        self.request(self.design_size(basis), basis)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
