use crate::foundation::core::PxSize;
use crate::foundation::error::{AutoSizeError, AutoSizeResult};

const PARAMS_NUM: usize = 8;

/// Window parameters declared by large-screen (external display / desktop mode) hosts.
///
/// The textual form is a comma-separated list in the fixed order
/// `version,window_mode,resize_mode,force_resize_mode,width,height,min_width,min_height`.
/// Sizes are in dp, `0` means "unspecified".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WindowParams {
    /// Declaration version.
    pub version: i32,
    /// `-1` unspecified, `0` portrait, `1` landscape, `2` maximized, `4` fullscreen.
    pub window_mode: i32,
    /// Stretch behavior of the window.
    pub resize_mode: i32,
    /// Restart-time resize support.
    pub force_resize_mode: i32,
    /// Default window width in dp.
    pub width: i32,
    /// Default window height in dp.
    pub height: i32,
    /// Minimum window width in dp.
    pub min_width: i32,
    /// Minimum window height in dp.
    pub min_height: i32,
}

impl WindowParams {
    /// Parse the comma-separated declaration.
    ///
    /// Missing trailing fields are `0`, fields beyond the eighth are ignored.
    pub fn parse(declared: &str) -> AutoSizeResult<Self> {
        Ok(Self::from_values(&parse_values(declared)?))
    }

    /// Overlay a unit-level declaration onto app-level params.
    ///
    /// Each index present in `declared` replaces the corresponding app value; indexes beyond
    /// the end of `declared` keep the app value.
    pub fn combine(app: &Self, declared: &str) -> AutoSizeResult<Self> {
        let overlay = parse_values(declared)?;
        let mut values = app.to_values();
        for (slot, v) in values.iter_mut().zip(overlay) {
            *slot = v;
        }
        Ok(Self::from_values(&values))
    }

    /// Intrinsic window size when both dimensions are declared.
    pub fn override_size_dp(&self) -> Option<PxSize> {
        (self.width > 0 && self.height > 0).then(|| PxSize::new(self.width, self.height))
    }

    fn from_values(values: &[i32]) -> Self {
        let at = |i: usize| values.get(i).copied().unwrap_or(0);
        Self {
            version: at(0),
            window_mode: at(1),
            resize_mode: at(2),
            force_resize_mode: at(3),
            width: at(4),
            height: at(5),
            min_width: at(6),
            min_height: at(7),
        }
    }

    fn to_values(self) -> [i32; PARAMS_NUM] {
        [
            self.version,
            self.window_mode,
            self.resize_mode,
            self.force_resize_mode,
            self.width,
            self.height,
            self.min_width,
            self.min_height,
        ]
    }
}

fn parse_values(declared: &str) -> AutoSizeResult<Vec<i32>> {
    declared
        .split(',')
        .take(PARAMS_NUM)
        .enumerate()
        .map(|(i, field)| {
            field.trim().parse::<i32>().map_err(|e| {
                AutoSizeError::validation(format!(
                    "window params field {i} ('{}') is not an integer: {e}",
                    field.trim()
                ))
            })
        })
        .collect()
}

/// Whether the host runs in "intrinsic size" mode for the unit being adapted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IntrinsicMode {
    /// The unit is shown on an external / large-screen display.
    pub external_display: bool,
    /// App-level declaration of intrinsic sizing.
    pub app_keep_intrinsic: bool,
    /// Unit-level declaration; wins over the app-level one when present.
    pub unit_keep_intrinsic: Option<bool>,
}

impl IntrinsicMode {
    /// Effective keep-intrinsic decision.
    pub fn keep_intrinsic(&self) -> bool {
        self.unit_keep_intrinsic.unwrap_or(self.app_keep_intrinsic)
    }

    /// The window override should replace the screen as the ratio base.
    pub fn is_active(&self) -> bool {
        self.external_display && self.keep_intrinsic()
    }

    /// Window override to inject into the per-call snapshot, if any.
    pub fn window_override(&self, params: Option<&WindowParams>) -> Option<PxSize> {
        if !self.is_active() {
            return None;
        }
        params.and_then(WindowParams::override_size_dp)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metrics/window.rs"]
mod tests;
