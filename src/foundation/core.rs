/// Axis that drives the scale ratio.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Scale so that the design width spans the screen width.
    #[default]
    Width,
    /// Scale so that the design height spans the screen height.
    Height,
}

impl Basis {
    /// Map the host's `base_on_width` flag onto a basis.
    pub fn from_width_flag(base_on_width: bool) -> Self {
        if base_on_width {
            Self::Width
        } else {
            Self::Height
        }
    }

    /// `true` for [`Basis::Width`].
    pub fn is_width(self) -> bool {
        matches!(self, Self::Width)
    }

    /// Select the component of a `(width, height)` pair that belongs to this axis.
    pub fn pick<T>(self, width: T, height: T) -> T {
        match self {
            Self::Width => width,
            Self::Height => height,
        }
    }

    /// Lowercase axis name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
        }
    }
}

/// Integer pixel (or dp) dimensions as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PxSize {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl PxSize {
    /// Construct a size from its two components.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component along `basis`.
    pub fn along(self, basis: Basis) -> i32 {
        basis.pick(self.width, self.height)
    }
}

/// Bit pattern of `v` suitable for exact equality/hashing.
///
/// `-0.0` collapses onto `0.0` and every NaN onto the canonical quiet NaN, so values that
/// compare equal as floats (or are both NaN) share one key.
pub(crate) fn f32_key_bits(v: f32) -> u32 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f32::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
