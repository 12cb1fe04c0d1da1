//! AutoSize scales layouts authored against a fixed design canvas across screens of any
//! density and size.
//!
//! Given a design size along one axis, the device's pixel extent along that axis and the
//! device's original metrics, AutoSize derives a replacement set of display metrics
//! (density, scaled density, dpi, a subunit factor and the logical screen size) and memoizes
//! the result per distinct input.
//!
//! # Pipeline overview
//!
//! 1. **Capture**: `DeviceScreen -> MetricsSnapshot` (the immutable baseline)
//! 2. **Resolve**: `AdaptTarget + AutoSizeConfig -> Resolution` (cancel, or which canvas to use)
//! 3. **Compute**: `AdaptationRequest + MetricsSnapshot -> ScaleResult`, through a [`ResultCache`]
//! 4. **Apply**: `ScaleResult + UnitPolicy -> MetricsPatch`, written by the host into its
//!    [`MetricsSurface`]
//!
//! [`AutoSize`] ties the steps together and owns one cache per [`Surface`].
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: computation is pure; equal inputs always produce bit-identical results.
//! - **No IO in the core**: configuration loading is the only file access and lives at the edge.
//! - **Reversible**: the baseline is never rewritten, so cancellation always restores it.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod adapt;
mod config;
mod foundation;
mod metrics;
mod scale;
mod units;

pub use adapt::apply::{MetricsPatch, MetricsSurface, PlainMetrics};
pub use adapt::engine::{AdaptOutcome, AutoSize, OnAdaptListener, Surface};
pub use adapt::external::{ExternalAdaptInfo, ExternalAdaptRegistry};
pub use adapt::orchestrator::{Resolution, ResolutionSource, resolve};
pub use adapt::target::{AdaptTarget, CustomAdapt, TargetInfo};
pub use config::model::AutoSizeConfig;
pub use foundation::core::{Basis, PxSize};
pub use foundation::error::{AutoSizeError, AutoSizeResult};
pub use metrics::snapshot::{DeviceScreen, MetricsSnapshot};
pub use metrics::window::{IntrinsicMode, WindowParams};
pub use scale::cache::{CacheKey, CacheLookup, CacheStats, ResultCache};
pub use scale::compute::{
    AdaptationRequest, DENSITY_DEFAULT_DPI, ScaleResult, compute, restore_original,
};
pub use units::policy::{Subunits, UnitPolicy};
