use std::sync::Arc;

use parking_lot::RwLock;

use crate::adapt::apply::MetricsPatch;
use crate::adapt::external::ExternalAdaptRegistry;
use crate::adapt::orchestrator::{Resolution, ResolutionSource, resolve};
use crate::adapt::target::AdaptTarget;
use crate::config::model::AutoSizeConfig;
use crate::foundation::core::PxSize;
use crate::foundation::error::{AutoSizeError, AutoSizeResult};
use crate::metrics::snapshot::MetricsSnapshot;
use crate::scale::cache::{CacheKey, CacheStats, ResultCache};
use crate::scale::compute::{AdaptationRequest, ScaleResult, compute, restore_original};

/// Independent adaptation path. Each surface owns its own result cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Regular lifecycle-driven adaptation of whole screens.
    Primary,
    /// Re-application from resource lookups that bypass the lifecycle.
    Compat,
}

/// Hooks around every adaptation pass.
pub trait OnAdaptListener: Send + Sync {
    /// Called before resolution.
    fn on_adapt_before(&self, _identity: &str, _surface: Surface) {}

    /// Called once the outcome is known, for adapted and cancelled units alike.
    fn on_adapt_after(&self, _identity: &str, _surface: Surface) {}
}

/// What the host should write for one unit.
#[derive(Clone, Debug)]
pub struct AdaptOutcome {
    /// Orchestrator decision.
    pub resolution: Resolution,
    /// Scale result (the baseline result when cancelled).
    pub result: Arc<ScaleResult>,
    /// Values to write, filtered by the unit policy.
    pub patch: MetricsPatch,
    /// The result came from the cache.
    pub cache_hit: bool,
}

/// Adaptation engine: configuration, baseline, external registry and one cache per surface.
///
/// Every method takes `&self`; the engine is meant to be shared behind an `Arc` across the
/// threads the host delivers lifecycle events on.
pub struct AutoSize {
    config: RwLock<AutoSizeConfig>,
    baseline: RwLock<MetricsSnapshot>,
    registry: ExternalAdaptRegistry,
    listener: RwLock<Option<Arc<dyn OnAdaptListener>>>,
    primary: ResultCache,
    compat: ResultCache,
}

impl std::fmt::Debug for AutoSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSize")
            .field("config", &*self.config.read())
            .field("baseline", &*self.baseline.read())
            .field("primary", &self.primary.stats())
            .field("compat", &self.compat.stats())
            .finish()
    }
}

impl AutoSize {
    /// Validate `config` and `baseline` and build an engine with empty caches.
    ///
    /// A subunit policy without a captured initial xdpi is rejected here, since such an
    /// adaptation could never be cancelled.
    pub fn new(config: AutoSizeConfig, baseline: MetricsSnapshot) -> AutoSizeResult<Self> {
        config.validate()?;
        baseline.validate()?;
        ensure_restorable(&config, &baseline)?;
        Ok(Self {
            config: RwLock::new(config),
            baseline: RwLock::new(baseline),
            registry: ExternalAdaptRegistry::new(),
            listener: RwLock::new(None),
            primary: ResultCache::new(),
            compat: ResultCache::new(),
        })
    }

    /// Copy of the current configuration.
    pub fn config(&self) -> AutoSizeConfig {
        self.config.read().clone()
    }

    /// Replace the configuration after validating it.
    ///
    /// Cached results stay valid: every flag that changes the arithmetic is part of the key.
    pub fn set_config(&self, config: AutoSizeConfig) -> AutoSizeResult<()> {
        config.validate()?;
        ensure_restorable(&config, &self.baseline())?;
        *self.config.write() = config;
        Ok(())
    }

    /// Current baseline.
    pub fn baseline(&self) -> MetricsSnapshot {
        *self.baseline.read()
    }

    /// Record new current screen dimensions (rotation, window resize).
    ///
    /// The captured `initial_*` values are kept. Cached results stay valid because both screen
    /// dimensions are part of the key. Non-positive dimensions are rejected and leave the
    /// baseline unchanged.
    pub fn set_baseline_screen_size(&self, width_px: i32, height_px: i32) -> AutoSizeResult<()> {
        let mut baseline = self.baseline.write();
        let resized = baseline.with_screen_size(width_px, height_px);
        resized.validate()?;
        *baseline = resized;
        Ok(())
    }

    /// Registry of external cancellations and overrides.
    pub fn external(&self) -> &ExternalAdaptRegistry {
        &self.registry
    }

    /// Install (or remove) the adaptation listener.
    pub fn set_listener(&self, listener: Option<Arc<dyn OnAdaptListener>>) {
        *self.listener.write() = listener;
    }

    /// Whether sub-screen units should be adapted too.
    pub fn fragment_adaptation_enabled(&self) -> bool {
        self.config.read().custom_fragment
    }

    /// Cache backing `surface`.
    pub fn cache(&self, surface: Surface) -> &ResultCache {
        match surface {
            Surface::Primary => &self.primary,
            Surface::Compat => &self.compat,
        }
    }

    /// Counters of the cache backing `surface`.
    pub fn cache_stats(&self, surface: Surface) -> CacheStats {
        self.cache(surface).stats()
    }

    /// Resolve `target`, then compute (through the surface cache) or restore the baseline.
    ///
    /// `window_override_dp` is the intrinsic window size when the host runs in intrinsic mode
    /// (see [`crate::IntrinsicMode::window_override`]). Computation errors are returned
    /// without touching any cache. The listener is notified before and after, also on error.
    #[tracing::instrument(skip_all, fields(identity = target.identity(), surface = ?surface))]
    pub fn adapt<T: AdaptTarget + ?Sized>(
        &self,
        target: &T,
        surface: Surface,
        window_override_dp: Option<PxSize>,
    ) -> AutoSizeResult<AdaptOutcome> {
        self.notified(target.identity(), surface, || {
            self.run(target, surface, window_override_dp)
        })
    }

    /// Like [`AutoSize::adapt`], but a computation failure cancels this unit only.
    ///
    /// Errors from restoring the baseline itself are still returned.
    pub fn adapt_or_cancel<T: AdaptTarget + ?Sized>(
        &self,
        target: &T,
        surface: Surface,
        window_override_dp: Option<PxSize>,
    ) -> AutoSizeResult<AdaptOutcome> {
        self.notified(target.identity(), surface, || {
            match self.run(target, surface, window_override_dp) {
                Ok(outcome) => Ok(outcome),
                Err(err) => {
                    tracing::warn!(
                        identity = target.identity(),
                        error = %err,
                        "adaptation failed, restoring baseline"
                    );
                    let config = self.config();
                    self.cancel_outcome(
                        &config,
                        Resolution::Cancel {
                            source: ResolutionSource::Failed,
                        },
                    )
                }
            }
        })
    }

    /// Baseline outcome for `target`, bypassing resolution.
    ///
    /// The listener sees this pass on [`Surface::Primary`].
    pub fn cancel<T: AdaptTarget + ?Sized>(&self, target: &T) -> AutoSizeResult<AdaptOutcome> {
        let identity = target.identity();
        self.notified(identity, Surface::Primary, || {
            let config = self.config();
            if config.log_enabled {
                tracing::warn!(identity, "adaptation cancelled");
            }
            self.cancel_outcome(
                &config,
                Resolution::Cancel {
                    source: ResolutionSource::TargetCancel,
                },
            )
        })
    }

    /// Drop every cached result on both surfaces.
    pub fn clear_caches(&self) {
        self.primary.clear();
        self.compat.clear();
    }

    fn notified<R>(&self, identity: &str, surface: Surface, pass: impl FnOnce() -> R) -> R {
        let listener = self.listener.read().clone();
        if let Some(l) = &listener {
            l.on_adapt_before(identity, surface);
        }
        let out = pass();
        if let Some(l) = &listener {
            l.on_adapt_after(identity, surface);
        }
        out
    }

    fn run<T: AdaptTarget + ?Sized>(
        &self,
        target: &T,
        surface: Surface,
        window_override_dp: Option<PxSize>,
    ) -> AutoSizeResult<AdaptOutcome> {
        let identity = target.identity();
        let config = self.config();
        match resolve(target, &config, Some(&self.registry)) {
            resolution @ Resolution::Cancel { source } => {
                if config.log_enabled {
                    tracing::warn!(identity, ?source, "adaptation cancelled");
                }
                self.cancel_outcome(&config, resolution)
            }
            Resolution::Adapt { request, source } => {
                let baseline = self.baseline().with_window_override(window_override_dp);
                self.adapt_request(&config, &baseline, surface, &request, source, identity)
            }
        }
    }

    fn adapt_request(
        &self,
        config: &AutoSizeConfig,
        baseline: &MetricsSnapshot,
        surface: Surface,
        request: &AdaptationRequest,
        source: ResolutionSource,
        identity: &str,
    ) -> AutoSizeResult<AdaptOutcome> {
        let key = CacheKey::new(request, baseline);
        let lookup = self
            .cache(surface)
            .get_or_compute(key, || compute(request, baseline))?;
        let result = lookup.result;

        if config.log_enabled {
            tracing::debug!(
                identity,
                ?source,
                basis = request.basis.as_str(),
                design_size = request.design_size,
                subunit_design_size = request.effective_subunit_design_size(),
                base_size = key.base_size(),
                density = result.density,
                scaled_density = result.scaled_density,
                density_dpi = result.density_dpi,
                unit_factor = result.unit_factor,
                logical_width = result.logical_width,
                logical_height = result.logical_height,
                cache_hit = lookup.hit,
                "adapted"
            );
        }

        Ok(AdaptOutcome {
            resolution: Resolution::Adapt {
                request: *request,
                source,
            },
            patch: MetricsPatch::from_result(&result, &config.units),
            result,
            cache_hit: lookup.hit,
        })
    }

    fn cancel_outcome(
        &self,
        config: &AutoSizeConfig,
        resolution: Resolution,
    ) -> AutoSizeResult<AdaptOutcome> {
        let baseline = self.baseline();
        let result = restore_original(&baseline, &config.units)?;
        Ok(AdaptOutcome {
            resolution,
            result: Arc::new(result),
            patch: MetricsPatch::restore(&baseline, &config.units),
            cache_hit: false,
        })
    }
}

fn ensure_restorable(config: &AutoSizeConfig, baseline: &MetricsSnapshot) -> AutoSizeResult<()> {
    if config.units.applies_unit_factor() && baseline.initial_xdpi.is_none() {
        return Err(AutoSizeError::missing_baseline(format!(
            "initial xdpi is required for {:?} subunits",
            config.units.subunits
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/adapt/engine.rs"]
mod tests;
