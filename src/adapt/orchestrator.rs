use crate::adapt::external::ExternalAdaptRegistry;
use crate::adapt::target::AdaptTarget;
use crate::config::model::AutoSizeConfig;
use crate::foundation::core::Basis;
use crate::scale::compute::AdaptationRequest;

/// Where a resolution came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Cancelled through the external registry.
    ExternalCancel,
    /// The unit itself opted out.
    TargetCancel,
    /// Parameters registered in the external registry.
    External,
    /// Parameters declared by the unit.
    Custom,
    /// Global configuration.
    Global,
    /// Computation failed and the baseline was restored instead.
    Failed,
}

/// Decision for one unit in one adaptation pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Restore the baseline; no computation runs.
    Cancel {
        /// Who asked for the cancellation.
        source: ResolutionSource,
    },
    /// Compute (or look up) a scale result for `request`.
    Adapt {
        /// Fully resolved request.
        request: AdaptationRequest,
        /// Which layer supplied the design parameters.
        source: ResolutionSource,
    },
}

impl Resolution {
    /// `true` for [`Resolution::Cancel`].
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel { .. })
    }

    /// Layer that produced the decision.
    pub fn source(&self) -> ResolutionSource {
        match self {
            Self::Cancel { source } | Self::Adapt { source, .. } => *source,
        }
    }

    /// Resolved request, unless cancelled.
    pub fn request(&self) -> Option<&AdaptationRequest> {
        match self {
            Self::Cancel { .. } => None,
            Self::Adapt { request, .. } => Some(request),
        }
    }
}

/// Decide which design parameters (if any) apply to `target`.
///
/// First match wins: cancellation (registry or the unit itself), a registered override, the
/// unit's own parameters, the global default. A declared size `<= 0` is replaced by the global
/// design size along the declared axis. The registry is consulted only when given and active.
pub fn resolve<T: AdaptTarget + ?Sized>(
    target: &T,
    config: &AutoSizeConfig,
    registry: Option<&ExternalAdaptRegistry>,
) -> Resolution {
    let identity = target.identity();
    let registry = registry.filter(|r| r.is_run());

    if registry.is_some_and(|r| r.is_cancel(identity)) {
        return Resolution::Cancel {
            source: ResolutionSource::ExternalCancel,
        };
    }
    if target.cancels_adaptation() {
        return Resolution::Cancel {
            source: ResolutionSource::TargetCancel,
        };
    }

    if let Some(info) = registry.and_then(|r| r.override_for(identity)) {
        return adapt_with(config, info.size_in_dp, info.basis, ResolutionSource::External);
    }
    if let Some(custom) = target.custom_adapt() {
        return adapt_with(config, custom.size_in_dp, custom.basis, ResolutionSource::Custom);
    }

    Resolution::Adapt {
        request: config.global_request(),
        source: ResolutionSource::Global,
    }
}

fn adapt_with(
    config: &AutoSizeConfig,
    size_in_dp: f32,
    basis: Basis,
    source: ResolutionSource,
) -> Resolution {
    let design_size = if size_in_dp <= 0.0 {
        config.design_size(basis)
    } else {
        size_in_dp
    };
    Resolution::Adapt {
        request: config.request(design_size, basis),
        source,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/adapt/orchestrator.rs"]
mod tests;
