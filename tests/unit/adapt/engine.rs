use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::adapt::external::ExternalAdaptInfo;
use crate::adapt::target::{CustomAdapt, TargetInfo};
use crate::foundation::core::Basis;
use crate::foundation::error::AutoSizeError;
use crate::units::policy::{Subunits, UnitPolicy};

fn baseline() -> MetricsSnapshot {
    MetricsSnapshot {
        screen_width_px: 1080,
        screen_height_px: 1920,
        initial_density: 2.0,
        initial_scaled_density: 2.0,
        initial_density_dpi: 320,
        initial_xdpi: Some(288.0),
        initial_screen_width_dp: 540,
        initial_screen_height_dp: 960,
        window_override_dp: None,
    }
}

fn engine() -> AutoSize {
    AutoSize::new(
        AutoSizeConfig::new(360.0, 640.0).with_exclude_font_scale(true),
        baseline(),
    )
    .unwrap()
}

#[derive(Default)]
struct Counting {
    before: AtomicUsize,
    after: AtomicUsize,
}

impl OnAdaptListener for Counting {
    fn on_adapt_before(&self, _identity: &str, _surface: Surface) {
        self.before.fetch_add(1, Ordering::SeqCst);
    }

    fn on_adapt_after(&self, _identity: &str, _surface: Surface) {
        self.after.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn new_rejects_invalid_config() {
    let err = AutoSize::new(AutoSizeConfig::new(0.0, 640.0), baseline()).unwrap_err();
    assert!(matches!(err, AutoSizeError::Validation(_)));
}

#[test]
fn global_adaptation_produces_patch() {
    let e = engine();
    let out = e
        .adapt(&TargetInfo::new("Main"), Surface::Primary, None)
        .unwrap();
    assert_eq!(out.resolution.source(), ResolutionSource::Global);
    assert_eq!(out.result.density, 3.0);
    assert_eq!(out.result.density_dpi, 480);
    assert_eq!(out.patch.density, Some(3.0));
    assert_eq!(out.patch.scaled_density, Some(3.0));
    assert!(!out.cache_hit);
}

#[test]
fn repeated_adaptation_hits_cache() {
    let e = engine();
    let a = e.adapt(&TargetInfo::new("A"), Surface::Primary, None).unwrap();
    let b = e.adapt(&TargetInfo::new("B"), Surface::Primary, None).unwrap();
    assert!(b.cache_hit);
    assert!(Arc::ptr_eq(&a.result, &b.result));
    assert_eq!(e.cache_stats(Surface::Primary).entries, 1);
}

#[test]
fn surfaces_keep_separate_caches() {
    let e = engine();
    e.adapt(&TargetInfo::new("A"), Surface::Primary, None).unwrap();
    let compat = e.adapt(&TargetInfo::new("A"), Surface::Compat, None).unwrap();
    assert!(!compat.cache_hit);
    assert_eq!(e.cache_stats(Surface::Primary).entries, 1);
    assert_eq!(e.cache_stats(Surface::Compat).entries, 1);
}

#[test]
fn cancelled_target_restores_baseline_without_caching() {
    let e = engine();
    let out = e
        .adapt(&TargetInfo::new("Splash").cancelled(), Surface::Primary, None)
        .unwrap();
    assert!(out.resolution.is_cancel());
    assert_eq!(out.result.density, 2.0);
    assert_eq!(out.result.density_dpi, 320);
    assert_eq!(out.result.scaled_density, 2.0);
    assert_eq!(out.patch.density, Some(2.0));
    assert!(e.cache(Surface::Primary).is_empty());
}

#[test]
fn external_registry_is_consulted() {
    let e = engine();
    e.external()
        .add_override("Lib", ExternalAdaptInfo::new(Basis::Width, 540.0));
    let out = e.adapt(&TargetInfo::new("Lib"), Surface::Primary, None).unwrap();
    assert_eq!(out.resolution.source(), ResolutionSource::External);
    assert_eq!(out.result.density, 2.0);

    e.external().add_cancel("Err");
    let out = e.adapt(&TargetInfo::new("Err"), Surface::Primary, None).unwrap();
    assert_eq!(out.resolution.source(), ResolutionSource::ExternalCancel);
}

#[test]
fn failure_is_surfaced_then_isolated() {
    let e = engine();
    let broken = TargetInfo::new("Broken").with_custom(CustomAdapt::new(Basis::Width, f32::NAN));

    let err = e.adapt(&broken, Surface::Primary, None).unwrap_err();
    assert!(matches!(err, AutoSizeError::InvalidDesignSize(_)));
    assert!(e.cache(Surface::Primary).is_empty());

    let out = e.adapt_or_cancel(&broken, Surface::Primary, None).unwrap();
    assert_eq!(out.resolution.source(), ResolutionSource::Failed);
    assert_eq!(out.result.density, 2.0);

    let ok = e.adapt(&TargetInfo::new("Main"), Surface::Primary, None).unwrap();
    assert_eq!(ok.result.density, 3.0);
}

#[test]
fn window_override_feeds_base_size() {
    let e = engine();
    let out = e
        .adapt(
            &TargetInfo::new("Main"),
            Surface::Primary,
            Some(PxSize::new(360, 640)),
        )
        .unwrap();
    // base = 360dp * 2.0 = 720px
    assert_eq!(out.result.density, 2.0);
    // logical size still covers the full 1080x1920 screen
    assert_eq!(out.result.logical_width, 540);
    assert_eq!(out.result.logical_height, 960);
    // the stored baseline itself is untouched
    assert_eq!(e.baseline().window_override_dp, None);
}

#[test]
fn rotation_keeps_initial_metrics() {
    let e = engine();
    e.set_baseline_screen_size(1920, 1080).unwrap();
    let out = e.adapt(&TargetInfo::new("Main"), Surface::Primary, None).unwrap();
    assert!((out.result.density - 1920.0 / 360.0).abs() < 1e-6);

    let cancelled = e.cancel(&TargetInfo::new("Main")).unwrap();
    assert_eq!(cancelled.result.density, 2.0);
    assert_eq!(e.baseline().initial_density_dpi, 320);
}

#[test]
fn listener_wraps_every_pass() {
    let e = engine();
    let listener = Arc::new(Counting::default());
    e.set_listener(Some(listener.clone()));

    e.adapt(&TargetInfo::new("A"), Surface::Primary, None).unwrap();
    e.adapt(&TargetInfo::new("B").cancelled(), Surface::Primary, None)
        .unwrap();

    assert_eq!(listener.before.load(Ordering::SeqCst), 2);
    assert_eq!(listener.after.load(Ordering::SeqCst), 2);

    e.set_listener(None);
    e.adapt(&TargetInfo::new("C"), Surface::Primary, None).unwrap();
    assert_eq!(listener.before.load(Ordering::SeqCst), 2);
}

#[test]
fn subunits_without_xdpi_are_rejected_up_front() {
    let mut b = baseline();
    b.initial_xdpi = None;
    let pt = AutoSizeConfig::new(360.0, 640.0)
        .with_units(UnitPolicy::default().with_subunits(Subunits::Pt));

    let err = AutoSize::new(pt.clone(), b).unwrap_err();
    assert!(matches!(err, AutoSizeError::MissingBaseline(_)));

    let e = AutoSize::new(AutoSizeConfig::new(360.0, 640.0), b).unwrap();
    let err = e.set_config(pt).unwrap_err();
    assert!(matches!(err, AutoSizeError::MissingBaseline(_)));
    assert_eq!(e.config().units.subunits, Subunits::None);
    e.cancel(&TargetInfo::new("Main")).unwrap();
}

#[test]
fn listener_is_balanced_on_failure_and_cancel() {
    let e = engine();
    let listener = Arc::new(Counting::default());
    e.set_listener(Some(listener.clone()));
    let broken = TargetInfo::new("Broken").with_custom(CustomAdapt::new(Basis::Width, f32::NAN));

    e.adapt(&broken, Surface::Primary, None).unwrap_err();
    assert_eq!(listener.before.load(Ordering::SeqCst), 1);
    assert_eq!(listener.after.load(Ordering::SeqCst), 1);

    let out = e.adapt_or_cancel(&broken, Surface::Compat, None).unwrap();
    assert!(out.resolution.is_cancel());
    assert_eq!(listener.before.load(Ordering::SeqCst), 2);
    assert_eq!(listener.after.load(Ordering::SeqCst), 2);

    e.cancel(&TargetInfo::new("Main")).unwrap();
    assert_eq!(listener.before.load(Ordering::SeqCst), 3);
    assert_eq!(listener.after.load(Ordering::SeqCst), 3);
}

#[test]
fn resize_on_other_axis_refreshes_logical_size() {
    let e = engine();
    let before = e.adapt(&TargetInfo::new("Main"), Surface::Primary, None).unwrap();
    assert_eq!(before.result.logical_height, 640);

    // Width basis: only the height changes, so the base size is the same.
    e.set_baseline_screen_size(1080, 2160).unwrap();
    let after = e.adapt(&TargetInfo::new("Main"), Surface::Primary, None).unwrap();
    assert!(!after.cache_hit);
    assert_eq!(after.result.density, 3.0);
    assert_eq!(after.result.logical_height, 720);
    assert_eq!(e.cache_stats(Surface::Primary).entries, 2);
}

#[test]
fn invalid_resize_keeps_previous_baseline() {
    let e = engine();
    let err = e.set_baseline_screen_size(0, 1920).unwrap_err();
    assert!(matches!(err, AutoSizeError::Validation(_)));
    assert_eq!(e.baseline().screen_width_px, 1080);
}

#[test]
fn cancel_from_compat_restores_baseline() {
    let e = engine();
    let out = e
        .adapt(&TargetInfo::new("Dialog").cancelled(), Surface::Compat, None)
        .unwrap();
    assert_eq!(out.result.density, 2.0);
    assert_eq!(out.patch.xdpi, None);
    assert!(e.cache(Surface::Compat).is_empty());
    assert!(e.cache(Surface::Primary).is_empty());
}

#[test]
fn set_config_validates_and_applies() {
    let e = engine();
    assert!(e.set_config(AutoSizeConfig::new(-1.0, 640.0)).is_err());
    assert_eq!(e.config().design_width_dp, 360.0);

    e.set_config(AutoSizeConfig::new(540.0, 960.0).with_custom_fragment(true))
        .unwrap();
    assert!(e.fragment_adaptation_enabled());
    let out = e.adapt(&TargetInfo::new("Main"), Surface::Primary, None).unwrap();
    assert_eq!(out.result.density, 2.0);
}

#[test]
fn clear_caches_empties_both_surfaces() {
    let e = engine();
    e.adapt(&TargetInfo::new("A"), Surface::Primary, None).unwrap();
    e.adapt(&TargetInfo::new("A"), Surface::Compat, None).unwrap();
    e.clear_caches();
    assert!(e.cache(Surface::Primary).is_empty());
    assert!(e.cache(Surface::Compat).is_empty());
}
