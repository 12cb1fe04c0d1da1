use super::*;
use crate::units::policy::Subunits;

#[test]
fn minimal_json_fills_defaults() {
    let cfg =
        AutoSizeConfig::from_reader(r#"{"design_width_dp":360,"design_height_dp":640}"#.as_bytes())
            .unwrap();
    assert_eq!(cfg, AutoSizeConfig::new(360.0, 640.0));
    assert!(cfg.base_on_width);
    assert!(cfg.log_enabled);
    assert!(!cfg.exclude_font_scale);
    cfg.validate().unwrap();
}

#[test]
fn missing_design_size_is_a_serde_error() {
    let err = AutoSizeConfig::from_reader(r#"{"design_width_dp":360}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, AutoSizeError::Serde(_)));
}

#[test]
fn validate_rejects_non_positive_canvas() {
    let err = AutoSizeConfig::new(0.0, 640.0).validate().unwrap_err();
    assert!(err.to_string().contains("design_width_dp"));

    let err = AutoSizeConfig::new(360.0, f32::NAN).validate().unwrap_err();
    assert!(err.to_string().contains("design_height_dp"));
}

#[test]
fn validate_rejects_negative_subunit_canvas() {
    let cfg = AutoSizeConfig::new(360.0, 640.0)
        .with_units(UnitPolicy::default().with_design_size(-1.0, 0.0));
    assert!(cfg.validate().is_err());
}

#[test]
fn global_request_follows_basis() {
    let cfg = AutoSizeConfig::new(360.0, 640.0);
    let req = cfg.global_request();
    assert_eq!(req.design_size, 360.0);
    assert_eq!(req.basis, Basis::Width);

    let req = cfg.with_base_on_width(false).global_request();
    assert_eq!(req.design_size, 640.0);
    assert_eq!(req.basis, Basis::Height);
}

#[test]
fn request_carries_flags_and_subunit_canvas() {
    let cfg = AutoSizeConfig::new(360.0, 640.0)
        .with_exclude_font_scale(true)
        .with_use_device_size(true)
        .with_units(
            UnitPolicy::default()
                .with_subunits(Subunits::Pt)
                .with_design_size(1080.0, 1920.0),
        );
    let req = cfg.request(400.0, Basis::Height);
    assert_eq!(req.design_size, 400.0);
    assert_eq!(req.subunit_design_size, 1920.0);
    assert!(req.exclude_font_scale);
    assert!(req.use_device_size);
}

#[test]
fn from_path_reports_missing_file() {
    let err = AutoSizeConfig::from_path("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("open config JSON"));
}
