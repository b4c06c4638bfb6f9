#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn empty_json_yields_defaults() {
    let config = EditorConfig::from_json("{}");
    assert!(config.is_ok());
    let Ok(config) = config else { return };
    assert_eq!(config, EditorConfig::default());
    assert_eq!(config.max_layers, 9);
    assert_eq!(config.printable_area, CanvasRect::new(361.0, 180.0, 440.0, 583.0));
    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_json_overrides_only_given_fields() {
    let config = EditorConfig::from_json(r#"{"max_layers": 4, "precision": {"offset_limit": 50}}"#);
    let Ok(config) = config else {
        panic!("expected valid config");
    };
    assert_eq!(config.max_layers, 4);
    assert_eq!(config.precision.offset_limit, 50.0);
    assert_eq!(config.precision.scale_field, NumericRange::new(1.0, 1000.0));
    assert_eq!(config.max_scale, 10.0);
}

#[test]
fn malformed_json_is_invalid_config() {
    let err = EditorConfig::from_json("{ not json");
    assert!(matches!(err, Err(EditorError::InvalidConfig(_))));
}

#[test]
fn inverted_scale_range_is_rejected() {
    let err = EditorConfig::from_json(r#"{"min_scale": 5, "max_scale": 1}"#);
    assert!(matches!(err, Err(EditorError::InvalidConfig(_))));
}

#[test]
fn zero_scale_min_is_rejected() {
    let config = EditorConfig { min_scale: 0.0, ..EditorConfig::default() };
    assert!(config.validate().is_err());
}

#[test]
fn zero_layers_is_rejected() {
    let config = EditorConfig { max_layers: 0, ..EditorConfig::default() };
    assert!(config.validate().is_err());
}

#[test]
fn empty_printable_area_is_rejected() {
    let config = EditorConfig { printable_area: CanvasRect::new(0.0, 0.0, 0.0, 100.0), ..EditorConfig::default() };
    assert!(config.validate().is_err());
}

#[test]
fn text_layout_applies_padding_and_minimums() {
    let layout = TextLayout::default();
    assert_eq!(layout.fit((10.0, 10.0)), (80.0, 60.0));
    assert_eq!(layout.fit((200.0, 40.0)), (232.0, 72.0));
}

#[test]
fn gesture_limits_carry_scale_bounds() {
    let limits = EditorConfig::default().gesture_limits();
    assert_eq!(limits.min_scale, 0.01);
    assert_eq!(limits.max_scale, 10.0);
    assert_eq!(limits.scale_guard, 0.1);
}

#[test]
fn full_view_box_is_whole_canvas() {
    assert_eq!(EditorConfig::default().full_view_box(), CanvasRect::new(0.0, 0.0, 1160.0, 943.0));
}
