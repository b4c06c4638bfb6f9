#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn limits() -> GestureLimits {
    GestureLimits::new(CanvasRect::new(361.0, 180.0, 440.0, 583.0))
}

fn start_at(x: f64, y: f64) -> Transform {
    Transform { center_x: x, center_y: y, scale: 1.0, rotation_deg: 0.0 }
}

// =============================================================
// clamp / normalize_rotation
// =============================================================

#[test]
fn clamp_bounds_and_nan() {
    assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
    assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
    assert_eq!(clamp(50.0, 0.0, 10.0), 10.0);
    assert_eq!(clamp(f64::NAN, 1.0, 10.0), 1.0);
    assert_eq!(clamp(f64::INFINITY, 1.0, 10.0), 10.0);
}

#[test]
fn normalize_wraps_into_half_open_range() {
    assert_eq!(normalize_rotation(0.0), 0.0);
    assert_eq!(normalize_rotation(360.0), 0.0);
    assert_eq!(normalize_rotation(-90.0), 270.0);
    assert_eq!(normalize_rotation(725.0), 5.0);
    assert_eq!(normalize_rotation(f64::NAN), 0.0);
    assert_eq!(normalize_rotation(f64::NEG_INFINITY), 0.0);
}

#[test]
fn normalize_tiny_negative_does_not_return_360() {
    let r = normalize_rotation(-1e-20);
    assert!((0.0..360.0).contains(&r));
}

// =============================================================
// Move
// =============================================================

#[test]
fn move_applies_pointer_delta() {
    let t = move_by(&start_at(100.0, 100.0), Point::new(10.0, 10.0), Point::new(40.0, -5.0), &limits());
    assert_eq!(t.center(), Point::new(130.0, 85.0));
    assert_eq!(t.scale, 1.0);
}

#[test]
fn move_clamps_center_into_area() {
    let t = move_by(&start_at(100.0, 100.0), Point::new(0.0, 0.0), Point::new(1000.0, -1000.0), &limits());
    assert_eq!(t.center(), Point::new(440.0, 0.0));
}

#[test]
fn move_is_relative_to_start_not_previous_frame() {
    let start = start_at(50.0, 50.0);
    let l = limits();
    let first = move_by(&start, Point::new(0.0, 0.0), Point::new(5.0, 5.0), &l);
    let again = move_by(&start, Point::new(0.0, 0.0), Point::new(5.0, 5.0), &l);
    assert_eq!(first, again);
}

// =============================================================
// Scale
// =============================================================

#[test]
fn scale_guard_saturates_at_max_scale() {
    // Pointer starts on the center: distance 0 is guarded to 0.1, then 100 / 0.1.
    let t = scale_by(&start_at(100.0, 100.0), Point::new(100.0, 100.0), Point::new(200.0, 100.0), &limits());
    assert_eq!(t.scale, MAX_SCALE);
}

#[test]
fn scale_by_distance_ratio() {
    let t = scale_by(&start_at(100.0, 100.0), Point::new(150.0, 100.0), Point::new(100.0, 200.0), &limits());
    assert!(approx_eq(t.scale, 2.0));
    assert_eq!(t.center(), Point::new(100.0, 100.0));
}

#[test]
fn scale_to_center_clamps_to_min() {
    let t = scale_by(&start_at(100.0, 100.0), Point::new(150.0, 100.0), Point::new(100.0, 100.0), &limits());
    assert_eq!(t.scale, MIN_SCALE);
}

// =============================================================
// Rotate
// =============================================================

#[test]
fn rotate_quarter_turn_clockwise() {
    let t = rotate_by(&start_at(100.0, 100.0), Point::new(200.0, 100.0), Point::new(100.0, 200.0));
    assert!(approx_eq(t.rotation_deg, 90.0));
}

#[test]
fn rotate_counter_clockwise_wraps() {
    let mut start = start_at(100.0, 100.0);
    start.rotation_deg = 10.0;
    let t = rotate_by(&start, Point::new(200.0, 100.0), Point::new(100.0, 0.0));
    assert!(approx_eq(t.rotation_deg, 280.0));
}

#[test]
fn apply_gesture_dispatches_by_kind() {
    let start = start_at(100.0, 100.0);
    let l = limits();
    let moved = apply_gesture(GestureKind::Move, &start, Point::new(0.0, 0.0), Point::new(1.0, 2.0), &l);
    assert_eq!(moved.center(), Point::new(101.0, 102.0));
    let rotated = apply_gesture(GestureKind::Rotate, &start, Point::new(200.0, 100.0), Point::new(100.0, 200.0), &l);
    assert!(approx_eq(rotated.rotation_deg, 90.0));
}

// =============================================================
// constrain
// =============================================================

#[test]
fn constrain_fixes_every_field() {
    let raw = Transform { center_x: -10.0, center_y: 9999.0, scale: 50.0, rotation_deg: -30.0 };
    let t = constrain(raw, &limits());
    assert_eq!(t, Transform { center_x: 0.0, center_y: 583.0, scale: MAX_SCALE, rotation_deg: 330.0 });
}

// =============================================================
// Properties
// =============================================================

proptest! {
    #[test]
    fn scale_gesture_stays_in_range(
        sx in -2000.0f64..2000.0, sy in -2000.0f64..2000.0,
        cx in -2000.0f64..2000.0, cy in -2000.0f64..2000.0,
        start_scale in 0.01f64..10.0,
    ) {
        let mut start = start_at(220.0, 291.5);
        start.scale = start_scale;
        let t = scale_by(&start, Point::new(sx, sy), Point::new(cx, cy), &limits());
        prop_assert!(t.scale >= MIN_SCALE && t.scale <= MAX_SCALE);
    }

    #[test]
    fn move_gesture_keeps_center_inside(
        dx in -1e6f64..1e6, dy in -1e6f64..1e6,
        x in 0.0f64..440.0, y in 0.0f64..583.0,
    ) {
        let t = move_by(&start_at(x, y), Point::new(0.0, 0.0), Point::new(dx, dy), &limits());
        prop_assert!((0.0..=440.0).contains(&t.center_x));
        prop_assert!((0.0..=583.0).contains(&t.center_y));
    }

    #[test]
    fn normalize_is_in_range_and_idempotent(deg in -1e7f64..1e7) {
        let once = normalize_rotation(deg);
        prop_assert!((0.0..360.0).contains(&once));
        prop_assert_eq!(normalize_rotation(once), once);
    }

    #[test]
    fn rotate_gesture_is_normalized(
        px in -500.0f64..500.0, py in -500.0f64..500.0,
        start_rotation in 0.0f64..360.0,
    ) {
        let mut start = start_at(0.0, 0.0);
        start.rotation_deg = start_rotation;
        let t = rotate_by(&start, Point::new(10.0, 3.0), Point::new(px, py));
        prop_assert!((0.0..360.0).contains(&t.rotation_deg));
    }
}
