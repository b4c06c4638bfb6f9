#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn area() -> CanvasRect {
    CanvasRect::new(361.0, 180.0, 440.0, 583.0)
}

// =============================================================
// Point
// =============================================================

#[test]
fn point_distance_is_euclidean() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_angle_is_clockwise_in_screen_space() {
    let origin = Point::new(10.0, 10.0);
    assert!(approx_eq(Point::new(20.0, 10.0).angle_from(origin), 0.0));
    assert!(approx_eq(Point::new(10.0, 20.0).angle_from(origin), 90.0));
    assert!(approx_eq(Point::new(10.0, 0.0).angle_from(origin), -90.0));
}

// =============================================================
// ScreenRect / CanvasRect
// =============================================================

#[test]
fn screen_rect_zero_size_is_empty() {
    assert!(ScreenRect::new(10.0, 10.0, 0.0, 50.0).is_empty());
    assert!(ScreenRect::new(10.0, 10.0, 50.0, 0.0).is_empty());
    assert!(ScreenRect::new(0.0, 0.0, f64::NAN, 10.0).is_empty());
    assert!(!ScreenRect::new(0.0, 0.0, 1.0, 1.0).is_empty());
}

#[test]
fn canvas_rect_relative_round_trip() {
    let a = area();
    let abs = Point::new(400.0, 250.0);
    let rel = a.to_relative(abs);
    assert_eq!(rel, Point::new(39.0, 70.0));
    assert_eq!(a.to_absolute(rel), abs);
}

#[test]
fn canvas_rect_view_box_attr() {
    assert_eq!(area().view_box_attr(), "361 180 440 583");
}

// =============================================================
// ViewTransform
// =============================================================

#[test]
fn identity_inverse_is_identity() {
    let inv = ViewTransform::identity().inverse();
    assert_eq!(inv, Some(ViewTransform::identity()));
}

#[test]
fn inverse_undoes_apply() {
    let t = ViewTransform::new(2.0, 0.5, -0.25, 1.5, 30.0, -12.0);
    let inv = t.inverse();
    assert!(inv.is_some());
    let Some(inv) = inv else { return };
    let p = Point::new(17.0, -4.5);
    assert!(point_approx_eq(inv.apply(t.apply(p)), p));
}

#[test]
fn singular_matrix_has_no_inverse() {
    let t = ViewTransform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
    assert!(t.inverse().is_none());
    let zero = ViewTransform::new(0.0, 0.0, 0.0, 0.0, 5.0, 5.0);
    assert!(zero.inverse().is_none());
}

#[test]
fn fit_view_box_meets_and_centers() {
    // 880x583 element showing a 440x583 view box: scale is limited by height (1.0),
    // content is centered horizontally with 220px letterboxing on each side.
    let element = ScreenRect::new(100.0, 50.0, 880.0, 583.0);
    let t = ViewTransform::fit_view_box(element, area());
    assert!(t.is_some());
    let Some(t) = t else { return };
    assert!(approx_eq(t.a, 1.0));
    let top_left = t.apply(Point::new(361.0, 180.0));
    assert!(point_approx_eq(top_left, Point::new(320.0, 50.0)));
}

#[test]
fn fit_view_box_rejects_hidden_element() {
    assert!(ViewTransform::fit_view_box(ScreenRect::default(), area()).is_none());
}

#[test]
fn mean_scale_of_uniform_zoom() {
    let t = ViewTransform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
    assert!(approx_eq(t.mean_scale(), 2.0));
}

// =============================================================
// CoordinateMapper
// =============================================================

#[test]
fn mapper_without_transform_returns_area_center() {
    let mapper = CoordinateMapper::new(area());
    assert_eq!(mapper.to_canvas_space(Point::new(5.0, 5.0)), Point::new(220.0, 291.5));
}

#[test]
fn mapper_relative_is_none_without_transform() {
    let mut mapper = CoordinateMapper::new(area());
    assert_eq!(mapper.to_canvas_relative(Point::new(5.0, 5.0)), None);
    mapper.set_view_transform(Some(ViewTransform::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)));
    assert_eq!(mapper.to_canvas_relative(Point::new(5.0, 5.0)), None);
}

#[test]
fn mapper_with_singular_transform_returns_area_center() {
    let mut mapper = CoordinateMapper::new(area());
    mapper.set_view_transform(Some(ViewTransform::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)));
    assert_eq!(mapper.to_canvas_space(Point::new(5.0, 5.0)), Point::new(220.0, 291.5));
}

#[test]
fn mapper_identity_subtracts_printable_offset() {
    let mut mapper = CoordinateMapper::new(area());
    mapper.set_view_transform(Some(ViewTransform::identity()));
    assert_eq!(mapper.to_canvas_space(Point::new(461.0, 280.0)), Point::new(100.0, 100.0));
}

#[test]
fn mapper_accounts_for_zoom_and_pan() {
    let mut mapper = CoordinateMapper::new(area());
    // Edit view: the printable area fills a 220px-wide box at (10, 20), i.e. zoom 0.5.
    mapper.set_view_transform(Some(ViewTransform::new(0.5, 0.0, 0.0, 0.5, 10.0 - 361.0 * 0.5, 20.0 - 180.0 * 0.5)));
    let p = mapper.to_canvas_space(Point::new(120.0, 70.0));
    assert!(point_approx_eq(p, Point::new(220.0, 100.0)));
}

#[test]
fn mapper_to_screen_inverts_to_canvas_space() {
    let mut mapper = CoordinateMapper::new(area());
    mapper.set_view_transform(Some(ViewTransform::new(1.5, 0.0, 0.0, 1.5, -400.0, -200.0)));
    let rel = Point::new(42.0, 87.0);
    let screen = mapper.to_screen(rel);
    assert!(screen.is_some());
    let Some(screen) = screen else { return };
    assert!(point_approx_eq(mapper.to_canvas_space(screen), rel));
}

#[test]
fn mapper_screen_distance_uses_view_scale() {
    let mut mapper = CoordinateMapper::new(area());
    assert!(approx_eq(mapper.screen_dist_to_canvas(10.0), 10.0));
    mapper.set_view_transform(Some(ViewTransform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0)));
    assert!(approx_eq(mapper.screen_dist_to_canvas(10.0), 5.0));
}
