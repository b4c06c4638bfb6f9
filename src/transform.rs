//! Gesture math: clamping, rotation normalization, and the move/scale/rotate updates.
//!
//! Every update is computed from the gesture's start snapshot and the current pointer
//! position, never from the previous frame, so dropped or repeated frames cannot drift
//! the result. All positions are printable-relative canvas coordinates.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::{MAX_SCALE, MIN_SCALE, SCALE_DISTANCE_GUARD};
use crate::coords::{CanvasRect, Point};
use crate::input::GestureKind;
use crate::layer::Transform;

/// Bounds applied to every transform write, whether from a gesture or a precision field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureLimits {
    pub area: CanvasRect,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Minimum start distance used as the scale-ratio denominator.
    pub scale_guard: f64,
}

impl GestureLimits {
    #[must_use]
    pub fn new(area: CanvasRect) -> Self {
        Self { area, min_scale: MIN_SCALE, max_scale: MAX_SCALE, scale_guard: SCALE_DISTANCE_GUARD }
    }
}

/// Clamp `value` into `[min, max]`. NaN maps to `min`.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Normalize an angle in degrees into `[0, 360)`. Non-finite input maps to 0.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clamp a printable-relative center into `[0, width] x [0, height]`.
#[must_use]
pub fn clamp_center(center: Point, area: &CanvasRect) -> Point {
    Point::new(clamp(center.x, 0.0, area.width), clamp(center.y, 0.0, area.height))
}

/// Bring every field of `transform` into range.
#[must_use]
pub fn constrain(transform: Transform, limits: &GestureLimits) -> Transform {
    let center = clamp_center(transform.center(), &limits.area);
    Transform {
        center_x: center.x,
        center_y: center.y,
        scale: clamp(transform.scale, limits.min_scale, limits.max_scale),
        rotation_deg: normalize_rotation(transform.rotation_deg),
    }
}

/// Translate by the pointer delta since the gesture started.
#[must_use]
pub fn move_by(start: &Transform, start_pointer: Point, current: Point, limits: &GestureLimits) -> Transform {
    let center = Point::new(
        start.center_x + (current.x - start_pointer.x),
        start.center_y + (current.y - start_pointer.y),
    );
    let center = clamp_center(center, &limits.area);
    Transform { center_x: center.x, center_y: center.y, ..*start }
}

/// Scale by the ratio of the pointer's current and starting distance from the center.
#[must_use]
pub fn scale_by(start: &Transform, start_pointer: Point, current: Point, limits: &GestureLimits) -> Transform {
    let center = start.center();
    let start_distance = start_pointer.distance_to(center).max(limits.scale_guard);
    let ratio = current.distance_to(center) / start_distance;
    Transform { scale: clamp(start.scale * ratio, limits.min_scale, limits.max_scale), ..*start }
}

/// Rotate by the angle swept around the center since the gesture started.
#[must_use]
pub fn rotate_by(start: &Transform, start_pointer: Point, current: Point) -> Transform {
    let center = start.center();
    let delta = current.angle_from(center) - start_pointer.angle_from(center);
    Transform { rotation_deg: normalize_rotation(start.rotation_deg + delta), ..*start }
}

/// Dispatch to the update for `kind`.
#[must_use]
pub fn apply_gesture(
    kind: GestureKind,
    start: &Transform,
    start_pointer: Point,
    current: Point,
    limits: &GestureLimits,
) -> Transform {
    match kind {
        GestureKind::Move => move_by(start, start_pointer, current, limits),
        GestureKind::Scale => scale_by(start, start_pointer, current, limits),
        GestureKind::Rotate => rotate_by(start, start_pointer, current),
    }
}
