//! Pointer-down target resolution in printable-relative canvas space.
//!
//! The active layer's handles are tested before any body so a handle overlapping another
//! layer still wins. Bodies are tested topmost first. Each test runs in the layer's local
//! frame (origin at its center, unrotated), where its box is axis-aligned.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::coords::Point;
use crate::layer::{Layer, LayerId};
use crate::model::LayerModel;

/// Which part of a layer was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ScaleHandle(Corner),
    RotateHandle,
}

/// A corner scale handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Self::TopLeft, Self::TopRight, Self::BottomRight, Self::BottomLeft];

    /// Position as a fraction of the box: `(0, 0)` is top-left, `(1, 1)` bottom-right.
    #[must_use]
    pub fn fraction(self) -> (f64, f64) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomRight => (1.0, 1.0),
            Self::BottomLeft => (0.0, 1.0),
        }
    }

    /// Two-letter code used for handle element ids and CSS classes.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::TopLeft => "tl",
            Self::TopRight => "tr",
            Self::BottomRight => "br",
            Self::BottomLeft => "bl",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub layer_id: LayerId,
    pub part: HitPart,
}

/// Handle geometry in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSlop {
    /// Pointer distance within which a handle counts as hit.
    pub handle_radius: f64,
    /// Distance of the rotate handle above the box's top edge.
    pub rotate_offset: f64,
}

/// Test which layer (if any) is under `point`, checking the active layer's handles first.
#[must_use]
pub fn hit_test(point: Point, model: &LayerModel, slop: &HitSlop) -> Option<Hit> {
    if let Some(active) = model.active_layer().filter(|l| l.visible)
        && let Some(part) = handle_at(point, active, slop)
    {
        return Some(Hit { layer_id: active.id, part });
    }
    model
        .layers()
        .iter()
        .rev()
        .filter(|l| l.visible)
        .find(|l| body_contains(l, point))
        .map(|l| Hit { layer_id: l.id, part: HitPart::Body })
}

fn handle_at(point: Point, layer: &Layer, slop: &HitSlop) -> Option<HitPart> {
    let local = to_local(layer, point);
    let (w, h) = layer.scaled_size();
    let within = |x: f64, y: f64| Point::new(x, y).distance_to(local) <= slop.handle_radius;

    if within(0.0, -h / 2.0 - slop.rotate_offset) {
        return Some(HitPart::RotateHandle);
    }
    Corner::ALL
        .into_iter()
        .find(|c| {
            let (fx, fy) = c.fraction();
            within((fx - 0.5) * w, (fy - 0.5) * h)
        })
        .map(HitPart::ScaleHandle)
}

fn body_contains(layer: &Layer, point: Point) -> bool {
    let local = to_local(layer, point);
    let (w, h) = layer.scaled_size();
    local.x.abs() <= w / 2.0 && local.y.abs() <= h / 2.0
}

/// Undo the layer's translation and rotation.
fn to_local(layer: &Layer, point: Point) -> Point {
    let dx = point.x - layer.transform.center_x;
    let dy = point.y - layer.transform.center_y;
    let (sin, cos) = layer.transform.rotation_deg.to_radians().sin_cos();
    Point::new(cos * dx + sin * dy, -sin * dx + cos * dy)
}
