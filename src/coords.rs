//! Coordinate spaces: client pixels, canvas-absolute units, and printable-relative units.
//!
//! The host reports pointer positions in client (CSS pixel) coordinates. The design
//! surface is an SVG whose screen transform maps canvas-absolute units to client pixels.
//! Layers store their centers relative to the printable area's top-left corner, so every
//! pointer position is converted client → canvas-absolute → printable-relative before any
//! gesture math runs.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

/// A point in client, canvas-absolute, or printable-relative space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle in degrees of the vector `origin → self`, measured clockwise from +x
    /// (y grows downward on screen).
    #[must_use]
    pub fn angle_from(self, origin: Point) -> f64 {
        (self.y - origin.y).atan2(self.x - origin.x).to_degrees()
    }
}

/// An axis-aligned rectangle in client pixels, as returned by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// True when the rectangle has no on-screen area (hidden or unattached element).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// An axis-aligned rectangle in canvas-absolute units: the printable area or a view box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center of the rectangle in its own relative coordinates (`width / 2, height / 2`).
    #[must_use]
    pub fn relative_center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert a canvas-absolute point into coordinates relative to this rectangle.
    #[must_use]
    pub fn to_relative(&self, absolute: Point) -> Point {
        Point::new(absolute.x - self.x, absolute.y - self.y)
    }

    /// Convert a point relative to this rectangle back into canvas-absolute coordinates.
    #[must_use]
    pub fn to_absolute(&self, relative: Point) -> Point {
        Point::new(relative.x + self.x, relative.y + self.y)
    }

    /// `x y width height`, the SVG `viewBox` attribute form.
    #[must_use]
    pub fn view_box_attr(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

/// Affine transform from canvas-absolute units to client pixels.
///
/// Laid out like an SVG matrix: `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    #[must_use]
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 }
    }

    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The transform an `<svg>` element laid out at `element` applies to `view_box`
    /// under the default `preserveAspectRatio="xMidYMid meet"`.
    ///
    /// Returns `None` when either rectangle is degenerate.
    #[must_use]
    pub fn fit_view_box(element: ScreenRect, view_box: CanvasRect) -> Option<Self> {
        if element.is_empty() || view_box.width <= 0.0 || view_box.height <= 0.0 {
            return None;
        }
        let scale = (element.width / view_box.width).min(element.height / view_box.height);
        let e = element.left + (element.width - view_box.width * scale) / 2.0 - view_box.x * scale;
        let f = element.top + (element.height - view_box.height * scale) / 2.0 - view_box.y * scale;
        Some(Self::new(scale, 0.0, 0.0, scale, e, f))
    }

    /// Apply the transform to a point.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(self.a * p.x + self.c * p.y + self.e, self.b * p.x + self.d * p.y + self.f)
    }

    /// The inverse transform, or `None` when the matrix is singular or non-finite.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return None;
        }
        Some(Self {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Average linear scale factor (client pixels per canvas unit).
    #[must_use]
    pub fn mean_scale(&self) -> f64 {
        let sx = self.a.hypot(self.b);
        let sy = self.c.hypot(self.d);
        (sx + sy) / 2.0
    }
}

/// Converts pointer positions into printable-relative canvas coordinates and back.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    area: CanvasRect,
    transform: Option<ViewTransform>,
}

impl CoordinateMapper {
    /// A mapper for `area` with no known screen transform yet.
    #[must_use]
    pub fn new(area: CanvasRect) -> Self {
        Self { area, transform: None }
    }

    /// Replace the current canvas-to-screen transform (e.g. after layout, resize, or a
    /// view-box change). `None` marks the surface as not laid out.
    pub fn set_view_transform(&mut self, transform: Option<ViewTransform>) {
        self.transform = transform;
    }

    #[must_use]
    pub fn view_transform(&self) -> Option<ViewTransform> {
        self.transform
    }

    #[must_use]
    pub fn printable_area(&self) -> CanvasRect {
        self.area
    }

    /// Convert a client position to printable-relative canvas coordinates.
    ///
    /// Falls back to the printable-area center when no invertible transform is available.
    #[must_use]
    pub fn to_canvas_space(&self, client: Point) -> Point {
        self.to_canvas_relative(client).unwrap_or_else(|| self.area.relative_center())
    }

    /// Convert a client position to printable-relative canvas coordinates, or `None`
    /// without an invertible transform.
    #[must_use]
    pub fn to_canvas_relative(&self, client: Point) -> Option<Point> {
        self.to_canvas_absolute(client).map(|absolute| self.area.to_relative(absolute))
    }

    /// Convert a client position to canvas-absolute coordinates.
    #[must_use]
    pub fn to_canvas_absolute(&self, client: Point) -> Option<Point> {
        let inverse = self.transform?.inverse()?;
        let p = inverse.apply(client);
        (p.x.is_finite() && p.y.is_finite()).then_some(p)
    }

    /// Convert a printable-relative point to client pixels.
    #[must_use]
    pub fn to_screen(&self, relative: Point) -> Option<Point> {
        self.transform.map(|t| t.apply(self.area.to_absolute(relative)))
    }

    /// Convert a screen distance in pixels to canvas units. Without a transform the two
    /// spaces are treated as 1:1.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, pixels: f64) -> f64 {
        match self.transform.map(|t| t.mean_scale()) {
            Some(scale) if scale.is_finite() && scale > f64::EPSILON => pixels / scale,
            _ => pixels,
        }
    }
}
