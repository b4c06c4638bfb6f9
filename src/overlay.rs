//! Selection overlay: the screen-space frame mirroring the active layer's footprint.
//!
//! The frame is positioned relative to the overlay's container element and rotated with
//! a CSS transform. Handles sit at fixed fractions of the frame's own box, so they follow
//! rotation and scale without being recomputed from canvas geometry.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::Serialize;
use tracing::debug;

use crate::coords::{CanvasRect, ScreenRect};
use crate::error::EditorError;
use crate::events::{LayerChange, LayerObserver};
use crate::hit::Corner;
use crate::layer::Layer;
use crate::model::LayerModel;

/// Client rectangles the overlay is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayGeometry {
    /// On-screen box of the printable area.
    pub area: ScreenRect,
    /// On-screen box of the element the overlay is positioned in.
    pub container: ScreenRect,
}

/// Overlay box in container-relative pixels, before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rotation_deg: f64,
}

impl OverlayFrame {
    /// CSS `transform` value.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("rotate({}deg)", self.rotation_deg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum OverlayState {
    #[default]
    Hidden,
    Visible(OverlayFrame),
}

impl OverlayState {
    #[must_use]
    pub fn frame(&self) -> Option<&OverlayFrame> {
        match self {
            Self::Hidden => None,
            Self::Visible(frame) => Some(frame),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    Scale(Corner),
    Rotate,
}

/// Where a handle sits inside the overlay box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandlePlacement {
    pub kind: HandleKind,
    pub left_pct: f64,
    pub top_pct: f64,
    /// Extra vertical offset in pixels (negative is above the box).
    pub offset_y_px: f64,
}

/// The four corner handles followed by the rotate handle.
#[must_use]
pub fn handle_layout(rotate_offset_px: f64) -> [HandlePlacement; 5] {
    let corner = |c: Corner| {
        let (fx, fy) = c.fraction();
        HandlePlacement { kind: HandleKind::Scale(c), left_pct: fx * 100.0, top_pct: fy * 100.0, offset_y_px: 0.0 }
    };
    [
        corner(Corner::TopLeft),
        corner(Corner::TopRight),
        corner(Corner::BottomRight),
        corner(Corner::BottomLeft),
        HandlePlacement { kind: HandleKind::Rotate, left_pct: 50.0, top_pct: 0.0, offset_y_px: -rotate_offset_px },
    ]
}

/// Project `layer` onto the screen.
///
/// Fails with [`EditorError::MissingGeometry`] when the printable area has no on-screen
/// size.
pub fn compute_frame(layer: &Layer, area: &CanvasRect, geometry: &OverlayGeometry) -> Result<OverlayFrame, EditorError> {
    if geometry.area.is_empty() {
        return Err(EditorError::MissingGeometry("printable area has no on-screen size"));
    }
    let scale_x = geometry.area.width / area.width;
    let scale_y = geometry.area.height / area.height;
    let (w, h) = layer.scaled_size();
    let width = w * scale_x;
    let height = h * scale_y;
    let center_x = geometry.area.left + layer.transform.center_x * scale_x;
    let center_y = geometry.area.top + layer.transform.center_y * scale_y;
    Ok(OverlayFrame {
        left: center_x - geometry.container.left - width / 2.0,
        top: center_y - geometry.container.top - height / 2.0,
        width,
        height,
        rotation_deg: layer.transform.rotation_deg,
    })
}

/// Tracks whether and where the overlay is shown.
#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    state: OverlayState,
    edit_mode: bool,
    geometry: Option<OverlayGeometry>,
    rotate_offset_px: f64,
    dirty: bool,
}

impl SelectionOverlay {
    #[must_use]
    pub fn new(rotate_offset_px: f64) -> Self {
        Self { state: OverlayState::Hidden, edit_mode: false, geometry: None, rotate_offset_px, dirty: true }
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        if self.edit_mode != edit_mode {
            self.edit_mode = edit_mode;
            self.dirty = true;
        }
    }

    /// Record fresh client rectangles (after layout, scroll, or resize).
    pub fn set_geometry(&mut self, geometry: Option<OverlayGeometry>) {
        if self.geometry != geometry {
            self.geometry = geometry;
            self.dirty = true;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    #[must_use]
    pub fn handles(&self) -> [HandlePlacement; 5] {
        handle_layout(self.rotate_offset_px)
    }

    /// Recompute the overlay from the model. Hidden without an active layer, outside
    /// edit mode, or without usable geometry.
    pub fn refresh(&mut self, model: &LayerModel) -> &OverlayState {
        self.dirty = false;
        self.state = match (self.edit_mode, model.active_layer(), self.geometry.as_ref()) {
            (true, Some(layer), Some(geometry)) => match compute_frame(layer, &model.printable_area(), geometry) {
                Ok(frame) => OverlayState::Visible(frame),
                Err(err) => {
                    debug!(%err, "overlay hidden");
                    OverlayState::Hidden
                }
            },
            _ => OverlayState::Hidden,
        };
        &self.state
    }
}

impl LayerObserver for SelectionOverlay {
    fn on_layer_change(&mut self, change: &LayerChange, model: &LayerModel) {
        if change.affects_geometry_of(model.active_id()) {
            self.dirty = true;
        }
    }
}
