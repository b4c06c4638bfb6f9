//! Precision controls: numeric fields and sliders mirroring the active layer's transform.
//!
//! Reading turns the active layer into display values (x/y as offsets from the printable
//! area's center, scale as a percentage, rotation in degrees). Writing turns a parsed
//! control value back into a transform, which the model then constrains exactly as it
//! does gesture output.

#[cfg(test)]
#[path = "precision_test.rs"]
mod precision_test;

use serde::Serialize;

use crate::config::{NumericRange, PrecisionRanges};
use crate::coords::CanvasRect;
use crate::error::EditorError;
use crate::events::{LayerChange, LayerObserver};
use crate::layer::{Layer, Transform};
use crate::model::LayerModel;
use crate::transform::{clamp, normalize_rotation};

/// A transform axis with a field/slider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionField {
    X,
    Y,
    Scale,
    Rotation,
}

impl PrecisionField {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "scale" => Some(Self::Scale),
            "rotation" => Some(Self::Rotation),
            _ => None,
        }
    }
}

/// Which half of a field/slider pair the user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSource {
    Field,
    Slider,
}

/// Display values of one field/slider pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisControl {
    pub text: String,
    pub slider: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextControls {
    pub content: String,
    pub font_family: String,
    pub font_size_px: f64,
    pub bold: bool,
    pub italic: bool,
}

/// Everything the precision panel displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionState {
    /// False when no layer is active; every control is cleared and disabled.
    pub enabled: bool,
    pub x: AxisControl,
    pub y: AxisControl,
    pub scale: AxisControl,
    pub rotation: AxisControl,
    pub color: Option<String>,
    /// Present only for text layers.
    pub text: Option<TextControls>,
}

impl PrecisionState {
    #[must_use]
    pub fn axis(&self, field: PrecisionField) -> &AxisControl {
        match field {
            PrecisionField::X => &self.x,
            PrecisionField::Y => &self.y,
            PrecisionField::Scale => &self.scale,
            PrecisionField::Rotation => &self.rotation,
        }
    }
}

/// Host surface that shows precision values.
pub trait PrecisionPanel {
    fn show(&mut self, state: &PrecisionState);
}

/// Parse a control value. Blank, malformed, and non-finite input is rejected.
pub fn parse_value(field: &'static str, raw: &str) -> Result<f64, EditorError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(EditorError::InvalidNumericInput { field, raw: raw.to_owned() }),
    }
}

/// Rounded display form without a negative zero.
#[must_use]
pub fn format_whole(value: f64) -> String {
    format!("{}", value.round() + 0.0)
}

/// Rounded degrees kept in `[0, 360)`.
#[must_use]
pub fn format_degrees(value: f64) -> String {
    format_whole(normalize_rotation(value.round()))
}

/// Keeps the panel consistent with the model.
#[derive(Debug, Clone)]
pub struct PrecisionSync {
    ranges: PrecisionRanges,
    state: PrecisionState,
    dirty: bool,
}

impl PrecisionSync {
    #[must_use]
    pub fn new(ranges: PrecisionRanges) -> Self {
        let state = disabled_state(&ranges);
        Self { ranges, state, dirty: true }
    }

    #[must_use]
    pub fn state(&self) -> &PrecisionState {
        &self.state
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn ranges(&self) -> &PrecisionRanges {
        &self.ranges
    }

    /// Re-read the active layer.
    pub fn refresh(&mut self, model: &LayerModel) -> &PrecisionState {
        self.dirty = false;
        self.state = match model.active_layer() {
            Some(layer) => self.read(layer, &model.printable_area()),
            None => disabled_state(&self.ranges),
        };
        &self.state
    }

    fn read(&self, layer: &Layer, area: &CanvasRect) -> PrecisionState {
        let t = &layer.transform;
        let center = area.relative_center();
        let x = t.center_x - center.x;
        let y = t.center_y - center.y;
        let percent = t.scale * 100.0;
        PrecisionState {
            enabled: true,
            x: AxisControl { text: format_whole(x), slider: self.ranges.x_slider.clamp(x) },
            y: AxisControl { text: format_whole(y), slider: self.ranges.y_slider.clamp(y) },
            scale: AxisControl { text: format_whole(percent), slider: self.ranges.scale_slider.clamp(percent) },
            rotation: AxisControl {
                text: format_degrees(t.rotation_deg),
                slider: self.ranges.rotation_slider.clamp(t.rotation_deg),
            },
            color: Some(layer.style.color().to_owned()),
            text: layer.text().map(|text| TextControls {
                content: text.content.clone(),
                font_family: text.font_family.clone(),
                font_size_px: text.font_size_px,
                bold: text.is_bold(),
                italic: text.is_italic(),
            }),
        }
    }

    /// The paired display values after the user types into one half of a pair, before
    /// anything is committed to the model.
    pub fn mirror(&self, field: PrecisionField, source: ControlSource, raw: &str) -> Result<AxisControl, EditorError> {
        let value = parse_value(field.name(), raw)?;
        let slider = self.slider_range(field).clamp(value);
        Ok(match source {
            ControlSource::Field => AxisControl { text: raw.trim().to_owned(), slider },
            ControlSource::Slider if field == PrecisionField::Rotation => {
                AxisControl { text: format_degrees(value), slider }
            }
            ControlSource::Slider => AxisControl { text: format_whole(value), slider },
        })
    }

    #[must_use]
    pub fn slider_range(&self, field: PrecisionField) -> NumericRange {
        match field {
            PrecisionField::X => self.ranges.x_slider,
            PrecisionField::Y => self.ranges.y_slider,
            PrecisionField::Scale => self.ranges.scale_slider,
            PrecisionField::Rotation => self.ranges.rotation_slider,
        }
    }

    /// The transform that results from setting `field` to `value` on `current`.
    #[must_use]
    pub fn target_transform(&self, field: PrecisionField, value: f64, current: &Transform, area: &CanvasRect) -> Transform {
        let center = area.relative_center();
        let limit = self.ranges.offset_limit;
        match field {
            PrecisionField::X => {
                Transform { center_x: center.x + clamp(value, -limit, limit), ..*current }
            }
            PrecisionField::Y => {
                Transform { center_y: center.y + clamp(value, -limit, limit), ..*current }
            }
            PrecisionField::Scale => Transform { scale: self.ranges.scale_field.clamp(value) / 100.0, ..*current },
            PrecisionField::Rotation => {
                Transform { rotation_deg: normalize_rotation(clamp(value, 0.0, 360.0)), ..*current }
            }
        }
    }
}

impl LayerObserver for PrecisionSync {
    fn on_layer_change(&mut self, change: &LayerChange, model: &LayerModel) {
        let active = model.active_id();
        let relevant = match change {
            LayerChange::StyleChanged { id } => active == Some(*id),
            other => other.affects_geometry_of(active),
        };
        if relevant {
            self.dirty = true;
        }
    }
}

fn disabled_state(ranges: &PrecisionRanges) -> PrecisionState {
    let blank = |range: NumericRange, neutral: f64| AxisControl { text: String::new(), slider: range.clamp(neutral) };
    PrecisionState {
        enabled: false,
        x: blank(ranges.x_slider, 0.0),
        y: blank(ranges.y_slider, 0.0),
        scale: blank(ranges.scale_slider, 100.0),
        rotation: blank(ranges.rotation_slider, 0.0),
        color: None,
        text: None,
    }
}
