//! Editor configuration supplied by the host page as JSON.
//!
//! Every field has a default, so `{}` is a complete configuration. Values are checked by
//! [`EditorConfig::validate`] before a session is built from them.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    HANDLE_RADIUS_PX, MAX_LAYERS, MAX_SCALE, MIN_SCALE, OFFSET_LIMIT, ROTATE_HANDLE_OFFSET_PX, SCALE_DISTANCE_GUARD,
    TEXT_MIN_HEIGHT, TEXT_MIN_WIDTH, TEXT_PADDING,
};
use crate::coords::CanvasRect;
use crate::error::EditorError;
use crate::transform::GestureLimits;

pub const DEFAULT_CANVAS_WIDTH: f64 = 1160.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 943.0;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Inclusive numeric range of an input control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        crate::transform::clamp(value, self.min, self.max)
    }
}

/// Ranges of the precision panel controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecisionRanges {
    /// Clamp for the x/y offset fields, symmetric around the area center.
    pub offset_limit: f64,
    pub x_slider: NumericRange,
    pub y_slider: NumericRange,
    /// Scale percentage accepted by the numeric field.
    pub scale_field: NumericRange,
    pub scale_slider: NumericRange,
    pub rotation_slider: NumericRange,
}

impl Default for PrecisionRanges {
    fn default() -> Self {
        Self {
            offset_limit: OFFSET_LIMIT,
            x_slider: NumericRange::new(-220.0, 220.0),
            y_slider: NumericRange::new(-292.0, 292.0),
            scale_field: NumericRange::new(1.0, 1000.0),
            scale_slider: NumericRange::new(10.0, 400.0),
            rotation_slider: NumericRange::new(0.0, 360.0),
        }
    }
}

/// Sizing rule for text layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayout {
    pub padding: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self { padding: TEXT_PADDING, min_width: TEXT_MIN_WIDTH, min_height: TEXT_MIN_HEIGHT }
    }
}

impl TextLayout {
    /// Intrinsic layer size for measured glyph bounds.
    #[must_use]
    pub fn fit(&self, measured: (f64, f64)) -> (f64, f64) {
        let (w, h) = measured;
        ((w + self.padding).max(self.min_width), (h + self.padding).max(self.min_height))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"customizer=debug"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_owned() }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Printable region in canvas-absolute units.
    pub printable_area: CanvasRect,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub max_layers: usize,
    pub scale_guard: f64,
    pub rotate_handle_offset_px: f64,
    pub handle_radius_px: f64,
    pub precision: PrecisionRanges,
    pub text: TextLayout,
    pub logging: LoggingConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            printable_area: CanvasRect::new(361.0, 180.0, 440.0, 583.0),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            max_layers: MAX_LAYERS,
            scale_guard: SCALE_DISTANCE_GUARD,
            rotate_handle_offset_px: ROTATE_HANDLE_OFFSET_PX,
            handle_radius_px: HANDLE_RADIUS_PX,
            precision: PrecisionRanges::default(),
            text: TextLayout::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| EditorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<(), EditorError> {
        let area = &self.printable_area;
        if !(area.width > 0.0 && area.height > 0.0 && area.x.is_finite() && area.y.is_finite()) {
            return Err(EditorError::InvalidConfig(format!(
                "printable_area must have positive size, got {}x{}",
                area.width, area.height
            )));
        }
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(EditorError::InvalidConfig("canvas size must be positive".into()));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(EditorError::InvalidConfig(format!(
                "scale range must satisfy 0 < min_scale <= max_scale, got {}..{}",
                self.min_scale, self.max_scale
            )));
        }
        if self.max_layers == 0 {
            return Err(EditorError::InvalidConfig("max_layers must be at least 1".into()));
        }
        if self.scale_guard.is_nan() || self.scale_guard <= 0.0 {
            return Err(EditorError::InvalidConfig("scale_guard must be positive".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn gesture_limits(&self) -> GestureLimits {
        GestureLimits {
            area: self.printable_area,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            scale_guard: self.scale_guard,
        }
    }

    /// The whole canvas, shown in full view.
    #[must_use]
    pub fn full_view_box(&self) -> CanvasRect {
        CanvasRect::new(0.0, 0.0, self.canvas_width, self.canvas_height)
    }
}
