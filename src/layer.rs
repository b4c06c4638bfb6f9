//! Layer data model: the placed design objects, their transform and style, and the
//! templates they are created from.
//!
//! Design layers (graphics and text) share a transform-bearing [`Layer`] struct whose
//! [`LayerContent`] distinguishes the variants, so text-only fields are only reachable
//! through a text layer. The product base is a separate [`ProductBase`] type: it has a
//! color but no transform, and it never enters the ordered layer list.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coords::{CanvasRect, Point};

/// Unique identifier for a layer.
pub type LayerId = Uuid;

/// The kind of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// A vector graphic (design or element template).
    Graphic,
    /// A single-line text run.
    Text,
    /// The product itself; color only.
    ProductBase,
}

impl LayerKind {
    /// Label used as the prefix of generated layer names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Graphic => "Graphic",
            Self::Text => "Text",
            Self::ProductBase => "ProductBase",
        }
    }
}

/// Which SVG paint attribute the layer color drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorAttribute {
    #[default]
    Fill,
    Stroke,
}

impl ColorAttribute {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }
}

/// Italic or upright text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
        }
    }
}

/// Placement of a design layer inside the printable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Center x, printable-area-relative.
    pub center_x: f64,
    /// Center y, printable-area-relative.
    pub center_y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Clockwise rotation in degrees, kept in `[0, 360)`.
    pub rotation_deg: f64,
}

impl Transform {
    /// Identity placement centered in `area`.
    #[must_use]
    pub fn centered_in(area: &CanvasRect) -> Self {
        let center = area.relative_center();
        Self { center_x: center.x, center_y: center.y, scale: 1.0, rotation_deg: 0.0 }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }
}

/// Paint applied to a layer's visual content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub fill_color: String,
    pub stroke_color: String,
    /// Which of the two colors the content responds to.
    pub color_attribute: ColorAttribute,
    pub opacity: f64,
}

impl Style {
    /// A style whose `attribute` paint is `color` and whose other paint is `none`.
    #[must_use]
    pub fn with_color(color: &str, attribute: ColorAttribute) -> Self {
        let (fill, stroke) = match attribute {
            ColorAttribute::Fill => (color.to_owned(), "none".to_owned()),
            ColorAttribute::Stroke => ("none".to_owned(), color.to_owned()),
        };
        Self { fill_color: fill, stroke_color: stroke, color_attribute: attribute, opacity: 1.0 }
    }

    /// The color the content currently responds to.
    #[must_use]
    pub fn color(&self) -> &str {
        match self.color_attribute {
            ColorAttribute::Fill => &self.fill_color,
            ColorAttribute::Stroke => &self.stroke_color,
        }
    }

    /// Write `color` into the paint selected by `color_attribute`.
    pub fn set_color(&mut self, color: &str) {
        match self.color_attribute {
            ColorAttribute::Fill => color.clone_into(&mut self.fill_color),
            ColorAttribute::Stroke => color.clone_into(&mut self.stroke_color),
        }
    }
}

/// Text-only properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub content: String,
    pub font_family: String,
    pub font_size_px: f64,
    pub font_weight: u16,
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Weights of 600 and above count as bold.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        self.font_weight >= 600
    }

    #[must_use]
    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }

    /// CSS `font` shorthand, used for glyph measurement.
    #[must_use]
    pub fn css_font(&self) -> String {
        format!("{} {} {}px {}", self.font_style.as_str(), self.font_weight, self.font_size_px, self.font_family)
    }
}

/// Vector content hosted by a graphic layer. The core never interprets `markup`; the
/// browser host inserts it into the layer's inner group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgContent {
    #[serde(default)]
    pub asset_ref: Option<String>,
    pub view_box: String,
    pub markup: String,
}

/// Variant-specific layer content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerContent {
    Graphic(SvgContent),
    Text(TextStyle),
}

impl LayerContent {
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Graphic(_) => LayerKind::Graphic,
            Self::Text(_) => LayerKind::Text,
        }
    }
}

/// A prototype describing the initial geometry, style, and content of a new layer.
/// Supplied by the gallery collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Stable catalog key (e.g. `"sparkle"`), exported as the layer's `objectId`.
    pub key: String,
    /// Gallery display name.
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub width: f64,
    pub height: f64,
    /// Initial color of the content.
    pub color: String,
    #[serde(default)]
    pub color_attribute: ColorAttribute,
    pub content: LayerContent,
}

impl Template {
    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }
}

/// A placed graphic or text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Key of the template the layer was created from.
    pub template_key: String,
    /// Intrinsic, unscaled width.
    pub width: f64,
    /// Intrinsic, unscaled height.
    pub height: f64,
    pub transform: Transform,
    pub style: Style,
    pub locked: bool,
    pub visible: bool,
    pub content: LayerContent,
}

impl Layer {
    /// Build a layer from `template`, centered in `area` at identity scale and rotation.
    #[must_use]
    pub fn from_template(template: &Template, id: LayerId, name: String, area: &CanvasRect) -> Self {
        Self {
            id,
            name,
            template_key: template.key.clone(),
            width: template.width,
            height: template.height,
            transform: Transform::centered_in(area),
            style: Style::with_color(&template.color, template.color_attribute),
            locked: false,
            visible: true,
            content: template.content.clone(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.content.kind()
    }

    /// Text properties, when this is a text layer.
    #[must_use]
    pub fn text(&self) -> Option<&TextStyle> {
        match &self.content {
            LayerContent::Text(text) => Some(text),
            LayerContent::Graphic(_) => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.content {
            LayerContent::Text(text) => Some(text),
            LayerContent::Graphic(_) => None,
        }
    }

    /// Width and height after scaling.
    #[must_use]
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.transform.scale, self.height * self.transform.scale)
    }
}

/// The product the design is printed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBase {
    pub id: LayerId,
    pub name: String,
    pub fill_color: String,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

impl ProductBase {
    #[must_use]
    pub fn new(name: &str, fill_color: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            fill_color: fill_color.to_owned(),
            product_code: None,
            size: None,
        }
    }
}

/// Measures rendered glyph bounds for a text layer.
pub trait TextMeasurer {
    /// Width and height of `text.content` rendered with `text`'s font, in canvas units.
    fn measure(&self, text: &TextStyle) -> (f64, f64);
}

/// Font-agnostic estimate: average advance of 0.6 em per character and a 1.2 em line box.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, text: &TextStyle) -> (f64, f64) {
        let chars = text.content.chars().count();
        #[allow(clippy::cast_precision_loss)]
        let width = chars as f64 * text.font_size_px * 0.6;
        let height = if chars == 0 { 0.0 } else { text.font_size_px * 1.2 };
        (width, height)
    }
}
