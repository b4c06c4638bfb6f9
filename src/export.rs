//! Design export and import.
//!
//! The exchange format groups layers by product side and canvas:
//! `{ product, design: { sides: [{ canvases: [{ layers: [...] }] }] } }`, with camelCase
//! keys. Layer `x`/`y` are the printable-relative center. Reading is lenient: numbers may
//! arrive as strings, non-finite or malformed numbers become absent, layers past the
//! layer cap and layers without any identity are dropped, and a document without sides
//! gets a default `front` side.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::coords::CanvasRect;
use crate::error::EditorError;
use crate::layer::{
    ColorAttribute, FontStyle, Layer, LayerContent, ProductBase, Style, SvgContent, TextStyle, Transform,
};
use crate::model::LayerModel;

pub const DEFAULT_SIDE: &str = "front";
const GRAPHIC_TYPE: &str = "svg";
const TEXT_TYPE: &str = "text";
const DEFAULT_PRESERVE_ASPECT_RATIO: &str = "xMidYMid meet";
const FALLBACK_SIZE: f64 = 100.0;
const FALLBACK_COLOR: &str = "#000000";
const FALLBACK_FONT_FAMILY: &str = "Arial";
const FALLBACK_FONT_SIZE: f64 = 32.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportDocument {
    pub product: ProductInfo,
    pub design: DesignData,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInfo {
    pub code: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignData {
    pub sides: Vec<SideData>,
    /// Older documents list canvases directly, each naming its side.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub canvases: Vec<CanvasData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SideData {
    pub id: Option<String>,
    pub name: Option<String>,
    pub enabled: bool,
    pub canvases: Vec<CanvasData>,
}

impl Default for SideData {
    fn default() -> Self {
        Self { id: None, name: None, enabled: true, canvases: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasData {
    pub id: Option<String>,
    pub side: Option<String>,
    pub preset_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub y: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    pub layers: Vec<ExportLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportLayer {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Template key the layer was created from.
    pub object_id: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub y: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub scale: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub rotation: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub opacity: Option<f64>,
    pub color: Option<String>,
    pub color_attribute: Option<ColorAttribute>,
    #[serde(deserialize_with = "lenient_number")]
    pub z_index: Option<f64>,
    pub locked: bool,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<SvgBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBlock>,
}

impl Default for ExportLayer {
    fn default() -> Self {
        Self {
            id: None,
            kind: None,
            object_id: None,
            name: None,
            x: None,
            y: None,
            width: None,
            height: None,
            scale: None,
            rotation: None,
            opacity: None,
            color: None,
            color_attribute: None,
            z_index: None,
            locked: false,
            visible: true,
            svg: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgBlock {
    pub asset_ref: Option<String>,
    pub view_box: Option<String>,
    pub preserve_aspect_ratio: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextBlock {
    pub content: Option<String>,
    pub font_family: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub letter_spacing: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub line_height: Option<f64>,
    pub text_align: Option<String>,
    pub text_transform: Option<String>,
    pub decoration: Option<String>,
}

/// A CSS font weight, numeric (`700`) or named (`"bold"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontWeight {
    Numeric(f64),
    Named(String),
}

impl FontWeight {
    /// Numeric weight; unknown names fall back to regular.
    #[must_use]
    pub fn to_numeric(&self) -> u16 {
        let value = match self {
            Self::Numeric(n) => *n,
            Self::Named(name) => match name.trim().to_ascii_lowercase().as_str() {
                "bold" | "bolder" => 700.0,
                "lighter" => 300.0,
                other => parse_number(other).unwrap_or(400.0),
            },
        };
        weight_from(value)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn weight_from(value: f64) -> u16 {
    if value.is_finite() && (1.0..=1000.0).contains(&value) { value.round() as u16 } else { 400 }
}

// --- Export ---

impl ExportDocument {
    /// Snapshot the model: one `front` side with one canvas covering the printable area,
    /// layers bottom first with `zIndex` counting from 1.
    #[must_use]
    pub fn from_model(model: &LayerModel) -> Self {
        let base = model.base();
        let area = model.printable_area();
        let layers = model
            .layers()
            .iter()
            .zip(1_u32..)
            .map(|(layer, z)| ExportLayer::from_layer(layer, z))
            .collect();
        Self {
            product: ProductInfo {
                code: base.product_code.clone(),
                size: base.size.clone(),
                color: Some(base.fill_color.clone()),
            },
            design: DesignData {
                sides: vec![SideData {
                    id: Some(DEFAULT_SIDE.to_owned()),
                    name: Some(title_case(DEFAULT_SIDE)),
                    enabled: true,
                    canvases: vec![CanvasData {
                        id: Some(format!("{DEFAULT_SIDE}-canvas")),
                        side: Some(DEFAULT_SIDE.to_owned()),
                        preset_name: None,
                        x: Some(area.x),
                        y: Some(area.y),
                        width: Some(area.width),
                        height: Some(area.height),
                        layers,
                    }],
                }],
                canvases: Vec::new(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and sanitize a document.
    pub fn from_json(raw: &str, max_layers: usize) -> Result<Self, EditorError> {
        let document: Self = serde_json::from_str(raw).map_err(|e| EditorError::Import(e.to_string()))?;
        Ok(document.sanitized(max_layers))
    }

    /// Normalize a parsed document.
    #[must_use]
    pub fn sanitized(mut self, max_layers: usize) -> Self {
        if self.design.sides.is_empty() && !self.design.canvases.is_empty() {
            self.design.sides = group_legacy_canvases(std::mem::take(&mut self.design.canvases));
        }
        self.design.canvases.clear();
        if self.design.sides.is_empty() {
            self.design.sides.push(SideData::default());
        }
        for (index, side) in self.design.sides.iter_mut().enumerate() {
            let id = side.id.as_deref().map_or_else(|| format!("side-{}", index + 1), str::to_ascii_lowercase);
            if side.name.is_none() {
                side.name = Some(title_case(&id));
            }
            if side.canvases.is_empty() {
                side.canvases.push(CanvasData::default());
            }
            for canvas in &mut side.canvases {
                if canvas.side.is_none() {
                    canvas.side = Some(id.clone());
                }
                canvas.layers.truncate(max_layers);
                canvas.layers.retain(ExportLayer::has_identity);
            }
            side.id = Some(id);
        }
        self
    }

    /// The canvas the editor works on: the first canvas of the `front` side, else of the
    /// first side.
    #[must_use]
    pub fn primary_canvas(&self) -> Option<&CanvasData> {
        let sides = &self.design.sides;
        sides
            .iter()
            .find(|s| s.id.as_deref() == Some(DEFAULT_SIDE))
            .or_else(|| sides.first())
            .and_then(|s| s.canvases.first())
    }

    /// Layers of the primary canvas in z-order, ready for the model. Unknown layer types
    /// are skipped.
    #[must_use]
    pub fn to_layers(&self, area: &CanvasRect) -> Vec<Layer> {
        let Some(canvas) = self.primary_canvas() else {
            return Vec::new();
        };
        let mut ordered: Vec<&ExportLayer> = canvas.layers.iter().collect();
        ordered.sort_by(|a, b| a.z_index.unwrap_or(f64::MAX).total_cmp(&b.z_index.unwrap_or(f64::MAX)));
        ordered.into_iter().filter_map(|l| l.to_layer(area)).collect()
    }

    /// The product base described by `product`, keeping `current`'s identity and any
    /// field the document leaves out.
    #[must_use]
    pub fn to_product_base(&self, current: &ProductBase) -> ProductBase {
        ProductBase {
            id: current.id,
            name: current.name.clone(),
            fill_color: self.product.color.clone().unwrap_or_else(|| current.fill_color.clone()),
            product_code: self.product.code.clone().or_else(|| current.product_code.clone()),
            size: self.product.size.clone().or_else(|| current.size.clone()),
        }
    }
}

impl ExportLayer {
    #[must_use]
    pub fn from_layer(layer: &Layer, z_index: u32) -> Self {
        let (kind, svg, text) = match &layer.content {
            LayerContent::Graphic(content) => (
                GRAPHIC_TYPE,
                Some(SvgBlock {
                    asset_ref: content.asset_ref.clone(),
                    view_box: Some(content.view_box.clone()),
                    preserve_aspect_ratio: Some(DEFAULT_PRESERVE_ASPECT_RATIO.to_owned()),
                    content: Some(content.markup.clone()),
                }),
                None,
            ),
            LayerContent::Text(t) => (
                TEXT_TYPE,
                None,
                Some(TextBlock {
                    content: Some(t.content.clone()),
                    font_family: Some(t.font_family.clone()),
                    font_size: Some(t.font_size_px),
                    font_weight: Some(FontWeight::Numeric(f64::from(t.font_weight))),
                    font_style: Some(t.font_style.as_str().to_owned()),
                    ..TextBlock::default()
                }),
            ),
        };
        Self {
            id: Some(layer.id.to_string()),
            kind: Some(kind.to_owned()),
            object_id: Some(layer.template_key.clone()),
            name: Some(layer.name.clone()),
            x: Some(layer.transform.center_x),
            y: Some(layer.transform.center_y),
            width: Some(layer.width),
            height: Some(layer.height),
            scale: Some(layer.transform.scale),
            rotation: Some(layer.transform.rotation_deg),
            opacity: Some(layer.style.opacity),
            color: Some(layer.style.color().to_owned()),
            color_attribute: Some(layer.style.color_attribute),
            z_index: Some(f64::from(z_index)),
            locked: layer.locked,
            visible: layer.visible,
            svg,
            text,
        }
    }

    /// Whether the entry names a type, template, or id.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        self.kind.is_some() || self.object_id.is_some() || self.id.is_some()
    }

    /// Rebuild a layer. Missing geometry defaults to an identity transform centered in
    /// `area`; an unknown or missing `type` yields `None`.
    #[must_use]
    pub fn to_layer(&self, area: &CanvasRect) -> Option<Layer> {
        let width = self.width.filter(|w| *w > 0.0).unwrap_or(FALLBACK_SIZE);
        let height = self.height.filter(|h| *h > 0.0).unwrap_or(FALLBACK_SIZE);
        let content = match self.kind.as_deref()? {
            GRAPHIC_TYPE => {
                let svg = self.svg.clone().unwrap_or_default();
                LayerContent::Graphic(SvgContent {
                    asset_ref: svg.asset_ref,
                    view_box: svg.view_box.unwrap_or_else(|| format!("0 0 {width} {height}")),
                    markup: svg.content.unwrap_or_default(),
                })
            }
            TEXT_TYPE => {
                let text = self.text.clone().unwrap_or_default();
                LayerContent::Text(TextStyle {
                    content: text.content.unwrap_or_default(),
                    font_family: text.font_family.unwrap_or_else(|| FALLBACK_FONT_FAMILY.to_owned()),
                    font_size_px: text.font_size.filter(|s| *s > 0.0).unwrap_or(FALLBACK_FONT_SIZE),
                    font_weight: text.font_weight.as_ref().map_or(400, FontWeight::to_numeric),
                    font_style: match text.font_style.as_deref() {
                        Some("italic" | "oblique") => FontStyle::Italic,
                        _ => FontStyle::Normal,
                    },
                })
            }
            _ => return None,
        };

        let center = area.relative_center();
        let id = match self.id.as_deref().map(Uuid::parse_str) {
            Some(Ok(id)) => id,
            _ => Uuid::new_v4(),
        };
        let attribute = self.color_attribute.unwrap_or_default();
        let mut style = Style::with_color(self.color.as_deref().unwrap_or(FALLBACK_COLOR), attribute);
        style.opacity = self.opacity.map_or(1.0, |o| o.clamp(0.0, 1.0));

        Some(Layer {
            id,
            name: self.name.clone().unwrap_or_default(),
            template_key: self.object_id.clone().unwrap_or_default(),
            width,
            height,
            transform: Transform {
                center_x: self.x.unwrap_or(center.x),
                center_y: self.y.unwrap_or(center.y),
                scale: self.scale.unwrap_or(1.0),
                rotation_deg: self.rotation.unwrap_or(0.0),
            },
            style,
            locked: self.locked,
            visible: self.visible,
            content,
        })
    }
}

// --- Helpers ---

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}

fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => parse_number(s),
        _ => None,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// `"front-left"` → `"Front Left"`.
fn title_case(id: &str) -> String {
    id.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn group_legacy_canvases(canvases: Vec<CanvasData>) -> Vec<SideData> {
    let mut sides: Vec<SideData> = Vec::new();
    for (index, canvas) in canvases.into_iter().enumerate() {
        let side_id = canvas.side.as_deref().map_or_else(|| format!("side-{}", index + 1), str::to_ascii_lowercase);
        match sides.iter().position(|s| s.id.as_deref() == Some(side_id.as_str())) {
            Some(existing) => sides[existing].canvases.push(canvas),
            None => sides.push(SideData {
                name: Some(title_case(&side_id)),
                id: Some(side_id),
                enabled: true,
                canvases: vec![canvas],
            }),
        }
    }
    sides
}
