//! Rendering support: coalesced frame scheduling, layer transform attributes, and the
//! standalone SVG document export.
//!
//! Layers render inside a group translated to the printable area's origin. Each layer
//! group carries `translate(cx cy) rotate(r) scale(s)` and wraps an inner group shifted by
//! half the intrinsic size, so the content's own origin stays at its top-left corner.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::coords::CanvasRect;
use crate::layer::{Layer, LayerContent, Transform};
use crate::model::LayerModel;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Coalesces render requests to at most one per animation frame.
#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    pending: bool,
    frames: u64,
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a render. Returns true only when this call scheduled a new frame; further
    /// requests before the frame runs are absorbed.
    pub fn request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Start an animation frame. Returns whether a render was pending.
    pub fn begin_frame(&mut self) -> bool {
        let pending = std::mem::take(&mut self.pending);
        if pending {
            self.frames += 1;
        }
        pending
    }

    /// Number of frames rendered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// The layer group's `transform` attribute.
#[must_use]
pub fn layer_transform_attr(transform: &Transform) -> String {
    format!(
        "translate({} {}) rotate({}) scale({})",
        transform.center_x, transform.center_y, transform.rotation_deg, transform.scale
    )
}

/// The inner content group's `transform` attribute.
#[must_use]
pub fn content_offset_attr(width: f64, height: f64) -> String {
    format!("translate({} {})", -width / 2.0, -height / 2.0)
}

/// The printable-area group's `transform` attribute.
#[must_use]
pub fn area_offset_attr(area: &CanvasRect) -> String {
    format!("translate({} {})", area.x, area.y)
}

/// Escape text for use in XML content and attribute values.
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize the whole design as a standalone SVG file showing `view_box`.
#[must_use]
pub fn svg_document(model: &LayerModel, view_box: &CanvasRect) -> String {
    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg xmlns=\"{SVG_NS}\" viewBox=\"{}\" width=\"{}\" height=\"{}\">\n",
        view_box.view_box_attr(),
        view_box.width,
        view_box.height
    ));
    svg.push_str(&format!(
        "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
        view_box.x,
        view_box.y,
        view_box.width,
        view_box.height,
        escape_xml(&model.base().fill_color)
    ));
    svg.push_str(&format!("  <g transform=\"{}\">\n", area_offset_attr(&model.printable_area())));
    for layer in model.layers().iter().filter(|l| l.visible) {
        write_layer(&mut svg, layer);
    }
    svg.push_str("  </g>\n</svg>\n");
    svg
}

fn write_layer(svg: &mut String, layer: &Layer) {
    svg.push_str(&format!(
        "    <g data-layer=\"{}\" transform=\"{}\" opacity=\"{}\">\n      <g transform=\"{}\">\n        {}\n",
        escape_xml(&layer.name),
        layer_transform_attr(&layer.transform),
        layer.style.opacity,
        content_offset_attr(layer.width, layer.height),
        content_markup(layer)
    ));
    svg.push_str("      </g>\n    </g>\n");
}

/// The layer's visual content in its own unscaled frame: a nested `<svg>` for graphics,
/// a centered `<text>` for text.
#[must_use]
pub fn content_markup(layer: &Layer) -> String {
    match &layer.content {
        LayerContent::Graphic(content) => format!(
            "<svg width=\"{}\" height=\"{}\" viewBox=\"{}\" fill=\"{}\" stroke=\"{}\">{}</svg>",
            layer.width,
            layer.height,
            escape_xml(&content.view_box),
            escape_xml(&layer.style.fill_color),
            escape_xml(&layer.style.stroke_color),
            content.markup
        ),
        LayerContent::Text(text) => format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\" \
             font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" fill=\"{}\">{}</text>",
            layer.width / 2.0,
            layer.height / 2.0,
            escape_xml(&text.font_family),
            text.font_size_px,
            text.font_weight,
            text.font_style.as_str(),
            escape_xml(layer.style.color()),
            escape_xml(&text.content)
        ),
    }
}
