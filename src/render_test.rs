use super::*;
use crate::config::EditorConfig;
use crate::layer::{ColorAttribute, FontStyle, SvgContent, Template, TextStyle};

fn heart() -> Template {
    Template {
        key: "heart".to_owned(),
        name: "Heart".to_owned(),
        tags: Vec::new(),
        width: 120.0,
        height: 100.0,
        color: "#e63946".to_owned(),
        color_attribute: ColorAttribute::Fill,
        content: LayerContent::Graphic(SvgContent {
            asset_ref: None,
            view_box: "0 0 120 100".to_owned(),
            markup: "<path d='M60 100 L0 30 L60 0 L120 30 Z'/>".to_owned(),
        }),
    }
}

fn quote() -> Template {
    Template {
        key: "quote".to_owned(),
        name: "Quote".to_owned(),
        content: LayerContent::Text(TextStyle {
            content: "Fish & <Chips>".to_owned(),
            font_family: "Georgia".to_owned(),
            font_size_px: 30.0,
            font_weight: 400,
            font_style: FontStyle::Italic,
        }),
        ..heart()
    }
}

// =============================================================
// RenderScheduler
// =============================================================

#[test]
fn requests_coalesce_until_frame() {
    let mut scheduler = RenderScheduler::new();
    assert!(scheduler.request());
    assert!(!scheduler.request());
    assert!(!scheduler.request());
    assert!(scheduler.is_pending());

    assert!(scheduler.begin_frame());
    assert_eq!(scheduler.frames(), 1);
    assert!(!scheduler.begin_frame());
    assert_eq!(scheduler.frames(), 1);

    assert!(scheduler.request());
}

// =============================================================
// Attributes
// =============================================================

#[test]
fn layer_transform_order_is_translate_rotate_scale() {
    let t = Transform { center_x: 220.0, center_y: 291.5, scale: 1.5, rotation_deg: 30.0 };
    assert_eq!(layer_transform_attr(&t), "translate(220 291.5) rotate(30) scale(1.5)");
}

#[test]
fn content_offset_is_half_size() {
    assert_eq!(content_offset_attr(120.0, 100.0), "translate(-60 -50)");
}

#[test]
fn escape_covers_markup_characters() {
    assert_eq!(escape_xml(r#"a&b<c>"d"'e'"#), "a&amp;b&lt;c&gt;&quot;d&quot;&apos;e&apos;");
}

// =============================================================
// svg_document
// =============================================================

#[test]
fn document_has_prolog_view_box_and_base() {
    let config = EditorConfig::default();
    let mut model = LayerModel::new(&config);
    model.set_product_color("#1d3557");
    let svg = svg_document(&model, &config.full_view_box());
    assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
    assert!(svg.contains("viewBox=\"0 0 1160 943\""));
    assert!(svg.contains("fill=\"#1d3557\""));
    assert!(svg.contains("<g transform=\"translate(361 180)\">"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn document_renders_layers_in_z_order() {
    let config = EditorConfig::default();
    let mut model = LayerModel::new(&config);
    assert!(model.create_layer(&heart()).is_ok());
    assert!(model.create_layer(&quote()).is_ok());
    let svg = svg_document(&model, &config.full_view_box());

    let graphic_at = svg.find("data-layer=\"Graphic-1\"");
    let text_at = svg.find("data-layer=\"Text-1\"");
    assert!(graphic_at.is_some() && text_at.is_some());
    assert!(graphic_at < text_at);
    assert!(svg.contains("<path d='M60 100 L0 30 L60 0 L120 30 Z'/>"));
    assert!(svg.contains("Fish &amp; &lt;Chips&gt;"));
    assert!(svg.contains("font-style=\"italic\""));
}
