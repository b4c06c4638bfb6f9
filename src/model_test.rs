#![allow(clippy::float_cmp)]

use std::collections::HashSet;

use super::*;
use crate::layer::{ColorAttribute, LayerContent, SvgContent, TextStyle};

fn model() -> LayerModel {
    LayerModel::new(&EditorConfig::default())
}

fn graphic(key: &str) -> Template {
    Template {
        key: key.to_owned(),
        name: key.to_owned(),
        tags: Vec::new(),
        width: 240.0,
        height: 240.0,
        color: "#ff6b6b".to_owned(),
        color_attribute: ColorAttribute::Fill,
        content: LayerContent::Graphic(SvgContent {
            asset_ref: Some(format!("assets/{key}.svg")),
            view_box: "0 0 240 240".to_owned(),
            markup: "<circle cx='120' cy='120' r='100'/>".to_owned(),
        }),
    }
}

fn text(content: &str) -> Template {
    Template {
        key: "headline".to_owned(),
        name: "Headline".to_owned(),
        tags: Vec::new(),
        width: 300.0,
        height: 80.0,
        color: "#111111".to_owned(),
        color_attribute: ColorAttribute::Fill,
        content: LayerContent::Text(TextStyle {
            content: content.to_owned(),
            font_family: "Inter".to_owned(),
            font_size_px: 20.0,
            font_weight: 400,
            font_style: FontStyle::Normal,
        }),
    }
}

fn names(m: &LayerModel) -> Vec<String> {
    m.layers().iter().map(|l| l.name.clone()).collect()
}

fn assert_unique_names(m: &LayerModel) {
    let set: HashSet<&str> = m.layers().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(set.len(), m.len(), "duplicate names in {:?}", names(m));
}

// =============================================================
// create_layer
// =============================================================

#[test]
fn create_centers_names_and_activates() {
    let mut m = model();
    let id = m.create_layer(&graphic("heart"));
    let Ok(id) = id else {
        panic!("create failed");
    };
    let layer = m.layer(id);
    assert!(layer.is_some());
    let Some(layer) = layer else { return };
    assert_eq!(layer.name, "Graphic-1");
    assert_eq!(layer.transform.center_x, 220.0);
    assert_eq!(layer.transform.center_y, 291.5);
    assert_eq!(m.active_id(), Some(id));
    assert_eq!(
        m.take_changes(),
        vec![LayerChange::Created { id }, LayerChange::ActiveChanged { id: Some(id) }]
    );
}

#[test]
fn new_layers_stack_on_top() {
    let mut m = model();
    let first = m.create_layer(&graphic("a")).unwrap_or_default();
    let second = m.create_layer(&graphic("b")).unwrap_or_default();
    assert_eq!(m.index_of(first), Some(0));
    assert_eq!(m.index_of(second), Some(1));
    assert_eq!(m.active_id(), Some(second));
}

#[test]
fn tenth_create_fails_and_leaves_state_unchanged() {
    let mut m = model();
    for i in 0..9 {
        assert!(m.create_layer(&graphic(&format!("g{i}"))).is_ok());
    }
    m.take_changes();
    let before_layers = m.layers().to_vec();
    let before_active = m.active_id();

    let result = m.create_layer(&graphic("overflow"));
    assert!(matches!(result, Err(EditorError::LayerLimitReached { max: 9 })));
    assert_eq!(m.len(), 9);
    assert_eq!(m.layers(), before_layers.as_slice());
    assert_eq!(m.active_id(), before_active);
    assert!(m.take_changes().is_empty());
}

#[test]
fn text_layer_size_follows_measurement() {
    let mut m = model();
    // 10 chars * 20px * 0.6 = 120 wide, 24 tall; plus 32 padding, min 80x60.
    let id = m.create_layer(&text("Dream Big!")).unwrap_or_default();
    let Some(layer) = m.layer(id) else {
        panic!("missing layer");
    };
    assert!((layer.width - 152.0).abs() < 1e-9);
    assert_eq!(layer.height, 60.0);
    assert_eq!(layer.name, "Text-1");
}

// =============================================================
// delete_layer
// =============================================================

#[test]
fn delete_active_clears_selection_without_reselecting() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    let b = m.create_layer(&graphic("b")).unwrap_or_default();
    assert!(m.delete_layer(b).is_ok());
    assert_eq!(m.active_id(), None);
    assert_eq!(m.len(), 1);
    assert!(m.layer(a).is_some());
}

#[test]
fn delete_inactive_keeps_selection() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    let b = m.create_layer(&graphic("b")).unwrap_or_default();
    assert!(m.delete_layer(a).is_ok());
    assert_eq!(m.active_id(), Some(b));
}

#[test]
fn delete_unknown_and_base_fail() {
    let mut m = model();
    assert!(matches!(m.delete_layer(Uuid::new_v4()), Err(EditorError::LayerNotFound(_))));
    let base = m.base().id;
    assert!(matches!(m.delete_layer(base), Err(EditorError::BaseLayerImmutable)));
}

#[test]
fn deleted_numbers_are_not_reused() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    assert!(m.delete_layer(a).is_ok());
    let b = m.create_layer(&graphic("b")).unwrap_or_default();
    assert_eq!(m.layer(b).map(|l| l.name.as_str()), Some("Graphic-2"));
}

// =============================================================
// rename_layer
// =============================================================

#[test]
fn rename_to_same_name_is_noop() {
    let mut m = model();
    let mut last = Uuid::nil();
    for _ in 0..3 {
        last = m.create_layer(&text("hi")).unwrap_or_default();
    }
    assert_eq!(m.layer(last).map(|l| l.name.as_str()), Some("Text-3"));
    m.take_changes();
    assert_eq!(m.rename_layer(last, "Text-3"), Some("Text-3".to_owned()));
    assert_eq!(m.layer(last).map(|l| l.name.as_str()), Some("Text-3"));
    assert!(m.take_changes().is_empty());
}

#[test]
fn rename_strips_retyped_prefix() {
    let mut m = model();
    let id = m.create_layer(&text("hi")).unwrap_or_default();
    assert_eq!(m.rename_layer(id, "text-Logo"), Some("Text-Logo".to_owned()));
}

#[test]
fn rename_collision_uses_sequential_composite() {
    let mut m = model();
    let a = m.create_layer(&text("a")).unwrap_or_default();
    let b = m.create_layer(&text("b")).unwrap_or_default();
    assert_eq!(m.rename_layer(a, "Logo"), Some("Text-Logo".to_owned()));
    assert_eq!(m.rename_layer(b, "Logo"), Some("Text-3 Logo".to_owned()));
    assert_unique_names(&m);
}

#[test]
fn rename_empty_input_is_rejected() {
    let mut m = model();
    let id = m.create_layer(&graphic("a")).unwrap_or_default();
    assert_eq!(m.rename_layer(id, "   "), None);
    assert_eq!(m.rename_layer(id, "Graphic-"), None);
    assert_eq!(m.layer(id).map(|l| l.name.as_str()), Some("Graphic-1"));
}

#[test]
fn rename_unknown_layer_is_none() {
    let mut m = model();
    assert_eq!(m.rename_layer(Uuid::new_v4(), "x"), None);
}

#[test]
fn names_stay_unique_across_mixed_operations() {
    let mut m = model();
    let mut ids = Vec::new();
    for i in 0..6 {
        let template = if i % 2 == 0 { graphic("g") } else { text("t") };
        ids.push(m.create_layer(&template).unwrap_or_default());
        assert_unique_names(&m);
    }
    for (i, id) in ids.iter().enumerate() {
        m.rename_layer(*id, if i % 3 == 0 { "Star" } else { "Graphic-2" });
        assert_unique_names(&m);
    }
    assert!(m.delete_layer(ids[0]).is_ok());
    assert!(m.create_layer(&graphic("g")).is_ok());
    assert_unique_names(&m);
}

// =============================================================
// move_layer / set_active_layer
// =============================================================

#[test]
fn move_forward_and_backward_swap_neighbors() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    let b = m.create_layer(&graphic("b")).unwrap_or_default();
    assert!(m.move_layer(a, Direction::Forward));
    assert_eq!(m.index_of(a), Some(1));
    assert!(m.move_layer(a, Direction::Backward));
    assert_eq!(m.index_of(b), Some(1));
}

#[test]
fn move_at_boundaries_is_noop() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    let b = m.create_layer(&graphic("b")).unwrap_or_default();
    m.take_changes();
    assert!(!m.move_layer(b, Direction::Forward));
    assert!(!m.move_layer(a, Direction::Backward));
    assert!(!m.move_layer(m.base().id, Direction::Forward));
    assert!(m.take_changes().is_empty());
}

#[test]
fn set_active_rejects_unknown_and_reports_change() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    assert!(!m.set_active_layer(Some(a)));
    assert!(!m.set_active_layer(Some(Uuid::new_v4())));
    assert_eq!(m.active_id(), Some(a));
    assert!(m.set_active_layer(None));
    assert_eq!(m.active_layer(), None);
}

// =============================================================
// Property writes
// =============================================================

#[test]
fn set_transform_is_constrained() {
    let mut m = model();
    let id = m.create_layer(&graphic("a")).unwrap_or_default();
    let t = Transform { center_x: -50.0, center_y: 100.0, scale: 0.0, rotation_deg: 370.0 };
    assert!(m.set_transform(id, t));
    let Some(layer) = m.layer(id) else {
        panic!("missing layer");
    };
    assert_eq!(layer.transform.center_x, 0.0);
    assert_eq!(layer.transform.scale, 0.01);
    assert!((layer.transform.rotation_deg - 10.0).abs() < 1e-9);
}

#[test]
fn set_transform_on_missing_layer_is_false() {
    let mut m = model();
    let t = Transform { center_x: 0.0, center_y: 0.0, scale: 1.0, rotation_deg: 0.0 };
    assert!(!m.set_transform(Uuid::new_v4(), t));
}

#[test]
fn text_edits_are_noop_for_graphics() {
    let mut m = model();
    let id = m.create_layer(&graphic("a")).unwrap_or_default();
    m.take_changes();
    assert!(!m.update_text(id, TextEdit::ToggleBold));
    assert!(m.take_changes().is_empty());
}

#[test]
fn bold_and_italic_toggle() {
    let mut m = model();
    let id = m.create_layer(&text("hi")).unwrap_or_default();
    assert!(m.update_text(id, TextEdit::ToggleBold));
    assert_eq!(m.layer(id).and_then(Layer::text).map(|t| t.font_weight), Some(700));
    assert!(m.update_text(id, TextEdit::ToggleBold));
    assert_eq!(m.layer(id).and_then(Layer::text).map(|t| t.font_weight), Some(400));
    assert!(m.update_text(id, TextEdit::ToggleItalic));
    assert_eq!(m.layer(id).and_then(Layer::text).map(TextStyle::is_italic), Some(true));
}

#[test]
fn content_edit_refits_text_size() {
    let mut m = model();
    let id = m.create_layer(&text("hi")).unwrap_or_default();
    assert_eq!(m.layer(id).map(|l| l.width), Some(80.0));
    assert!(m.update_text(id, TextEdit::Content("a much longer headline".to_owned())));
    assert!(m.layer(id).is_some_and(|l| l.width > 80.0));
}

#[test]
fn invalid_font_size_is_ignored() {
    let mut m = model();
    let id = m.create_layer(&text("hi")).unwrap_or_default();
    assert!(!m.update_text(id, TextEdit::FontSize(f64::NAN)));
    assert!(!m.update_text(id, TextEdit::FontSize(-3.0)));
    assert_eq!(m.layer(id).and_then(Layer::text).map(|t| t.font_size_px), Some(20.0));
}

#[test]
fn color_and_product_updates() {
    let mut m = model();
    let id = m.create_layer(&graphic("a")).unwrap_or_default();
    assert!(m.set_color(id, "#000000"));
    assert_eq!(m.layer(id).map(|l| l.style.fill_color.as_str()), Some("#000000"));
    m.set_product_color("#223344");
    assert_eq!(m.base().fill_color, "#223344");
    assert!(m.take_changes().contains(&LayerChange::ProductChanged));
}

// =============================================================
// replace_all / list_view
// =============================================================

#[test]
fn replace_all_truncates_and_dedupes() {
    let mut source = model();
    let id = source.create_layer(&graphic("a")).unwrap_or_default();
    let Some(layer) = source.layer(id).cloned() else {
        panic!("missing layer");
    };
    let mut copies = Vec::new();
    for _ in 0..12 {
        let mut copy = layer.clone();
        copy.id = Uuid::new_v4();
        copies.push(copy);
    }

    let mut m = model();
    m.replace_all(copies, None);
    assert_eq!(m.len(), 9);
    assert_eq!(m.active_id(), None);
    assert_unique_names(&m);
    assert_eq!(m.take_changes(), vec![LayerChange::Restored]);
}

#[test]
fn replace_all_reissues_repeated_ids() {
    let mut source = model();
    let id = source.create_layer(&graphic("a")).unwrap_or_default();
    let Some(layer) = source.layer(id).cloned() else {
        panic!("missing layer");
    };
    let mut on_base = layer.clone();
    on_base.id = source.base().id;

    let mut m = model();
    m.replace_all(vec![layer.clone(), layer, on_base], Some(source.base().clone()));
    assert_eq!(m.len(), 3);
    let ids: HashSet<LayerId> = m.layers().iter().map(|l| l.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(!ids.contains(&m.base().id));
    assert_eq!(m.layers()[0].id, id);

    assert!(m.delete_layer(id).is_ok());
    assert_eq!(m.len(), 2);
    assert!(m.layers().iter().all(|l| l.id != id));
}

#[test]
fn list_view_is_topmost_first_with_empty_slots() {
    let mut m = model();
    let a = m.create_layer(&graphic("a")).unwrap_or_default();
    let b = m.create_layer(&text("b")).unwrap_or_default();
    let view = m.list_view();
    assert_eq!(view.slots.len(), 9);
    assert_eq!(view.indicator, "2/9 max");
    assert!(!view.is_full);
    let LayerSlot::Filled(top) = &view.slots[0] else {
        panic!("expected filled slot");
    };
    assert_eq!(top.id, b);
    assert!(top.active);
    assert!(!top.can_move_forward);
    assert!(top.can_move_backward);
    let LayerSlot::Filled(bottom) = &view.slots[1] else {
        panic!("expected filled slot");
    };
    assert_eq!(bottom.id, a);
    assert!(bottom.can_move_forward);
    assert!(!bottom.can_move_backward);
    assert_eq!(view.slots[2], LayerSlot::Empty);
}

#[test]
fn list_view_reports_full() {
    let mut m = LayerModel::new(&EditorConfig { max_layers: 2, ..EditorConfig::default() });
    assert!(m.create_layer(&graphic("a")).is_ok());
    assert!(m.create_layer(&graphic("b")).is_ok());
    let view = m.list_view();
    assert!(view.is_full);
    assert_eq!(view.indicator, "2/2 max");
}
