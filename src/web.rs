//! Browser host: binds an [`EditorSession`] to the page's SVG canvas, overlay, and
//! precision panel, and exports it to JavaScript as [`WebEditor`].
//!
//! This module is the only place that touches `web_sys`. Every DOM failure is logged and
//! skipped so a broken element never aborts a gesture.

use std::collections::HashMap;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, Storage,
    SvgGraphicsElement,
};

use crate::config::EditorConfig;
use crate::coords::{ScreenRect, ViewTransform};
use crate::engine::{Action, EditorSession, FrameOutput};
use crate::error::EditorError;
use crate::input::{Button, PointerInput, ViewMode};
use crate::layer::{ApproxTextMeasurer, Layer, LayerId, Template, TextMeasurer, TextStyle};
use crate::model::{Direction, TextEdit};
use crate::overlay::{OverlayGeometry, OverlayState};
use crate::precision::{AxisControl, ControlSource, PrecisionField, PrecisionPanel, PrecisionState};
use crate::render::{SVG_NS, content_markup, content_offset_attr, layer_transform_attr};
use crate::snapshot::SnapshotStore;

const LINE_HEIGHT_EM: f64 = 1.2;

// ── Helpers ─────────────────────────────────────────────────────

/// A JavaScript `Error` carrying `message`.
fn js_err(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn js_error(err: EditorError) -> JsValue {
    js_err(&err.to_string())
}

fn check<T>(result: Result<T, JsValue>, what: &'static str) {
    if let Err(err) = result {
        warn!(what, error = ?err, "DOM update failed");
    }
}

fn screen_rect(element: &Element) -> ScreenRect {
    let rect = element.get_bounding_client_rect();
    ScreenRect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

fn required<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document.get_element_by_id(id).ok_or_else(|| js_err(&format!("missing element #{id}")))?;
    element.dyn_into::<T>().map_err(|_| js_err(&format!("element #{id} has the wrong type")))
}

fn optional_input(document: &Document, id: &str) -> Option<HtmlInputElement> {
    match document.get_element_by_id(id)?.dyn_into::<HtmlInputElement>() {
        Ok(input) => Some(input),
        Err(_) => None,
    }
}

fn parse_id(raw: &str) -> Result<LayerId, JsValue> {
    LayerId::parse_str(raw).map_err(|e| js_err(&format!("invalid layer id {raw:?}: {e}")))
}

fn actions_json(actions: &[Action]) -> String {
    match serde_json::to_string(actions) {
        Ok(json) => json,
        Err(err) => {
            warn!(%err, "failed to serialize actions");
            "[]".to_owned()
        }
    }
}

// ── Text measurement ────────────────────────────────────────────

/// Measures text with an offscreen 2D canvas context.
pub struct CanvasTextMeasurer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasurer {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let canvas = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn measure(&self, text: &TextStyle) -> (f64, f64) {
        self.ctx.set_font(&text.css_font());
        match self.ctx.measure_text(&text.content) {
            Ok(metrics) if !text.content.is_empty() => (metrics.width(), text.font_size_px * LINE_HEIGHT_EM),
            Ok(_) => (0.0, 0.0),
            Err(err) => {
                debug!(error = ?err, "measureText failed, estimating");
                ApproxTextMeasurer.measure(text)
            }
        }
    }
}

// ── Snapshot storage ────────────────────────────────────────────

/// `window.localStorage`-backed snapshot store.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new() -> Result<Self, EditorError> {
        let window = web_sys::window().ok_or_else(|| EditorError::Snapshot("no window".into()))?;
        match window.local_storage() {
            Ok(Some(storage)) => Ok(Self { storage }),
            Ok(None) => Err(EditorError::Snapshot("localStorage unavailable".into())),
            Err(err) => Err(EditorError::Snapshot(format!("{err:?}"))),
        }
    }
}

impl SnapshotStore for LocalStorageStore {
    fn load(&self, key: &str) -> Result<Option<String>, EditorError> {
        self.storage.get_item(key).map_err(|e| EditorError::Snapshot(format!("{e:?}")))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), EditorError> {
        self.storage.set_item(key, value).map_err(|e| EditorError::Snapshot(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), EditorError> {
        self.storage.remove_item(key).map_err(|e| EditorError::Snapshot(format!("{e:?}")))
    }
}

// ── Precision panel ─────────────────────────────────────────────

/// Field/slider input pair of one axis: `#precision-{axis}-input` and
/// `#precision-{axis}-slider`.
struct AxisInputs {
    field: Option<HtmlInputElement>,
    slider: Option<HtmlInputElement>,
}

impl AxisInputs {
    fn find(document: &Document, axis: PrecisionField) -> Self {
        Self {
            field: optional_input(document, &format!("precision-{}-input", axis.name())),
            slider: optional_input(document, &format!("precision-{}-slider", axis.name())),
        }
    }

    fn show(&self, control: &AxisControl, enabled: bool) {
        if let Some(field) = &self.field {
            field.set_value(&control.text);
            field.set_disabled(!enabled);
        }
        if let Some(slider) = &self.slider {
            slider.set_value(&control.slider.to_string());
            slider.set_disabled(!enabled);
        }
    }
}

/// The precision panel's DOM inputs. Missing elements are skipped.
pub struct DomPrecisionPanel {
    axes: Vec<(PrecisionField, AxisInputs)>,
    color: Option<HtmlInputElement>,
    content: Option<HtmlInputElement>,
    font_family: Option<HtmlInputElement>,
    font_size: Option<HtmlInputElement>,
    bold: Option<HtmlInputElement>,
    italic: Option<HtmlInputElement>,
}

impl DomPrecisionPanel {
    #[must_use]
    pub fn find(document: &Document) -> Self {
        let axes = [PrecisionField::X, PrecisionField::Y, PrecisionField::Scale, PrecisionField::Rotation]
            .into_iter()
            .map(|axis| (axis, AxisInputs::find(document, axis)))
            .collect();
        Self {
            axes,
            color: optional_input(document, "precision-color"),
            content: optional_input(document, "precision-text-content"),
            font_family: optional_input(document, "precision-font-family"),
            font_size: optional_input(document, "precision-font-size"),
            bold: optional_input(document, "precision-bold"),
            italic: optional_input(document, "precision-italic"),
        }
    }
}

impl PrecisionPanel for DomPrecisionPanel {
    fn show(&mut self, state: &PrecisionState) {
        for (axis, inputs) in &self.axes {
            inputs.show(state.axis(*axis), state.enabled);
        }
        if let Some(color) = &self.color {
            color.set_value(state.color.as_deref().unwrap_or_default());
            color.set_disabled(!state.enabled);
        }
        let text = state.text.as_ref();
        for (input, value) in [
            (&self.content, text.map(|t| t.content.clone())),
            (&self.font_family, text.map(|t| t.font_family.clone())),
            (&self.font_size, text.map(|t| t.font_size_px.to_string())),
        ] {
            if let Some(input) = input {
                input.set_value(value.as_deref().unwrap_or_default());
                input.set_disabled(text.is_none());
            }
        }
        for (input, checked) in [(&self.bold, text.is_some_and(|t| t.bold)), (&self.italic, text.is_some_and(|t| t.italic))]
        {
            if let Some(input) = input {
                input.set_checked(checked);
                input.set_disabled(text.is_none());
            }
        }
    }
}

// ── Editor ──────────────────────────────────────────────────────

/// The editor bound to one page. Methods returning a `String` return the JSON array of
/// [`Action`]s the page still has to handle (scheduling frames, notices, the layer list).
#[wasm_bindgen]
pub struct WebEditor {
    session: EditorSession,
    document: Document,
    svg: SvgGraphicsElement,
    layer_root: Element,
    overlay: HtmlElement,
    printable: Element,
    panel: DomPrecisionPanel,
    store: Option<LocalStorageStore>,
    nodes: HashMap<LayerId, Element>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Bind to the page. `svg_id` is the canvas `<svg>`, `layers_id` the group layers are
    /// placed in, `printable_id` the printable-area outline, and `overlay_id` the overlay
    /// frame element.
    #[wasm_bindgen(constructor)]
    pub fn new(
        svg_id: &str,
        layers_id: &str,
        printable_id: &str,
        overlay_id: &str,
        config_json: &str,
    ) -> Result<WebEditor, JsValue> {
        let config = EditorConfig::from_json(config_json).map_err(js_error)?;
        crate::logging::init(&config.logging).map_err(js_error)?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_err("no document"))?;
        let mut session = EditorSession::new(config).map_err(js_error)?;
        match CanvasTextMeasurer::new(&document) {
            Ok(measurer) => session.set_measurer(Box::new(measurer)),
            Err(err) => warn!(error = ?err, "canvas text measurement unavailable"),
        }
        let store = match LocalStorageStore::new() {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(%err, "snapshots disabled");
                None
            }
        };

        let mut editor = Self {
            svg: required(&document, svg_id)?,
            layer_root: required(&document, layers_id)?,
            printable: required(&document, printable_id)?,
            overlay: required(&document, overlay_id)?,
            panel: DomPrecisionPanel::find(&document),
            document,
            session,
            store,
            nodes: HashMap::new(),
        };
        editor.apply_view_box();
        editor.refresh_geometry();
        Ok(editor)
    }

    // --- View ---

    pub fn set_edit_mode(&mut self, edit: bool) -> String {
        let mode = if edit { ViewMode::Edit } else { ViewMode::Full };
        let mut actions = self.session.set_view_mode(mode);
        self.apply_view_box();
        actions.extend(self.refresh_geometry_actions());
        self.handle(actions)
    }

    /// Re-read layout after a resize, scroll, or panel toggle.
    pub fn refresh_geometry(&mut self) -> String {
        let actions = self.refresh_geometry_actions();
        self.handle(actions)
    }

    // --- Pointer input ---

    pub fn pointer_down(&mut self, pointer_id: i32, x: f64, y: f64, button: i16) -> String {
        let mut pointer = PointerInput::primary(pointer_id, x, y);
        pointer.button = Button::from_dom(button);
        let actions = self.session.on_pointer_down(pointer);
        self.handle(actions)
    }

    pub fn pointer_move(&mut self, pointer_id: i32, x: f64, y: f64) -> String {
        let actions = self.session.on_pointer_move(PointerInput::primary(pointer_id, x, y));
        self.handle(actions)
    }

    pub fn pointer_up(&mut self, pointer_id: i32, x: f64, y: f64) -> String {
        let actions = self.session.on_pointer_up(PointerInput::primary(pointer_id, x, y));
        self.handle(actions)
    }

    pub fn pointer_cancel(&mut self, pointer_id: i32, x: f64, y: f64) -> String {
        let actions = self.session.on_pointer_cancel(PointerInput::primary(pointer_id, x, y));
        self.handle(actions)
    }

    pub fn pointer_leave(&mut self, pointer_id: i32, x: f64, y: f64) -> String {
        let actions = self.session.on_pointer_leave(PointerInput::primary(pointer_id, x, y));
        self.handle(actions)
    }

    pub fn outside_click(&mut self) -> String {
        let actions = self.session.on_outside_click();
        self.handle(actions)
    }

    // --- Layers ---

    /// Create a layer from a gallery template (JSON).
    pub fn add_layer(&mut self, template_json: &str) -> Result<String, JsValue> {
        let template: Template = serde_json::from_str(template_json)
            .map_err(|e| js_err(&format!("invalid template: {e}")))?;
        if let Err(err) = self.session.create_layer(&template) {
            debug!(%err, "layer not created");
        }
        Ok(self.flush())
    }

    pub fn delete_layer(&mut self, id: &str) -> Result<String, JsValue> {
        self.session.delete_layer(parse_id(id)?).map_err(js_error)?;
        Ok(self.flush())
    }

    /// Rename a layer. Returns the applied name, or `undefined` when nothing was applied.
    pub fn rename_layer(&mut self, id: &str, name: &str) -> Result<Option<String>, JsValue> {
        let applied = self.session.rename_layer(parse_id(id)?, name);
        self.flush();
        Ok(applied)
    }

    pub fn move_layer(&mut self, id: &str, forward: bool) -> Result<String, JsValue> {
        let direction = if forward { Direction::Forward } else { Direction::Backward };
        self.session.move_layer(parse_id(id)?, direction);
        Ok(self.flush())
    }

    pub fn select_layer(&mut self, id: Option<String>) -> Result<String, JsValue> {
        let id = id.as_deref().map(parse_id).transpose()?;
        self.session.set_active_layer(id);
        Ok(self.flush())
    }

    pub fn layer_list(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.layer_list()).map_err(|e| js_err(&e.to_string()))
    }

    // --- Precision panel ---

    pub fn apply_field(&mut self, field: &str, raw: &str) -> Result<String, JsValue> {
        let field = PrecisionField::from_name(field).ok_or_else(|| js_err("unknown field"))?;
        if let Err(err) = self.session.apply_precision(field, raw) {
            debug!(%err, "precision edit rejected");
        }
        Ok(self.flush())
    }

    /// Mirror a live edit into the paired control without committing it.
    pub fn mirror_field(&self, field: &str, from_slider: bool, raw: &str) -> Result<(), JsValue> {
        let field = PrecisionField::from_name(field).ok_or_else(|| js_err("unknown field"))?;
        let source = if from_slider { ControlSource::Slider } else { ControlSource::Field };
        let control = self.session.mirror_precision(field, source, raw).map_err(js_error)?;
        if let Some((_, inputs)) = self.panel.axes.iter().find(|(axis, _)| *axis == field) {
            match source {
                ControlSource::Field => {
                    if let Some(slider) = &inputs.slider {
                        slider.set_value(&control.slider.to_string());
                    }
                }
                ControlSource::Slider => {
                    if let Some(input) = &inputs.field {
                        input.set_value(&control.text);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn set_text_content(&mut self, content: &str) -> String {
        self.session.update_text(TextEdit::Content(content.to_owned()));
        self.flush()
    }

    pub fn set_font_family(&mut self, family: &str) -> String {
        self.session.update_text(TextEdit::FontFamily(family.to_owned()));
        self.flush()
    }

    pub fn set_font_size(&mut self, size_px: f64) -> String {
        self.session.update_text(TextEdit::FontSize(size_px));
        self.flush()
    }

    pub fn toggle_bold(&mut self) -> String {
        self.session.update_text(TextEdit::ToggleBold);
        self.flush()
    }

    pub fn toggle_italic(&mut self) -> String {
        self.session.update_text(TextEdit::ToggleItalic);
        self.flush()
    }

    pub fn set_layer_color(&mut self, color: &str) -> String {
        self.session.set_layer_color(color);
        self.flush()
    }

    pub fn set_product_color(&mut self, color: &str) -> String {
        self.session.set_product_color(color);
        self.flush()
    }

    // --- Rendering ---

    /// Run from `requestAnimationFrame` after a `render_needed` action. Returns the frame
    /// output as JSON, or `null` when nothing was pending.
    pub fn frame(&mut self) -> String {
        let Some(output) = self.session.on_animation_frame() else {
            return "null".to_owned();
        };
        self.apply_frame(&output);
        match serde_json::to_string(&output) {
            Ok(json) => json,
            Err(err) => {
                warn!(%err, "failed to serialize frame");
                "null".to_owned()
            }
        }
    }

    // --- Export / import ---

    pub fn export_json(&self) -> Result<String, JsValue> {
        self.session.export_json().map_err(js_error)
    }

    pub fn export_svg(&self) -> String {
        self.session.export_svg()
    }

    pub fn import_json(&mut self, raw: &str) -> Result<String, JsValue> {
        self.session.import_json(raw).map_err(js_error)?;
        Ok(self.flush())
    }

    pub fn save_snapshot(&mut self) -> Result<(), JsValue> {
        let Some(store) = self.store.as_mut() else {
            return Ok(());
        };
        self.session.save_snapshot(store).map_err(js_error)
    }

    /// Restore the saved design. Returns false when none was stored.
    pub fn restore_snapshot(&mut self) -> Result<bool, JsValue> {
        let Some(store) = self.store.as_ref() else {
            return Ok(false);
        };
        let restored = self.session.restore_snapshot(store).map_err(js_error)?;
        self.flush();
        Ok(restored)
    }
}

impl WebEditor {
    fn flush(&mut self) -> String {
        let actions = self.session.take_actions();
        self.handle(actions)
    }

    fn apply_view_box(&self) {
        let view_box = self.session.view_box().view_box_attr();
        check(self.svg.set_attribute("viewBox", &view_box), "svg viewBox");
    }

    fn refresh_geometry_actions(&mut self) -> Vec<Action> {
        let transform = self.svg.get_screen_ctm().map(|m| {
            ViewTransform::new(
                f64::from(m.a()),
                f64::from(m.b()),
                f64::from(m.c()),
                f64::from(m.d()),
                f64::from(m.e()),
                f64::from(m.f()),
            )
        });
        self.session.set_view_transform(transform);
        let container = self.overlay.offset_parent().map_or_else(ScreenRect::default, |parent| screen_rect(&parent));
        let geometry = OverlayGeometry { area: screen_rect(&self.printable), container };
        self.session.set_screen_geometry(Some(geometry))
    }

    /// Carry out the DOM side of `actions` and return them for the page.
    fn handle(&mut self, actions: Vec<Action>) -> String {
        for action in &actions {
            match action {
                Action::CapturePointer { pointer_id } => {
                    check(self.svg.set_pointer_capture(*pointer_id), "setPointerCapture");
                }
                Action::ReleasePointer { pointer_id } => {
                    if self.svg.has_pointer_capture(*pointer_id) {
                        check(self.svg.release_pointer_capture(*pointer_id), "releasePointerCapture");
                    }
                }
                Action::LayerCreated { id } => self.insert_node(*id),
                Action::LayerDeleted { id } => {
                    if let Some(node) = self.nodes.remove(id) {
                        node.remove();
                    }
                }
                Action::LayersReordered => self.reorder_nodes(),
                Action::LayerContentChanged { id } | Action::LayerRenamed { id, .. } => {
                    if let (Some(node), Some(layer)) = (self.nodes.get(id), self.session.model().layer(*id)) {
                        populate(node, layer);
                    }
                }
                Action::DocumentReplaced => self.rebuild_nodes(),
                Action::ProductChanged => self.paint_product(),
                Action::RenderNeeded
                | Action::SelectionChanged { .. }
                | Action::LayerLimitReached { .. }
                | Action::FieldReverted { .. } => {}
            }
        }
        if let Some(Action::FieldReverted { field, control }) =
            actions.iter().find(|a| matches!(a, Action::FieldReverted { .. }))
            && let Some((_, inputs)) = self.panel.axes.iter().find(|(axis, _)| axis == field)
        {
            inputs.show(control, true);
        }
        actions_json(&actions)
    }

    fn insert_node(&mut self, id: LayerId) {
        let Some(layer) = self.session.model().layer(id) else {
            return;
        };
        match self.document.create_element_ns(Some(SVG_NS), "g") {
            Ok(node) => {
                check(node.set_attribute("data-layer-id", &id.to_string()), "data-layer-id");
                populate(&node, layer);
                check(self.layer_root.append_child(&node), "append layer");
                self.nodes.insert(id, node);
                self.reorder_nodes();
            }
            Err(err) => warn!(%id, error = ?err, "failed to create layer node"),
        }
    }

    fn reorder_nodes(&self) {
        for layer in self.session.model().layers() {
            if let Some(node) = self.nodes.get(&layer.id) {
                check(self.layer_root.append_child(node), "reorder layer");
            }
        }
    }

    fn rebuild_nodes(&mut self) {
        for (_, node) in self.nodes.drain() {
            node.remove();
        }
        let ids: Vec<LayerId> = self.session.model().layers().iter().map(|l| l.id).collect();
        for id in ids {
            self.insert_node(id);
        }
        self.paint_product();
    }

    fn paint_product(&self) {
        match self.svg.query_selector("[data-product-base]") {
            Ok(Some(base)) => check(base.set_attribute("fill", &self.session.model().base().fill_color), "product fill"),
            Ok(None) => {}
            Err(err) => warn!(error = ?err, "product base lookup failed"),
        }
    }

    fn apply_frame(&mut self, output: &FrameOutput) {
        for layer in self.session.model().layers() {
            if let Some(node) = self.nodes.get(&layer.id) {
                place(node, layer);
            }
        }
        if let Some(overlay) = &output.overlay {
            self.paint_overlay(overlay);
        }
        if let Some(state) = &output.precision {
            self.panel.show(state);
        }
    }

    fn paint_overlay(&self, state: &OverlayState) {
        let style = self.overlay.style();
        match state {
            OverlayState::Hidden => check(style.set_property("display", "none"), "overlay display"),
            OverlayState::Visible(frame) => {
                for (property, value) in [
                    ("display", "block".to_owned()),
                    ("left", format!("{}px", frame.left)),
                    ("top", format!("{}px", frame.top)),
                    ("width", format!("{}px", frame.width)),
                    ("height", format!("{}px", frame.height)),
                    ("transform", frame.css_transform()),
                ] {
                    check(style.set_property(property, &value), "overlay style");
                }
            }
        }
    }
}

/// Write the layer's attributes and content into its node.
fn populate(node: &Element, layer: &Layer) {
    check(node.set_attribute("data-layer", &layer.name), "data-layer");
    place(node, layer);
    node.set_inner_html(&format!(
        "<g transform=\"{}\">{}</g>",
        content_offset_attr(layer.width, layer.height),
        content_markup(layer)
    ));
}

/// Write the layer's placement attributes.
fn place(node: &Element, layer: &Layer) {
    check(node.set_attribute("transform", &layer_transform_attr(&layer.transform)), "transform");
    check(node.set_attribute("opacity", &layer.style.opacity.to_string()), "opacity");
    check(node.set_attribute("visibility", if layer.visible { "visible" } else { "hidden" }), "visibility");
}
