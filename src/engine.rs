//! The editor session: one instance per design canvas, owning every component.
//!
//! Host events (pointer input, control edits, view changes) come in through methods on
//! [`EditorSession`]. Each method mutates the [`LayerModel`], then drains the model's
//! change queue into the overlay, the precision panel, and any subscribed observers, and
//! records the [`Action`]s the host must carry out. Handlers return those actions
//! directly; operations with their own result leave them in the outbox for
//! [`EditorSession::take_actions`].
//!
//! Rendering is coalesced: property writes only mark state dirty and request a frame,
//! and [`EditorSession::on_animation_frame`] produces at most one update per frame.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::consts::SNAPSHOT_KEY;
use crate::coords::{CanvasRect, CoordinateMapper, Point, ViewTransform};
use crate::error::EditorError;
use crate::events::{LayerChange, LayerObserver, ObserverId, Observers};
use crate::export::ExportDocument;
use crate::hit::{Corner, HitPart, HitSlop, hit_test};
use crate::input::{Button, GestureKind, InputState, InteractionSession, PointerInput, ViewMode};
use crate::layer::{LayerId, Template, TextMeasurer};
use crate::model::{Direction, LayerListView, LayerModel, TextEdit};
use crate::overlay::{HandlePlacement, OverlayGeometry, OverlayState, SelectionOverlay};
use crate::precision::{AxisControl, ControlSource, PrecisionField, PrecisionState, PrecisionSync, parse_value};
use crate::render::{RenderScheduler, svg_document};
use crate::snapshot::SnapshotStore;
use crate::transform::apply_gesture;

/// Actions returned to the host for processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Capture `pointer_id` on the canvas surface for the rest of the gesture.
    CapturePointer { pointer_id: i32 },
    ReleasePointer { pointer_id: i32 },
    /// Schedule an animation frame and call [`EditorSession::on_animation_frame`].
    RenderNeeded,
    SelectionChanged { id: Option<LayerId> },
    LayerCreated { id: LayerId },
    /// Remove the layer's visual node.
    LayerDeleted { id: LayerId },
    LayerRenamed { id: LayerId, name: String },
    /// Z-order changed; reorder the layer nodes.
    LayersReordered,
    /// Content or style of a layer changed; repopulate its node.
    LayerContentChanged { id: LayerId },
    ProductChanged,
    /// The whole document was replaced; rebuild every layer node.
    DocumentReplaced,
    /// Creation was rejected at the cap. Shown to the user as a blocking notice.
    LayerLimitReached { max: usize },
    /// A precision edit was rejected; restore the control to `control`.
    FieldReverted { field: PrecisionField, control: AxisControl },
}

/// Presentation updates produced by one animation frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Refreshed overlay state, when it changed.
    pub overlay: Option<OverlayState>,
    /// Refreshed precision panel, when it changed.
    pub precision: Option<PrecisionState>,
    /// Refreshed layer list, when it changed.
    pub layer_list: Option<LayerListView>,
}

/// Per-canvas editor state.
pub struct EditorSession {
    config: EditorConfig,
    model: LayerModel,
    mapper: CoordinateMapper,
    view_mode: ViewMode,
    input: InputState,
    overlay: SelectionOverlay,
    precision: PrecisionSync,
    scheduler: RenderScheduler,
    observers: Observers,
    list_dirty: bool,
    next_serial: u64,
    outbox: Vec<Action>,
}

impl EditorSession {
    /// Build a session from a validated configuration.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let model = LayerModel::new(&config);
        let mapper = CoordinateMapper::new(config.printable_area);
        let overlay = SelectionOverlay::new(config.rotate_handle_offset_px);
        let precision = PrecisionSync::new(config.precision);
        info!(max_layers = config.max_layers, "editor session created");
        Ok(Self {
            config,
            model,
            mapper,
            view_mode: ViewMode::Full,
            input: InputState::Idle,
            overlay,
            precision,
            scheduler: RenderScheduler::new(),
            observers: Observers::new(),
            list_dirty: true,
            next_serial: 0,
            outbox: Vec::new(),
        })
    }

    /// Replace the text measurer used to size text layers.
    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.model.set_measurer(measurer);
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn model(&self) -> &LayerModel {
        &self.model
    }

    #[must_use]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// The canvas region currently shown: the printable area in edit mode, the whole
    /// canvas otherwise.
    #[must_use]
    pub fn view_box(&self) -> CanvasRect {
        match self.view_mode {
            ViewMode::Edit => self.config.printable_area,
            ViewMode::Full => self.config.full_view_box(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn overlay_state(&self) -> &OverlayState {
        self.overlay.state()
    }

    #[must_use]
    pub fn overlay_handles(&self) -> [HandlePlacement; 5] {
        self.overlay.handles()
    }

    #[must_use]
    pub fn precision_state(&self) -> &PrecisionState {
        self.precision.state()
    }

    #[must_use]
    pub fn layer_list(&self) -> LayerListView {
        self.model.list_view()
    }

    #[must_use]
    pub fn is_render_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Drain actions queued by operations that return their own result.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.outbox)
    }

    // --- Observers ---

    pub fn subscribe(&mut self, observer: Box<dyn LayerObserver>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    // --- View ---

    /// Switch between the full product view and the printable-area edit view.
    ///
    /// Leaving edit mode ends any open gesture and hides the overlay.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Vec<Action> {
        if self.view_mode != mode {
            debug!(?mode, "view mode changed");
            self.view_mode = mode;
            if !mode.is_edit() {
                self.end_gesture(None);
            }
            self.overlay.set_edit_mode(mode.is_edit());
            self.request_render();
        }
        self.take_actions()
    }

    /// Record the canvas-to-screen transform after layout or a view-box change.
    pub fn set_view_transform(&mut self, transform: Option<ViewTransform>) {
        self.mapper.set_view_transform(transform);
    }

    /// Record the client rectangles the overlay is positioned against.
    pub fn set_screen_geometry(&mut self, geometry: Option<OverlayGeometry>) -> Vec<Action> {
        self.overlay.set_geometry(geometry);
        if self.overlay.is_dirty() {
            self.request_render();
        }
        self.take_actions()
    }

    // --- Pointer input ---

    /// Resolve what is under the pointer and start the matching gesture.
    ///
    /// Ignored while a gesture is open, outside edit mode, for non-primary buttons, and
    /// before the surface has a usable transform. A miss clears the active layer.
    pub fn on_pointer_down(&mut self, pointer: PointerInput) -> Vec<Action> {
        if let Some(open) = self.input.session() {
            debug!(pointer_id = pointer.pointer_id, open = open.pointer_id, "pointer-down ignored during gesture");
            return Vec::new();
        }
        if !self.view_mode.is_edit() || pointer.button != Button::Primary {
            return Vec::new();
        }
        let Some(point) = self.mapper.to_canvas_relative(pointer.client) else {
            debug!("pointer-down ignored without view transform");
            return Vec::new();
        };
        let slop = HitSlop {
            handle_radius: self.mapper.screen_dist_to_canvas(self.config.handle_radius_px),
            rotate_offset: self.mapper.screen_dist_to_canvas(self.config.rotate_handle_offset_px),
        };

        match hit_test(point, &self.model, &slop) {
            None => {
                self.model.set_active_layer(None);
                self.dispatch_changes();
            }
            Some(hit) => {
                self.model.set_active_layer(Some(hit.layer_id));
                self.dispatch_changes();
                let (gesture, handle) = match hit.part {
                    HitPart::Body => (GestureKind::Move, None),
                    HitPart::ScaleHandle(corner) => (GestureKind::Scale, Some(corner)),
                    HitPart::RotateHandle => (GestureKind::Rotate, None),
                };
                self.open_session(gesture, pointer.pointer_id, hit.layer_id, point, handle);
            }
        }
        self.take_actions()
    }

    /// Start a gesture on the active layer directly, for hosts that know which handle
    /// element was pressed. Ignored before the surface has a usable transform.
    pub fn begin_gesture(&mut self, gesture: GestureKind, pointer: PointerInput, handle: Option<Corner>) -> Vec<Action> {
        if !self.input.is_idle() || !self.view_mode.is_edit() {
            return Vec::new();
        }
        let Some(layer_id) = self.model.active_id() else {
            return Vec::new();
        };
        let Some(point) = self.mapper.to_canvas_relative(pointer.client) else {
            debug!("gesture ignored without view transform");
            return Vec::new();
        };
        self.open_session(gesture, pointer.pointer_id, layer_id, point, handle);
        self.take_actions()
    }

    /// Update the open gesture from the pointer's current position. A frame without a
    /// usable transform leaves the layer where it is.
    pub fn on_pointer_move(&mut self, pointer: PointerInput) -> Vec<Action> {
        let Some(session) = self.input.session() else {
            return Vec::new();
        };
        if session.pointer_id != pointer.pointer_id {
            return Vec::new();
        }
        let Some(layer) = self.model.layer(session.layer_id) else {
            return Vec::new();
        };
        if layer.locked {
            return Vec::new();
        }
        let Some(current) = self.mapper.to_canvas_relative(pointer.client) else {
            return Vec::new();
        };
        let next =
            apply_gesture(session.gesture, &session.start_transform, session.start_pointer, current, self.model.limits());
        let layer_id = session.layer_id;
        self.model.set_transform(layer_id, next);
        self.dispatch_changes();
        self.take_actions()
    }

    pub fn on_pointer_up(&mut self, pointer: PointerInput) -> Vec<Action> {
        self.end_gesture(Some(pointer.pointer_id));
        self.take_actions()
    }

    pub fn on_pointer_cancel(&mut self, pointer: PointerInput) -> Vec<Action> {
        self.end_gesture(Some(pointer.pointer_id));
        self.take_actions()
    }

    /// The pointer left the canvas surface. Only a move gesture ends here.
    pub fn on_pointer_leave(&mut self, pointer: PointerInput) -> Vec<Action> {
        if self.input.is_moving() {
            self.end_gesture(Some(pointer.pointer_id));
        }
        self.take_actions()
    }

    /// A click landed outside every interactive region.
    pub fn on_outside_click(&mut self) -> Vec<Action> {
        if self.input.is_idle() {
            self.model.set_active_layer(None);
            self.dispatch_changes();
        }
        self.take_actions()
    }

    fn open_session(
        &mut self,
        gesture: GestureKind,
        pointer_id: i32,
        layer_id: LayerId,
        start_pointer: Point,
        handle: Option<Corner>,
    ) {
        let Some(layer) = self.model.layer(layer_id) else {
            return;
        };
        if layer.locked {
            debug!(%layer_id, "gesture ignored on locked layer");
            return;
        }
        self.next_serial += 1;
        let session = InteractionSession {
            gesture,
            pointer_id,
            layer_id,
            start_pointer,
            start_transform: layer.transform,
            handle,
            serial: self.next_serial,
        };
        debug!(%layer_id, ?gesture, serial = session.serial, "gesture started");
        self.input = InputState::active(session);
        self.outbox.push(Action::CapturePointer { pointer_id });
    }

    /// Close the open gesture. With `Some(pointer_id)` only that pointer's gesture ends.
    fn end_gesture(&mut self, pointer_id: Option<i32>) {
        let owned = self.input.session().is_some_and(|s| pointer_id.is_none_or(|p| p == s.pointer_id));
        if !owned {
            return;
        }
        if let Some(session) = self.input.finish() {
            debug!(layer_id = %session.layer_id, gesture = ?session.gesture, serial = session.serial, "gesture ended");
            self.outbox.push(Action::ReleasePointer { pointer_id: session.pointer_id });
        }
    }

    // --- Layer operations ---

    /// Create a layer from `template` and select it.
    ///
    /// At the cap, queues [`Action::LayerLimitReached`] and returns the error without
    /// touching the model.
    pub fn create_layer(&mut self, template: &Template) -> Result<LayerId, EditorError> {
        match self.model.create_layer(template) {
            Ok(id) => {
                self.dispatch_changes();
                Ok(id)
            }
            Err(err) => {
                if let EditorError::LayerLimitReached { max } = &err {
                    self.outbox.push(Action::LayerLimitReached { max: *max });
                }
                Err(err)
            }
        }
    }

    /// Delete a layer. An open gesture on it stays open and no-ops until pointer-up.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<(), EditorError> {
        self.model.delete_layer(id)?;
        self.dispatch_changes();
        Ok(())
    }

    /// Rename a layer, returning the name actually applied.
    pub fn rename_layer(&mut self, id: LayerId, proposed: &str) -> Option<String> {
        let applied = self.model.rename_layer(id, proposed);
        self.dispatch_changes();
        applied
    }

    pub fn move_layer(&mut self, id: LayerId, direction: Direction) -> bool {
        let moved = self.model.move_layer(id, direction);
        self.dispatch_changes();
        moved
    }

    /// Select a layer from the layer list, or clear the selection.
    pub fn set_active_layer(&mut self, id: Option<LayerId>) -> bool {
        let changed = self.model.set_active_layer(id);
        self.dispatch_changes();
        changed
    }

    // --- Precision panel ---

    /// Commit a field or slider value to the active layer.
    ///
    /// Input that is not a finite number is rejected: the control is reverted to the
    /// current value through [`Action::FieldReverted`]. Without an active layer this is
    /// a no-op.
    pub fn apply_precision(&mut self, field: PrecisionField, raw: &str) -> Result<(), EditorError> {
        let Some(layer) = self.model.active_layer() else {
            return Ok(());
        };
        let value = match parse_value(field.name(), raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(field = field.name(), raw, "invalid precision input reverted");
                let control = self.precision.refresh(&self.model).axis(field).clone();
                self.outbox.push(Action::FieldReverted { field, control });
                return Err(err);
            }
        };
        let id = layer.id;
        let next = self.precision.target_transform(field, value, &layer.transform, &self.model.printable_area());
        self.model.set_transform(id, next);
        self.dispatch_changes();
        Ok(())
    }

    /// Display values for the paired control while the user edits one half of a pair.
    pub fn mirror_precision(
        &self,
        field: PrecisionField,
        source: ControlSource,
        raw: &str,
    ) -> Result<AxisControl, EditorError> {
        self.precision.mirror(field, source, raw)
    }

    /// Apply a text edit to the active layer. A no-op for graphics.
    pub fn update_text(&mut self, edit: TextEdit) -> bool {
        let Some(id) = self.model.active_id() else {
            return false;
        };
        let applied = self.model.update_text(id, edit);
        self.dispatch_changes();
        applied
    }

    /// Recolor the active layer.
    pub fn set_layer_color(&mut self, color: &str) -> bool {
        let Some(id) = self.model.active_id() else {
            return false;
        };
        let applied = self.model.set_color(id, color);
        self.dispatch_changes();
        applied
    }

    pub fn set_product_color(&mut self, color: &str) {
        self.model.set_product_color(color);
        self.dispatch_changes();
    }

    pub fn set_product_info(&mut self, code: Option<String>, size: Option<String>) {
        self.model.set_product_info(code, size);
        self.dispatch_changes();
    }

    // --- Rendering ---

    /// Run one animation frame. Returns `None` when no render was requested.
    pub fn on_animation_frame(&mut self) -> Option<FrameOutput> {
        if !self.scheduler.begin_frame() {
            return None;
        }
        let overlay = self.overlay.is_dirty().then(|| *self.overlay.refresh(&self.model));
        let precision = self.precision.is_dirty().then(|| self.precision.refresh(&self.model).clone());
        let layer_list = std::mem::take(&mut self.list_dirty).then(|| self.model.list_view());
        Some(FrameOutput { frame: self.scheduler.frames(), overlay, precision, layer_list })
    }

    // --- Export / import ---

    #[must_use]
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument::from_model(&self.model)
    }

    pub fn export_json(&self) -> Result<String, EditorError> {
        self.export_document().to_json()
    }

    /// Standalone SVG of the whole product.
    #[must_use]
    pub fn export_svg(&self) -> String {
        svg_document(&self.model, &self.config.full_view_box())
    }

    /// Replace the design with an exported document. Any open gesture is ended.
    pub fn import_json(&mut self, raw: &str) -> Result<(), EditorError> {
        let doc = ExportDocument::from_json(raw, self.config.max_layers)?;
        self.end_gesture(None);
        let layers = doc.to_layers(&self.config.printable_area);
        let base = doc.to_product_base(self.model.base());
        self.model.replace_all(layers, Some(base));
        self.dispatch_changes();
        Ok(())
    }

    /// Remove every design layer.
    pub fn clear_design(&mut self) {
        self.end_gesture(None);
        self.model.clear();
        self.dispatch_changes();
    }

    pub fn save_snapshot(&self, store: &mut dyn SnapshotStore) -> Result<(), EditorError> {
        let json = self.export_json()?;
        store.save(SNAPSHOT_KEY, &json)?;
        debug!(bytes = json.len(), "snapshot saved");
        Ok(())
    }

    /// Restore the stored snapshot. Returns false when none is stored.
    pub fn restore_snapshot(&mut self, store: &dyn SnapshotStore) -> Result<bool, EditorError> {
        let Some(json) = store.load(SNAPSHOT_KEY)? else {
            return Ok(false);
        };
        self.import_json(&json)?;
        Ok(true)
    }

    // --- Change propagation ---

    fn dispatch_changes(&mut self) {
        let changes = self.model.take_changes();
        if changes.is_empty() {
            return;
        }
        for change in &changes {
            self.overlay.on_layer_change(change, &self.model);
            self.precision.on_layer_change(change, &self.model);
            self.observers.notify(change, &self.model);
            if let Some(action) = self.action_for(change) {
                self.outbox.push(action);
            }
        }
        self.request_render();
    }

    fn action_for(&mut self, change: &LayerChange) -> Option<Action> {
        let action = match change {
            LayerChange::Created { id } => Action::LayerCreated { id: *id },
            LayerChange::Deleted { id } => Action::LayerDeleted { id: *id },
            LayerChange::Renamed { id, name } => Action::LayerRenamed { id: *id, name: name.clone() },
            LayerChange::Reordered { .. } => Action::LayersReordered,
            LayerChange::ActiveChanged { id } => Action::SelectionChanged { id: *id },
            LayerChange::StyleChanged { id } | LayerChange::ContentChanged { id } => {
                Action::LayerContentChanged { id: *id }
            }
            LayerChange::ProductChanged => Action::ProductChanged,
            LayerChange::Restored => Action::DocumentReplaced,
            LayerChange::TransformChanged { .. } => return None,
        };
        if !matches!(action, Action::LayerContentChanged { .. } | Action::ProductChanged) {
            self.list_dirty = true;
        }
        Some(action)
    }

    fn request_render(&mut self) {
        if self.scheduler.request() {
            self.outbox.push(Action::RenderNeeded);
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("model", &self.model)
            .field("view_mode", &self.view_mode)
            .field("input", &self.input)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}
