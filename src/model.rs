//! The layer model: ordered design layers, the product base, the active selection, and
//! the constraints that hold over them.
//!
//! Layers are kept bottom-first, so the last entry is drawn on top. The product base is
//! held apart from that list and never counts toward `max_layers`. Every mutation queues
//! a [`LayerChange`] which the session drains with [`LayerModel::take_changes`].
//!
//! Invariants maintained here:
//! - at most `max_layers` design layers;
//! - layer ids and names are unique;
//! - `active_id`, when set, names a layer in the list;
//! - every stored transform is within [`GestureLimits`].

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EditorConfig, TextLayout};
use crate::consts::{DEFAULT_PRODUCT_COLOR, PRODUCT_BASE_NAME};
use crate::coords::CanvasRect;
use crate::error::EditorError;
use crate::events::LayerChange;
use crate::layer::{
    ApproxTextMeasurer, FontStyle, Layer, LayerId, LayerKind, ProductBase, Template, TextMeasurer, Transform,
};
use crate::naming::{NameRegistry, rename_remainder};
use crate::transform::{GestureLimits, constrain};

const BOLD_WEIGHT: u16 = 700;
const REGULAR_WEIGHT: u16 = 400;

/// Z-order direction for [`LayerModel::move_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the top of the stack.
    Forward,
    /// Toward the bottom of the stack.
    Backward,
}

/// A text-layer edit from the precision panel.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    Content(String),
    FontFamily(String),
    FontSize(f64),
    ToggleBold,
    ToggleItalic,
}

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub id: LayerId,
    pub name: String,
    pub kind: LayerKind,
    pub active: bool,
    pub can_move_forward: bool,
    pub can_move_backward: bool,
}

/// A layer list slot: occupied or free.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "slot", rename_all = "lowercase")]
pub enum LayerSlot {
    Filled(LayerEntry),
    Empty,
}

/// Presentation of the layer list, topmost layer first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerListView {
    pub slots: Vec<LayerSlot>,
    pub count: usize,
    pub max: usize,
    /// `"{count}/{max} max"`.
    pub indicator: String,
    pub is_full: bool,
}

pub struct LayerModel {
    limits: GestureLimits,
    max_layers: usize,
    text_layout: TextLayout,
    layers: Vec<Layer>,
    base: ProductBase,
    active_id: Option<LayerId>,
    names: NameRegistry,
    measurer: Box<dyn TextMeasurer>,
    pending: Vec<LayerChange>,
}

impl LayerModel {
    /// An empty model sized by `config`, measuring text with [`ApproxTextMeasurer`].
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            limits: config.gesture_limits(),
            max_layers: config.max_layers,
            text_layout: config.text,
            layers: Vec::new(),
            base: ProductBase::new(PRODUCT_BASE_NAME, DEFAULT_PRODUCT_COLOR),
            active_id: None,
            names: NameRegistry::new(),
            measurer: Box::new(ApproxTextMeasurer),
            pending: Vec::new(),
        }
    }

    /// Replace the text measurer (the browser host measures with the real font).
    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    // --- Queries ---

    /// Design layers, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.layers.len() >= self.max_layers
    }

    #[must_use]
    pub fn max_layers(&self) -> usize {
        self.max_layers
    }

    #[must_use]
    pub fn active_id(&self) -> Option<LayerId> {
        self.active_id
    }

    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_id.and_then(|id| self.layer(id))
    }

    #[must_use]
    pub fn base(&self) -> &ProductBase {
        &self.base
    }

    #[must_use]
    pub fn printable_area(&self) -> CanvasRect {
        self.limits.area
    }

    #[must_use]
    pub fn limits(&self) -> &GestureLimits {
        &self.limits
    }

    /// Position of `id` in the bottom-first order.
    #[must_use]
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Drain the queued change notifications.
    pub fn take_changes(&mut self) -> Vec<LayerChange> {
        std::mem::take(&mut self.pending)
    }

    // --- Layer lifecycle ---

    /// Create a layer from `template`, centered in the printable area, on top of the
    /// stack, and make it active.
    ///
    /// Fails with [`EditorError::LayerLimitReached`] without touching any state when the
    /// model is already full.
    pub fn create_layer(&mut self, template: &Template) -> Result<LayerId, EditorError> {
        if self.is_full() {
            warn!(count = self.layers.len(), max = self.max_layers, template = %template.key, "layer limit reached");
            return Err(EditorError::LayerLimitReached { max: self.max_layers });
        }

        let layers = &self.layers;
        let name = self.names.next_sequential(template.kind(), |n| name_in_use(layers, n, None));
        let id = Uuid::new_v4();
        let mut layer = Layer::from_template(template, id, name, &self.limits.area);
        fit_text(&mut layer, self.measurer.as_ref(), &self.text_layout);

        info!(%id, name = %layer.name, kind = ?layer.kind(), count = self.layers.len() + 1, "layer created");
        self.layers.push(layer);
        self.pending.push(LayerChange::Created { id });
        self.activate(Some(id));
        Ok(id)
    }

    /// Remove a layer. Clears the selection if it was active; no other layer is selected.
    pub fn delete_layer(&mut self, id: LayerId) -> Result<(), EditorError> {
        if id == self.base.id {
            return Err(EditorError::BaseLayerImmutable);
        }
        let index = self.index_of(id).ok_or(EditorError::LayerNotFound(id))?;
        let removed = self.layers.remove(index);
        info!(%id, name = %removed.name, count = self.layers.len(), "layer deleted");
        self.pending.push(LayerChange::Deleted { id });
        if self.active_id == Some(id) {
            self.activate(None);
        }
        Ok(())
    }

    /// Rename a layer, returning the name actually applied.
    ///
    /// A retyped `{Kind}-` prefix is stripped, and collisions are resolved by the naming
    /// rules. Returns `None` for an unknown layer or an input that is empty after
    /// trimming. Submitting the current name returns it unchanged.
    pub fn rename_layer(&mut self, id: LayerId, proposed: &str) -> Option<String> {
        let index = self.index_of(id)?;
        let kind = self.layers[index].kind();
        let remainder = rename_remainder(kind, proposed)?;

        if format!("{}-{remainder}", kind.label()) == self.layers[index].name {
            return Some(self.layers[index].name.clone());
        }

        let layers = &self.layers;
        let name = self.names.resolve(kind, &remainder, |n| name_in_use(layers, n, Some(id)));
        debug!(%id, from = %self.layers[index].name, to = %name, "layer renamed");
        name.clone_into(&mut self.layers[index].name);
        self.pending.push(LayerChange::Renamed { id, name: name.clone() });
        Some(name)
    }

    /// Swap a layer with its neighbor in z-order. Returns false at either end of the
    /// stack or for an unknown layer.
    pub fn move_layer(&mut self, id: LayerId, direction: Direction) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let target = match direction {
            Direction::Forward if index + 1 < self.layers.len() => index + 1,
            Direction::Backward if index > 0 => index - 1,
            _ => return false,
        };
        self.layers.swap(index, target);
        self.pending.push(LayerChange::Reordered { id });
        true
    }

    /// Select a layer, or clear the selection with `None`. Returns true when the active
    /// layer changed.
    pub fn set_active_layer(&mut self, id: Option<LayerId>) -> bool {
        if let Some(id) = id
            && self.index_of(id).is_none()
        {
            return false;
        }
        if self.active_id == id {
            return false;
        }
        self.activate(id);
        true
    }

    fn activate(&mut self, id: Option<LayerId>) {
        self.active_id = id;
        self.pending.push(LayerChange::ActiveChanged { id });
    }

    // --- Property writes ---

    /// Write a whole transform at once, constrained to the gesture limits. Returns false
    /// when the layer no longer exists.
    pub fn set_transform(&mut self, id: LayerId, transform: Transform) -> bool {
        let limits = self.limits;
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        let next = constrain(transform, &limits);
        if layer.transform != next {
            layer.transform = next;
            self.pending.push(LayerChange::TransformChanged { id });
        }
        true
    }

    /// Set the color the layer's content responds to.
    pub fn set_color(&mut self, id: LayerId, color: &str) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        layer.style.set_color(color);
        self.pending.push(LayerChange::StyleChanged { id });
        true
    }

    /// Apply a text edit. A no-op returning false for graphics and unknown layers.
    pub fn update_text(&mut self, id: LayerId, edit: TextEdit) -> bool {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        let Some(text) = layer.text_mut() else {
            debug!(%id, "text edit ignored for non-text layer");
            return false;
        };
        match edit {
            TextEdit::Content(content) => text.content = content,
            TextEdit::FontFamily(family) => text.font_family = family,
            TextEdit::FontSize(size) if size.is_finite() && size > 0.0 => text.font_size_px = size,
            TextEdit::FontSize(_) => return false,
            TextEdit::ToggleBold => {
                text.font_weight = if text.is_bold() { REGULAR_WEIGHT } else { BOLD_WEIGHT };
            }
            TextEdit::ToggleItalic => {
                text.font_style = if text.is_italic() { FontStyle::Normal } else { FontStyle::Italic };
            }
        }
        fit_text(layer, self.measurer.as_ref(), &self.text_layout);
        self.pending.push(LayerChange::ContentChanged { id });
        true
    }

    pub fn set_product_color(&mut self, color: &str) {
        color.clone_into(&mut self.base.fill_color);
        self.pending.push(LayerChange::ProductChanged);
    }

    /// Product code and size carried into exports.
    pub fn set_product_info(&mut self, code: Option<String>, size: Option<String>) {
        self.base.product_code = code;
        self.base.size = size;
        self.pending.push(LayerChange::ProductChanged);
    }

    // --- Bulk ---

    /// Replace the whole document (import or snapshot restore).
    ///
    /// Layers past `max_layers` are dropped, transforms are constrained, repeated ids get
    /// a fresh id, and duplicate names are renamed sequentially. The selection is cleared.
    pub fn replace_all(&mut self, layers: Vec<Layer>, base: Option<ProductBase>) {
        self.layers.clear();
        self.names.reset();
        let base_id = base.as_ref().map_or(self.base.id, |b| b.id);
        let mut seen = HashSet::from([base_id]);
        for mut layer in layers.into_iter().take(self.max_layers) {
            if !seen.insert(layer.id) {
                let fresh = Uuid::new_v4();
                warn!(duplicate = %layer.id, %fresh, "repeated layer id re-issued");
                layer.id = fresh;
                seen.insert(fresh);
            }
            layer.transform = constrain(layer.transform, &self.limits);
            let existing = &self.layers;
            if layer.name.trim().is_empty() || name_in_use(existing, &layer.name, None) {
                layer.name = self.names.next_sequential(layer.kind(), |n| name_in_use(existing, n, None));
            }
            self.layers.push(layer);
        }
        if let Some(base) = base {
            self.base = base;
        }
        self.active_id = None;
        info!(count = self.layers.len(), "document restored");
        self.pending.push(LayerChange::Restored);
    }

    /// Remove every design layer.
    pub fn clear(&mut self) {
        self.replace_all(Vec::new(), None);
    }

    // --- Presentation ---

    /// The layer list: `max_layers` slots, topmost layer first, then empty slots.
    #[must_use]
    pub fn list_view(&self) -> LayerListView {
        let top = self.layers.len().saturating_sub(1);
        let mut slots: Vec<LayerSlot> = self
            .layers
            .iter()
            .enumerate()
            .rev()
            .map(|(index, layer)| {
                LayerSlot::Filled(LayerEntry {
                    id: layer.id,
                    name: layer.name.clone(),
                    kind: layer.kind(),
                    active: self.active_id == Some(layer.id),
                    can_move_forward: index < top,
                    can_move_backward: index > 0,
                })
            })
            .collect();
        slots.resize(self.max_layers.max(slots.len()), LayerSlot::Empty);
        LayerListView {
            slots,
            count: self.layers.len(),
            max: self.max_layers,
            indicator: format!("{}/{} max", self.layers.len(), self.max_layers),
            is_full: self.is_full(),
        }
    }
}

impl std::fmt::Debug for LayerModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerModel")
            .field("layers", &self.layers.len())
            .field("active_id", &self.active_id)
            .field("base", &self.base.fill_color)
            .finish_non_exhaustive()
    }
}

fn name_in_use(layers: &[Layer], name: &str, except: Option<LayerId>) -> bool {
    layers.iter().any(|l| Some(l.id) != except && l.name == name)
}

/// Resize a text layer to its measured glyph bounds plus padding.
fn fit_text(layer: &mut Layer, measurer: &dyn TextMeasurer, layout: &TextLayout) {
    if let Some(text) = layer.text() {
        let (width, height) = layout.fit(measurer.measure(text));
        layer.width = width;
        layer.height = height;
    }
}
