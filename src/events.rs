//! Typed change notifications from the layer model.
//!
//! The model queues a [`LayerChange`] for every mutation it performs. The session drains
//! that queue after each operation and hands every change to the subscribed
//! [`LayerObserver`]s together with a read-only view of the model, so observers never see
//! a half-applied update.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use serde::Serialize;

use crate::layer::LayerId;
use crate::model::LayerModel;

/// A single mutation of the layer model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerChange {
    Created { id: LayerId },
    Deleted { id: LayerId },
    Renamed { id: LayerId, name: String },
    /// Z-order of `id` changed.
    Reordered { id: LayerId },
    ActiveChanged { id: Option<LayerId> },
    TransformChanged { id: LayerId },
    StyleChanged { id: LayerId },
    /// Text or vector content changed (and with it possibly the intrinsic size).
    ContentChanged { id: LayerId },
    ProductChanged,
    /// The whole document was replaced (import or snapshot restore).
    Restored,
}

impl LayerChange {
    /// The layer the change is about, if it concerns a single layer.
    #[must_use]
    pub fn layer_id(&self) -> Option<LayerId> {
        match self {
            Self::Created { id }
            | Self::Deleted { id }
            | Self::Renamed { id, .. }
            | Self::Reordered { id }
            | Self::TransformChanged { id }
            | Self::StyleChanged { id }
            | Self::ContentChanged { id } => Some(*id),
            Self::ActiveChanged { id } => *id,
            Self::ProductChanged | Self::Restored => None,
        }
    }

    /// Whether observers mirroring the active layer's geometry must refresh.
    #[must_use]
    pub fn affects_geometry_of(&self, active: Option<LayerId>) -> bool {
        match self {
            Self::ActiveChanged { .. } | Self::Restored => true,
            Self::TransformChanged { id } | Self::ContentChanged { id } | Self::Deleted { id } => {
                active.is_none_or(|a| a == *id)
            }
            _ => false,
        }
    }
}

/// Receives layer model changes.
pub trait LayerObserver {
    fn on_layer_change(&mut self, change: &LayerChange, model: &LayerModel);
}

impl<F> LayerObserver for F
where
    F: FnMut(&LayerChange, &LayerModel),
{
    fn on_layer_change(&mut self, change: &LayerChange, model: &LayerModel) {
        self(change, model);
    }
}

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of subscribed observers, notified in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn LayerObserver>)>,
}

impl Observers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn LayerObserver>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.entries.push((id, observer));
        id
    }

    /// Remove an observer. Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, change: &LayerChange, model: &LayerModel) {
        for (_, observer) in &mut self.entries {
            observer.on_layer_change(change, model);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("count", &self.entries.len()).finish()
    }
}
