//! Input model: pointer events, view modes, and the gesture state machine.
//!
//! `InputState` is the gesture being tracked between pointer-down and pointer-up. Each
//! active variant carries the [`InteractionSession`] with the start snapshot that every
//! per-frame update is computed from.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::coords::Point;
use crate::hit::Corner;
use crate::layer::{LayerId, Transform};

/// The kind of transform a gesture performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Move,
    Scale,
    Rotate,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    /// Left mouse button, pen contact, or single-finger touch.
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl Button {
    /// Map a DOM `PointerEvent.button` value.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A pointer event as reported by the host, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer_id: i32,
    pub client: Point,
    pub button: Button,
}

impl PointerInput {
    #[must_use]
    pub fn primary(pointer_id: i32, x: f64, y: f64) -> Self {
        Self { pointer_id, client: Point::new(x, y), button: Button::Primary }
    }
}

/// Which part of the editor is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The whole product; layers are visible but not editable.
    #[default]
    Full,
    /// Zoomed onto the printable area with gestures and overlay enabled.
    Edit,
}

impl ViewMode {
    #[must_use]
    pub fn is_edit(self) -> bool {
        self == Self::Edit
    }
}

/// One open pointer-down to pointer-up gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionSession {
    pub gesture: GestureKind,
    /// Pointer that owns the capture; events from other pointers are ignored.
    pub pointer_id: i32,
    pub layer_id: LayerId,
    /// Printable-relative pointer position at pointer-down.
    pub start_pointer: Point,
    /// Layer transform at pointer-down.
    pub start_transform: Transform,
    /// Corner handle that started a scale gesture.
    pub handle: Option<Corner>,
    /// Distinguishes sessions for identity checks.
    pub serial: u64,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the active layer.
    Moving(InteractionSession),
    /// Dragging a corner handle.
    Scaling(InteractionSession),
    /// Dragging the rotate handle.
    Rotating(InteractionSession),
}

impl InputState {
    /// Wrap `session` in the state matching its gesture.
    #[must_use]
    pub fn active(session: InteractionSession) -> Self {
        match session.gesture {
            GestureKind::Move => Self::Moving(session),
            GestureKind::Scale => Self::Scaling(session),
            GestureKind::Rotate => Self::Rotating(session),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&InteractionSession> {
        match self {
            Self::Idle => None,
            Self::Moving(s) | Self::Scaling(s) | Self::Rotating(s) => Some(s),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a move gesture is open (cancelled by pointer-leave).
    #[must_use]
    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving(_))
    }

    /// End the current gesture, returning its session.
    pub fn finish(&mut self) -> Option<InteractionSession> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Moving(s) | Self::Scaling(s) | Self::Rotating(s) => Some(s),
        }
    }
}
