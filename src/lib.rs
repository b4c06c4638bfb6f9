//! Layer transform and selection-overlay engine for the product design customizer.
//!
//! The crate owns the design canvas's editing core: placing graphic and text layers on
//! a product's printable area, moving, scaling, and rotating them with pointer gestures,
//! mirroring the active layer in a screen-space selection overlay and a precision panel,
//! and enforcing the layer cap and unique names. It compiles natively for tests and to
//! WebAssembly for the browser, where the `browser` feature adds the DOM host in [`web`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Per-canvas [`engine::EditorSession`] wiring every component, and host [`engine::Action`]s |
//! | [`model`] | Ordered layers, active selection, naming and cap constraints, layer list view |
//! | [`layer`] | Layer, template, style, and text types |
//! | [`naming`] | Sequential layer names and rename normalization |
//! | [`events`] | Typed change notifications and observers |
//! | [`coords`] | Screen/canvas coordinate mapping |
//! | [`transform`] | Gesture math: clamping, rotation normalization, move/scale/rotate |
//! | [`input`] | Pointer input types and the gesture state machine |
//! | [`hit`] | Hit-testing layer bodies and overlay handles |
//! | [`overlay`] | Selection overlay frame and handle placement |
//! | [`precision`] | Precision panel values, parsing, and write-back |
//! | [`render`] | Coalesced frame scheduling, SVG attributes, SVG export |
//! | [`export`] | JSON export/import document |
//! | [`snapshot`] | Local snapshot storage |
//! | [`config`] | Host-supplied configuration |
//! | [`error`] | Error taxonomy |
//! | [`logging`] | Logging initialisation |
//! | [`consts`] | Shared numeric constants (layer cap, scale limits, handle sizes, etc.) |

pub mod config;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod hit;
pub mod input;
pub mod layer;
pub mod logging;
pub mod model;
pub mod naming;
pub mod overlay;
pub mod precision;
pub mod render;
pub mod snapshot;
pub mod transform;
#[cfg(feature = "browser")]
pub mod web;
