//! Shared numeric constants for the customizer crate.

// ── Layers ──────────────────────────────────────────────────────

/// Maximum number of design layers (graphics and text) on one canvas.
pub const MAX_LAYERS: usize = 9;

/// Lower scale bound for a layer transform.
pub const MIN_SCALE: f64 = 0.01;

/// Upper scale bound for a layer transform.
pub const MAX_SCALE: f64 = 10.0;

/// Display name of the product base layer.
pub const PRODUCT_BASE_NAME: &str = "Product";

/// Product color used before the catalog collaborator supplies one.
pub const DEFAULT_PRODUCT_COLOR: &str = "#ffffff";

// ── Gestures ────────────────────────────────────────────────────

/// Smallest start distance (canvas units) used as the scale-ratio denominator.
pub const SCALE_DISTANCE_GUARD: f64 = 0.1;

/// Distance from the overlay's top edge to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 32.0;

/// Screen-space hit slop in pixels for the corner and rotate handles.
pub const HANDLE_RADIUS_PX: f64 = 10.0;

// ── Text layout ─────────────────────────────────────────────────

/// Padding added around measured glyph bounds of a text layer.
pub const TEXT_PADDING: f64 = 32.0;

/// Minimum intrinsic width of a text layer.
pub const TEXT_MIN_WIDTH: f64 = 80.0;

/// Minimum intrinsic height of a text layer.
pub const TEXT_MIN_HEIGHT: f64 = 60.0;

// ── Precision panel ─────────────────────────────────────────────

/// Largest offset from the printable-area center accepted by the x/y fields.
pub const OFFSET_LIMIT: f64 = 1000.0;

// ── Persistence ─────────────────────────────────────────────────

/// Key under which the local design snapshot is stored.
pub const SNAPSHOT_KEY: &str = "designer.state.v1";
