//! Error taxonomy for the editor core.
//!
//! Only [`EditorError::LayerLimitReached`] is meant to reach the user (as a blocking
//! notice). Every other variant is handled where it occurs: invalid input reverts the
//! field, missing geometry hides the overlay, and name collisions never become errors
//! at all because the naming algorithm resolves them.

use crate::layer::LayerId;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("layer limit reached: at most {max} design layers")]
    LayerLimitReached { max: usize },
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),
    #[error("the product base layer cannot be deleted, reordered, or transformed")]
    BaseLayerImmutable,
    #[error("invalid numeric input for {field}: {raw:?}")]
    InvalidNumericInput { field: &'static str, raw: String },
    #[error("missing geometry: {0}")]
    MissingGeometry(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("import failed: {0}")]
    Import(String),
    #[error("snapshot store error: {0}")]
    Snapshot(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EditorError {
    /// Whether the host should surface this error to the user as a notice.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::LayerLimitReached { .. })
    }
}
