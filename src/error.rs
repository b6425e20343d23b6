//! Error taxonomy for the transform engine.
//!
//! Three failure classes cover every public operation:
//!
//! - [`TransformError::InvalidParameter`] — malformed parameters, always
//!   raised before any pixel work begins.
//! - [`TransformError::Unsupported`] — the operation has no backend
//!   implementation for the given representation.
//! - [`TransformError::ShapeMismatch`] — a buffer or axis layout violation
//!   during construction or conversion.
//!
//! No operation retries and no operation partially mutates its input; errors
//! surface synchronously to the caller.

use crate::image::Repr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    /// A parameter failed validation (wrong padding length, non-odd kernel
    /// size, non-positive sigma, crop larger than source in `five_crop`, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation is not implemented for this image representation.
    #[error("{op} is not supported for the {repr} representation")]
    Unsupported { op: &'static str, repr: Repr },

    /// A raw buffer or axis layout did not match what the operation requires.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },
}

impl TransformError {
    pub(crate) fn shape(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

/// Result type for all transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
