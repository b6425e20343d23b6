//! Parameter types for transform operations.
//!
//! These types describe *what* to do, not *how* to do it. They are the
//! interface between the dispatch layer in [`functional`](crate::functional)
//! (which validates and routes) and the backends (which do the actual pixel
//! work), so both backends always receive already-validated input.
//!
//! ## Types
//!
//! - [`ResizeTarget`] — shorter-edge scaling vs. an exact (height, width).
//! - [`Padding`] — per-side border widths, resolved from 1, 2, or 4 values.
//! - [`PadMode`] — how the synthesized border is filled.
//! - [`Fill`] — constant fill value, scalar or per-channel.
//! - [`KernelSize`] / [`Sigma`] — Gaussian blur kernel specification.

use crate::error::{Result, TransformError};

/// Desired output size for a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeTarget {
    /// Match the shorter edge to this length, scaling the other edge
    /// proportionally. The scaling factor is `target / min(width, height)`.
    Shorter(u32),
    /// Exact output dimensions; aspect ratio is not preserved.
    Exact { height: u32, width: u32 },
}

/// Border widths for a pad operation, one per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Padding {
    /// The same border width on all four sides.
    pub fn uniform(n: u32) -> Self {
        Self {
            left: n,
            top: n,
            right: n,
            bottom: n,
        }
    }

    pub fn ltrb(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Resolve a padding specification: one value applies to all sides, two
    /// values to left/right and top/bottom, four values to left, top, right,
    /// bottom. Any other length is a validation error.
    pub fn from_spec(values: &[u32]) -> Result<Self> {
        match values {
            [n] => Ok(Self::uniform(*n)),
            [lr, tb] => Ok(Self::ltrb(*lr, *tb, *lr, *tb)),
            [l, t, r, b] => Ok(Self::ltrb(*l, *t, *r, *b)),
            other => Err(TransformError::InvalidParameter(format!(
                "padding must have 1, 2 or 4 values, got {}",
                other.len()
            ))),
        }
    }
}

/// How a pad operation fills the synthesized border region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// Fill with a constant value (see [`Fill`]).
    Constant,
    /// Repeat the pixel at the image edge.
    Edge,
    /// Mirror across the edge *excluding* the boundary pixel: padding
    /// `[1, 2, 3, 4]` by 2 on both sides gives `[3, 2, 1, 2, 3, 4, 3, 2]`.
    Reflect,
    /// Mirror across the edge *including* the boundary pixel: padding
    /// `[1, 2, 3, 4]` by 2 on both sides gives `[2, 1, 1, 2, 3, 4, 4, 3]`.
    Symmetric,
}

/// Constant fill value for [`PadMode::Constant`].
///
/// Object images interpret the value in their native 0–255 sample space and
/// accept a per-channel tuple; array images interpret it in the buffer's own
/// value space and accept a scalar only (per-channel fill on the array path
/// is rejected at dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Uniform(f32),
    PerChannel(Vec<f32>),
}

impl Default for Fill {
    fn default() -> Self {
        Self::Uniform(0.0)
    }
}

/// Gaussian kernel extent, per axis. Each axis length must be a positive odd
/// integer; this is validated at dispatch, before any pixel work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelSize {
    Square(u32),
    /// Separate extents for the horizontal (x) and vertical (y) passes.
    Rect { x: u32, y: u32 },
}

impl KernelSize {
    pub(crate) fn per_axis(self) -> (u32, u32) {
        match self {
            Self::Square(n) => (n, n),
            Self::Rect { x, y } => (x, y),
        }
    }
}

/// Gaussian standard deviation, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sigma {
    /// Derive per axis from the kernel size as `0.15 * ksize + 0.35`.
    Auto,
    Uniform(f64),
    PerAxis { x: f64, y: f64 },
}
