//! Interpolation modes and the legacy integer code mapping.
//!
//! The enumeration is closed; each backend declares the subset it actually
//! supports (see the `SUPPORTED_INTERPOLATION` tables in the backend
//! modules). Requesting a mode outside a backend's subset is a validation
//! error at dispatch, never a silent fallback.

use crate::error::{Result, TransformError};
use image::imageops::FilterType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationMode {
    Nearest,
    Bilinear,
    Bicubic,
    Box,
    Hamming,
    Lanczos,
}

impl InterpolationMode {
    /// Map a legacy integer resampling code onto the enum.
    ///
    /// Emits a deprecation warning; callers should migrate to
    /// [`InterpolationMode`] values directly. Unknown codes are a validation
    /// error.
    pub fn from_legacy_code(code: u32) -> Result<Self> {
        let mode = match code {
            0 => Self::Nearest,
            1 => Self::Lanczos,
            2 => Self::Bilinear,
            3 => Self::Bicubic,
            4 => Self::Box,
            5 => Self::Hamming,
            other => {
                return Err(TransformError::InvalidParameter(format!(
                    "unknown legacy interpolation code {other}"
                )));
            }
        };
        tracing::warn!(
            code,
            mode = %mode,
            "integer interpolation codes are deprecated, use InterpolationMode"
        );
        Ok(mode)
    }

    /// The resampling filter the object backend delegates to, if this mode is
    /// in its supported subset.
    pub(crate) fn object_filter(self) -> Option<FilterType> {
        match self {
            Self::Nearest => Some(FilterType::Nearest),
            Self::Bilinear => Some(FilterType::Triangle),
            Self::Bicubic => Some(FilterType::CatmullRom),
            Self::Lanczos => Some(FilterType::Lanczos3),
            Self::Box | Self::Hamming => None,
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Box => "box",
            Self::Hamming => "hamming",
            Self::Lanczos => "lanczos",
        };
        f.write_str(name)
    }
}
