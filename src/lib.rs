//! Image preprocessing transforms over two interchangeable representations.
//!
//! The crate exposes a single functional surface ([`functional`]) whose
//! operations accept an [`Image`] in either of two forms and return the form
//! they were given: an object image (a decoded 2-D pixel grid with a color
//! mode) or an array image (a dense `[..., C, H, W]` float buffer, possibly
//! batched). Both backends implement the same boundary and rounding
//! policies, so switching representations does not change results beyond
//! quantization.
//!
//! ## Module map
//!
//! | Module         | Role |
//! |----------------|------|
//! | [`functional`] | Validated, representation-dispatching transform operations |
//! | [`image`]      | The [`Image`] enum, [`ArrayImage`], and conversions between forms |
//! | [`params`]     | Parameter types: resize targets, padding, fills, kernels |
//! | [`interp`]     | Interpolation modes and the legacy integer code mapping |
//! | [`affine`]     | Inverse 2x3 affine matrix derivation |
//! | [`error`]      | The [`TransformError`] taxonomy |
//!
//! ```no_run
//! use imgprep::{Image, InterpolationMode, ResizeTarget, functional};
//!
//! # fn run(img: Image) -> imgprep::Result<()> {
//! let small = functional::resize(&img, ResizeTarget::Shorter(256), InterpolationMode::Bilinear)?;
//! let square = functional::center_crop(&small, 224, 224)?;
//! # Ok(())
//! # }
//! ```

pub mod affine;
pub mod error;
pub mod functional;
pub mod image;
pub mod interp;
pub mod params;

pub(crate) mod backend;
pub(crate) mod blur;

pub use crate::affine::inverse_affine_matrix;
pub use crate::error::{Result, TransformError};
pub use crate::image::{ArrayImage, Image, Repr};
pub use crate::interp::InterpolationMode;
pub use crate::params::{Fill, KernelSize, PadMode, Padding, ResizeTarget, Sigma};
