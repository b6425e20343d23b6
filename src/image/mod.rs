//! The two interchangeable image representations.
//!
//! [`Image`] is a closed enum over:
//!
//! - [`Image::Object`] — an opaque, already-decoded pixel grid with a color
//!   mode ([`image::DynamicImage`]), always exactly 2-D with an implicit
//!   channel encoding.
//! - [`Image::Array`] — a dense `[..., C, H, W]` float buffer
//!   ([`ArrayImage`]).
//!
//! Every transform in [`functional`](crate::functional) accepts either
//! variant and returns the variant it was given, so the enum is the single
//! dispatch boundary; call sites never inspect representations themselves.

mod array;

pub use array::ArrayImage;

use crate::error::{Result, TransformError};
use image::DynamicImage;
use ndarray::{ArrayD, IxDyn};
use std::fmt;

/// Which representation an [`Image`] carries; used in error reporting and
/// capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    Object,
    Array,
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Object => "object",
            Self::Array => "array",
        })
    }
}

/// An image in one of the two supported representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Image {
    Object(DynamicImage),
    Array(ArrayImage),
}

impl Image {
    pub fn repr(&self) -> Repr {
        match self {
            Self::Object(_) => Repr::Object,
            Self::Array(_) => Repr::Array,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Object(img) => img.width(),
            Self::Array(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Object(img) => img.height(),
            Self::Array(img) => img.height(),
        }
    }

    pub fn channels(&self) -> u32 {
        match self {
            Self::Object(img) => u32::from(img.color().channel_count()),
            Self::Array(img) => img.channels(),
        }
    }

    /// Convert to the array representation.
    ///
    /// Object pixels are scaled from their native 0-255 sample space into
    /// `[0, 1]` floats in `[C, H, W]` order; an array input is returned as-is
    /// (cloned). Sample depths beyond 8 bits are first converted through the
    /// object backend's RGBA path.
    pub fn to_array(&self) -> Result<ArrayImage> {
        match self {
            Self::Array(img) => Ok(img.clone()),
            Self::Object(img) => object_to_array(img),
        }
    }

    /// Convert to the object representation.
    ///
    /// Requires a batch-free `[C, H, W]` array; values are scaled back to
    /// 0-255 with rounding and saturation. The channel count picks the color
    /// mode: 1 = grayscale, 2 = grayscale+alpha, 3 = RGB, 4 = RGBA.
    pub fn to_object(&self) -> Result<DynamicImage> {
        match self {
            Self::Object(img) => Ok(img.clone()),
            Self::Array(img) => array_to_object(img),
        }
    }
}

fn object_to_array(img: &DynamicImage) -> Result<ArrayImage> {
    let (samples, w, h, c) = crate::backend::object::to_samples(img);
    let (w, h) = (w as usize, h as usize);
    let mut data = vec![0f32; c * h * w];
    // HWC byte samples to CHW floats.
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                data[ch * h * w + y * w + x] =
                    f32::from(samples[(y * w + x) * c + ch]) / 255.0;
            }
        }
    }
    let arr = ArrayD::from_shape_vec(IxDyn(&[c, h, w]), data)
        .map_err(|e| TransformError::shape("[C, H, W] buffer", e.to_string()))?;
    ArrayImage::new(arr)
}

fn array_to_object(img: &ArrayImage) -> Result<DynamicImage> {
    if !img.leading().is_empty() {
        return Err(TransformError::shape(
            "batch-free [C, H, W] array",
            format!("{:?}", img.data().shape()),
        ));
    }
    let (c, h, w) = (
        img.channels() as usize,
        img.height() as usize,
        img.width() as usize,
    );
    let data = img.data();
    let mut samples = vec![0u8; h * w * c];
    for y in 0..h {
        for x in 0..w {
            for ch in 0..c {
                let v = data[[ch, y, x]];
                samples[(y * w + x) * c + ch] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(crate::backend::object::from_samples(
        samples, w as u32, h as u32, c,
    ))
}
