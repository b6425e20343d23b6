//! The functional transform surface.
//!
//! Every operation here takes an [`Image`], validates its parameters, and
//! dispatches to the matching backend primitive; results come back in the
//! representation the input had. Validation always happens before any pixel
//! work, so an `Err` means the input was not touched.
//!
//! ## Operations
//!
//! | Group       | Operations |
//! |-------------|------------|
//! | Geometry    | [`resize`], [`crop`], [`center_crop`], [`resized_crop`], [`pad`], [`hflip`], [`vflip`], [`five_crop`], [`ten_crop`], [`rotate`] |
//! | Photometry  | [`adjust_brightness`], [`adjust_contrast`], [`adjust_saturation`], [`adjust_hue`] |
//! | Conversion  | [`rgb_to_grayscale`], [`normalize`], [`normalize_mut`] |
//! | Filtering   | [`gaussian_blur`] |

use crate::affine::inverse_affine_matrix;
use crate::backend;
use crate::blur;
use crate::error::{Result, TransformError};
use crate::image::{ArrayImage, Image, Repr};
use crate::interp::InterpolationMode;
use crate::params::{Fill, KernelSize, PadMode, Padding, ResizeTarget, Sigma};

fn check_interpolation(mode: InterpolationMode, repr: Repr) -> Result<()> {
    let supported = match repr {
        Repr::Object => backend::object::SUPPORTED_INTERPOLATION,
        Repr::Array => backend::array::SUPPORTED_INTERPOLATION,
    };
    if supported.contains(&mode) {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter(format!(
            "interpolation mode {mode} is outside the {repr} backend's supported set"
        )))
    }
}

fn require_channels(img: &Image, allowed: &[u32], op: &str) -> Result<()> {
    let c = img.channels();
    if allowed.contains(&c) {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter(format!(
            "{op} requires {allowed:?} channels, image has {c}"
        )))
    }
}

fn require_non_negative(factor: f32, name: &str) -> Result<()> {
    if factor >= 0.0 {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter(format!(
            "{name} must be non-negative, got {factor}"
        )))
    }
}

fn require_non_empty(height: u32, width: u32) -> Result<()> {
    if height == 0 || width == 0 {
        Err(TransformError::InvalidParameter(format!(
            "output extent must be non-empty, got {height}x{width}"
        )))
    } else {
        Ok(())
    }
}

/// Output dimensions for shorter-edge scaling: the shorter edge becomes
/// `size` and the longer edge scales proportionally, truncating toward zero.
fn shorter_edge_dims(w: u32, h: u32, size: u32) -> (u32, u32) {
    if w <= h {
        if w == size {
            (w, h)
        } else {
            (size, (f64::from(size) * f64::from(h) / f64::from(w)) as u32)
        }
    } else if h == size {
        (w, h)
    } else {
        ((f64::from(size) * f64::from(w) / f64::from(h)) as u32, size)
    }
}

/// Resample to the target size. Shorter-edge targets that already match
/// return the input unchanged.
pub fn resize(img: &Image, target: ResizeTarget, interpolation: InterpolationMode) -> Result<Image> {
    check_interpolation(interpolation, img.repr())?;
    let (ow, oh) = match target {
        ResizeTarget::Shorter(size) => {
            require_non_empty(size, size)?;
            shorter_edge_dims(img.width(), img.height(), size)
        }
        ResizeTarget::Exact { height, width } => {
            require_non_empty(height, width)?;
            (width, height)
        }
    };
    if (ow, oh) == (img.width(), img.height()) {
        return Ok(img.clone());
    }
    tracing::debug!(width = ow, height = oh, %interpolation, repr = %img.repr(), "resize");
    match img {
        Image::Object(o) => {
            // Membership in the object subset guarantees a filter exists.
            let filter = interpolation.object_filter().ok_or_else(|| {
                TransformError::InvalidParameter(format!(
                    "interpolation mode {interpolation} has no object resampling filter"
                ))
            })?;
            Ok(Image::Object(backend::object::resize(o, ow, oh, filter)))
        }
        Image::Array(a) => Ok(Image::Array(backend::array::resize(a, ow, oh, interpolation)?)),
    }
}

/// Extract the `height x width` region whose top-left corner is
/// `(top, left)`. Boxes overrunning the right or bottom edge read from a
/// zero-padded extension of the source.
pub fn crop(img: &Image, top: u32, left: u32, height: u32, width: u32) -> Result<Image> {
    require_non_empty(height, width)?;
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::crop(o, top, left, height, width)?)),
        Image::Array(a) => Ok(Image::Array(backend::array::crop(a, top, left, height, width)?)),
    }
}

/// Add a border on each side. Constant fills come from `fill`; per-channel
/// fills are an object-only feature and must match the channel count.
pub fn pad(img: &Image, padding: Padding, fill: &Fill, mode: PadMode) -> Result<Image> {
    match img {
        Image::Object(o) => {
            if let Fill::PerChannel(values) = fill {
                let c = img.channels() as usize;
                if values.len() != c {
                    return Err(TransformError::InvalidParameter(format!(
                        "per-channel fill has {} values for a {c}-channel image",
                        values.len()
                    )));
                }
            }
            Ok(Image::Object(backend::object::pad(o, padding, fill, mode)?))
        }
        Image::Array(a) => {
            let value = match fill {
                Fill::Uniform(v) => *v,
                Fill::PerChannel(_) => {
                    return Err(TransformError::Unsupported {
                        op: "pad with a per-channel fill",
                        repr: Repr::Array,
                    });
                }
            };
            Ok(Image::Array(backend::array::pad(a, padding, value, mode)?))
        }
    }
}

/// Crop the central `height x width` region. Targets larger than the source
/// first zero-pad it symmetrically (the extra pixel of an odd excess goes to
/// the right/bottom); offsets round half-to-even.
pub fn center_crop(img: &Image, height: u32, width: u32) -> Result<Image> {
    require_non_empty(height, width)?;
    let padded;
    let source = if width > img.width() || height > img.height() {
        let ew = width.saturating_sub(img.width());
        let eh = height.saturating_sub(img.height());
        padded = pad(
            img,
            Padding::ltrb(ew / 2, eh / 2, ew - ew / 2, eh - eh / 2),
            &Fill::default(),
            PadMode::Constant,
        )?;
        &padded
    } else {
        img
    };
    let top = (f64::from(source.height() - height) / 2.0).round_ties_even() as u32;
    let left = (f64::from(source.width() - width) / 2.0).round_ties_even() as u32;
    crop(source, top, left, height, width)
}

/// Crop then resize, as a strict composition of [`crop`] and [`resize`].
pub fn resized_crop(
    img: &Image,
    top: u32,
    left: u32,
    height: u32,
    width: u32,
    target: ResizeTarget,
    interpolation: InterpolationMode,
) -> Result<Image> {
    let cropped = crop(img, top, left, height, width)?;
    resize(&cropped, target, interpolation)
}

pub fn hflip(img: &Image) -> Result<Image> {
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::hflip(o))),
        Image::Array(a) => Ok(Image::Array(backend::array::hflip(a)?)),
    }
}

pub fn vflip(img: &Image) -> Result<Image> {
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::vflip(o))),
        Image::Array(a) => Ok(Image::Array(backend::array::vflip(a)?)),
    }
}

/// The four corner crops plus the center crop, in that order. Unlike
/// [`center_crop`], a target larger than the source is an error here, never
/// an implicit pad.
pub fn five_crop(img: &Image, height: u32, width: u32) -> Result<[Image; 5]> {
    require_non_empty(height, width)?;
    let (iw, ih) = (img.width(), img.height());
    if width > iw || height > ih {
        return Err(TransformError::InvalidParameter(format!(
            "requested crop {height}x{width} is larger than the {ih}x{iw} source"
        )));
    }
    Ok([
        crop(img, 0, 0, height, width)?,
        crop(img, 0, iw - width, height, width)?,
        crop(img, ih - height, 0, height, width)?,
        crop(img, ih - height, iw - width, height, width)?,
        center_crop(img, height, width)?,
    ])
}

/// [`five_crop`] of the image followed by [`five_crop`] of its flip
/// (horizontal by default, vertical when `vertical_flip` is set); ten crops
/// total.
pub fn ten_crop(img: &Image, height: u32, width: u32, vertical_flip: bool) -> Result<Vec<Image>> {
    let first = five_crop(img, height, width)?;
    let flipped = if vertical_flip { vflip(img)? } else { hflip(img)? };
    let second = five_crop(&flipped, height, width)?;
    let mut out = Vec::with_capacity(10);
    out.extend(first);
    out.extend(second);
    Ok(out)
}

/// Rotate by `angle` degrees counter-clockwise about `center` (image
/// midpoint by default), keeping the canvas size; uncovered pixels take
/// `fill`.
///
/// The array backend has no resampler for this yet: the inverse transform
/// is still derived (so bad parameters fail the same way on both paths) and
/// the call then reports the representation as unsupported.
pub fn rotate(
    img: &Image,
    angle: f64,
    interpolation: InterpolationMode,
    center: Option<(f32, f32)>,
    fill: f32,
) -> Result<Image> {
    const ROTATE_MODES: &[InterpolationMode] = &[
        InterpolationMode::Nearest,
        InterpolationMode::Bilinear,
        InterpolationMode::Bicubic,
    ];
    if !ROTATE_MODES.contains(&interpolation) {
        return Err(TransformError::InvalidParameter(format!(
            "interpolation mode {interpolation} is not supported for rotate"
        )));
    }
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::rotate(
            o,
            angle,
            interpolation,
            center,
            fill,
        )?)),
        Image::Array(a) => {
            // Center relative to the image midpoint, as the resampling
            // matrix convention wants it.
            let center_rel = center
                .map(|(cx, cy)| {
                    (
                        f64::from(cx) - f64::from(a.width()) * 0.5,
                        f64::from(cy) - f64::from(a.height()) * 0.5,
                    )
                })
                .unwrap_or((0.0, 0.0));
            let _matrix = inverse_affine_matrix(center_rel, -angle, (0.0, 0.0), 1.0, (0.0, 0.0));
            Err(TransformError::Unsupported {
                op: "rotate",
                repr: Repr::Array,
            })
        }
    }
}

/// Scale pixel values by `factor`; 0 gives a black image, 1 is identity.
pub fn adjust_brightness(img: &Image, factor: f32) -> Result<Image> {
    require_non_negative(factor, "brightness factor")?;
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::adjust_brightness(o, factor))),
        Image::Array(a) => Ok(Image::Array(backend::array::adjust_brightness(a, factor)?)),
    }
}

/// Blend toward the image's gray mean; 0 gives a solid gray image, 1 is
/// identity.
pub fn adjust_contrast(img: &Image, factor: f32) -> Result<Image> {
    require_non_negative(factor, "contrast factor")?;
    require_channels(img, &[1, 3], "adjust_contrast")?;
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::adjust_contrast(o, factor))),
        Image::Array(a) => Ok(Image::Array(backend::array::adjust_contrast(a, factor)?)),
    }
}

/// Blend each pixel toward its own luma; 0 gives a grayscale image, 1 is
/// identity.
pub fn adjust_saturation(img: &Image, factor: f32) -> Result<Image> {
    require_non_negative(factor, "saturation factor")?;
    require_channels(img, &[3], "adjust_saturation")?;
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::adjust_saturation(o, factor))),
        Image::Array(a) => Ok(Image::Array(backend::array::adjust_saturation(a, factor)?)),
    }
}

/// Shift hue by `factor` of a full turn; the factor must lie in
/// `[-0.5, 0.5]`, and 0 is identity.
pub fn adjust_hue(img: &Image, factor: f32) -> Result<Image> {
    if !(-0.5..=0.5).contains(&factor) {
        return Err(TransformError::InvalidParameter(format!(
            "hue factor must be in [-0.5, 0.5], got {factor}"
        )));
    }
    require_channels(img, &[3], "adjust_hue")?;
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::adjust_hue(o, factor))),
        Image::Array(a) => Ok(Image::Array(backend::array::adjust_hue(a, factor)?)),
    }
}

/// Collapse a 3-channel image to Rec. 601 luma, replicated across
/// `num_output_channels` (1 or 3).
pub fn rgb_to_grayscale(img: &Image, num_output_channels: u32) -> Result<Image> {
    if !matches!(num_output_channels, 1 | 3) {
        return Err(TransformError::InvalidParameter(format!(
            "grayscale output must have 1 or 3 channels, got {num_output_channels}"
        )));
    }
    require_channels(img, &[3], "rgb_to_grayscale")?;
    let nc = num_output_channels as usize;
    match img {
        Image::Object(o) => Ok(Image::Object(backend::object::rgb_to_grayscale(o, nc))),
        Image::Array(a) => Ok(Image::Array(backend::array::rgb_to_grayscale(a, nc)?)),
    }
}

fn auto_sigma(ksize: u32) -> f64 {
    0.15 * f64::from(ksize) + 0.35
}

/// Gaussian blur with a per-axis kernel size and standard deviation.
/// Kernel sizes must be positive odd integers and sigmas positive;
/// [`Sigma::Auto`] derives each axis's sigma from its kernel size.
///
/// Object images are blurred through the array representation and converted
/// back, so both paths share one filter implementation.
pub fn gaussian_blur(img: &Image, ksize: KernelSize, sigma: Sigma) -> Result<Image> {
    let (kx, ky) = ksize.per_axis();
    for (axis, k) in [("x", kx), ("y", ky)] {
        if k == 0 || k % 2 == 0 {
            return Err(TransformError::InvalidParameter(format!(
                "kernel size on {axis} must be a positive odd integer, got {k}"
            )));
        }
    }
    let (sx, sy) = match sigma {
        Sigma::Auto => (auto_sigma(kx), auto_sigma(ky)),
        Sigma::Uniform(s) => (s, s),
        Sigma::PerAxis { x, y } => (x, y),
    };
    if sx <= 0.0 || sy <= 0.0 {
        return Err(TransformError::InvalidParameter(format!(
            "sigma must be positive, got ({sx}, {sy})"
        )));
    }
    tracing::debug!(kx, ky, sx, sy, repr = %img.repr(), "gaussian_blur");
    match img {
        Image::Array(a) => Ok(Image::Array(blur::blur_array(a, (kx, ky), (sx, sy))?)),
        Image::Object(_) => {
            let arr = img.to_array()?;
            let blurred = blur::blur_array(&arr, (kx, ky), (sx, sy))?;
            Ok(Image::Object(Image::Array(blurred).to_object()?))
        }
    }
}

fn check_normalize_args(channels: u32, mean: &[f32], std: &[f32]) -> Result<()> {
    let c = channels as usize;
    for (name, values) in [("mean", mean), ("std", std)] {
        if values.len() != 1 && values.len() != c {
            return Err(TransformError::InvalidParameter(format!(
                "{name} must have 1 or {c} values, got {}",
                values.len()
            )));
        }
    }
    if std.iter().any(|s| *s == 0.0) {
        return Err(TransformError::InvalidParameter(
            "std contains a zero entry, which would divide by zero".into(),
        ));
    }
    Ok(())
}

/// Channel-wise standardization `(v - mean) / std`, array representation
/// only. Values are not clamped afterward.
pub fn normalize(img: &Image, mean: &[f32], std: &[f32]) -> Result<Image> {
    match img {
        Image::Object(_) => Err(TransformError::Unsupported {
            op: "normalize",
            repr: Repr::Object,
        }),
        Image::Array(a) => {
            check_normalize_args(a.channels(), mean, std)?;
            Ok(Image::Array(backend::array::normalize(a, mean, std)?))
        }
    }
}

/// In-place variant of [`normalize`] for callers that own the buffer.
pub fn normalize_mut(img: &mut ArrayImage, mean: &[f32], std: &[f32]) -> Result<()> {
    check_normalize_args(img.channels(), mean, std)?;
    backend::array::normalize_mut(img, mean, std)
}
