//! Object-backend primitives over [`image::DynamicImage`].
//!
//! All pixel work goes through a flat interleaved (HWC) u8 sample buffer;
//! `to_samples`/`from_samples` are the only places that match on the color
//! mode. Inputs arrive already validated by the dispatch layer.

use crate::error::{Result, TransformError};
use crate::interp::InterpolationMode;
use crate::params::{Fill, PadMode, Padding};
use image::imageops::FilterType;
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, Luma, LumaA, Rgb, RgbImage, Rgba, RgbaImage,
};
use imageproc::geometric_transformations::{self, Interpolation};

use super::{LUMA_WEIGHTS, hsv_to_rgb, pad_source_index, rgb_to_hsv};

/// Interpolation modes this backend can resample with.
pub(crate) const SUPPORTED_INTERPOLATION: &[InterpolationMode] = &[
    InterpolationMode::Nearest,
    InterpolationMode::Bilinear,
    InterpolationMode::Bicubic,
    InterpolationMode::Lanczos,
];

/// Flatten into interleaved HWC u8 samples plus (width, height, channels).
///
/// The four 8-bit color modes pass through directly; anything deeper is
/// narrowed through RGBA first.
pub(crate) fn to_samples(img: &DynamicImage) -> (Vec<u8>, u32, u32, usize) {
    let (w, h) = (img.width(), img.height());
    match img {
        DynamicImage::ImageLuma8(b) => (b.as_raw().clone(), w, h, 1),
        DynamicImage::ImageLumaA8(b) => (b.as_raw().clone(), w, h, 2),
        DynamicImage::ImageRgb8(b) => (b.as_raw().clone(), w, h, 3),
        DynamicImage::ImageRgba8(b) => (b.as_raw().clone(), w, h, 4),
        other => (other.to_rgba8().into_raw(), w, h, 4),
    }
}

/// Rebuild a [`DynamicImage`] from interleaved HWC samples. The channel
/// count picks the color mode: 1 = gray, 2 = gray+alpha, 3 = RGB, 4 = RGBA.
pub(crate) fn from_samples(samples: Vec<u8>, w: u32, h: u32, c: usize) -> DynamicImage {
    match c {
        1 => DynamicImage::ImageLuma8(
            GrayImage::from_raw(w, h, samples).expect("buffer length matches dimensions"),
        ),
        2 => DynamicImage::ImageLumaA8(
            GrayAlphaImage::from_raw(w, h, samples).expect("buffer length matches dimensions"),
        ),
        3 => DynamicImage::ImageRgb8(
            RgbImage::from_raw(w, h, samples).expect("buffer length matches dimensions"),
        ),
        4 => DynamicImage::ImageRgba8(
            RgbaImage::from_raw(w, h, samples).expect("buffer length matches dimensions"),
        ),
        _ => unreachable!("channel count is validated to 1-4 before reaching the backend"),
    }
}

/// Number of color (non-alpha) channels for a given channel count.
fn color_channels(c: usize) -> usize {
    match c {
        2 => 1,
        4 => 3,
        n => n,
    }
}

fn luma(px: &[u8]) -> f32 {
    if px.len() >= 3 {
        LUMA_WEIGHTS[0] * f32::from(px[0])
            + LUMA_WEIGHTS[1] * f32::from(px[1])
            + LUMA_WEIGHTS[2] * f32::from(px[2])
    } else {
        f32::from(px[0])
    }
}

fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

pub(crate) fn resize(img: &DynamicImage, width: u32, height: u32, filter: FilterType) -> DynamicImage {
    img.resize_exact(width, height, filter)
}

pub(crate) fn hflip(img: &DynamicImage) -> DynamicImage {
    img.fliph()
}

pub(crate) fn vflip(img: &DynamicImage) -> DynamicImage {
    img.flipv()
}

/// Extract the `height x width` region whose top-left corner is
/// `(top, left)`. A box that overruns the right or bottom edge reads from a
/// zero-padded extension of the source, matching pad-then-crop composition.
pub(crate) fn crop(
    img: &DynamicImage,
    top: u32,
    left: u32,
    height: u32,
    width: u32,
) -> Result<DynamicImage> {
    let pad_right = (left + width).saturating_sub(img.width());
    let pad_bottom = (top + height).saturating_sub(img.height());
    let padded;
    let source = if pad_right > 0 || pad_bottom > 0 {
        padded = pad(
            img,
            Padding::ltrb(0, 0, pad_right, pad_bottom),
            &Fill::Uniform(0.0),
            PadMode::Constant,
        )?;
        &padded
    } else {
        img
    };

    let (samples, sw, _, c) = to_samples(source);
    let (sw, top, left) = (sw as usize, top as usize, left as usize);
    let (oh, ow) = (height as usize, width as usize);
    let mut out = vec![0u8; oh * ow * c];
    for y in 0..oh {
        let src_row = ((y + top) * sw + left) * c;
        let dst_row = y * ow * c;
        out[dst_row..dst_row + ow * c].copy_from_slice(&samples[src_row..src_row + ow * c]);
    }
    Ok(from_samples(out, width, height, c))
}

/// Add a border on each side according to `mode`. The fill value only
/// applies to [`PadMode::Constant`]; per-channel fills must already match the
/// channel count.
pub(crate) fn pad(
    img: &DynamicImage,
    padding: Padding,
    fill: &Fill,
    mode: PadMode,
) -> Result<DynamicImage> {
    let (samples, w, h, c) = to_samples(img);
    let fill_px: Vec<u8> = match fill {
        Fill::Uniform(v) => vec![quantize(*v); c],
        Fill::PerChannel(values) => {
            if values.len() != c {
                return Err(TransformError::InvalidParameter(format!(
                    "per-channel fill has {} values for a {c}-channel image",
                    values.len()
                )));
            }
            values.iter().map(|v| quantize(*v)).collect()
        }
    };

    let (ow, oh) = (
        w + padding.left + padding.right,
        h + padding.top + padding.bottom,
    );
    let (wi, hi) = (i64::from(w), i64::from(h));
    let mut out = vec![0u8; ow as usize * oh as usize * c];
    for y in 0..oh as usize {
        let sy = pad_source_index(y as i64 - i64::from(padding.top), hi, mode);
        for x in 0..ow as usize {
            let sx = pad_source_index(x as i64 - i64::from(padding.left), wi, mode);
            let dst = (y * ow as usize + x) * c;
            match (sy, sx) {
                (Some(sy), Some(sx)) => {
                    let src = (sy as usize * w as usize + sx as usize) * c;
                    out[dst..dst + c].copy_from_slice(&samples[src..src + c]);
                }
                _ => out[dst..dst + c].copy_from_slice(&fill_px),
            }
        }
    }
    Ok(from_samples(out, ow, oh, c))
}

/// Rotate by `angle` degrees counter-clockwise about `center` (defaults to
/// the image midpoint), keeping the canvas size. Uncovered pixels take the
/// fill value on every band.
pub(crate) fn rotate(
    img: &DynamicImage,
    angle: f64,
    mode: InterpolationMode,
    center: Option<(f32, f32)>,
    fill: f32,
) -> Result<DynamicImage> {
    let interp = match mode {
        InterpolationMode::Nearest => Interpolation::Nearest,
        InterpolationMode::Bilinear => Interpolation::Bilinear,
        InterpolationMode::Bicubic => Interpolation::Bicubic,
        other => {
            return Err(TransformError::InvalidParameter(format!(
                "interpolation mode {other} is not supported for rotate"
            )));
        }
    };
    let center = center.unwrap_or((img.width() as f32 / 2.0, img.height() as f32 / 2.0));
    // The resampler's positive angle is clockwise; ours is counter-clockwise.
    let theta = (-angle as f32).to_radians();
    let f = quantize(fill);

    let rotated = match img {
        DynamicImage::ImageLuma8(b) => DynamicImage::ImageLuma8(
            geometric_transformations::rotate(b, center, theta, interp, Luma([f])),
        ),
        DynamicImage::ImageLumaA8(b) => DynamicImage::ImageLumaA8(
            geometric_transformations::rotate(b, center, theta, interp, LumaA([f, f])),
        ),
        DynamicImage::ImageRgb8(b) => DynamicImage::ImageRgb8(
            geometric_transformations::rotate(b, center, theta, interp, Rgb([f, f, f])),
        ),
        DynamicImage::ImageRgba8(b) => DynamicImage::ImageRgba8(
            geometric_transformations::rotate(b, center, theta, interp, Rgba([f, f, f, f])),
        ),
        other => DynamicImage::ImageRgba8(geometric_transformations::rotate(
            &other.to_rgba8(),
            center,
            theta,
            interp,
            Rgba([f, f, f, f]),
        )),
    };
    Ok(rotated)
}

/// Linear blend `baseline + factor * (original - baseline)` over the color
/// channels, leaving alpha untouched. All three photometric adjustments are
/// this blend with a different baseline.
fn blend(img: &DynamicImage, factor: f32, baseline: impl Fn(&[u8]) -> f32) -> DynamicImage {
    let (samples, w, h, c) = to_samples(img);
    let cc = color_channels(c);
    let mut out = samples.clone();
    for px in 0..(w as usize * h as usize) {
        let pixel = &samples[px * c..px * c + c];
        let base = baseline(pixel);
        for ch in 0..cc {
            out[px * c + ch] = quantize(base + factor * (f32::from(pixel[ch]) - base));
        }
    }
    from_samples(out, w, h, c)
}

pub(crate) fn adjust_brightness(img: &DynamicImage, factor: f32) -> DynamicImage {
    blend(img, factor, |_| 0.0)
}

pub(crate) fn adjust_contrast(img: &DynamicImage, factor: f32) -> DynamicImage {
    let (samples, w, h, c) = to_samples(img);
    let count = (w as usize * h as usize) as f32;
    let mean = samples
        .chunks_exact(c)
        .map(luma)
        .sum::<f32>()
        / count;
    blend(img, factor, move |_| mean)
}

pub(crate) fn adjust_saturation(img: &DynamicImage, factor: f32) -> DynamicImage {
    blend(img, factor, luma)
}

/// Shift hue by `factor` (fraction of a full turn) through an HSV round
/// trip. Only meaningful for 3-channel input, which dispatch guarantees.
pub(crate) fn adjust_hue(img: &DynamicImage, factor: f32) -> DynamicImage {
    let (samples, w, h, c) = to_samples(img);
    let mut out = samples.clone();
    for px in 0..(w as usize * h as usize) {
        let i = px * c;
        let (h_deg, s, v) = rgb_to_hsv(
            f32::from(samples[i]) / 255.0,
            f32::from(samples[i + 1]) / 255.0,
            f32::from(samples[i + 2]) / 255.0,
        );
        let (r, g, b) = hsv_to_rgb((h_deg + factor * 360.0).rem_euclid(360.0), s, v);
        out[i] = quantize(r * 255.0);
        out[i + 1] = quantize(g * 255.0);
        out[i + 2] = quantize(b * 255.0);
    }
    from_samples(out, w, h, c)
}

/// Collapse RGB to Rec. 601 luma, replicated across `output_channels`
/// (1 or 3).
pub(crate) fn rgb_to_grayscale(img: &DynamicImage, output_channels: usize) -> DynamicImage {
    let (samples, w, h, c) = to_samples(img);
    let mut out = vec![0u8; w as usize * h as usize * output_channels];
    for px in 0..(w as usize * h as usize) {
        let gray = quantize(luma(&samples[px * c..px * c + c]));
        out[px * output_channels..(px + 1) * output_channels].fill(gray);
    }
    from_samples(out, w, h, output_channels)
}
