//! Array-backend primitives over `[..., C, H, W]` float buffers.
//!
//! Geometric operations treat the trailing two axes as space and map over
//! any leading batch axes unchanged. Photometric blends assume unit-range
//! values and clamp their results back into `[0, 1]`; `normalize` is the one
//! value transform that does not clamp.

use crate::error::{Result, TransformError};
use crate::image::ArrayImage;
use crate::interp::InterpolationMode;
use crate::params::{PadMode, Padding};
use ndarray::{Array4, ArrayD, ArrayView2, Axis, IxDyn, Slice, s};

use super::{LUMA_WEIGHTS, hsv_to_rgb, pad_source_index, rgb_to_hsv};

/// Interpolation modes this backend can resample with.
pub(crate) const SUPPORTED_INTERPOLATION: &[InterpolationMode] = &[
    InterpolationMode::Nearest,
    InterpolationMode::Bilinear,
    InterpolationMode::Bicubic,
];

/// View the buffer as `(B, C, H, W)` with the batch axes collapsed.
fn as_batched(img: &ArrayImage) -> Result<Array4<f32>> {
    let dims = (
        img.batch(),
        img.channels() as usize,
        img.height() as usize,
        img.width() as usize,
    );
    img.data()
        .clone()
        .into_shape_with_order(dims)
        .map_err(|e| TransformError::shape("[B, C, H, W] collapse", e.to_string()))
}

/// Restore the original leading batch axes around a transformed
/// `(B, C, H, W)` buffer.
fn rebuild(leading: &[usize], batched: Array4<f32>) -> Result<ArrayImage> {
    let (_, c, h, w) = batched.dim();
    let mut shape = leading.to_vec();
    shape.extend([c, h, w]);
    let data = batched
        .into_shape_with_order(IxDyn(&shape))
        .map_err(|e| TransformError::shape(format!("{shape:?}"), e.to_string()))?;
    ArrayImage::new(data)
}

pub(crate) fn hflip(img: &ArrayImage) -> Result<ArrayImage> {
    let mut data = img.data().clone();
    let n = data.ndim();
    data.invert_axis(Axis(n - 1));
    ArrayImage::new(data)
}

pub(crate) fn vflip(img: &ArrayImage) -> Result<ArrayImage> {
    let mut data = img.data().clone();
    let n = data.ndim();
    data.invert_axis(Axis(n - 2));
    ArrayImage::new(data)
}

/// Extract the `height x width` region at `(top, left)` from every batch
/// item. Boxes overrunning the right or bottom edge read from a zero-padded
/// extension, matching pad-then-crop composition.
pub(crate) fn crop(
    img: &ArrayImage,
    top: u32,
    left: u32,
    height: u32,
    width: u32,
) -> Result<ArrayImage> {
    let pad_right = (left + width).saturating_sub(img.width());
    let pad_bottom = (top + height).saturating_sub(img.height());
    let padded;
    let source = if pad_right > 0 || pad_bottom > 0 {
        padded = pad(
            img,
            Padding::ltrb(0, 0, pad_right, pad_bottom),
            0.0,
            PadMode::Constant,
        )?;
        &padded
    } else {
        img
    };

    let n = source.data().ndim();
    let (t, l) = (top as isize, left as isize);
    let data = source
        .data()
        .slice_each_axis(|ad| {
            if ad.axis.index() == n - 2 {
                Slice::from(t..t + height as isize)
            } else if ad.axis.index() == n - 1 {
                Slice::from(l..l + width as isize)
            } else {
                Slice::from(..)
            }
        })
        .to_owned();
    ArrayImage::new(data)
}

/// Add a border on each side according to `mode`; constant borders take the
/// scalar `fill` in the buffer's own value space.
pub(crate) fn pad(
    img: &ArrayImage,
    padding: Padding,
    fill: f32,
    mode: PadMode,
) -> Result<ArrayImage> {
    let data = img.data();
    let n = data.ndim();
    let (h, w) = (i64::from(img.height()), i64::from(img.width()));
    let mut shape = data.shape().to_vec();
    shape[n - 2] += (padding.top + padding.bottom) as usize;
    shape[n - 1] += (padding.left + padding.right) as usize;

    let out = ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
        let y = idx[n - 2] as i64 - i64::from(padding.top);
        let x = idx[n - 1] as i64 - i64::from(padding.left);
        match (pad_source_index(y, h, mode), pad_source_index(x, w, mode)) {
            (Some(sy), Some(sx)) => {
                let mut src = idx.clone();
                src[n - 2] = sy as usize;
                src[n - 1] = sx as usize;
                data[src]
            }
            _ => fill,
        }
    });
    ArrayImage::new(out)
}

fn cubic_weight(t: f32) -> f32 {
    // Keys kernel with a = -0.75.
    const A: f32 = -0.75;
    let t = t.abs();
    if t <= 1.0 {
        (A + 2.0) * t * t * t - (A + 3.0) * t * t + 1.0
    } else if t < 2.0 {
        A * t * t * t - 5.0 * A * t * t + 8.0 * A * t - 4.0 * A
    } else {
        0.0
    }
}

fn sample_bilinear(plane: &ArrayView2<f32>, fy: f32, fx: f32) -> f32 {
    let (h, w) = plane.dim();
    let y0 = fy.floor();
    let x0 = fx.floor();
    let ty = fy - y0;
    let tx = fx - x0;
    let clamp_y = |v: f32| (v.max(0.0) as usize).min(h - 1);
    let clamp_x = |v: f32| (v.max(0.0) as usize).min(w - 1);
    let (y0i, y1i) = (clamp_y(y0), clamp_y(y0 + 1.0));
    let (x0i, x1i) = (clamp_x(x0), clamp_x(x0 + 1.0));
    let top = plane[[y0i, x0i]] * (1.0 - tx) + plane[[y0i, x1i]] * tx;
    let bot = plane[[y1i, x0i]] * (1.0 - tx) + plane[[y1i, x1i]] * tx;
    top * (1.0 - ty) + bot * ty
}

fn sample_bicubic(plane: &ArrayView2<f32>, fy: f32, fx: f32) -> f32 {
    let (h, w) = plane.dim();
    let y0 = fy.floor() as i64;
    let x0 = fx.floor() as i64;
    let mut acc = 0.0;
    for dy in -1..=2 {
        let wy = cubic_weight(fy - (y0 + dy) as f32);
        if wy == 0.0 {
            continue;
        }
        let yi = (y0 + dy).clamp(0, h as i64 - 1) as usize;
        for dx in -1..=2 {
            let wx = cubic_weight(fx - (x0 + dx) as f32);
            if wx == 0.0 {
                continue;
            }
            let xi = (x0 + dx).clamp(0, w as i64 - 1) as usize;
            acc += wy * wx * plane[[yi, xi]];
        }
    }
    acc
}

/// Resample every `(batch, channel)` plane to `height x width`. Bilinear and
/// bicubic use half-pixel-center source coordinates with edge clamping.
pub(crate) fn resize(
    img: &ArrayImage,
    width: u32,
    height: u32,
    mode: InterpolationMode,
) -> Result<ArrayImage> {
    if !SUPPORTED_INTERPOLATION.contains(&mode) {
        return Err(TransformError::InvalidParameter(format!(
            "interpolation mode {mode} is not supported for array resize"
        )));
    }
    let leading = img.leading().to_vec();
    let src = as_batched(img)?;
    let (b, c, sh, sw) = src.dim();
    let (oh, ow) = (height as usize, width as usize);
    let scale_y = sh as f32 / oh as f32;
    let scale_x = sw as f32 / ow as f32;

    let mut out = Array4::<f32>::zeros((b, c, oh, ow));
    for bi in 0..b {
        for ci in 0..c {
            let plane = src.slice(s![bi, ci, .., ..]);
            let mut dst = out.slice_mut(s![bi, ci, .., ..]);
            for y in 0..oh {
                for x in 0..ow {
                    dst[[y, x]] = match mode {
                        InterpolationMode::Nearest => {
                            let sy = ((y as f32 * scale_y) as usize).min(sh - 1);
                            let sx = ((x as f32 * scale_x) as usize).min(sw - 1);
                            plane[[sy, sx]]
                        }
                        InterpolationMode::Bilinear => {
                            let fy = (y as f32 + 0.5) * scale_y - 0.5;
                            let fx = (x as f32 + 0.5) * scale_x - 0.5;
                            sample_bilinear(&plane, fy, fx)
                        }
                        _ => {
                            let fy = (y as f32 + 0.5) * scale_y - 0.5;
                            let fx = (x as f32 + 0.5) * scale_x - 0.5;
                            sample_bicubic(&plane, fy, fx)
                        }
                    };
                }
            }
        }
    }
    rebuild(&leading, out)
}

pub(crate) fn adjust_brightness(img: &ArrayImage, factor: f32) -> Result<ArrayImage> {
    ArrayImage::new(img.data().mapv(|v| (v * factor).clamp(0.0, 1.0)))
}

fn gray_mean(item: &ndarray::ArrayView3<f32>) -> f32 {
    let c = item.dim().0;
    if c == 1 {
        item.mean().unwrap_or(0.0)
    } else {
        LUMA_WEIGHTS
            .iter()
            .enumerate()
            .map(|(ch, weight)| weight * item.index_axis(Axis(0), ch).mean().unwrap_or(0.0))
            .sum()
    }
}

/// Blend every value toward the batch item's gray mean; channel counts other
/// than 1 and 3 are rejected at dispatch.
pub(crate) fn adjust_contrast(img: &ArrayImage, factor: f32) -> Result<ArrayImage> {
    let leading = img.leading().to_vec();
    let mut batched = as_batched(img)?;
    let b = batched.dim().0;
    for bi in 0..b {
        let mean = gray_mean(&batched.slice(s![bi, .., .., ..]));
        batched
            .slice_mut(s![bi, .., .., ..])
            .mapv_inplace(|v| (mean + factor * (v - mean)).clamp(0.0, 1.0));
    }
    rebuild(&leading, batched)
}

/// Blend every pixel toward its own luma; 3-channel only, checked at
/// dispatch.
pub(crate) fn adjust_saturation(img: &ArrayImage, factor: f32) -> Result<ArrayImage> {
    let leading = img.leading().to_vec();
    let mut batched = as_batched(img)?;
    let (b, _, h, w) = batched.dim();
    for bi in 0..b {
        for y in 0..h {
            for x in 0..w {
                let gray = LUMA_WEIGHTS[0] * batched[[bi, 0, y, x]]
                    + LUMA_WEIGHTS[1] * batched[[bi, 1, y, x]]
                    + LUMA_WEIGHTS[2] * batched[[bi, 2, y, x]];
                for ch in 0..3 {
                    let v = gray + factor * (batched[[bi, ch, y, x]] - gray);
                    batched[[bi, ch, y, x]] = v.clamp(0.0, 1.0);
                }
            }
        }
    }
    rebuild(&leading, batched)
}

/// Shift hue by `factor` of a full turn through an HSV round trip.
pub(crate) fn adjust_hue(img: &ArrayImage, factor: f32) -> Result<ArrayImage> {
    let leading = img.leading().to_vec();
    let mut batched = as_batched(img)?;
    let (b, _, h, w) = batched.dim();
    for bi in 0..b {
        for y in 0..h {
            for x in 0..w {
                let (hue, s, v) = rgb_to_hsv(
                    batched[[bi, 0, y, x]],
                    batched[[bi, 1, y, x]],
                    batched[[bi, 2, y, x]],
                );
                let (r, g, bl) = hsv_to_rgb((hue + factor * 360.0).rem_euclid(360.0), s, v);
                batched[[bi, 0, y, x]] = r.clamp(0.0, 1.0);
                batched[[bi, 1, y, x]] = g.clamp(0.0, 1.0);
                batched[[bi, 2, y, x]] = bl.clamp(0.0, 1.0);
            }
        }
    }
    rebuild(&leading, batched)
}

/// Collapse RGB to Rec. 601 luma, replicated across `output_channels`
/// (1 or 3).
pub(crate) fn rgb_to_grayscale(img: &ArrayImage, output_channels: usize) -> Result<ArrayImage> {
    let leading = img.leading().to_vec();
    let batched = as_batched(img)?;
    let (b, _, h, w) = batched.dim();
    let mut out = Array4::<f32>::zeros((b, output_channels, h, w));
    for bi in 0..b {
        for y in 0..h {
            for x in 0..w {
                let gray = LUMA_WEIGHTS[0] * batched[[bi, 0, y, x]]
                    + LUMA_WEIGHTS[1] * batched[[bi, 1, y, x]]
                    + LUMA_WEIGHTS[2] * batched[[bi, 2, y, x]];
                for ch in 0..output_channels {
                    out[[bi, ch, y, x]] = gray;
                }
            }
        }
    }
    rebuild(&leading, out)
}

/// In-place channel-wise standardization `(v - mean) / std`. `mean` and
/// `std` hold one value per channel or a single broadcast value; zero
/// standard deviations are rejected at dispatch. No clamping.
pub(crate) fn normalize_mut(img: &mut ArrayImage, mean: &[f32], std: &[f32]) -> Result<()> {
    let n = img.data().ndim();
    let per = |values: &[f32], ch: usize| {
        if values.len() == 1 {
            values[0]
        } else {
            values[ch]
        }
    };
    for (ch, mut lane) in img.data_mut().axis_iter_mut(Axis(n - 3)).enumerate() {
        let (m, s) = (per(mean, ch), per(std, ch));
        lane.mapv_inplace(|v| (v - m) / s);
    }
    Ok(())
}

pub(crate) fn normalize(img: &ArrayImage, mean: &[f32], std: &[f32]) -> Result<ArrayImage> {
    let mut out = img.clone();
    normalize_mut(&mut out, mean, std)?;
    Ok(out)
}
