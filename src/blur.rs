//! Separable Gaussian blur over the array representation.
//!
//! The kernel is sampled from the continuous Gaussian and renormalized to
//! sum to one, so constant fields pass through unchanged. Borders are
//! extended by reflection (boundary pixel excluded, the same policy the pad
//! primitive uses). Planes are independent, so they are blurred in parallel.

use crate::backend::pad_source_index;
use crate::error::{Result, TransformError};
use crate::image::ArrayImage;
use crate::params::PadMode;
use rayon::prelude::*;

/// A normalized 1-D Gaussian kernel of odd length `ksize`.
pub(crate) fn gaussian_kernel(ksize: usize, sigma: f64) -> Vec<f32> {
    let center = (ksize as f64 - 1.0) / 2.0;
    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - center;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter().map(|v| (v / sum) as f32).collect()
}

fn mirror(i: i64, size: i64) -> usize {
    match pad_source_index(i, size, PadMode::Reflect) {
        Some(v) => v as usize,
        None => 0,
    }
}

/// Blur every `(batch, channel)` plane with the given per-axis kernels.
/// Sigmas must already be resolved and positive; kernel sizes odd.
pub(crate) fn blur_array(
    img: &ArrayImage,
    ksize: (u32, u32),
    sigma: (f64, f64),
) -> Result<ArrayImage> {
    let kernel_x = gaussian_kernel(ksize.0 as usize, sigma.0);
    let kernel_y = gaussian_kernel(ksize.1 as usize, sigma.1);
    let (h, w) = (img.height() as usize, img.width() as usize);
    let half_x = (kernel_x.len() as i64 - 1) / 2;
    let half_y = (kernel_y.len() as i64 - 1) / 2;

    let mut data = img.data().clone();
    let samples = data
        .as_slice_mut()
        .ok_or_else(|| TransformError::shape("contiguous buffer", "strided view"))?;

    samples.par_chunks_mut(h * w).for_each(|plane| {
        let mut tmp = vec![0f32; h * w];
        // Horizontal pass.
        for y in 0..h {
            for x in 0..w {
                let mut acc = 0.0;
                for (k, weight) in kernel_x.iter().enumerate() {
                    let sx = mirror(x as i64 + k as i64 - half_x, w as i64);
                    acc += weight * plane[y * w + sx];
                }
                tmp[y * w + x] = acc;
            }
        }
        // Vertical pass, writing back in place.
        for y in 0..h {
            for x in 0..w {
                let mut acc = 0.0;
                for (k, weight) in kernel_y.iter().enumerate() {
                    let sy = mirror(y as i64 + k as i64 - half_y, h as i64);
                    acc += weight * tmp[sy * w + x];
                }
                plane[y * w + x] = acc;
            }
        }
    });
    ArrayImage::new(data)
}
