//! Backend implementations for the two image representations.
//!
//! Every geometric and photometric primitive is implemented once per
//! backend; the two implementations share a boundary-policy contract (the
//! index mapping below) and are held to near-identical numerical results by
//! the `compare_backends` integration suite. Dispatch between them happens
//! in [`functional`](crate::functional), never here.

pub(crate) mod array;
pub(crate) mod object;

use crate::params::PadMode;

/// Map a possibly out-of-range coordinate onto a source index according to
/// the padding mode. `None` means the position lies in the synthesized
/// constant-fill region.
///
/// Reflect mirrors around the edge pixel without repeating it (period
/// `2 * size - 2`); symmetric repeats it (period `2 * size`).
pub(crate) fn pad_source_index(i: i64, size: i64, mode: PadMode) -> Option<i64> {
    if (0..size).contains(&i) {
        return Some(i);
    }
    match mode {
        PadMode::Constant => None,
        PadMode::Edge => Some(i.clamp(0, size - 1)),
        PadMode::Reflect => {
            if size == 1 {
                Some(0)
            } else {
                let p = i.rem_euclid(2 * size - 2);
                Some(if p < size { p } else { 2 * size - 2 - p })
            }
        }
        PadMode::Symmetric => {
            let p = i.rem_euclid(2 * size);
            Some(if p < size { p } else { 2 * size - 1 - p })
        }
    }
}

/// RGB (unit range) to HSV with hue in degrees.
pub(crate) fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta.abs() < f32::EPSILON {
        0.0
    } else if (max - r).abs() < f32::EPSILON {
        60.0 * (((g - b) / delta) % 6.0)
    } else if (max - g).abs() < f32::EPSILON {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    let hue = if hue < 0.0 { hue + 360.0 } else { hue };
    let saturation = if max.abs() < f32::EPSILON {
        0.0
    } else {
        delta / max
    };
    (hue, saturation, max)
}

/// HSV (hue in degrees) back to RGB in unit range.
pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s <= 0.0 {
        return (v, v, v);
    }
    let hue = if h.is_nan() { 0.0 } else { h.rem_euclid(360.0) };
    let c = v * s;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match hue {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (r1 + m, g1 + m, b1 + m)
}

/// Rec. 601 luma weights shared by grayscale, contrast and saturation.
pub(crate) const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_excludes_boundary_pixel() {
        // [1, 2, 3, 4] padded by 2 on both sides -> [3, 2 | 1 2 3 4 | 3, 2]
        let idx: Vec<i64> = (-2..6)
            .map(|i| pad_source_index(i, 4, PadMode::Reflect).unwrap())
            .collect();
        assert_eq!(idx, vec![2, 1, 0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn symmetric_includes_boundary_pixel() {
        // [1, 2, 3, 4] padded by 2 on both sides -> [2, 1 | 1 2 3 4 | 4, 3]
        let idx: Vec<i64> = (-2..6)
            .map(|i| pad_source_index(i, 4, PadMode::Symmetric).unwrap())
            .collect();
        assert_eq!(idx, vec![1, 0, 0, 1, 2, 3, 3, 2]);
    }

    #[test]
    fn edge_clamps_and_constant_falls_outside() {
        assert_eq!(pad_source_index(-3, 4, PadMode::Edge), Some(0));
        assert_eq!(pad_source_index(9, 4, PadMode::Edge), Some(3));
        assert_eq!(pad_source_index(-1, 4, PadMode::Constant), None);
        assert_eq!(pad_source_index(2, 4, PadMode::Constant), Some(2));
    }

    #[test]
    fn reflect_handles_single_pixel_axis() {
        assert_eq!(pad_source_index(-5, 1, PadMode::Reflect), Some(0));
        assert_eq!(pad_source_index(3, 1, PadMode::Reflect), Some(0));
    }

    #[test]
    fn hsv_round_trip_preserves_rgb() {
        for &(r, g, b) in &[(0.2f32, 0.7f32, 0.4f32), (1.0, 0.0, 0.0), (0.5, 0.5, 0.5)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!((r - r2).abs() < 1e-5, "{r} vs {r2}");
            assert!((g - g2).abs() < 1e-5, "{g} vs {g2}");
            assert!((b - b2).abs() < 1e-5, "{b} vs {b2}");
        }
    }

    #[test]
    fn full_hue_circle_is_identity() {
        let (h, s, v) = rgb_to_hsv(0.8, 0.3, 0.1);
        let (r, g, b) = hsv_to_rgb(h + 360.0, s, v);
        assert!((r - 0.8).abs() < 1e-5);
        assert!((g - 0.3).abs() < 1e-5);
        assert!((b - 0.1).abs() < 1e-5);
    }
}
