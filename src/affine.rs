//! Inverse 2x3 affine matrix derivation.
//!
//! Pure dimension math, testable without any images (compare
//! `calculations` in the imaging pipeline this crate grew out of).
//!
//! Resampling maps destination to source coordinates, so the rotate
//! primitive needs the *inverse* of the forward transform
//! `M = T * C * RSS * C^-1` where `T` is the translation, `C` shifts the
//! rotation center to the origin, and `RSS` combines rotation, scale and
//! shear. The inverse is `M^-1 = C * RSS^-1 * C^-1 * T^-1`.

/// Compute the inverse affine transform as a row-major 2x3 matrix
/// `[a, b, c, d, e, f]`.
///
/// * `center` — rotation center (cx, cy) in pixel coordinates, top-left
///   origin.
/// * `angle` — rotation in degrees, counter-clockwise.
/// * `translate` — post-rotation translation (tx, ty).
/// * `scale` — uniform scale factor, must be non-zero.
/// * `shear` — shear angles (sx, sy) in degrees.
///
/// Identity inputs (`center = (0, 0)`, `angle = 0`, `translate = (0, 0)`,
/// `scale = 1`, `shear = (0, 0)`) yield `[1, 0, 0, 0, 1, 0]`.
pub fn inverse_affine_matrix(
    center: (f64, f64),
    angle: f64,
    translate: (f64, f64),
    scale: f64,
    shear: (f64, f64),
) -> [f64; 6] {
    debug_assert!(scale != 0.0, "scale must be non-zero");

    let rot = angle.to_radians();
    let sx = shear.0.to_radians();
    let sy = shear.1.to_radians();
    let (cx, cy) = center;
    let (tx, ty) = translate;

    // RSS without scaling. det([[a, b], [c, d]]) == 1 because rotation and
    // shear both have unit determinant, so the unscaled inverse is just the
    // adjugate [d, -b; -c, a].
    let a = (rot - sy).cos() / sy.cos();
    let b = -(rot - sy).cos() * sx.tan() / sy.cos() - rot.sin();
    let c = (rot - sy).sin() / sy.cos();
    let d = -(rot - sy).sin() * sx.tan() / sy.cos() + rot.cos();

    let mut matrix = [d, -b, 0.0, -c, a, 0.0].map(|x| x / scale);

    // RSS^-1 * C^-1 * T^-1
    matrix[2] += matrix[0] * (-cx - tx) + matrix[1] * (-cy - ty);
    matrix[5] += matrix[3] * (-cx - tx) + matrix[4] * (-cy - ty);

    // C * RSS^-1 * C^-1 * T^-1
    matrix[2] += cx;
    matrix[5] += cy;

    matrix
}
