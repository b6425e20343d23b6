//! The array-backed image representation.
//!
//! An [`ArrayImage`] is a dense `f32` buffer in `[..., C, H, W]` layout:
//! the trailing three axes are channel, height and width, and any leading
//! axes are batch axes. Pixel values conventionally live in `[0, 1]` (the
//! range [`Image::to_array`](crate::image::Image::to_array) produces), which
//! is what the photometric blends assume.

use crate::error::{Result, TransformError};
use ndarray::{ArrayD, IxDyn};

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayImage {
    data: ArrayD<f32>,
}

impl ArrayImage {
    /// Wrap an existing buffer, validating the `[..., C, H, W]` contract:
    /// at least three axes, 1-4 channels, non-empty spatial extent.
    ///
    /// Non-standard-layout input (e.g. a reversed view that was made owned)
    /// is repacked so that downstream reshapes are always cheap.
    pub fn new(data: ArrayD<f32>) -> Result<Self> {
        let shape = data.shape();
        if shape.len() < 3 {
            return Err(TransformError::shape(
                "[..., C, H, W] with at least 3 axes",
                format!("{shape:?}"),
            ));
        }
        let n = shape.len();
        let (c, h, w) = (shape[n - 3], shape[n - 2], shape[n - 1]);
        if !(1..=4).contains(&c) {
            return Err(TransformError::shape(
                "1-4 channels",
                format!("{c} channels in {shape:?}"),
            ));
        }
        if h == 0 || w == 0 {
            return Err(TransformError::shape(
                "non-empty height and width",
                format!("{shape:?}"),
            ));
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().to_owned()
        };
        Ok(Self { data })
    }

    /// Build from a flat row-major vector and an explicit shape.
    pub fn from_shape_vec(shape: &[usize], values: Vec<f32>) -> Result<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values).map_err(|e| {
            TransformError::shape(format!("buffer matching {shape:?}"), e.to_string())
        })?;
        Self::new(data)
    }

    /// A batch-free zero image, mostly useful in tests and as a conversion
    /// scratch target.
    pub fn zeros(channels: usize, height: usize, width: usize) -> Result<Self> {
        Self::new(ArrayD::zeros(IxDyn(&[channels, height, width])))
    }

    pub fn width(&self) -> u32 {
        let s = self.data.shape();
        s[s.len() - 1] as u32
    }

    pub fn height(&self) -> u32 {
        let s = self.data.shape();
        s[s.len() - 2] as u32
    }

    pub fn channels(&self) -> u32 {
        let s = self.data.shape();
        s[s.len() - 3] as u32
    }

    /// Product of the leading batch axes (1 when there are none).
    pub fn batch(&self) -> usize {
        let s = self.data.shape();
        s[..s.len() - 3].iter().product()
    }

    /// The leading batch axes themselves.
    pub(crate) fn leading(&self) -> &[usize] {
        let s = self.data.shape();
        &s[..s.len() - 3]
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    /// Mutable access for in-place value transforms; the shape invariant is
    /// unaffected because callers cannot reshape through this.
    pub(crate) fn data_mut(&mut self) -> &mut ArrayD<f32> {
        &mut self.data
    }

    pub fn into_inner(self) -> ArrayD<f32> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_read_trailing_axes() {
        let img = ArrayImage::zeros(3, 4, 5).unwrap();
        assert_eq!(img.channels(), 3);
        assert_eq!(img.height(), 4);
        assert_eq!(img.width(), 5);
        assert_eq!(img.batch(), 1);
    }

    #[test]
    fn leading_axes_multiply_into_batch() {
        let img = ArrayImage::from_shape_vec(&[2, 3, 1, 2, 2], vec![0.0; 24]).unwrap();
        assert_eq!(img.batch(), 6);
        assert_eq!(img.channels(), 1);
        assert_eq!(img.leading(), &[2, 3]);
    }

    #[test]
    fn rejects_fewer_than_three_axes() {
        assert!(ArrayImage::from_shape_vec(&[4, 4], vec![0.0; 16]).is_err());
    }

    #[test]
    fn rejects_out_of_range_channel_count() {
        assert!(ArrayImage::from_shape_vec(&[5, 2, 2], vec![0.0; 20]).is_err());
        assert!(ArrayImage::from_shape_vec(&[0, 2, 2], vec![]).is_err());
    }

    #[test]
    fn rejects_empty_spatial_extent() {
        assert!(ArrayImage::from_shape_vec(&[1, 0, 2], vec![]).is_err());
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        assert!(ArrayImage::from_shape_vec(&[1, 2, 2], vec![0.0; 3]).is_err());
    }

    #[test]
    fn repacks_non_standard_layout() {
        let mut arr = ArrayD::from_shape_vec(IxDyn(&[1, 2, 3]), (0..6).map(|v| v as f32).collect())
            .unwrap();
        arr.invert_axis(ndarray::Axis(2));
        let img = ArrayImage::new(arr).unwrap();
        assert!(img.data().is_standard_layout());
        assert_eq!(img.data()[[0, 0, 0]], 2.0);
    }
}
