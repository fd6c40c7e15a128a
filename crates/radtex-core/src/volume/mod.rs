//! Volume - 3D voxel array
//!
//! `Volume<T>` is a dense 3D array indexed `(row, column, slice)`. Scalar
//! images use `Volume<f64>`; region masks use [`Mask`] (`Volume<bool>`).
//!
//! See [`crop`] for crop-back and bounding-box extraction, and [`border`]
//! for padding with a boundary rule.
//!
//! # Examples
//!
//! ```
//! use radtex_core::Volume;
//!
//! let mut vol = Volume::<f64>::new(4, 5, 3).unwrap();
//! vol.set(1, 2, 0, 0.5).unwrap();
//! assert_eq!(vol.get(1, 2, 0).unwrap(), 0.5);
//! assert_eq!(vol.shape().cols, 5);
//! ```

pub mod border;
pub mod crop;

use crate::error::{Error, Result};
use crate::shape::Shape;

/// 3D voxel array
///
/// # Memory Layout
///
/// Slices are stored one after another; each slice is a row-major plane.
/// The voxel at `(r, c, s)` is at index `(s * rows + r) * cols + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T> {
    shape: Shape,
    data: Vec<T>,
}

/// Boolean region mask with the same layout as a scalar volume
pub type Mask = Volume<bool>;

fn check_dims(shape: Shape) -> Result<()> {
    if shape.is_degenerate() {
        return Err(Error::InvalidDimension {
            rows: shape.rows,
            cols: shape.cols,
            slices: shape.slices,
        });
    }
    Ok(())
}

impl<T: Clone> Volume<T> {
    /// Create a volume with every voxel set to `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any extent is 0.
    pub fn new_with_value(rows: usize, cols: usize, slices: usize, value: T) -> Result<Self> {
        let shape = Shape::new(rows, cols, slices);
        check_dims(shape)?;
        Ok(Volume {
            shape,
            data: vec![value; shape.voxel_count()],
        })
    }

    /// Create a volume from raw data in slice-major, row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions are invalid or the data length
    /// doesn't match.
    pub fn from_data(rows: usize, cols: usize, slices: usize, data: Vec<T>) -> Result<Self> {
        let shape = Shape::new(rows, cols, slices);
        check_dims(shape)?;
        let expected = shape.voxel_count();
        if data.len() != expected {
            return Err(Error::DataLength {
                len: data.len(),
                shape,
                expected,
            });
        }
        Ok(Volume { shape, data })
    }

    /// Build a volume by evaluating `f(row, col, slice)` at every voxel.
    pub fn from_fn(shape: Shape, mut f: impl FnMut(usize, usize, usize) -> T) -> Result<Self> {
        check_dims(shape)?;
        let mut data = Vec::with_capacity(shape.voxel_count());
        for s in 0..shape.slices {
            for r in 0..shape.rows {
                for c in 0..shape.cols {
                    data.push(f(r, c, s));
                }
            }
        }
        Ok(Volume { shape, data })
    }

    /// Get a voxel value
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfBounds` if the index is outside the volume.
    pub fn get(&self, row: usize, col: usize, slice: usize) -> Result<T> {
        self.check_index(row, col, slice)?;
        Ok(self.data[self.offset(row, col, slice)].clone())
    }

    /// Set a voxel value
    pub fn set(&mut self, row: usize, col: usize, slice: usize, value: T) -> Result<()> {
        self.check_index(row, col, slice)?;
        let idx = self.offset(row, col, slice);
        self.data[idx] = value;
        Ok(())
    }

    /// Get a voxel value without bounds checking against the shape.
    ///
    /// Panics if the flat index falls outside the data.
    #[inline]
    pub fn get_unchecked(&self, row: usize, col: usize, slice: usize) -> T {
        self.data[self.offset(row, col, slice)].clone()
    }

    #[inline]
    pub fn set_unchecked(&mut self, row: usize, col: usize, slice: usize, value: T) {
        let idx = self.offset(row, col, slice);
        self.data[idx] = value;
    }

    /// Set every voxel to `value`
    pub fn set_all(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Apply `f` to every voxel, producing a new volume of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Volume<U> {
        Volume {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Combine two volumes of identical shape voxel by voxel.
    ///
    /// # Errors
    ///
    /// Returns `Error::ShapeMismatch` if the shapes differ.
    pub fn zip_map<U: Clone, V>(
        &self,
        other: &Volume<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<Volume<V>> {
        self.check_same_shape(other)?;
        Ok(Volume {
            shape: self.shape,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }
}

impl<T> Volume<T> {
    /// Extent along each axis
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    #[inline]
    pub fn slices(&self) -> usize {
        self.shape.slices
    }

    /// Get the voxel data
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get mutable access to the voxel data
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Get one slice as a row-major plane.
    ///
    /// # Panics
    ///
    /// Panics if `slice >= self.slices()`.
    pub fn plane(&self, slice: usize) -> &[T] {
        let n = self.shape.rows * self.shape.cols;
        &self.data[slice * n..(slice + 1) * n]
    }

    /// Get one slice as a mutable row-major plane.
    pub fn plane_mut(&mut self, slice: usize) -> &mut [T] {
        let n = self.shape.rows * self.shape.cols;
        &mut self.data[slice * n..(slice + 1) * n]
    }

    /// Fail with `Error::ShapeMismatch` unless `other` has this shape.
    pub fn check_same_shape<U>(&self, other: &Volume<U>) -> Result<()> {
        if self.shape != other.shape {
            return Err(Error::ShapeMismatch {
                expected: self.shape,
                actual: other.shape,
            });
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize, slice: usize) -> usize {
        (slice * self.shape.rows + row) * self.shape.cols + col
    }

    fn check_index(&self, row: usize, col: usize, slice: usize) -> Result<()> {
        if row >= self.shape.rows || col >= self.shape.cols || slice >= self.shape.slices {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                slice,
                shape: self.shape,
            });
        }
        Ok(())
    }
}

impl<T: Clone + Default> Volume<T> {
    /// Create a new volume with all voxels set to `T::default()`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidDimension` if any extent is 0.
    pub fn new(rows: usize, cols: usize, slices: usize) -> Result<Self> {
        Self::new_with_value(rows, cols, slices, T::default())
    }

    /// Create a zeroed volume with the same shape as `self`
    pub fn create_template(&self) -> Volume<T> {
        Volume {
            shape: self.shape,
            data: vec![T::default(); self.data.len()],
        }
    }
}

impl<T: Copy + Into<f64>> Volume<T> {
    /// Convert voxel values to `f64`.
    pub fn to_f64(&self) -> Volume<f64> {
        self.map(|&v| v.into())
    }
}

// ============================================================================
// Scalar volumes
// ============================================================================

impl Volume<f64> {
    /// Voxel-wise absolute value
    pub fn abs(&self) -> Volume<f64> {
        self.map(|v| v.abs())
    }

    /// Add `other` into `self` voxel by voxel.
    pub fn add_assign(&mut self, other: &Volume<f64>) -> Result<()> {
        self.check_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += b;
        }
        Ok(())
    }

    /// Keep the voxel-wise maximum of `self` and `other`.
    pub fn max_assign(&mut self, other: &Volume<f64>) -> Result<()> {
        self.check_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a = a.max(*b);
        }
        Ok(())
    }

    /// Multiply every voxel by a constant
    pub fn mul_constant(&mut self, value: f64) {
        for v in &mut self.data {
            *v *= value;
        }
    }

    /// Minimum voxel value
    pub fn min_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Maximum voxel value
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Mean voxel value
    pub fn mean(&self) -> f64 {
        self.sum() / self.data.len() as f64
    }

    /// Sum of all voxel values
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

// ============================================================================
// Masks
// ============================================================================

impl Volume<bool> {
    /// Number of foreground voxels
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// True if no voxel is set
    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Sorted indices of slices that contain at least one foreground voxel.
    pub fn foreground_slices(&self) -> Vec<usize> {
        (0..self.shape.slices)
            .filter(|&s| self.plane(s).iter().any(|&v| v))
            .collect()
    }
}
