//! Crop-back windows
//!
//! A [`CropWindow`] holds one [`AxisCrop`] per axis: how many voxels to
//! drop from the low and high end. The same window is applied to a volume
//! and to the coordinate vector running along each axis, so the two stay
//! the same length.
//!
//! Two constructions cover the padding policies:
//!
//! - [`CropWindow::fixed`] removes the configured size on both sides.
//! - [`CropWindow::clamped`] removes the configured size, but never more
//!   than the margin between a bounding box and the array boundary.

use std::ops::Range;

use super::Volume;
use crate::bbox::BoundingBox;
use crate::error::{Error, Result};
use crate::shape::{Axis, Shape};

/// Voxels removed from the low and high end of one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AxisCrop {
    pub low: usize,
    pub high: usize,
}

impl AxisCrop {
    /// Removes nothing
    pub const NONE: AxisCrop = AxisCrop { low: 0, high: 0 };

    pub const fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    /// Removes `n` voxels from each end
    pub const fn symmetric(n: usize) -> Self {
        Self { low: n, high: n }
    }

    /// Removes `pad` from each end, limited by the available margin there.
    pub fn clamped(pad: usize, margin_low: usize, margin_high: usize) -> Self {
        Self {
            low: pad.min(margin_low),
            high: pad.min(margin_high),
        }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// Index range kept from an axis of length `len`.
    ///
    /// # Errors
    ///
    /// Returns `Error::CropOutOfRange` if nothing would remain.
    pub fn kept(&self, axis: Axis, len: usize) -> Result<Range<usize>> {
        match self.low.checked_add(self.high) {
            Some(total) if total < len => Ok(self.low..len - self.high),
            _ => Err(Error::CropOutOfRange {
                axis,
                len,
                low: self.low,
                high: self.high,
            }),
        }
    }

    /// Crop a coordinate vector running along `axis`.
    pub fn apply<T: Clone>(&self, axis: Axis, values: &[T]) -> Result<Vec<T>> {
        let range = self.kept(axis, values.len())?;
        Ok(values[range].to_vec())
    }
}

/// Per-axis crop applied during crop-back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CropWindow {
    pub rows: AxisCrop,
    pub cols: AxisCrop,
    pub slices: AxisCrop,
}

impl CropWindow {
    /// Removes nothing on any axis
    pub const IDENTITY: CropWindow = CropWindow {
        rows: AxisCrop::NONE,
        cols: AxisCrop::NONE,
        slices: AxisCrop::NONE,
    };

    pub const fn new(rows: AxisCrop, cols: AxisCrop, slices: AxisCrop) -> Self {
        Self { rows, cols, slices }
    }

    /// Removes `size[axis]` from both ends of every axis.
    pub const fn fixed(size: [usize; 3]) -> Self {
        Self {
            rows: AxisCrop::symmetric(size[0]),
            cols: AxisCrop::symmetric(size[1]),
            slices: AxisCrop::symmetric(size[2]),
        }
    }

    /// Removes `size[axis]` from both ends of every axis, clamped to the
    /// margin between `bbox` and the boundary of an array of `shape`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bbox` does not fit inside `shape`.
    pub fn clamped(size: [usize; 3], bbox: &BoundingBox, shape: Shape) -> Result<Self> {
        let mut crops = [AxisCrop::NONE; 3];
        for axis in Axis::ALL {
            let (low, high) = bbox.margins(axis, shape)?;
            crops[axis.index()] = AxisCrop::clamped(size[axis.index()], low, high);
        }
        Ok(Self::new(crops[0], crops[1], crops[2]))
    }

    /// Build from `(row_low, row_high, col_low, col_high, slice_low, slice_high)`.
    pub const fn from_vector(v: [usize; 6]) -> Self {
        Self {
            rows: AxisCrop::new(v[0], v[1]),
            cols: AxisCrop::new(v[2], v[3]),
            slices: AxisCrop::new(v[4], v[5]),
        }
    }

    /// The six-element removal vector
    pub fn to_vector(&self) -> [usize; 6] {
        [
            self.rows.low,
            self.rows.high,
            self.cols.low,
            self.cols.high,
            self.slices.low,
            self.slices.high,
        ]
    }

    #[inline]
    pub fn axis(&self, axis: Axis) -> AxisCrop {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
            Axis::Slice => self.slices,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.rows.is_identity() && self.cols.is_identity() && self.slices.is_identity()
    }

    /// Shape left after cropping an array of `shape`.
    pub fn cropped_shape(&self, shape: Shape) -> Result<Shape> {
        let rows = self.rows.kept(Axis::Row, shape.rows)?;
        let cols = self.cols.kept(Axis::Column, shape.cols)?;
        let slices = self.slices.kept(Axis::Slice, shape.slices)?;
        Ok(Shape::new(rows.len(), cols.len(), slices.len()))
    }
}

impl<T: Clone> Volume<T> {
    /// Remove the voxels selected by `window` from each end of each axis.
    ///
    /// # Errors
    ///
    /// Returns `Error::CropOutOfRange` if an axis would be left empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use radtex_core::{CropWindow, Volume};
    ///
    /// let vol = Volume::<f64>::new(10, 8, 6).unwrap();
    /// let cropped = vol.crop(&CropWindow::fixed([2, 1, 0])).unwrap();
    /// assert_eq!(cropped.shape().as_array(), [6, 6, 6]);
    /// ```
    pub fn crop(&self, window: &CropWindow) -> Result<Volume<T>> {
        if window.is_identity() {
            return Ok(self.clone());
        }
        let shape = self.shape();
        let rows = window.rows.kept(Axis::Row, shape.rows)?;
        let cols = window.cols.kept(Axis::Column, shape.cols)?;
        let slices = window.slices.kept(Axis::Slice, shape.slices)?;
        self.copy_ranges(rows, cols, slices)
    }

    /// Copy out the voxels inside `bbox`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bbox` reaches outside the volume.
    pub fn extract(&self, bbox: &BoundingBox) -> Result<Volume<T>> {
        let shape = self.shape();
        if bbox.max_row >= shape.rows
            || bbox.max_col >= shape.cols
            || bbox.max_slice >= shape.slices
        {
            return Err(Error::IndexOutOfBounds {
                row: bbox.max_row,
                col: bbox.max_col,
                slice: bbox.max_slice,
                shape,
            });
        }
        self.copy_ranges(
            bbox.min_row..bbox.max_row + 1,
            bbox.min_col..bbox.max_col + 1,
            bbox.min_slice..bbox.max_slice + 1,
        )
    }

    fn copy_ranges(
        &self,
        rows: Range<usize>,
        cols: Range<usize>,
        slices: Range<usize>,
    ) -> Result<Volume<T>> {
        let (nr, nc, ns) = (rows.len(), cols.len(), slices.len());
        let mut data = Vec::with_capacity(nr * nc * ns);
        for s in slices {
            for r in rows.clone() {
                let start = self.offset(r, cols.start, s);
                data.extend_from_slice(&self.data()[start..start + nc]);
            }
        }
        Volume::from_data(nr, nc, ns, data)
    }
}
