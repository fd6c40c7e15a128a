//! BoundingBox - inclusive 3D index ranges
//!
//! A bounding box records, for each axis, the first and last index holding
//! a foreground voxel of a mask. Unlike a 2D `x/y/w/h` rectangle, both ends
//! are inclusive, which matches how padding margins are measured.

use crate::error::{Error, Result};
use crate::shape::{Axis, Shape};
use crate::volume::Mask;

/// Inclusive index range `(min, max)` along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_row: usize,
    pub max_row: usize,
    pub min_col: usize,
    pub max_col: usize,
    pub min_slice: usize,
    pub max_slice: usize,
}

impl BoundingBox {
    /// Create a new bounding box
    ///
    /// # Errors
    ///
    /// Returns an error if any `min` exceeds its `max`.
    pub fn new(
        (min_row, max_row): (usize, usize),
        (min_col, max_col): (usize, usize),
        (min_slice, max_slice): (usize, usize),
    ) -> Result<Self> {
        if min_row > max_row || min_col > max_col || min_slice > max_slice {
            return Err(Error::InvalidParameter(format!(
                "bounding box ranges must be ordered: rows {min_row}..={max_row}, \
                 cols {min_col}..={max_col}, slices {min_slice}..={max_slice}"
            )));
        }
        Ok(Self {
            min_row,
            max_row,
            min_col,
            max_col,
            min_slice,
            max_slice,
        })
    }

    /// Smallest box containing every foreground voxel of `mask`.
    ///
    /// Returns `None` for a blank mask.
    pub fn of_mask(mask: &Mask) -> Option<Self> {
        let shape = mask.shape();
        let mut bbox: Option<BoundingBox> = None;
        for s in 0..shape.slices {
            let plane = mask.plane(s);
            for r in 0..shape.rows {
                let row = &plane[r * shape.cols..(r + 1) * shape.cols];
                let Some(first) = row.iter().position(|&v| v) else {
                    continue;
                };
                // position() found a set voxel, so rposition() does too
                let last = row.iter().rposition(|&v| v).unwrap_or(first);
                bbox = Some(match bbox {
                    None => BoundingBox {
                        min_row: r,
                        max_row: r,
                        min_col: first,
                        max_col: last,
                        min_slice: s,
                        max_slice: s,
                    },
                    Some(b) => BoundingBox {
                        min_row: b.min_row.min(r),
                        max_row: b.max_row.max(r),
                        min_col: b.min_col.min(first),
                        max_col: b.max_col.max(last),
                        min_slice: b.min_slice.min(s),
                        max_slice: b.max_slice.max(s),
                    },
                });
            }
        }
        bbox
    }

    /// `(min, max)` along `axis`
    #[inline]
    pub fn range(&self, axis: Axis) -> (usize, usize) {
        match axis {
            Axis::Row => (self.min_row, self.max_row),
            Axis::Column => (self.min_col, self.max_col),
            Axis::Slice => (self.min_slice, self.max_slice),
        }
    }

    /// `(minr, maxr, minc, maxc, mins, maxs)`
    pub fn as_array(&self) -> [usize; 6] {
        [
            self.min_row,
            self.max_row,
            self.min_col,
            self.max_col,
            self.min_slice,
            self.max_slice,
        ]
    }

    /// Extent of the box along each axis
    pub fn shape(&self) -> Shape {
        Shape::new(
            self.max_row - self.min_row + 1,
            self.max_col - self.min_col + 1,
            self.max_slice - self.min_slice + 1,
        )
    }

    /// Check if a voxel index is inside the box
    #[inline]
    pub fn contains(&self, row: usize, col: usize, slice: usize) -> bool {
        (self.min_row..=self.max_row).contains(&row)
            && (self.min_col..=self.max_col).contains(&col)
            && (self.min_slice..=self.max_slice).contains(&slice)
    }

    /// Number of voxels between the box and the array boundary along `axis`,
    /// as `(low, high)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the box reaches outside `shape`.
    pub fn margins(&self, axis: Axis, shape: Shape) -> Result<(usize, usize)> {
        let (min, max) = self.range(axis);
        let len = shape.len(axis);
        if max >= len {
            return Err(Error::InvalidParameter(format!(
                "bounding box {min}..={max} exceeds {len} {axis}"
            )));
        }
        Ok((min, len - 1 - max))
    }

    /// Grow the box by up to `pad` voxels per side, clipped to `shape`.
    pub fn expand_within(&self, pad: [usize; 3], shape: Shape) -> BoundingBox {
        let grow = |min: usize, max: usize, p: usize, len: usize| {
            (min.saturating_sub(p), (max + p).min(len.saturating_sub(1)))
        };
        let (min_row, max_row) = grow(self.min_row, self.max_row, pad[0], shape.rows);
        let (min_col, max_col) = grow(self.min_col, self.max_col, pad[1], shape.cols);
        let (min_slice, max_slice) = grow(self.min_slice, self.max_slice, pad[2], shape.slices);
        BoundingBox {
            min_row,
            max_row,
            min_col,
            max_col,
            min_slice,
            max_slice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(points: &[(usize, usize, usize)]) -> Mask {
        let mut m = Mask::new(6, 7, 5).unwrap();
        for &(r, c, s) in points {
            m.set(r, c, s, true).unwrap();
        }
        m
    }

    #[test]
    fn test_bbox_of_mask() {
        let m = mask_with(&[(2, 3, 1), (4, 1, 3), (3, 5, 2)]);
        let b = BoundingBox::of_mask(&m).unwrap();
        assert_eq!(b.as_array(), [2, 4, 1, 5, 1, 3]);
        assert_eq!(b.shape(), Shape::new(3, 5, 3));
        assert!(b.contains(3, 3, 2));
        assert!(!b.contains(5, 3, 2));
    }

    #[test]
    fn test_bbox_of_blank_mask() {
        let m = Mask::new(3, 3, 3).unwrap();
        assert!(BoundingBox::of_mask(&m).is_none());
    }

    #[test]
    fn test_bbox_margins() {
        let b = BoundingBox::new((2, 4), (0, 6), (1, 1)).unwrap();
        let shape = Shape::new(6, 7, 5);
        assert_eq!(b.margins(Axis::Row, shape).unwrap(), (2, 1));
        assert_eq!(b.margins(Axis::Column, shape).unwrap(), (0, 0));
        assert_eq!(b.margins(Axis::Slice, shape).unwrap(), (1, 3));
        assert!(b.margins(Axis::Row, Shape::new(4, 7, 5)).is_err());
    }

    #[test]
    fn test_bbox_expand_within() {
        let b = BoundingBox::new((2, 4), (0, 6), (1, 1)).unwrap();
        let e = b.expand_within([3, 1, 1], Shape::new(6, 7, 5));
        assert_eq!(e.as_array(), [0, 5, 0, 6, 0, 2]);
    }

    #[test]
    fn test_bbox_invalid() {
        assert!(BoundingBox::new((3, 2), (0, 0), (0, 0)).is_err());
    }
}
