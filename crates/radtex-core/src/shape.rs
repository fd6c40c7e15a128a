//! Axes and extents of 3D volumes
//!
//! Volumes are indexed `(row, column, slice)`. Coordinate vectors follow a
//! different naming: `y` runs along rows, `x` along columns and `z` along
//! slices. [`Axis`] keeps that mapping in one place.

use std::fmt;

/// One of the three array axes of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First array index; physical `y`
    Row,
    /// Second array index; physical `x`
    Column,
    /// Third array index; physical `z`
    Slice,
}

impl Axis {
    /// All axes in array order.
    pub const ALL: [Axis; 3] = [Axis::Row, Axis::Column, Axis::Slice];

    /// Position of this axis in `(row, column, slice)` order.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::Row => 0,
            Axis::Column => 1,
            Axis::Slice => 2,
        }
    }

    /// Name of the coordinate vector that runs along this axis.
    pub fn coordinate_name(self) -> &'static str {
        match self {
            Axis::Row => "y",
            Axis::Column => "x",
            Axis::Slice => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Row => "rows",
            Axis::Column => "columns",
            Axis::Slice => "slices",
        };
        f.write_str(name)
    }
}

/// Extent of a volume along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
    pub slices: usize,
}

impl Shape {
    pub const fn new(rows: usize, cols: usize, slices: usize) -> Self {
        Self { rows, cols, slices }
    }

    /// Extent along `axis`.
    #[inline]
    pub fn len(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
            Axis::Slice => self.slices,
        }
    }

    /// Total number of voxels
    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.rows * self.cols * self.slices
    }

    /// True when any axis has zero extent
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.cols == 0 || self.slices == 0
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.rows, self.cols, self.slices]
    }
}

impl From<[usize; 3]> for Shape {
    fn from(v: [usize; 3]) -> Self {
        Shape::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.rows, self.cols, self.slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_coordinate_names() {
        assert_eq!(Axis::Row.coordinate_name(), "y");
        assert_eq!(Axis::Column.coordinate_name(), "x");
        assert_eq!(Axis::Slice.coordinate_name(), "z");
    }

    #[test]
    fn test_shape_len() {
        let s = Shape::new(4, 5, 6);
        assert_eq!(s.len(Axis::Row), 4);
        assert_eq!(s.len(Axis::Column), 5);
        assert_eq!(s.len(Axis::Slice), 6);
        assert_eq!(s.voxel_count(), 120);
        assert_eq!(s.to_string(), "4x5x6");
        assert!(!s.is_degenerate());
        assert!(Shape::new(4, 0, 6).is_degenerate());
    }
}
