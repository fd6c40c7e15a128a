//! Grid - physical coordinates of a volume
//!
//! A grid carries one coordinate vector per axis and the voxel spacing.
//! The vectors are named after physical directions, not array axes:
//! `y` has one entry per row, `x` one per column and `z` one per slice.
//! Spacing is stored in the same units as the coordinates (cm for scans).

use crate::error::{Error, Result};
use crate::shape::{Axis, Shape};
use crate::volume::crop::CropWindow;

/// Coordinate vectors and voxel spacing of a volume
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    /// Spacing along `(rows, cols, slices)`
    spacing: [f64; 3],
}

impl Grid {
    /// Create a grid from coordinate vectors.
    ///
    /// # Arguments
    ///
    /// * `x` - Column coordinates
    /// * `y` - Row coordinates
    /// * `z` - Slice coordinates
    /// * `spacing` - Voxel spacing along `(rows, cols, slices)`
    ///
    /// # Errors
    ///
    /// Returns an error if a vector is empty or not strictly monotonic.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, spacing: [f64; 3]) -> Result<Self> {
        for (name, v) in [("x", &x), ("y", &y), ("z", &z)] {
            check_monotonic(name, v)?;
        }
        Ok(Self { x, y, z, spacing })
    }

    /// Evenly spaced grid starting at `origin` (`(x0, y0, z0)`).
    pub fn uniform(shape: Shape, spacing: [f64; 3], origin: [f64; 3]) -> Result<Self> {
        if spacing.iter().any(|&d| !(d.is_finite() && d > 0.0)) {
            return Err(Error::InvalidParameter(format!(
                "grid spacing must be positive: {spacing:?}"
            )));
        }
        let axis = |n: usize, start: f64, step: f64| -> Vec<f64> {
            (0..n).map(|i| start + i as f64 * step).collect()
        };
        Self::new(
            axis(shape.cols, origin[0], spacing[1]),
            axis(shape.rows, origin[1], spacing[0]),
            axis(shape.slices, origin[2], spacing[2]),
            spacing,
        )
    }

    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[inline]
    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Voxel spacing along `(rows, cols, slices)`
    #[inline]
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// Spacing converted from cm to mm
    pub fn voxel_size_mm(&self) -> [f64; 3] {
        self.spacing.map(|d| d * 10.0)
    }

    /// Coordinate vector running along `axis`.
    pub fn along(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::Row => &self.y,
            Axis::Column => &self.x,
            Axis::Slice => &self.z,
        }
    }

    /// Number of coordinates along each array axis
    pub fn shape(&self) -> Shape {
        Shape::new(self.y.len(), self.x.len(), self.z.len())
    }

    /// Fail unless the vectors match an array of `shape` one-to-one.
    ///
    /// # Errors
    ///
    /// Returns `Error::GridMismatch` naming the first inconsistent axis.
    pub fn check_shape(&self, shape: Shape) -> Result<()> {
        for axis in Axis::ALL {
            let coords = self.along(axis).len();
            let len = shape.len(axis);
            if coords != len {
                return Err(Error::GridMismatch { axis, coords, len });
            }
        }
        Ok(())
    }

    /// Apply a crop window to the coordinate vectors.
    ///
    /// Rows crop `y`, columns crop `x` and slices crop `z`.
    pub fn crop(&self, window: &CropWindow) -> Result<Grid> {
        Ok(Grid {
            x: window.cols.apply(Axis::Column, &self.x)?,
            y: window.rows.apply(Axis::Row, &self.y)?,
            z: window.slices.apply(Axis::Slice, &self.z)?,
            spacing: self.spacing,
        })
    }

    /// Select a sub-range of indices along each axis.
    ///
    /// Indices outside the vectors are extrapolated with the grid spacing, so
    /// a padded region gets coordinates continuing the original ones.
    pub fn resample_indices(&self, start: [isize; 3], shape: Shape) -> Result<Grid> {
        let pick = |v: &[f64], step: f64, first: isize, n: usize| -> Vec<f64> {
            let descending = v.len() > 1 && v[1] < v[0];
            let sign = if descending { -1.0 } else { 1.0 };
            (0..n as isize)
                .map(|i| {
                    let idx = first + i;
                    if (0..v.len() as isize).contains(&idx) {
                        v[idx as usize]
                    } else if idx < 0 {
                        v[0] + sign * step * idx as f64
                    } else {
                        let last = v.len() - 1;
                        v[last] + sign * step * (idx - last as isize) as f64
                    }
                })
                .collect()
        };
        Grid::new(
            pick(&self.x, self.spacing[1], start[1], shape.cols),
            pick(&self.y, self.spacing[0], start[0], shape.rows),
            pick(&self.z, self.spacing[2], start[2], shape.slices),
            self.spacing,
        )
    }
}

fn check_monotonic(name: &str, v: &[f64]) -> Result<()> {
    if v.is_empty() {
        return Err(Error::InvalidParameter(format!("coordinate vector {name} is empty")));
    }
    let increasing = v.windows(2).all(|w| w[1] > w[0]);
    let decreasing = v.windows(2).all(|w| w[1] < w[0]);
    if !(increasing || decreasing) {
        return Err(Error::InvalidParameter(format!(
            "coordinate vector {name} is not strictly monotonic"
        )));
    }
    Ok(())
}
