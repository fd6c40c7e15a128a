//! Synthetic volumes for regression tests
//!
//! Deterministic stand-ins for scan data: intensity ramps, a patterned
//! texture, and spherical or box-shaped masks.

use radtex_core::{BoundingBox, Grid, Mask, Shape, Volume};

use crate::error::{TestError, TestResult};

fn build<T: Clone>(
    name: &'static str,
    shape: Shape,
    f: impl FnMut(usize, usize, usize) -> T,
) -> TestResult<Volume<T>> {
    Volume::from_fn(shape, f).map_err(|e| TestError::Phantom {
        name,
        message: e.to_string(),
    })
}

/// Linear ramp `r + 10*c + 100*s`; every voxel value encodes its index.
pub fn ramp(shape: Shape) -> TestResult<Volume<f64>> {
    build("ramp", shape, |r, c, s| (r + 10 * c + 100 * s) as f64)
}

/// Constant volume
pub fn constant(shape: Shape, value: f64) -> TestResult<Volume<f64>> {
    build("constant", shape, |_, _, _| value)
}

/// Patterned texture with stripes along rows and a checker along slices.
pub fn texture(shape: Shape) -> TestResult<Volume<f64>> {
    build("texture", shape, |r, c, s| {
        let stripe = if (r / 2) % 2 == 0 { 40.0 } else { -40.0 };
        let checker = if (c + s) % 2 == 0 { 15.0 } else { 0.0 };
        let hash = ((r * 7919 + c * 104_729 + s * 1_299_709) % 97) as f64;
        100.0 + stripe + checker + hash * 0.5
    })
}

/// Ball of radius `radius` (voxels) around `center`.
pub fn sphere_mask(shape: Shape, center: [f64; 3], radius: f64) -> TestResult<Mask> {
    build("sphere", shape, |r, c, s| {
        let dr = r as f64 - center[0];
        let dc = c as f64 - center[1];
        let ds = s as f64 - center[2];
        dr * dr + dc * dc + ds * ds <= radius * radius
    })
}

/// Mask set exactly inside `bbox`.
pub fn box_mask(shape: Shape, bbox: BoundingBox) -> TestResult<Mask> {
    build("box", shape, |r, c, s| bbox.contains(r, c, s))
}

/// Grid with 1 mm in-plane and 2 mm slice spacing (in cm), starting at 0.
pub fn grid(shape: Shape) -> TestResult<Grid> {
    Grid::uniform(shape, [0.1, 0.1, 0.2], [0.0, 0.0, 0.0]).map_err(|e| TestError::Phantom {
        name: "grid",
        message: e.to_string(),
    })
}
