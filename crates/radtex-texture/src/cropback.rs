//! Crop-back of filter outputs
//!
//! Removes the padding window from a filter response, the processed mask
//! and the coordinate vectors together so the three stay aligned: rows crop
//! `y`, columns crop `x`, slices crop `z`.

use log::{debug, warn};
use radtex_core::{CropWindow, Grid, Mask, Volume};

use crate::error::{TextureError, TextureResult};

/// A filter response realigned with the unpadded region
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedMap {
    pub volume: Volume<f64>,
    pub mask: Mask,
    pub grid: Grid,
    /// Slices of the cropped mask with foreground voxels (may be empty)
    pub foreground_slices: Vec<usize>,
}

/// Apply `window` to a filter output and its mask and grid.
///
/// # Errors
///
/// Returns `TextureError::Geometry` when the output, mask and grid disagree
/// in shape or when the window would leave an axis empty.
pub fn crop_back(
    output: &Volume<f64>,
    mask: &Mask,
    grid: &Grid,
    window: &CropWindow,
) -> TextureResult<CroppedMap> {
    let shape = output.shape();
    if mask.shape() != shape {
        return Err(TextureError::Geometry(format!(
            "filter output is {shape} but the processed mask is {}",
            mask.shape()
        )));
    }
    grid.check_shape(shape)
        .map_err(|e| TextureError::Geometry(e.to_string()))?;
    let cropped_shape = window
        .cropped_shape(shape)
        .map_err(|e| TextureError::Geometry(e.to_string()))?;

    let volume = output.crop(window)?;
    let mask = mask.crop(window)?;
    let grid = grid.crop(window)?;
    let foreground_slices = mask.foreground_slices();
    debug!(
        "crop-back {:?}: {shape} -> {cropped_shape}",
        window.to_vector()
    );
    if foreground_slices.is_empty() {
        warn!("cropped mask has no foreground voxels; registering with no foreground slices");
    }

    Ok(CroppedMap {
        volume,
        mask,
        grid,
        foreground_slices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use radtex_core::{Axis, AxisCrop, Shape};

    fn setup() -> (Volume<f64>, Mask, Grid) {
        let shape = Shape::new(6, 8, 4);
        let vol = Volume::from_fn(shape, |r, c, s| (r + 10 * c + 100 * s) as f64).unwrap();
        let mask = Mask::from_fn(shape, |r, c, s| (2..4).contains(&r) && c == 3 && s == 1).unwrap();
        let grid = Grid::uniform(shape, [0.1, 0.2, 0.3], [0.0, 0.0, 0.0]).unwrap();
        (vol, mask, grid)
    }

    #[test]
    fn test_identity_window() {
        let (vol, mask, grid) = setup();
        let out = crop_back(&vol, &mask, &grid, &CropWindow::IDENTITY).unwrap();
        assert_eq!(out.volume, vol);
        assert_eq!(out.grid, grid);
        assert_eq!(out.foreground_slices, vec![1]);
    }

    #[test]
    fn test_shapes_stay_consistent() {
        let (vol, mask, grid) = setup();
        let window = CropWindow::new(
            AxisCrop::new(1, 2),
            AxisCrop::new(0, 3),
            AxisCrop::new(1, 1),
        );
        let out = crop_back(&vol, &mask, &grid, &window).unwrap();
        assert_eq!(out.volume.shape(), Shape::new(3, 5, 2));
        for axis in Axis::ALL {
            assert_eq!(out.grid.along(axis).len(), out.volume.shape().len(axis));
        }
        // first kept voxel is (1, 0, 1) of the input
        assert_eq!(out.volume.get(0, 0, 0).unwrap(), 101.0);
        assert!((out.grid.y()[0] - grid.y()[1]).abs() < 1e-12);
        assert!((out.grid.z()[0] - grid.z()[1]).abs() < 1e-12);
        assert_eq!(out.foreground_slices, vec![0]);
    }

    #[test]
    fn test_empty_foreground_is_registered() {
        let (vol, mask, grid) = setup();
        // drop slice 1, the only foreground slice
        let window = CropWindow::new(AxisCrop::NONE, AxisCrop::NONE, AxisCrop::new(2, 0));
        let out = crop_back(&vol, &mask, &grid, &window).unwrap();
        assert!(out.foreground_slices.is_empty());
        assert_eq!(out.volume.slices(), 2);
    }

    #[test]
    fn test_geometry_errors() {
        let (vol, mask, grid) = setup();
        let window = CropWindow::fixed([3, 0, 0]);
        let err = crop_back(&vol, &mask, &grid, &window).unwrap_err();
        assert!(matches!(err, TextureError::Geometry(_)));

        let small = Mask::new(6, 8, 3).unwrap();
        let err = crop_back(&vol, &small, &grid, &CropWindow::IDENTITY).unwrap_err();
        assert!(matches!(err, TextureError::Geometry(_)));
    }
}
