//! radtex core - basic data structures for texture-map generation
//!
//! This crate provides the fundamental data structures used throughout the
//! radtex workspace:
//!
//! - [`Volume`] / [`Mask`] - 3D voxel arrays indexed `(row, column, slice)`
//! - [`Grid`] - Coordinate vectors (`x`, `y`, `z`) and voxel spacing
//! - [`BoundingBox`] - Inclusive index ranges of a mask's foreground
//! - [`CropWindow`] / [`AxisCrop`] - Per-axis padding removal
//! - [`BorderMode`] - Boundary rules for padding and convolution

pub mod bbox;
pub mod error;
pub mod grid;
pub mod shape;
pub mod volume;

pub use bbox::BoundingBox;
pub use error::{Error, Result};
pub use grid::Grid;
pub use shape::{Axis, Shape};
pub use volume::border::BorderMode;
pub use volume::crop::{AxisCrop, CropWindow};
pub use volume::{Mask, Volume};
