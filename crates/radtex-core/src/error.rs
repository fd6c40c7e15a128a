//! Error types for radtex-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

use crate::shape::{Axis, Shape};

/// radtex-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid volume dimensions
    #[error("invalid volume dimensions: {rows}x{cols}x{slices}")]
    InvalidDimension {
        rows: usize,
        cols: usize,
        slices: usize,
    },

    /// Data length does not match the requested shape
    #[error("data length {len} doesn't match shape {shape} = {expected}")]
    DataLength {
        len: usize,
        shape: Shape,
        expected: usize,
    },

    /// Two volumes that must share a shape do not
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: Shape, actual: Shape },

    /// A coordinate vector disagrees with the array extent along its axis
    #[error("grid mismatch along {axis}: {coords} coordinates for {len} voxels")]
    GridMismatch {
        axis: Axis,
        coords: usize,
        len: usize,
    },

    /// A crop window removes the whole axis (or more)
    #[error("crop along {axis} removes {low}+{high} of {len} voxels")]
    CropOutOfRange {
        axis: Axis,
        len: usize,
        low: usize,
        high: usize,
    },

    /// Index out of bounds
    #[error("index ({row}, {col}, {slice}) out of bounds for shape {shape}")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        slice: usize,
        shape: Shape,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for radtex-core operations
pub type Result<T> = std::result::Result<T, Error>;
