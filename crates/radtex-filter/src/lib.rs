//! radtex-filter - Texture filter kernels
//!
//! This crate provides the filters used to build texture maps:
//!
//! - Separable and planar convolution with configurable borders
//! - Mean (block) filter
//! - Sobel edge magnitude and direction
//! - Laplacian of Gaussian
//! - Gabor filters in 2D and across the three orthogonal planes
//! - Laws filters, their energy maps and rotation-invariant variants
//!
//! The [`TextureKernels`] trait groups all filters behind one interface.

pub mod aggregate;
pub mod bank;
pub mod block_conv;
pub mod convolve;
pub mod edge;
mod error;
pub mod gabor;
pub mod kernel;
pub mod laplacian;
pub mod laws;

pub use error::{FilterError, FilterResult};
pub use kernel::{Kernel, Kernel1d};

// Re-export commonly used items
pub use aggregate::Aggregation;
pub use bank::{NamedVolumes, StandardKernels, TextureKernels};
pub use block_conv::{MeanParams, mean_filter};
pub use convolve::{Plane, convolve_axis, convolve_plane, convolve_separable};
pub use edge::{SobelResponse, sobel_filter};
pub use gabor::{Gabor3dParams, GaborParams, gabor_filter, gabor_filter_3d};
pub use laplacian::{LogParams, log_filter};
pub use laws::{
    EnergyParams, LawsCombination, LawsDirection, LawsKernel, LawsParams, LawsType,
    RotationInvariance, energy_map, laws_energy, laws_filter, rotation_invariant_laws,
    rotation_invariant_laws_energy,
};
