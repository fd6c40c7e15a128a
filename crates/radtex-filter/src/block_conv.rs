//! Block (mean) convolution
//!
//! Local mean over a rectangular 3D neighbourhood, computed as three 1D box
//! passes.

use radtex_core::{BorderMode, Volume};

use crate::FilterResult;
use crate::convolve::convolve_separable;
use crate::kernel::Kernel1d;

/// Parameters of the mean filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanParams {
    /// Neighbourhood size `(rows, cols, slices)`, each odd
    pub kernel_size: [usize; 3],
    /// Average absolute values instead of signed values
    pub absolute: bool,
    /// Rule for voxels outside the volume
    pub border: BorderMode,
}

impl MeanParams {
    pub fn new(kernel_size: [usize; 3]) -> Self {
        Self {
            kernel_size,
            absolute: false,
            border: BorderMode::Replicate,
        }
    }
}

/// Local mean of `image` over a `kernel_size` box.
///
/// # Errors
///
/// Returns `FilterError::InvalidKernel` if a kernel size is even or zero.
pub fn mean_filter(image: &Volume<f64>, params: &MeanParams) -> FilterResult<Volume<f64>> {
    let [kr, kc, ks] = params.kernel_size;
    let kernels = [
        Kernel1d::box_kernel(kr)?,
        Kernel1d::box_kernel(kc)?,
        Kernel1d::box_kernel(ks)?,
    ];
    let source = if params.absolute {
        image.abs()
    } else {
        image.clone()
    };
    Ok(blockconv(&source, &kernels, params.border))
}

/// Box mean with prepared kernels; size-1 axes are skipped.
pub(crate) fn blockconv(
    image: &Volume<f64>,
    kernels: &[Kernel1d; 3],
    border: BorderMode,
) -> Volume<f64> {
    fn active(k: &Kernel1d) -> Option<&Kernel1d> {
        (k.len() > 1).then_some(k)
    }
    convolve_separable(
        image,
        [
            active(&kernels[0]),
            active(&kernels[1]),
            active(&kernels[2]),
        ],
        border,
    )
}
