//! Laplacian of Gaussian
//!
//! Built from separable pieces: for every active axis `i`, the second
//! derivative of a Gaussian along `i` times plain Gaussians along the other
//! active axes. Axes with a zero sigma take no part, which turns the filter
//! into a 2D (or 1D) LoG.

use log::debug;
use radtex_core::{Axis, BorderMode, Volume};

use crate::convolve::convolve_separable;
use crate::kernel::Kernel1d;
use crate::{FilterError, FilterResult};

/// Parameters of the LoG filter, all in physical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogParams {
    /// Gaussian sigma per axis in mm `(rows, cols, slices)`
    pub sigma_mm: [f64; 3],
    /// Kernel half-width per axis in mm
    pub cutoff_mm: [f64; 3],
    /// Voxel size per axis in mm
    pub voxel_size_mm: [f64; 3],
    pub border: BorderMode,
}

/// Apply the Laplacian of Gaussian.
///
/// # Errors
///
/// Returns `FilterError::InvalidParameters` if a voxel size is not
/// positive, a sigma or cutoff is negative, or every sigma is zero.
pub fn log_filter(image: &Volume<f64>, params: &LogParams) -> FilterResult<Volume<f64>> {
    let mut smooth: [Option<Kernel1d>; 3] = [None, None, None];
    let mut second: [Option<Kernel1d>; 3] = [None, None, None];

    for axis in Axis::ALL {
        let i = axis.index();
        let voxel = params.voxel_size_mm[i];
        let (sigma_mm, cutoff_mm) = (params.sigma_mm[i], params.cutoff_mm[i]);
        if !(voxel.is_finite() && voxel > 0.0) {
            return Err(FilterError::InvalidParameters(format!(
                "voxel size along {axis} must be positive, got {voxel}"
            )));
        }
        if sigma_mm < 0.0 || cutoff_mm < 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "sigma and cutoff along {axis} must not be negative"
            )));
        }
        if sigma_mm == 0.0 {
            continue;
        }
        let sigma = sigma_mm / voxel;
        let half = (cutoff_mm / voxel).ceil() as usize;
        let taps = 2 * half + 1;
        debug!("LoG along {axis}: sigma {sigma:.3} voxels, {taps} taps");
        smooth[i] = Some(Kernel1d::gaussian(sigma, half)?);
        second[i] = Some(Kernel1d::gaussian_second_derivative(sigma, half)?);
    }

    let mut out: Option<Volume<f64>> = None;
    for axis in Axis::ALL {
        let i = axis.index();
        let Some(d2) = second[i].as_ref() else {
            continue;
        };
        let mut kernels: [Option<&Kernel1d>; 3] =
            [smooth[0].as_ref(), smooth[1].as_ref(), smooth[2].as_ref()];
        kernels[i] = Some(d2);
        let term = convolve_separable(image, kernels, params.border);
        match out.as_mut() {
            Some(acc) => acc.add_assign(&term)?,
            None => out = Some(term),
        }
    }

    out.ok_or_else(|| {
        FilterError::InvalidParameters("LoG needs at least one non-zero sigma".into())
    })
}
