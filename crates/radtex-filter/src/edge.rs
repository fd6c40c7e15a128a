//! Edge detection
//!
//! Sobel gradients computed in every axial plane.

use radtex_core::{BorderMode, Volume};

use crate::FilterResult;
use crate::convolve::{Plane, convolve_plane};
use crate::kernel::Kernel;

/// Sobel gradient magnitude and direction
#[derive(Debug, Clone, PartialEq)]
pub struct SobelResponse {
    /// `sqrt(gx^2 + gy^2)`
    pub magnitude: Volume<f64>,
    /// `atan2(gy, gx)` in degrees, `-180..=180`
    pub direction: Volume<f64>,
}

/// Apply the Sobel operator to every axial slice.
///
/// `gx` responds to changes along columns and `gy` to changes along rows.
pub fn sobel_filter(image: &Volume<f64>, border: BorderMode) -> FilterResult<SobelResponse> {
    let gx = convolve_plane(image, &Kernel::sobel_horizontal(), Plane::Axial, border);
    let gy = convolve_plane(image, &Kernel::sobel_vertical(), Plane::Axial, border);
    Ok(SobelResponse {
        magnitude: gx.zip_map(&gy, |x, y| x.hypot(*y))?,
        direction: gx.zip_map(&gy, |x, y| y.atan2(*x).to_degrees())?,
    })
}
