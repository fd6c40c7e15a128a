//! Gabor filters
//!
//! A 2D Gabor kernel is a Gaussian envelope modulated by a complex
//! sinusoid. The filter response is the magnitude of the complex response,
//! computed per orientation in the axial plane ([`gabor_filter`]) or in the
//! axial, coronal and sagittal planes ([`gabor_filter_3d`]).
//!
//! All lengths are in voxels.

use std::f64::consts::PI;

use log::debug;
use radtex_core::{BorderMode, Volume};

use crate::aggregate::Aggregation;
use crate::convolve::{Plane, convolve_plane};
use crate::kernel::Kernel;
use crate::{FilterError, FilterResult};

/// Parameters of the 2D Gabor filter
#[derive(Debug, Clone, PartialEq)]
pub struct GaborParams {
    /// Envelope sigma in voxels
    pub sigma: f64,
    /// Wavelength of the carrier in voxels
    pub wavelength: f64,
    /// Spatial aspect ratio of the envelope
    pub gamma: f64,
    /// Orientations in degrees
    pub orientations: Vec<f64>,
    /// Combine the orientations into one map
    pub orientation_aggregation: Option<Aggregation>,
    /// Kernel half-widths `(vertical, horizontal)` in voxels
    pub radius: Option<[usize; 2]>,
    pub border: BorderMode,
}

/// Parameters of the 3D Gabor filter
#[derive(Debug, Clone, PartialEq)]
pub struct Gabor3dParams {
    pub gabor: GaborParams,
    /// How the three plane responses are combined
    pub plane_aggregation: Aggregation,
}

impl GaborParams {
    fn validate(&self) -> FilterResult<()> {
        for (name, v) in [
            ("sigma", self.sigma),
            ("wavelength", self.wavelength),
            ("spatial aspect ratio", self.gamma),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(FilterError::InvalidParameters(format!(
                    "gabor {name} must be positive, got {v}"
                )));
            }
        }
        if self.orientations.is_empty() {
            return Err(FilterError::InvalidParameters(
                "gabor needs at least one orientation".into(),
            ));
        }
        Ok(())
    }

    /// Kernel half-widths `(vertical, horizontal)`.
    ///
    /// Defaults to three envelope sigmas along the wider envelope axis.
    pub fn half_widths(&self) -> [usize; 2] {
        self.radius.unwrap_or_else(|| {
            let half = (3.0 * self.sigma * (1.0f64).max(1.0 / self.gamma)).ceil() as usize;
            [half, half]
        })
    }
}

/// Real and imaginary parts of a Gabor kernel at `theta_deg`.
pub fn gabor_kernels(params: &GaborParams, theta_deg: f64) -> (Kernel, Kernel) {
    let [half_y, half_x] = params.half_widths();
    let theta = theta_deg.to_radians();
    let (sin, cos) = theta.sin_cos();
    let s2 = 2.0 * params.sigma * params.sigma;
    let g2 = params.gamma * params.gamma;
    let k = 2.0 * PI / params.wavelength;

    let envelope_phase = |x: f64, y: f64| {
        let xr = x * cos + y * sin;
        let yr = -x * sin + y * cos;
        ((-(xr * xr + g2 * yr * yr) / s2).exp(), k * xr)
    };
    let re = Kernel::from_fn(half_x, half_y, |x, y| {
        let (env, phase) = envelope_phase(x, y);
        env * phase.cos()
    });
    let im = Kernel::from_fn(half_x, half_y, |x, y| {
        let (env, phase) = envelope_phase(x, y);
        env * phase.sin()
    });
    (re, im)
}

fn magnitude_response(
    image: &Volume<f64>,
    params: &GaborParams,
    theta_deg: f64,
    plane: Plane,
) -> FilterResult<Volume<f64>> {
    let (re, im) = gabor_kernels(params, theta_deg);
    let a = convolve_plane(image, &re, plane, params.border);
    let b = convolve_plane(image, &im, plane, params.border);
    Ok(a.zip_map(&b, |x, y| x.hypot(*y))?)
}

fn orientation_label(prefix: &str, theta: f64) -> String {
    format!("{prefix}_{theta}")
}

/// Apply the Gabor filter in every axial slice.
///
/// # Returns
///
/// `Gabor_<theta>` per orientation, or a single `Gabor_<avg|max>` when an
/// orientation aggregation is set.
pub fn gabor_filter(
    image: &Volume<f64>,
    params: &GaborParams,
) -> FilterResult<Vec<(String, Volume<f64>)>> {
    params.validate()?;
    debug!(
        "gabor: sigma {:.3}, wavelength {:.3}, kernel half-widths {:?}",
        params.sigma,
        params.wavelength,
        params.half_widths()
    );

    let mut responses = Vec::with_capacity(params.orientations.len());
    for &theta in &params.orientations {
        let r = magnitude_response(image, params, theta, Plane::Axial)?;
        responses.push((orientation_label("Gabor", theta), r));
    }

    match params.orientation_aggregation {
        None => Ok(responses),
        Some(agg) => {
            let combined = agg.combine(responses.into_iter().map(|(_, v)| v))?;
            Ok(vec![(format!("Gabor_{agg}"), combined)])
        }
    }
}

/// Apply the Gabor filter in the axial, coronal and sagittal planes.
///
/// For every orientation the three plane responses are combined with the
/// plane aggregation. Outputs are named like [`gabor_filter`]'s with a
/// `Gabor3d` prefix.
pub fn gabor_filter_3d(
    image: &Volume<f64>,
    params: &Gabor3dParams,
) -> FilterResult<Vec<(String, Volume<f64>)>> {
    let gabor = &params.gabor;
    gabor.validate()?;

    let mut responses = Vec::with_capacity(gabor.orientations.len());
    for &theta in &gabor.orientations {
        let per_plane = Plane::ALL
            .iter()
            .map(|&plane| magnitude_response(image, gabor, theta, plane))
            .collect::<FilterResult<Vec<_>>>()?;
        let combined = params.plane_aggregation.combine(per_plane)?;
        responses.push((orientation_label("Gabor3d", theta), combined));
    }

    match gabor.orientation_aggregation {
        None => Ok(responses),
        Some(agg) => {
            let combined = agg.combine(responses.into_iter().map(|(_, v)| v))?;
            Ok(vec![(format!("Gabor3d_{agg}"), combined)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radtex_core::Shape;

    fn params(orientations: Vec<f64>) -> GaborParams {
        GaborParams {
            sigma: 1.0,
            wavelength: 4.0,
            gamma: 1.0,
            orientations,
            orientation_aggregation: None,
            radius: None,
            border: BorderMode::Replicate,
        }
    }

    #[test]
    fn test_kernel_shape_and_symmetry() {
        let p = params(vec![0.0]);
        assert_eq!(p.half_widths(), [3, 3]);
        let (re, im) = gabor_kernels(&p, 0.0);
        assert_eq!((re.width(), re.height()), (7, 7));
        // real part is even, imaginary part odd
        assert!((re.get(2, 3).unwrap() - re.get(4, 3).unwrap()).abs() < 1e-12);
        assert!((im.get(2, 3).unwrap() + im.get(4, 3).unwrap()).abs() < 1e-12);

        let narrow = GaborParams {
            gamma: 0.5,
            radius: None,
            ..p.clone()
        };
        assert_eq!(narrow.half_widths(), [6, 6]);
        let fixed = GaborParams {
            radius: Some([2, 4]),
            ..p
        };
        let (re, _) = gabor_kernels(&fixed, 30.0);
        assert_eq!((re.width(), re.height()), (9, 5));
    }

    #[test]
    fn test_output_names() {
        let v = Volume::from_fn(Shape::new(8, 8, 2), |r, c, _| ((r * c) % 5) as f64).unwrap();
        let out = gabor_filter(&v, &params(vec![0.0, 45.0, 22.5])).unwrap();
        let names: Vec<_> = out.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Gabor_0", "Gabor_45", "Gabor_22.5"]);

        let mut p = params(vec![0.0, 90.0]);
        p.orientation_aggregation = Some(Aggregation::Average);
        let out = gabor_filter(&v, &p).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "Gabor_avg");
        assert_eq!(out[0].1.shape(), v.shape());
    }

    #[test]
    fn test_orientation_selectivity() {
        // stripes varying along columns with the carrier wavelength
        let v = Volume::from_fn(Shape::new(16, 16, 1), |_, c, _| {
            (2.0 * PI * c as f64 / 4.0).cos()
        })
        .unwrap();
        let out = gabor_filter(&v, &params(vec![0.0, 90.0])).unwrap();
        let along = out[0].1.get(8, 8, 0).unwrap();
        let across = out[1].1.get(8, 8, 0).unwrap();
        assert!(along > 3.0 * across);
    }

    #[test]
    fn test_gabor3d() {
        let v = Volume::from_fn(Shape::new(6, 6, 6), |r, c, s| (r + c + s) as f64).unwrap();
        let p = Gabor3dParams {
            gabor: GaborParams {
                orientation_aggregation: Some(Aggregation::Max),
                ..params(vec![0.0, 90.0])
            },
            plane_aggregation: Aggregation::Average,
        };
        let out = gabor_filter_3d(&v, &p).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].0, "Gabor3d_max");

        let p = Gabor3dParams {
            gabor: params(vec![45.0]),
            plane_aggregation: Aggregation::Max,
        };
        let out = gabor_filter_3d(&v, &p).unwrap();
        assert_eq!(out[0].0, "Gabor3d_45");
    }

    #[test]
    fn test_invalid_params() {
        let v = Volume::new_with_value(3, 3, 1, 1.0).unwrap();
        assert!(gabor_filter(&v, &params(vec![])).is_err());
        let p = GaborParams {
            wavelength: 0.0,
            ..params(vec![0.0])
        };
        assert!(gabor_filter(&v, &p).is_err());
    }
}
