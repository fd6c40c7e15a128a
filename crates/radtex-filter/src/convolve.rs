//! Convolution operations
//!
//! Implements volume correlation with 1D kernels along an axis and with 2D
//! kernels inside a family of parallel planes. Voxels outside the volume are
//! read through a [`BorderMode`].

use radtex_core::{Axis, BorderMode, Volume};

use crate::kernel::{Kernel, Kernel1d};

/// Family of parallel planes a 2D kernel is applied in.
///
/// Each plane has a vertical axis (kernel rows) and a horizontal axis
/// (kernel columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plane {
    /// Rows x columns, one plane per slice
    Axial,
    /// Slices x columns, one plane per row
    Coronal,
    /// Slices x rows, one plane per column
    Sagittal,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Axial, Plane::Coronal, Plane::Sagittal];

    /// `(vertical, horizontal)` axes of the plane
    pub fn axes(self) -> (Axis, Axis) {
        match self {
            Plane::Axial => (Axis::Row, Axis::Column),
            Plane::Coronal => (Axis::Slice, Axis::Column),
            Plane::Sagittal => (Axis::Slice, Axis::Row),
        }
    }
}

/// Correlate `vol` with `kernel` along `axis`.
///
/// Uses `border` to read voxels beyond the ends of the axis.
pub fn convolve_axis(
    vol: &Volume<f64>,
    kernel: &Kernel1d,
    axis: Axis,
    border: BorderMode,
) -> Volume<f64> {
    let shape = vol.shape();
    let len = shape.len(axis);
    let a = axis.index();
    let kc = kernel.center() as isize;
    let mut out = vol.create_template();

    for s in 0..shape.slices {
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                let mut idx = [r, c, s];
                let pos = idx[a] as isize;
                let mut sum = 0.0;
                for (j, &w) in kernel.data().iter().enumerate() {
                    if w == 0.0 {
                        continue;
                    }
                    let Some(src) = border.resolve(pos + j as isize - kc, len) else {
                        continue;
                    };
                    idx[a] = src;
                    sum += w * vol.get_unchecked(idx[0], idx[1], idx[2]);
                }
                out.set_unchecked(r, c, s, sum);
            }
        }
    }

    out
}

/// Apply up to one 1D kernel per axis, `kernels` in `(row, col, slice)`
/// order. Axes with `None` are left untouched.
pub fn convolve_separable(
    vol: &Volume<f64>,
    kernels: [Option<&Kernel1d>; 3],
    border: BorderMode,
) -> Volume<f64> {
    let mut out = vol.clone();
    for axis in Axis::ALL {
        if let Some(k) = kernels[axis.index()] {
            out = convolve_axis(&out, k, axis, border);
        }
    }
    out
}

/// Correlate every plane of `plane` orientation with a 2D kernel.
///
/// Kernel rows run along the plane's vertical axis and kernel columns along
/// its horizontal axis.
pub fn convolve_plane(
    vol: &Volume<f64>,
    kernel: &Kernel,
    plane: Plane,
    border: BorderMode,
) -> Volume<f64> {
    let shape = vol.shape();
    let (va, ha) = plane.axes();
    let (vlen, hlen) = (shape.len(va), shape.len(ha));
    let (vi, hi) = (va.index(), ha.index());
    let (kcx, kcy) = (kernel.center_x() as isize, kernel.center_y() as isize);
    let kw = kernel.width();
    let mut out = vol.create_template();

    for s in 0..shape.slices {
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                let mut idx = [r, c, s];
                let (pv, ph) = (idx[vi] as isize, idx[hi] as isize);
                let mut sum = 0.0;
                for (k, &w) in kernel.data().iter().enumerate() {
                    if w == 0.0 {
                        continue;
                    }
                    let (kx, ky) = ((k % kw) as isize, (k / kw) as isize);
                    let Some(sv) = border.resolve(pv + ky - kcy, vlen) else {
                        continue;
                    };
                    let Some(sh) = border.resolve(ph + kx - kcx, hlen) else {
                        continue;
                    };
                    idx[vi] = sv;
                    idx[hi] = sh;
                    sum += w * vol.get_unchecked(idx[0], idx[1], idx[2]);
                }
                out.set_unchecked(r, c, s, sum);
            }
        }
    }

    out
}
