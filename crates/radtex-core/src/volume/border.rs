//! Border operations for volumes
//!
//! Adds and removes padding around a volume. The padded voxels are filled
//! according to a [`BorderMode`]:
//!
//! - `Zero`: default value (`0.0` for scalars, `false` for masks)
//! - `Replicate`: nearest edge voxel
//! - `Mirror`: reflection that repeats the edge voxel (`c b a | a b c`)
//! - `Circular`: wrap-around
//!
//! The same rule is used by the filter kernels to read outside the array.

use std::str::FromStr;

use super::Volume;
use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::volume::crop::CropWindow;

/// Boundary rule for voxels outside a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderMode {
    Zero,
    #[default]
    Replicate,
    Mirror,
    Circular,
}

impl BorderMode {
    /// Map a possibly out-of-range index onto `0..len`.
    ///
    /// Returns `None` when the voxel lies outside and the mode is `Zero`.
    #[inline]
    pub fn resolve(self, index: isize, len: usize) -> Option<usize> {
        let n = len as isize;
        if (0..n).contains(&index) {
            return Some(index as usize);
        }
        match self {
            BorderMode::Zero => None,
            BorderMode::Replicate => Some(index.clamp(0, n - 1) as usize),
            BorderMode::Circular => Some(index.rem_euclid(n) as usize),
            BorderMode::Mirror => {
                let period = 2 * n;
                let m = index.rem_euclid(period);
                Some(if m < n { m } else { period - 1 - m } as usize)
            }
        }
    }
}

impl FromStr for BorderMode {
    type Err = Error;

    /// Parse a padding method name.
    ///
    /// Accepts `padzeros`/`zero`/`zeros`, `replicate`, `mirror`/`symmetric`
    /// and `circular`, case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "padzeros" | "zero" | "zeros" => Ok(BorderMode::Zero),
            "replicate" => Ok(BorderMode::Replicate),
            "mirror" | "symmetric" => Ok(BorderMode::Mirror),
            "circular" => Ok(BorderMode::Circular),
            other => Err(Error::InvalidParameter(format!("unknown border mode '{other}'"))),
        }
    }
}

impl<T: Clone + Default> Volume<T> {
    /// Add `pad[axis]` voxels on both sides of every axis.
    ///
    /// # Arguments
    ///
    /// * `pad` - Border width per axis, `(rows, cols, slices)`
    /// * `mode` - How the new voxels are filled
    ///
    /// # Returns
    ///
    /// New volume with shape `(rows + 2*pad[0], cols + 2*pad[1], slices + 2*pad[2])`.
    pub fn add_border(&self, pad: [usize; 3], mode: BorderMode) -> Result<Volume<T>> {
        self.add_border_general(pad, pad, mode)
    }

    /// Add a border with different sizes on the low and high side.
    pub fn add_border_general(
        &self,
        low: [usize; 3],
        high: [usize; 3],
        mode: BorderMode,
    ) -> Result<Volume<T>> {
        let src = self.shape();
        let dst = Shape::new(
            src.rows + low[0] + high[0],
            src.cols + low[1] + high[1],
            src.slices + low[2] + high[2],
        );
        Volume::from_fn(dst, |r, c, s| {
            let sr = mode.resolve(r as isize - low[0] as isize, src.rows);
            let sc = mode.resolve(c as isize - low[1] as isize, src.cols);
            let ss = mode.resolve(s as isize - low[2] as isize, src.slices);
            match (sr, sc, ss) {
                (Some(sr), Some(sc), Some(ss)) => self.get_unchecked(sr, sc, ss),
                _ => T::default(),
            }
        })
    }

    /// Remove `pad[axis]` voxels from both sides of every axis.
    ///
    /// # Errors
    ///
    /// Returns error if the border is larger than the volume.
    pub fn remove_border(&self, pad: [usize; 3]) -> Result<Volume<T>> {
        self.crop(&CropWindow::fixed(pad))
    }
}
