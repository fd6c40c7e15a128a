//! Filter bank
//!
//! [`TextureKernels`] is the boundary between parameter handling and kernel
//! mathematics: the dispatcher only talks to this trait, so a different
//! kernel implementation can be plugged in. [`StandardKernels`] forwards to
//! the kernels of this crate.

use radtex_core::{BorderMode, Volume};

use crate::FilterResult;
use crate::block_conv::{MeanParams, mean_filter};
use crate::edge::{SobelResponse, sobel_filter};
use crate::gabor::{Gabor3dParams, GaborParams, gabor_filter, gabor_filter_3d};
use crate::laplacian::{LogParams, log_filter};
use crate::laws::{
    EnergyParams, LawsParams, RotationInvariance, laws_energy, laws_filter,
    rotation_invariant_laws, rotation_invariant_laws_energy,
};

/// Named filter responses in output order
pub type NamedVolumes = Vec<(String, Volume<f64>)>;

/// Texture filter kernels used by the dispatcher
pub trait TextureKernels {
    fn mean(&self, image: &Volume<f64>, params: &MeanParams) -> FilterResult<Volume<f64>>;

    fn sobel(&self, image: &Volume<f64>) -> FilterResult<SobelResponse>;

    fn log(&self, image: &Volume<f64>, params: &LogParams) -> FilterResult<Volume<f64>>;

    fn gabor(&self, image: &Volume<f64>, params: &GaborParams) -> FilterResult<NamedVolumes>;

    fn gabor3d(&self, image: &Volume<f64>, params: &Gabor3dParams) -> FilterResult<NamedVolumes>;

    fn laws(&self, image: &Volume<f64>, params: &LawsParams) -> FilterResult<NamedVolumes>;

    fn rotation_invariant_laws(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        rotation: &RotationInvariance,
    ) -> FilterResult<Volume<f64>>;

    fn laws_energy(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        energy: &EnergyParams,
    ) -> FilterResult<NamedVolumes>;

    fn rotation_invariant_laws_energy(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        energy: &EnergyParams,
        rotation: &RotationInvariance,
    ) -> FilterResult<Volume<f64>>;
}

/// The kernels implemented in this crate
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardKernels {
    /// Boundary rule for the Sobel operator
    pub sobel_border: BorderMode,
}

impl TextureKernels for StandardKernels {
    fn mean(&self, image: &Volume<f64>, params: &MeanParams) -> FilterResult<Volume<f64>> {
        mean_filter(image, params)
    }

    fn sobel(&self, image: &Volume<f64>) -> FilterResult<SobelResponse> {
        sobel_filter(image, self.sobel_border)
    }

    fn log(&self, image: &Volume<f64>, params: &LogParams) -> FilterResult<Volume<f64>> {
        log_filter(image, params)
    }

    fn gabor(&self, image: &Volume<f64>, params: &GaborParams) -> FilterResult<NamedVolumes> {
        gabor_filter(image, params)
    }

    fn gabor3d(&self, image: &Volume<f64>, params: &Gabor3dParams) -> FilterResult<NamedVolumes> {
        gabor_filter_3d(image, params)
    }

    fn laws(&self, image: &Volume<f64>, params: &LawsParams) -> FilterResult<NamedVolumes> {
        laws_filter(image, params)
    }

    fn rotation_invariant_laws(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        rotation: &RotationInvariance,
    ) -> FilterResult<Volume<f64>> {
        rotation_invariant_laws(image, params, rotation)
    }

    fn laws_energy(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        energy: &EnergyParams,
    ) -> FilterResult<NamedVolumes> {
        laws_energy(image, params, energy)
    }

    fn rotation_invariant_laws_energy(
        &self,
        image: &Volume<f64>,
        params: &LawsParams,
        energy: &EnergyParams,
        rotation: &RotationInvariance,
    ) -> FilterResult<Volume<f64>> {
        rotation_invariant_laws_energy(image, params, energy, rotation)
    }
}
