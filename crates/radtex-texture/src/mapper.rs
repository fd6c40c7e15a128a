//! Texture-map generation
//!
//! [`TextureMapper::generate`] drives the whole pipeline for one region:
//!
//! 1. resolve the region to a mask on its scan
//! 2. load the settings document
//! 3. preprocess the scan and take the bounding box of the processed mask
//! 4. resolve the padding policy and its removal window
//! 5. for every filter type and parameter variant, in document order:
//!    inject voxel size and padding, dispatch, crop back every output and
//!    register it with the store
//!
//! The first failure aborts the run.

use std::path::Path;

use log::{debug, info};
use radtex_core::{BoundingBox, Mask};
use radtex_filter::{StandardKernels, TextureKernels};
use radtex_io::{SettingsDocument, load_settings};

use crate::cropback::crop_back;
use crate::dispatch::apply;
use crate::error::{TextureError, TextureResult};
use crate::padding::PaddingPolicy;
use crate::preprocess::{CropPadPreprocessor, Preprocessor};
use crate::store::{DerivedScan, ScanStore, rasterize};

/// Region to compute texture maps for
#[derive(Debug, Clone, PartialEq)]
pub enum Region {
    /// A mask with the shape of `scan`
    Mask { scan: usize, mask: Mask },
    /// A structure of the store, rasterized on its associated scan
    Structure(usize),
}

/// Filter-bank orchestrator
#[derive(Debug, Clone, Default)]
pub struct TextureMapper<K = StandardKernels, P = CropPadPreprocessor> {
    kernels: K,
    preprocessor: P,
}

impl TextureMapper {
    /// Mapper with the standard kernels and crop/pad preprocessing
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: TextureKernels, P: Preprocessor> TextureMapper<K, P> {
    pub fn with_parts(kernels: K, preprocessor: P) -> Self {
        Self {
            kernels,
            preprocessor,
        }
    }

    pub fn kernels(&self) -> &K {
        &self.kernels
    }

    /// Generate texture maps for `region` as configured in `config_path`.
    ///
    /// # Returns
    ///
    /// Store indices of the registered maps, in registration order.
    pub fn generate<S: ScanStore>(
        &self,
        store: &mut S,
        region: Region,
        config_path: impl AsRef<Path>,
    ) -> TextureResult<Vec<usize>> {
        let (settings, _) = load_settings(config_path, None)?;
        self.generate_with_settings(store, region, &settings)
    }

    /// Generate texture maps from an already loaded settings document.
    pub fn generate_with_settings<S: ScanStore>(
        &self,
        store: &mut S,
        region: Region,
        settings: &SettingsDocument,
    ) -> TextureResult<Vec<usize>> {
        let (scan, mask) = resolve_region(store, region)?;
        let image = store.scan_image(scan)?;
        let grid = store.scan_grid(scan)?;
        let pre = self.preprocessor.preprocess(image, &mask, grid, settings)?;

        let shape = pre.image.shape();
        if pre.mask.shape() != shape {
            return Err(TextureError::Geometry(format!(
                "preprocessing returned a {} mask for a {shape} image",
                pre.mask.shape()
            )));
        }
        let bbox = BoundingBox::of_mask(&pre.mask).ok_or_else(|| {
            TextureError::Geometry("processed mask has no foreground voxels".into())
        })?;

        let policy = PaddingPolicy::from_settings(settings.padding());
        let window = policy.removal_window(&bbox, shape)?;
        let voxel_size_mm = pre.grid.voxel_size_mm();

        let mut registered = Vec::new();
        for filter in settings.filters() {
            for (variant, block) in filter.variants.iter().enumerate() {
                let mut block = block.clone();
                policy.inject(&mut block, voxel_size_mm);
                debug!("running {} variant {variant}", filter.name);

                let outputs = apply(&filter.name, &pre.image, &pre.mask, &block, &self.kernels)?;
                for (output, volume) in outputs {
                    if volume.shape() != shape {
                        return Err(TextureError::Geometry(format!(
                            "{} output '{output}' is {} but the processed image is {shape}",
                            filter.name,
                            volume.shape()
                        )));
                    }
                    let cropped = crop_back(&volume, &pre.mask, &pre.grid, &window)?;
                    let index = store.import_derived(DerivedScan {
                        label: filter.name.clone(),
                        output,
                        source_scan: scan,
                        volume: cropped.volume,
                        grid: cropped.grid,
                        foreground_slices: cropped.foreground_slices,
                    })?;
                    registered.push(index);
                }
            }
        }

        info!(
            "generated {} texture maps from scan {scan}",
            registered.len()
        );
        Ok(registered)
    }
}

/// Resolve a region to its scan and a mask with the scan's shape.
fn resolve_region<S: ScanStore>(store: &S, region: Region) -> TextureResult<(usize, Mask)> {
    let (scan, mask, slices) = match region {
        Region::Mask { scan, mask } => {
            let expected = store.scan_image(scan)?.shape();
            if mask.shape() != expected {
                return Err(TextureError::Geometry(format!(
                    "region mask is {} but scan {scan} is {expected}",
                    mask.shape()
                )));
            }
            let slices = mask.foreground_slices();
            (scan, mask, slices)
        }
        Region::Structure(structure) => {
            let scan = store.structure_scan(structure)?;
            let shape = store.scan_image(scan)?.shape();
            let (mask, slices) = rasterize(store.structure_segments(structure)?, shape)?;
            (scan, mask, slices)
        }
    };
    debug!("region on scan {scan} covers slices {slices:?}");
    Ok((scan, mask))
}
