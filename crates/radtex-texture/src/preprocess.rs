//! Preprocessing before filtering
//!
//! A [`Preprocessor`] turns a scan and its region mask into the arrays the
//! filters run on. [`CropPadPreprocessor`] crops to the region and pads
//! according to the padding policy.

use log::debug;
use radtex_core::{Axis, BorderMode, BoundingBox, Grid, Mask, Volume};
use radtex_io::SettingsDocument;

use crate::error::{TextureError, TextureResult};
use crate::padding::{PaddingMethod, PaddingPolicy};

/// Arrays produced by preprocessing, all of the same shape
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub image: Volume<f64>,
    pub mask: Mask,
    /// Mask for morphological features
    pub morph_mask: Mask,
    /// Coordinates of the processed arrays
    pub grid: Grid,
}

/// Prepares a scan for filtering
pub trait Preprocessor {
    /// # Arguments
    ///
    /// * `image` - Scan voxels
    /// * `mask` - Region mask with the scan's shape
    /// * `grid` - Scan coordinates
    /// * `settings` - The full settings document
    fn preprocess(
        &self,
        image: &Volume<f64>,
        mask: &Mask,
        grid: &Grid,
        settings: &SettingsDocument,
    ) -> TextureResult<Preprocessed>;
}

/// Crops to the region bounding box, then pads.
///
/// - `none`: crop only
/// - `expand`: the box grows by up to the padding size, clamped to the scan
/// - fixed methods: exactly the padding size is added with the named border
///   rule; the mask is padded with background
#[derive(Debug, Clone, Copy, Default)]
pub struct CropPadPreprocessor;

impl Preprocessor for CropPadPreprocessor {
    fn preprocess(
        &self,
        image: &Volume<f64>,
        mask: &Mask,
        grid: &Grid,
        settings: &SettingsDocument,
    ) -> TextureResult<Preprocessed> {
        let shape = image.shape();
        if mask.shape() != shape {
            return Err(TextureError::Preprocess(format!(
                "mask is {} but the scan is {shape}",
                mask.shape()
            )));
        }
        grid.check_shape(shape)
            .map_err(|e| TextureError::Preprocess(e.to_string()))?;
        let bbox = BoundingBox::of_mask(mask).ok_or_else(|| {
            TextureError::Preprocess("region mask has no foreground voxels".into())
        })?;

        let policy = PaddingPolicy::from_settings(settings.padding());
        let (region, pad, border) = match policy.method {
            PaddingMethod::None => (bbox, [0; 3], None),
            PaddingMethod::Expand => (bbox.expand_within(policy.size, shape), [0; 3], None),
            PaddingMethod::Fixed(_) => (bbox, policy.size, Some(policy.border_mode()?)),
        };

        let mut image = image.extract(&region)?;
        let mut mask = mask.extract(&region)?;
        if let Some(border) = border {
            image = image.add_border(pad, border)?;
            mask = mask.add_border(pad, BorderMode::Zero)?;
        }

        let mut start = [0isize; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            start[i] = region.range(axis).0 as isize - pad[i] as isize;
        }
        let grid = grid.resample_indices(start, image.shape())?;
        debug!(
            "preprocess: {shape} -> {} (padding {}, start {start:?})",
            image.shape(),
            policy.method.name()
        );

        Ok(Preprocessed {
            morph_mask: mask.clone(),
            image,
            mask,
            grid,
        })
    }
}
