//! Padding policy
//!
//! Resolves `settings.padding` into the policy used for one orchestration
//! run and computes the removal window applied to every filter output.

use log::debug;
use radtex_core::{BorderMode, BoundingBox, CropWindow, Shape};
use radtex_io::{PADDING_KEY, PADDING_NONE, PaddingSettings, ParamBlock, VOXEL_SIZE_KEY};
use serde_json::json;

use crate::error::{TextureError, TextureResult};

/// Padding method name meaning "grow the region into real image data"
pub const PADDING_EXPAND: &str = "expand";

/// How padding was added before filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaddingMethod {
    None,
    /// Region grown by up to the padding size, clamped at the scan boundary
    Expand,
    /// Exactly the padding size added on every side, filled by the named
    /// rule (`padzeros`, `replicate`, `mirror`, `circular`, ...)
    Fixed(String),
}

impl PaddingMethod {
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            PADDING_NONE => PaddingMethod::None,
            PADDING_EXPAND => PaddingMethod::Expand,
            _ => PaddingMethod::Fixed(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PaddingMethod::None => PADDING_NONE,
            PaddingMethod::Expand => PADDING_EXPAND,
            PaddingMethod::Fixed(name) => name,
        }
    }
}

/// Resolved padding policy: `{Size, Method, Flag}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingPolicy {
    /// Padding per axis `(rows, cols, slices)`
    pub size: [usize; 3],
    pub method: PaddingMethod,
    /// Whether padding was applied at all
    pub flag: bool,
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl PaddingPolicy {
    /// No padding: zero size, method `none`, flag off.
    pub fn none() -> Self {
        Self {
            size: [0; 3],
            method: PaddingMethod::None,
            flag: false,
        }
    }

    /// Policy for the first `settings.padding` entry, if any.
    pub fn from_settings(padding: Option<&PaddingSettings>) -> Self {
        let Some(padding) = padding else {
            return Self::none();
        };
        match PaddingMethod::from_name(&padding.method) {
            PaddingMethod::None => Self::none(),
            method => Self {
                size: padding.size,
                method,
                flag: true,
            },
        }
    }

    /// Border rule for fixed padding methods.
    ///
    /// # Errors
    ///
    /// Returns `TextureError::ConfigFormat` for a fixed method that is not a
    /// known border rule.
    pub fn border_mode(&self) -> TextureResult<BorderMode> {
        match &self.method {
            PaddingMethod::Fixed(name) => name.parse().map_err(|_| {
                TextureError::ConfigFormat(format!("unsupported padding method '{name}'"))
            }),
            PaddingMethod::None | PaddingMethod::Expand => Ok(BorderMode::Replicate),
        }
    }

    /// Window removing the padding from an array of `shape`.
    ///
    /// `expand` removes `min(size, margin)` per side, where the margin is
    /// measured between `bbox` and the array boundary. Fixed methods remove
    /// `size` on both sides regardless of `bbox`. Without padding nothing is
    /// removed.
    pub fn removal_window(&self, bbox: &BoundingBox, shape: Shape) -> TextureResult<CropWindow> {
        let window = if !self.flag {
            CropWindow::IDENTITY
        } else {
            match self.method {
                PaddingMethod::None => CropWindow::IDENTITY,
                PaddingMethod::Expand => CropWindow::clamped(self.size, bbox, shape)
                    .map_err(|e| TextureError::Geometry(e.to_string()))?,
                PaddingMethod::Fixed(_) => CropWindow::fixed(self.size),
            }
        };
        debug!(
            "padding {:?} size {:?}: removal vector {:?}",
            self.method.name(),
            self.size,
            window.to_vector()
        );
        Ok(window)
    }

    /// Add `VoxelSize_mm` and the `{Size, Method, Flag}` descriptor to a
    /// parameter block.
    pub fn inject(&self, block: &mut ParamBlock, voxel_size_mm: [f64; 3]) {
        block.insert(VOXEL_SIZE_KEY, voxel_size_mm.to_vec());
        block.insert(
            PADDING_KEY,
            json!({
                "Size": self.size,
                "Method": self.method.name(),
                "Flag": self.flag,
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(method: &str, size: [usize; 3]) -> PaddingSettings {
        PaddingSettings {
            method: method.to_string(),
            size,
        }
    }

    #[test]
    fn test_resolution() {
        assert_eq!(PaddingPolicy::from_settings(None), PaddingPolicy::none());
        assert_eq!(
            PaddingPolicy::from_settings(Some(&settings("None", [3, 3, 3]))),
            PaddingPolicy::none()
        );
        let p = PaddingPolicy::from_settings(Some(&settings("Expand", [2, 2, 1])));
        assert_eq!(p.method, PaddingMethod::Expand);
        assert!(p.flag);
        let p = PaddingPolicy::from_settings(Some(&settings("mirror", [1, 1, 1])));
        assert_eq!(p.method, PaddingMethod::Fixed("mirror".into()));
        assert_eq!(p.border_mode().unwrap(), BorderMode::Mirror);
        let p = PaddingPolicy::from_settings(Some(&settings("spline", [1, 1, 1])));
        assert!(p.border_mode().is_err());
    }

    #[test]
    fn test_removal_windows() {
        let shape = Shape::new(10, 10, 6);
        let bbox = BoundingBox::new((1, 8), (3, 6), (0, 5)).unwrap();

        let none = PaddingPolicy::none().removal_window(&bbox, shape).unwrap();
        assert_eq!(none.to_vector(), [0; 6]);

        let expand = PaddingPolicy::from_settings(Some(&settings("expand", [2, 2, 2])));
        let w = expand.removal_window(&bbox, shape).unwrap();
        assert_eq!(w.to_vector(), [1, 1, 2, 2, 0, 0]);

        let fixed = PaddingPolicy::from_settings(Some(&settings("padzeros", [2, 1, 3])));
        let w = fixed.removal_window(&bbox, shape).unwrap();
        assert_eq!(w.to_vector(), [2, 2, 1, 1, 3, 3]);
    }

    #[test]
    fn test_inject() {
        let policy = PaddingPolicy::from_settings(Some(&settings("expand", [2, 2, 2])));
        let mut block = ParamBlock::new().with("KernelSize", 3);
        policy.inject(&mut block, [1.0, 1.0, 2.0]);
        assert_eq!(block.get(VOXEL_SIZE_KEY), Some(&json!([1.0, 1.0, 2.0])));
        assert_eq!(
            block.get(PADDING_KEY),
            Some(&json!({"Size": [2, 2, 2], "Method": "expand", "Flag": true}))
        );
    }
}
