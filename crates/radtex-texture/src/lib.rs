//! radtex-texture - Texture-map generation
//!
//! Connects settings, filters and scan storage:
//!
//! - [`FilterSpec`]: typed filter configuration parsed from a parameter block
//! - [`apply`] / [`apply_spec`]: filter dispatch
//! - [`PaddingPolicy`] and [`crop_back`]: padding removal that keeps arrays,
//!   masks and coordinate vectors aligned
//! - [`Preprocessor`] and [`ScanStore`]: seams to preprocessing and storage,
//!   with [`CropPadPreprocessor`] and [`MemoryStore`] implementations
//! - [`TextureMapper`]: the pipeline driver
//!
//! # Example
//!
//! ```
//! use radtex_core::{Grid, Shape, Volume};
//! use radtex_io::SettingsDocument;
//! use radtex_texture::{MemoryStore, RasterSegment, Region, TextureMapper};
//!
//! let shape = Shape::new(8, 8, 4);
//! let image = Volume::from_fn(shape, |r, c, s| (r + c + s) as f64).unwrap();
//! let grid = Grid::uniform(shape, [0.1, 0.1, 0.25], [0.0, 0.0, 0.0]).unwrap();
//!
//! let mut store = MemoryStore::new();
//! let scan = store.add_scan(image, grid).unwrap();
//! let gtv = store
//!     .add_structure("GTV", scan, vec![RasterSegment::new(1, 3, 2, 5)])
//!     .unwrap();
//!
//! let settings = SettingsDocument::from_json_str(
//!     r#"{"imageType": {"mean": {"KernelSize": [3, 3, 1]}}}"#,
//! )
//! .unwrap();
//! let maps = TextureMapper::new()
//!     .generate_with_settings(&mut store, Region::Structure(gtv), &settings)
//!     .unwrap();
//! assert_eq!(maps.len(), 1);
//! assert_eq!(store.derived()[0].output, "mean");
//! ```

pub mod cropback;
pub mod dispatch;
mod error;
pub mod mapper;
pub mod padding;
pub mod params;
pub mod preprocess;
pub mod store;

pub use cropback::{CroppedMap, crop_back};
pub use dispatch::{apply, apply_spec};
pub use error::{TextureError, TextureResult};
pub use mapper::{Region, TextureMapper};
pub use padding::{PADDING_EXPAND, PaddingMethod, PaddingPolicy};
pub use params::{FilterKind, FilterSpec};
pub use preprocess::{CropPadPreprocessor, Preprocessed, Preprocessor};
pub use store::{DerivedScan, MemoryStore, RasterSegment, ScanStore, rasterize};
