//! radtex - Radiomics texture maps for Rust
//!
//! Computes filter-response maps (mean, Sobel, LoG, Gabor, Laws and their
//! rotation-invariant and energy variants) over a region of a 3D scan, driven
//! by a JSON settings document, and registers each map as a new scan with
//! padding removed so that arrays, masks and coordinates stay aligned.
//!
//! # Overview
//!
//! - top level: volumes, masks, grids, bounding boxes, cropping
//! - [`io`]: settings documents and parameter blocks
//! - [`filter`]: the texture kernels
//! - [`texture`]: dispatch, padding policy, crop-back and the pipeline driver
//!
//! # Example
//!
//! ```
//! use radtex::texture::{MemoryStore, RasterSegment, Region, TextureMapper};
//! use radtex::io::SettingsDocument;
//! use radtex::{Grid, Shape, Volume};
//!
//! let shape = Shape::new(10, 10, 6);
//! let image = Volume::from_fn(shape, |r, c, s| (r * c + s) as f64).unwrap();
//! let grid = Grid::uniform(shape, [0.1, 0.1, 0.3], [0.0, 0.0, 0.0]).unwrap();
//!
//! let mut store = MemoryStore::new();
//! let scan = store.add_scan(image, grid).unwrap();
//! let gtv = store
//!     .add_structure("GTV", scan, vec![RasterSegment::new(3, 4, 3, 6)])
//!     .unwrap();
//!
//! let settings = SettingsDocument::from_json_str(
//!     r#"{"imageType": {"sobel": {}},
//!         "settings": {"padding": {"method": "expand", "size": 2}}}"#,
//! )
//! .unwrap();
//! TextureMapper::new()
//!     .generate_with_settings(&mut store, Region::Structure(gtv), &settings)
//!     .unwrap();
//!
//! let mag = &store.derived()[0];
//! assert_eq!(mag.output, "SobelMag");
//! assert_eq!(mag.volume.shape(), Shape::new(1, 4, 1));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use radtex_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use radtex_filter as filter;
pub use radtex_io as io;
pub use radtex_texture as texture;
