//! radtex-io - Settings loading
//!
//! Reads the JSON settings document that drives texture-map generation:
//! which filters to run, their parameter blocks, and the padding policy.
//!
//! # Example
//!
//! ```
//! use radtex_io::SettingsDocument;
//!
//! let doc = SettingsDocument::from_json_str(
//!     r#"{"imageType": {"mean": {"KernelSize": [3, 3, 3]}}}"#,
//! ).unwrap();
//! assert_eq!(doc.filter_types(), vec!["mean"]);
//! ```

mod error;
pub mod param;
pub mod settings;

pub use error::{IoError, IoResult};
pub use param::{PADDING_KEY, ParamBlock, VOXEL_SIZE_KEY};
pub use settings::{FilterEntry, PADDING_NONE, PaddingSettings, SettingsDocument, load_settings};
