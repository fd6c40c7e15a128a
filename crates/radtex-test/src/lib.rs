//! radtex-test - Regression test framework for radtex
//!
//! Every regression test creates a [`RegParams`], records comparisons and
//! finishes with `assert!(rp.cleanup())`. Failures are collected rather than
//! panicking on the first mismatch, so one run reports every broken check.
//!
//! # Usage
//!
//! ```ignore
//! use radtex_test::{RegParams, phantom};
//!
//! let mut rp = RegParams::new("cropback");
//! rp.compare_values(12.0, cropped.rows() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" (default) or "display"
//! - `RUST_LOG`: Log filter for library output during tests

mod error;
mod params;
pub mod phantom;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use radtex_io::SettingsDocument;

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // radtex-test is at crates/radtex-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a settings fixture
pub fn test_settings_path(name: &str) -> String {
    format!("{}/tests/data/settings/{}", workspace_root(), name)
}

/// Load a settings fixture from the test data directory
///
/// # Arguments
///
/// * `name` - Fixture filename (e.g., "mean_variants.json")
pub fn load_test_settings(name: &str) -> TestResult<(SettingsDocument, Vec<String>)> {
    let path = test_settings_path(name);
    radtex_io::load_settings(&path, None).map_err(|e| TestError::SettingsLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}
