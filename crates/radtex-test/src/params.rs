//! Regression test parameters and operations

use radtex_core::{Shape, Volume};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare results (default)
    #[default]
    Compare,
    /// Compare and also print volume summaries
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "cropback")
    pub test_name: String,
    /// Current test index (incremented before each comparison)
    index: usize,
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// Installs the test logger so `RUST_LOG` output from the library shows
    /// up next to the comparison report.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();
        let _ = env_logger::builder().is_test(true).try_init();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn record_failure(&mut self, msg: String) {
        eprintln!("{}", msg);
        log::error!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// # Arguments
    ///
    /// * `expected` - Expected value
    /// * `actual` - Actual computed value
    /// * `delta` - Maximum allowed difference
    ///
    /// # Returns
    ///
    /// `true` if values match within delta, `false` otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Record a boolean check as a comparison against `true`.
    pub fn compare_true(&mut self, condition: bool) -> bool {
        self.compare_values(1.0, if condition { 1.0 } else { 0.0 }, 0.0)
    }

    /// Compare two shapes for equality
    pub fn compare_shapes(&mut self, expected: Shape, actual: Shape) -> bool {
        self.index += 1;
        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: shape comparison for index {} - expected {}, got {}",
                self.test_name, self.index, expected, actual
            );
            self.record_failure(msg);
            false
        } else {
            true
        }
    }

    /// Compare two scalar volumes voxel by voxel
    ///
    /// # Arguments
    ///
    /// * `expected` - Reference volume
    /// * `actual` - Computed volume
    /// * `delta` - Maximum allowed difference per voxel
    ///
    /// # Returns
    ///
    /// `true` if the shapes match and every voxel is within delta.
    pub fn compare_volumes(
        &mut self,
        expected: &Volume<f64>,
        actual: &Volume<f64>,
        delta: f64,
    ) -> bool {
        self.index += 1;

        if expected.shape() != actual.shape() {
            let msg = format!(
                "Failure in {}_reg: volume comparison for index {} - shape {} vs {}",
                self.test_name,
                self.index,
                expected.shape(),
                actual.shape()
            );
            self.record_failure(msg);
            return false;
        }

        let mismatch = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| (a - b).abs() > delta || (a - b).is_nan());
        if let Some(pos) = mismatch {
            let msg = format!(
                "Failure in {}_reg: volume comparison for index {} - voxel {} differs: {} vs {}",
                self.test_name,
                self.index,
                pos,
                expected.data()[pos],
                actual.data()[pos]
            );
            self.record_failure(msg);
            return false;
        }

        true
    }

    /// Print a one-line summary of a volume in display mode.
    pub fn describe(&self, label: &str, vol: &Volume<f64>) {
        if self.display() {
            eprintln!(
                "  {}: shape={} min={:.4} max={:.4} mean={:.4}",
                label,
                vol.shape(),
                vol.min_value(),
                vol.max_value(),
                vol.mean()
            );
        }
    }

    /// Clean up and report results
    ///
    /// # Returns
    ///
    /// `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
