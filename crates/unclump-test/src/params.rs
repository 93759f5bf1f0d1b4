//! Regression test parameters and operations

use crate::error::TestResult;
use crate::{golden_dir, regout_dir};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use unclump_core::{Grid, LabelMap};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    /// Parse mode from a string; anything unrecognised is `Compare`
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "generate" => Self::Generate,
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
    /// Name of the test (e.g., "watershed")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

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

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if values match within `delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Record a boolean condition as a check
    pub fn check(&mut self, condition: bool, what: &str) -> bool {
        self.index += 1;
        if !condition {
            self.fail(format!(
                "Failure in {}_reg: check for index {} - {}",
                self.test_name, self.index, what
            ));
        }
        condition
    }

    /// Compare two grids for exact equality
    ///
    /// Returns `true` if the grids have the same size and contents.
    pub fn compare_grids<T: Copy + PartialEq + std::fmt::Debug>(
        &mut self,
        grid1: &Grid<T>,
        grid2: &Grid<T>,
    ) -> bool {
        self.index += 1;

        if !grid1.same_size(grid2) {
            self.fail(format!(
                "Failure in {}_reg: grid comparison for index {} - dimension mismatch",
                self.test_name, self.index
            ));
            return false;
        }

        let mismatch = grid1
            .data()
            .iter()
            .zip(grid2.data())
            .position(|(a, b)| a != b);
        if let Some(i) = mismatch {
            let (x, y) = grid1.coords(i);
            self.fail(format!(
                "Failure in {}_reg: grid comparison for index {} - \
                 mismatch at ({}, {}): {:?} vs {:?}",
                self.test_name,
                self.index,
                x,
                y,
                grid1.data()[i],
                grid2.data()[i]
            ));
            return false;
        }

        true
    }

    /// Write a label map as text and check it against its golden file
    pub fn write_labels_and_check(&mut self, labels: &LabelMap) -> TestResult<()> {
        self.write_data_and_check(label_map_text(labels).as_bytes(), "lbl")
    }

    /// Write data to file and check against golden file
    ///
    /// `ext` is the file extension (e.g., "lbl").
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        );

        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    /// Check a file against its golden counterpart
    ///
    /// In generate mode, copies the file to golden.
    /// In compare mode, compares with golden file; a missing golden file
    /// is reported but not counted as a failure.
    /// In display mode, does nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    eprintln!(
                        "{}_reg: no golden file {} (run with REGTEST_MODE=generate)",
                        self.test_name, golden_path
                    );
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;

                if local_data != golden_data {
                    self.fail(format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    ));
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
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

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Serialize a label map as a small text format
///
/// The first line is `width height`, followed by one line of
/// space-separated labels per row.
pub fn label_map_text(labels: &LabelMap) -> String {
    let mut out = format!("{} {}\n", labels.width(), labels.height());
    for y in 0..labels.height() {
        for x in 0..labels.width() {
            if x > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}", labels.get_unchecked(x, y));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(RegTestMode::parse("generate"), RegTestMode::Generate);
        assert_eq!(RegTestMode::parse("DISPLAY"), RegTestMode::Display);
        assert_eq!(RegTestMode::parse(""), RegTestMode::Compare);
    }

    #[test]
    fn test_compare_values_tracks_failures() {
        let mut rp = RegParams::new("params_selftest");
        assert!(rp.compare_values(1.0, 1.05, 0.1));
        assert!(!rp.compare_values(1.0, 2.0, 0.1));
        assert_eq!(rp.index(), 2);
        assert_eq!(rp.failures().len(), 1);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_grids() {
        let mut rp = RegParams::new("params_grids");
        let a = LabelMap::from_data(2, 2, vec![0, 1, 1, 2]).unwrap();
        let b = LabelMap::from_data(2, 2, vec![0, 1, 2, 2]).unwrap();
        assert!(rp.compare_grids(&a, &a.clone()));
        assert!(!rp.compare_grids(&a, &b));
        assert!(!rp.is_success());
    }

    #[test]
    fn test_label_map_text() {
        let labels = LabelMap::from_data(3, 2, vec![0, 1, 1, 2, 0, 10]).unwrap();
        assert_eq!(label_map_text(&labels), "3 2\n0 1 1\n2 0 10\n");
    }
}
