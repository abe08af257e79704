//! Run result types.
//!
//! One [`ProcessResult`] is recorded per (source, plan) attempt, and per
//! output for packages that derive their own outputs. A [`RunReport`]
//! aggregates them for one manifest block.

use crate::package::PackageError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Why a single output was not produced.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProcessError {
    #[error("Source does not have required suffix: {0}")]
    MissingSuffix(String),
    #[error("Unsupported source image format")]
    UnsupportedFormat,
    #[error("Open failed: {0}")]
    Open(#[source] image::ImageError),
    #[error("Save failed: {0}")]
    Save(#[source] image::ImageError),
    #[error(transparent)]
    Package(#[from] PackageError),
}

/// Outcome of one transform attempt.
#[derive(Debug)]
pub struct ProcessResult {
    /// Source image
    pub source: PathBuf,
    /// Output path, when one was determined
    pub destination: Option<PathBuf>,
    /// Whether the failure abandoned the rest of the source's work
    pub fatal: bool,
    pub error: Option<ProcessError>,
}

impl ProcessResult {
    /// An output was written.
    pub fn success(source: &Path, destination: PathBuf) -> Self {
        Self { source: source.to_path_buf(), destination: Some(destination), fatal: false, error: None }
    }

    /// The plan did not apply to this source.
    pub fn skipped(source: &Path, error: ProcessError) -> Self {
        Self { source: source.to_path_buf(), destination: None, fatal: false, error: Some(error) }
    }

    /// The attempt failed and the source's remaining work is abandoned.
    pub fn failed(source: &Path, destination: Option<PathBuf>, error: ProcessError) -> Self {
        Self { source: source.to_path_buf(), destination, fatal: true, error: Some(error) }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_skipped(&self) -> bool {
        !self.fatal && self.error.is_some()
    }

    pub fn is_failure(&self) -> bool {
        self.fatal
    }

    /// The line printed for a failed attempt, naming the source and, when
    /// known, the output it was headed for.
    pub fn error_line(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        let line = format!("Error ({}) for file ({})", error, self.source.display());
        Some(match &self.destination {
            Some(destination) => format!("{} -> {}", line, destination.display()),
            None => line,
        })
    }
}

/// Aggregated results of one block.
#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<ProcessResult>,
    /// Package-level failures after all sources were processed
    pub package_errors: Vec<PackageError>,
    pub duration: Duration,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, results: Vec<ProcessResult>) {
        self.results.extend(results);
    }

    pub fn add_package_error(&mut self, error: PackageError) {
        self.package_errors.push(error);
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_skipped()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count() + self.package_errors.len()
    }

    /// No fatal failures were recorded.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// Every output written.
    pub fn outputs(&self) -> Vec<&Path> {
        self.results.iter().filter(|r| r.is_success()).filter_map(|r| r.destination.as_deref()).collect()
    }

    /// One line per failure, in processing order.
    pub fn error_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> =
            self.results.iter().filter(|r| r.is_failure()).filter_map(ProcessResult::error_line).collect();
        lines.extend(self.package_errors.iter().map(|e| format!("Error ({})", e)));
        lines
    }

    pub fn summary(&self) -> String {
        let success = self.success_count();
        let skipped = self.skipped_count();
        let failed = self.failed_count();

        if failed > 0 {
            format!("Failed: {} written, {} skipped, {} failed", success, skipped, failed)
        } else {
            format!("Done: {} written, {} skipped in {:.2?}", success, skipped, self.duration)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_states() {
        let ok = ProcessResult::success(Path::new("a.png"), PathBuf::from("out/a.png"));
        assert!(ok.is_success() && !ok.is_skipped() && !ok.is_failure());

        let skip = ProcessResult::skipped(Path::new("a.png"), ProcessError::MissingSuffix("@3x".into()));
        assert!(!skip.is_success() && skip.is_skipped() && !skip.is_failure());

        let fail = ProcessResult::failed(Path::new("a.png"), None, ProcessError::UnsupportedFormat);
        assert!(!fail.is_success() && !fail.is_skipped() && fail.is_failure());
    }

    #[test]
    fn test_error_line_names_source() {
        let fail = ProcessResult::failed(
            Path::new("in/src.png"),
            Some(PathBuf::from("out/x.sticker/src.png")),
            ProcessError::UnsupportedFormat,
        );
        assert_eq!(
            fail.error_line().unwrap(),
            "Error (Unsupported source image format) for file (in/src.png) -> out/x.sticker/src.png"
        );

        let fail = ProcessResult::failed(Path::new("in/a.bmp"), None, ProcessError::UnsupportedFormat);
        assert_eq!(fail.error_line().unwrap(), "Error (Unsupported source image format) for file (in/a.bmp)");
    }

    #[test]
    fn test_report_counts() {
        let mut report = RunReport::new();
        report.extend(vec![
            ProcessResult::success(Path::new("a.png"), PathBuf::from("out/a.png")),
            ProcessResult::success(Path::new("b.png"), PathBuf::from("out/b.png")),
            ProcessResult::skipped(Path::new("c.png"), ProcessError::MissingSuffix("@3x".into())),
        ]);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.skipped_count(), 1);
        assert!(report.is_success());
        assert!(report.error_lines().is_empty());
        assert_eq!(report.outputs(), vec![Path::new("out/a.png"), Path::new("out/b.png")]);
        assert!(report.summary().starts_with("Done: 2 written, 1 skipped"));

        report.add_package_error(PackageError::MissingSize);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.error_lines(), vec!["Error (Missing Size)"]);
        assert_eq!(report.summary(), "Failed: 2 written, 1 skipped, 1 failed");
    }
}
