//! `.appiconset` / `.stickersiconset` packaging
//!
//! The icon set's sidecar already declares every required entry with a
//! `size` (points, e.g. `83.5x83.5`) and a `scale` (`2x`). Each entry is
//! filled from the single source image at `size × scale` pixels and its
//! `filename` is pointed at the new file. Entries are never added.

use super::contents::{read_contents, write_contents, ImageRecord, ImageSetContents, CONTENTS_FILENAME};
use super::{check_destination, check_single_source, PackageError, Packager};
use crate::build::{ProcessError, ProcessResult};
use crate::imaging;
use crate::models::{ImageFormat, PackageKind};
use crate::naming::{change_extension, change_suffix, file_name, has_suffix};
use crate::plan::TransformPlan;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Fills the pre-declared entries of an icon set.
#[derive(Debug)]
pub struct IconSetPackager {
    dst: PathBuf,
}

/// Pixel dimensions an entry asks for.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySize {
    pub width: u32,
    pub height: u32,
    /// Label used in the output name, e.g. `32x32-2x`
    pub label: String,
}

/// Parse an entry's `size` and `scale` into pixel dimensions.
///
/// ```
/// use imgx::package::iconset::entry_size;
/// use imgx::package::contents::ImageRecord;
///
/// let record = ImageRecord { size: Some("83.5x83.5".into()), scale: Some("2x".into()), ..Default::default() };
/// let size = entry_size(&record).unwrap();
/// assert_eq!((size.width, size.height), (167, 167));
/// assert_eq!(size.label, "83.5x83.5-2x");
/// ```
pub fn entry_size(record: &ImageRecord) -> Result<EntrySize, PackageError> {
    let size = record.size.as_deref().filter(|s| !s.is_empty()).ok_or(PackageError::MissingSize)?;
    let scale = record.scale.as_deref().filter(|s| !s.is_empty()).ok_or(PackageError::MissingScale)?;

    let invalid = || PackageError::InvalidSize(format!("{} @ {}", size, scale));
    let factor: f64 = scale.trim_end_matches('x').parse().map_err(|_| invalid())?;
    let (w, h) = size.split_once('x').ok_or_else(invalid)?;
    let w: f64 = w.parse().map_err(|_| invalid())?;
    let h: f64 = h.parse().map_err(|_| invalid())?;

    let width = (w * factor).round();
    let height = (h * factor).round();
    if width < 1.0 || height < 1.0 {
        return Err(invalid());
    }

    Ok(EntrySize { width: width as u32, height: height as u32, label: format!("{}-{}", size, scale) })
}

impl IconSetPackager {
    pub fn new(dst: PathBuf) -> Self {
        Self { dst }
    }

    fn contents_path(&self) -> PathBuf {
        self.dst.join(CONTENTS_FILENAME)
    }
}

impl Packager for IconSetPackager {
    fn kind(&self) -> Option<PackageKind> {
        Some(PackageKind::IconSet)
    }

    fn destination(&self) -> &Path {
        &self.dst
    }

    fn prepare(&mut self, sources: &[PathBuf]) -> Result<(), PackageError> {
        check_destination(PackageKind::IconSet, &self.dst)?;
        check_single_source(PackageKind::IconSet, sources)?;
        let path = self.contents_path();
        if !path.is_file() {
            return Err(PackageError::io(&path, std::io::ErrorKind::NotFound.into()));
        }
        Ok(())
    }

    fn process_source(&mut self, source: &Path, plans: &[TransformPlan]) -> Vec<ProcessResult> {
        info!("Processing: {}", file_name(source));
        let plan = plans.first().cloned().unwrap_or_default();
        let fail = |error: ProcessError| vec![ProcessResult::failed(source, None, error)];

        let contents_path = self.contents_path();
        let mut contents: ImageSetContents = match read_contents(&contents_path) {
            Ok(contents) => contents,
            Err(e) => return fail(e.into()),
        };

        if let Some(suffix) = &plan.required_suffix {
            if !has_suffix(source, suffix) {
                return vec![ProcessResult::skipped(source, ProcessError::MissingSuffix(suffix.clone()))];
            }
        }
        let Some(source_format) = ImageFormat::from_path(source) else {
            return fail(ProcessError::UnsupportedFormat);
        };
        let format = plan.output_format.unwrap_or(source_format);

        // every entry must be complete before anything is touched
        let sizes = match contents.images.iter().map(entry_size).collect::<Result<Vec<_>, _>>() {
            Ok(sizes) => sizes,
            Err(e) => return fail(e.into()),
        };

        let image = match imaging::open(source) {
            Ok(image) => image,
            Err(e) => return fail(ProcessError::Open(e)),
        };

        let base_name = change_extension(Path::new(&file_name(source)), format.extension());
        let mut results = Vec::with_capacity(sizes.len() + 1);
        for (record, size) in contents.images.iter_mut().zip(sizes) {
            if let Some(previous) = record.filename.take() {
                let previous = self.dst.join(previous);
                if previous.exists() {
                    if let Err(e) = fs::remove_file(&previous) {
                        warn!("Error deleting {}: {}", previous.display(), e);
                    }
                }
            }

            let name = file_name(&change_suffix(&base_name, "", &format!("-{}", size.label)));
            let destination = self.dst.join(&name);
            let output = imaging::fill(&image, size.width, size.height);
            match imaging::save(&output, &destination, format) {
                Ok(()) => {
                    debug!("Wrote {} ({}x{})", name, size.width, size.height);
                    record.filename = Some(name);
                    results.push(ProcessResult::success(source, destination));
                }
                Err(e) => results.push(ProcessResult::failed(source, Some(destination), ProcessError::Save(e))),
            }
        }

        if let Err(e) = write_contents(&contents_path, &contents) {
            results.push(ProcessResult::failed(source, None, e.into()));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(size: Option<&str>, scale: Option<&str>) -> ImageRecord {
        ImageRecord {
            size: size.map(str::to_string),
            scale: scale.map(str::to_string),
            idiom: Some("iphone".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_entry_size() {
        let size = entry_size(&record(Some("32x32"), Some("2x"))).unwrap();
        assert_eq!((size.width, size.height), (64, 64));
        assert_eq!(size.label, "32x32-2x");

        let size = entry_size(&record(Some("60x45"), Some("1x"))).unwrap();
        assert_eq!((size.width, size.height), (60, 45));
    }

    #[test]
    fn test_entry_size_missing_fields() {
        assert!(matches!(entry_size(&record(None, Some("2x"))), Err(PackageError::MissingSize)));
        assert!(matches!(entry_size(&record(Some("32x32"), None)), Err(PackageError::MissingScale)));
        assert!(matches!(entry_size(&record(Some(""), Some("2x"))), Err(PackageError::MissingSize)));
    }

    #[test]
    fn test_entry_size_invalid() {
        assert!(matches!(entry_size(&record(Some("big"), Some("2x"))), Err(PackageError::InvalidSize(_))));
        assert!(matches!(entry_size(&record(Some("32x32"), Some("twox"))), Err(PackageError::InvalidSize(_))));
    }
}
