//! `.xcassets` catalog of large-sticker image sets
//!
//! Each source becomes `<stem>.imageset` inside the catalog with three
//! variants: transparent placeholders at 1x and 3x around the real image at
//! 2x. The stems processed are optionally written to an output manifest as
//! a JSON array.

use super::contents::{write_contents, CatalogContents, ImageRecord, ImageSetContents, CONTENTS_FILENAME};
use super::{check_destination, clear_folder, PackageError, Packager};
use crate::build::{ProcessError, ProcessResult};
use crate::imaging;
use crate::models::{ImageFormat, PackageKind};
use crate::naming::{change_extension, change_suffix, file_name, file_stem};
use crate::plan::TransformPlan;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Largest sticker file accepted by the platform, in bytes.
pub const MAX_STICKER_BYTES: u64 = 512_000;

/// Bounding box of the 1x variant.
const SMALL_BOX: u32 = 206;

/// Bounding box of the 2x and 3x variants.
const LARGE_BOX: u32 = 412;

#[derive(Debug, Clone, Copy)]
enum Content {
    Placeholder,
    Source,
}

/// Writes one image set per source into a catalog.
#[derive(Debug)]
pub struct CatalogPackager {
    dst: PathBuf,
    replace: bool,
    out_manifest: Option<PathBuf>,
    names: Vec<String>,
}

impl CatalogPackager {
    pub fn new(dst: PathBuf, replace: bool, out_manifest: Option<PathBuf>) -> Self {
        Self { dst, replace, out_manifest, names: Vec::new() }
    }

    /// Stems of the sources packaged so far.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn write_catalog_contents(&self) -> Result<(), PackageError> {
        write_contents(&self.dst.join(CONTENTS_FILENAME), &CatalogContents::default())
    }
}

/// The size of `path` when it exceeds [`MAX_STICKER_BYTES`].
pub fn oversize_sticker(path: &Path) -> Option<u64> {
    let len = fs::metadata(path).ok()?.len();
    (len > MAX_STICKER_BYTES).then_some(len)
}

impl Packager for CatalogPackager {
    fn kind(&self) -> Option<PackageKind> {
        Some(PackageKind::Catalog)
    }

    fn destination(&self) -> &Path {
        &self.dst
    }

    fn prepare(&mut self, _sources: &[PathBuf]) -> Result<(), PackageError> {
        check_destination(PackageKind::Catalog, &self.dst)?;
        fs::create_dir_all(&self.dst).map_err(|e| PackageError::io(&self.dst, e))?;

        if self.replace {
            info!("Clearing catalog {}", self.dst.display());
            clear_folder(&self.dst);
            self.write_catalog_contents()?;
        } else if !self.dst.join(CONTENTS_FILENAME).exists() {
            self.write_catalog_contents()?;
        }
        Ok(())
    }

    fn process_source(&mut self, source: &Path, plans: &[TransformPlan]) -> Vec<ProcessResult> {
        info!("Processing: {}", file_name(source));
        let plan = plans.first().cloned().unwrap_or_default();

        let Some(source_format) = ImageFormat::from_path(source) else {
            return vec![ProcessResult::failed(source, None, ProcessError::UnsupportedFormat)];
        };
        let format = plan.output_format.unwrap_or(source_format);

        let stem = file_stem(source);
        let set_dir = self.dst.join(format!("{}.imageset", stem));
        if let Err(e) = fs::create_dir_all(&set_dir) {
            return vec![ProcessResult::failed(source, None, PackageError::io(&set_dir, e).into())];
        }

        let base = set_dir.join(change_extension(Path::new(&file_name(source)), format.extension()));
        let variants = [
            ("1x", base.clone(), Content::Placeholder, SMALL_BOX),
            ("2x", change_suffix(&base, "", "@2x"), Content::Source, LARGE_BOX),
            ("3x", change_suffix(&base, "", "@3x"), Content::Placeholder, LARGE_BOX),
        ];

        let mut contents = ImageSetContents::default();
        let mut results = Vec::with_capacity(variants.len());
        let mut source_image: Option<DynamicImage> = None;

        for (scale, path, content, size) in variants {
            let image = match content {
                Content::Placeholder => imaging::blank(1, 1),
                Content::Source => match source_image.take() {
                    Some(image) => image,
                    None => match imaging::open(source) {
                        Ok(image) => image,
                        Err(e) => {
                            results.push(ProcessResult::failed(source, Some(path), ProcessError::Open(e)));
                            break;
                        }
                    },
                },
            };

            let output = imaging::fit(&image, size, size);
            if let Content::Source = content {
                source_image = Some(image);
            }
            if let Err(e) = imaging::save(&output, &path, format) {
                results.push(ProcessResult::failed(source, Some(path), ProcessError::Save(e)));
                break;
            }
            contents.images.push(ImageRecord::universal(file_name(&path), scale));
            results.push(ProcessResult::success(source, path));
        }

        // the sidecar lists exactly the variants written
        if let Err(e) = write_contents(&set_dir.join(CONTENTS_FILENAME), &contents) {
            results.push(ProcessResult::failed(source, None, e.into()));
            return results;
        }

        if results.iter().all(ProcessResult::is_success) {
            if let Some(len) = oversize_sticker(&change_suffix(&base, "", "@3x")) {
                warn!("{} sticker image is too large. ({} > {})", file_name(source), len, MAX_STICKER_BYTES);
            }
            self.names.push(stem);
        }
        results
    }

    fn finish(&mut self) -> Result<(), PackageError> {
        let Some(path) = &self.out_manifest else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.names)
            .map_err(|e| PackageError::Json { path: path.clone(), source: e })?;
        fs::write(path, json).map_err(|e| PackageError::io(path, e))?;
        debug!("Wrote {} name(s) to {}", self.names.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_rejects_wrong_destination() {
        let temp = TempDir::new().unwrap();
        let mut packager = CatalogPackager::new(temp.path().join("Assets"), false, None);
        assert!(matches!(packager.prepare(&[]), Err(PackageError::InvalidDestination { .. })));
    }

    #[test]
    fn test_replace_resets_catalog() {
        let temp = TempDir::new().unwrap();
        let dst = temp.path().join("Assets.xcassets");
        fs::create_dir_all(dst.join("old.imageset")).unwrap();

        let mut packager = CatalogPackager::new(dst.clone(), true, None);
        packager.prepare(&[]).unwrap();

        assert!(!dst.join("old.imageset").exists());
        let text = fs::read_to_string(dst.join(CONTENTS_FILENAME)).unwrap();
        assert!(text.contains("\"author\": \"xcode\""));
    }

    #[test]
    fn test_finish_writes_names() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("names.json");
        let mut packager = CatalogPackager::new(temp.path().join("A.xcassets"), false, Some(manifest.clone()));
        packager.names.push("cat".to_string());
        packager.names.push("dog".to_string());
        packager.finish().unwrap();

        let names: Vec<String> = serde_json::from_str(&fs::read_to_string(&manifest).unwrap()).unwrap();
        assert_eq!(names, vec!["cat", "dog"]);
    }

    #[test]
    fn test_oversize_sticker() {
        let temp = TempDir::new().unwrap();
        let small = temp.path().join("small.png");
        fs::write(&small, vec![0u8; 100]).unwrap();
        assert_eq!(oversize_sticker(&small), None);
        assert_eq!(oversize_sticker(&temp.path().join("missing.png")), None);

        let big = temp.path().join("big.png");
        fs::write(&big, vec![0u8; MAX_STICKER_BYTES as usize + 1]).unwrap();
        assert_eq!(oversize_sticker(&big), Some(MAX_STICKER_BYTES + 1));
    }
}
