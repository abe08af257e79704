//! Packaging adapters
//!
//! Each package kind owns a container layout and its `Contents.json`
//! sidecars. The executor talks to them through [`Packager`]:
//!
//! - [`Packager::prepare`] runs once per job: it checks the destination
//!   naming contract and applies the "replace" policy.
//! - [`Packager::place`] receives each output path before it is written and
//!   may relocate it into a sub-container, recording it in the sidecar.
//!   [`Packager::discard`] undoes that record when the write fails.
//! - [`Packager::process_source`] handles one source file. Most packages use
//!   the default plan-by-plan flow; icon sets, icns bundles and catalogs
//!   derive their outputs from the container instead.
//!
//! Sidecar updates are always read, modify, rewrite.

pub mod catalog;
pub mod contents;
pub mod folder;
pub mod icns;
pub mod iconset;
pub mod imageset;
pub mod stickerpack;

pub use catalog::CatalogPackager;
pub use folder::FolderPackager;
pub use icns::{IconConverter, IcnsPackager, Iconutil};
pub use iconset::IconSetPackager;
pub use imageset::ImageSetPackager;
pub use stickerpack::StickerPackPackager;

use crate::build::executor::process_image;
use crate::build::ProcessResult;
use crate::config::Configuration;
use crate::models::{PackageKind, Preset};
use crate::plan::TransformPlan;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;
use tracing::warn;

/// Packaging error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PackageError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("Destination ({}) is not a {expected} directory", .path.display())]
    InvalidDestination { path: PathBuf, expected: String },
    #[error("Only 1 source image allowed when using {0} package")]
    SingleSourceRequired(PackageKind),
    #[error("Catalog package requires the imageSetForLargeSticker preset")]
    CatalogRequiresPreset,
    #[error("Missing Size")]
    MissingSize,
    #[error("Missing Scale")]
    MissingScale,
    #[error("Invalid size or scale: {0}")]
    InvalidSize(String),
    #[error("Convert failed: {0}")]
    ConvertFailed(String),
    #[error("Could not run {tool}: {source}")]
    ConverterUnavailable { tool: String, source: io::Error },
}

impl PackageError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        PackageError::Io { path: path.to_path_buf(), source }
    }
}

/// Per-source state threaded through [`Packager::place`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceState {
    /// The container for this source has been reset during this run
    pub container_ready: bool,
}

/// A package layout the executor writes into.
pub trait Packager {
    /// The package kind, `None` for plain folders.
    fn kind(&self) -> Option<PackageKind>;

    /// The destination directory or file.
    fn destination(&self) -> &Path;

    /// Validate the destination and apply the replace policy.
    fn prepare(&mut self, sources: &[PathBuf]) -> Result<(), PackageError>;

    /// Map a suggested output path to where it is actually written.
    fn place(&mut self, suggested: &Path, state: &mut SourceState) -> Result<PathBuf, PackageError> {
        let _ = state;
        Ok(suggested.to_path_buf())
    }

    /// Forget an output from [`Packager::place`] that could not be written.
    fn discard(&mut self, placed: &Path) -> Result<(), PackageError> {
        let _ = placed;
        Ok(())
    }

    /// Produce every output for one source.
    fn process_source(&mut self, source: &Path, plans: &[TransformPlan]) -> Vec<ProcessResult> {
        let dst = self.destination().to_path_buf();
        process_image(source, plans, &dst, self)
    }

    /// Called once after every source has been processed.
    fn finish(&mut self) -> Result<(), PackageError> {
        Ok(())
    }
}

/// Build the packager a configuration asks for.
pub fn packager_for(
    config: &Configuration,
    converter: Rc<dyn IconConverter>,
) -> Result<Box<dyn Packager>, PackageError> {
    let dst = config.dst.clone().unwrap_or_default();
    let replace = config.out_package_replace;

    let packager: Box<dyn Packager> = match config.out_package {
        None => Box::new(FolderPackager::new(dst, replace)),
        Some(PackageKind::StickerPack) => {
            Box::new(StickerPackPackager::new(dst, replace, config.preset))
        }
        Some(PackageKind::ImageSet) => Box::new(ImageSetPackager::new(dst, replace)),
        Some(PackageKind::IconSet) => Box::new(IconSetPackager::new(dst)),
        Some(PackageKind::Icns) => Box::new(IcnsPackager::new(dst, converter)),
        Some(PackageKind::Catalog) => {
            if config.preset != Some(Preset::ImageSetForLargeSticker) {
                return Err(PackageError::CatalogRequiresPreset);
            }
            Box::new(CatalogPackager::new(dst, replace, config.out_manifest.clone()))
        }
    };
    Ok(packager)
}

/// Fail unless `dst` satisfies the naming contract of `kind`.
pub fn check_destination(kind: PackageKind, dst: &Path) -> Result<(), PackageError> {
    if kind.accepts_destination(dst) {
        return Ok(());
    }
    Err(PackageError::InvalidDestination {
        path: dst.to_path_buf(),
        expected: kind.destination_suffixes().join(" or "),
    })
}

/// Fail unless exactly one source was collected.
pub fn check_single_source(kind: PackageKind, sources: &[PathBuf]) -> Result<(), PackageError> {
    if sources.len() == 1 {
        Ok(())
    } else {
        Err(PackageError::SingleSourceRequired(kind))
    }
}

/// Delete every entry directly inside `dir`. Failures are logged only.
pub fn clear_folder(dir: &Path) {
    if !dir.exists() {
        return;
    }
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error listing {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let result = if path.is_dir() { fs::remove_dir_all(&path) } else { fs::remove_file(&path) };
        if let Err(e) = result {
            warn!("Error deleting {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct NoConverter;

    impl IconConverter for NoConverter {
        fn convert(&self, _iconset: &Path, _output: &Path) -> Result<(), PackageError> {
            Ok(())
        }
    }

    fn config(package: Option<PackageKind>, preset: Option<Preset>) -> Configuration {
        Configuration {
            src: Some(PathBuf::from("in")),
            dst: Some(PathBuf::from("out")),
            out_package: package,
            preset,
            ..Default::default()
        }
    }

    #[test]
    fn test_packager_for_kinds() {
        let converter: Rc<dyn IconConverter> = Rc::new(NoConverter);
        for kind in [
            None,
            Some(PackageKind::StickerPack),
            Some(PackageKind::ImageSet),
            Some(PackageKind::IconSet),
            Some(PackageKind::Icns),
        ] {
            let packager = packager_for(&config(kind, None), Rc::clone(&converter)).unwrap();
            assert_eq!(packager.kind(), kind);
            assert_eq!(packager.destination(), Path::new("out"));
        }
    }

    #[test]
    fn test_catalog_requires_preset() {
        let converter: Rc<dyn IconConverter> = Rc::new(NoConverter);
        let result = packager_for(&config(Some(PackageKind::Catalog), None), Rc::clone(&converter));
        assert!(matches!(result, Err(PackageError::CatalogRequiresPreset)));

        let packager = packager_for(
            &config(Some(PackageKind::Catalog), Some(Preset::ImageSetForLargeSticker)),
            converter,
        )
        .unwrap();
        assert_eq!(packager.kind(), Some(PackageKind::Catalog));
    }

    #[test]
    fn test_check_destination_message() {
        let err = check_destination(PackageKind::IconSet, Path::new("x.iconset")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Destination (x.iconset) is not a .stickersiconset or .appiconset directory"
        );
    }

    #[test]
    fn test_check_single_source() {
        let one = vec![PathBuf::from("a.png")];
        let two = vec![PathBuf::from("a.png"), PathBuf::from("b.png")];
        assert!(check_single_source(PackageKind::Icns, &one).is_ok());
        assert!(check_single_source(PackageKind::Icns, &two).is_err());
        assert!(check_single_source(PackageKind::Icns, &[]).is_err());
    }

    #[test]
    fn test_clear_folder() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.png"), b"x").unwrap();
        fs::create_dir_all(temp.path().join("sub/deeper")).unwrap();

        clear_folder(temp.path());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
