//! `.imageset` packaging
//!
//! Outputs of one source are grouped into a set named after the image with
//! its `@2x`/`@3x` suffix removed: `photo@2x.png` lands in
//! `photo.imageset/photo@2x.png` with a `2x` record.

use super::contents::{read_contents, write_contents, ImageRecord, ImageSetContents, CONTENTS_FILENAME};
use super::{clear_folder, PackageError, Packager, SourceState};
use crate::models::PackageKind;
use crate::naming::{change_extension, change_suffix, file_name, has_suffix};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Groups the variants of each source into an image set.
#[derive(Debug)]
pub struct ImageSetPackager {
    dst: PathBuf,
    replace: bool,
}

impl ImageSetPackager {
    pub fn new(dst: PathBuf, replace: bool) -> Self {
        Self { dst, replace }
    }
}

/// The set container for an image path.
///
/// ```
/// use imgx::package::imageset::image_set_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(image_set_path(Path::new("out/photo@3x.png")), PathBuf::from("out/photo.imageset"));
/// ```
pub fn image_set_path(image: &Path) -> PathBuf {
    let path = change_extension(image, "imageset");
    let path = change_suffix(&path, "@2x", "");
    change_suffix(&path, "@3x", "")
}

/// The record scale for an image name.
pub fn scale_for(image: &Path) -> &'static str {
    if has_suffix(image, "@2x") {
        "2x"
    } else if has_suffix(image, "@3x") {
        "3x"
    } else {
        "1x"
    }
}

/// Recreate `set_dir` empty with a fresh sidecar.
fn reset_set(set_dir: &Path) -> Result<(), PackageError> {
    if set_dir.exists() {
        if let Err(e) = fs::remove_dir_all(set_dir) {
            warn!("Error deleting image set {}: {}", set_dir.display(), e);
        }
    }
    fs::create_dir_all(set_dir).map_err(|e| PackageError::io(set_dir, e))?;
    write_contents(&set_dir.join(CONTENTS_FILENAME), &ImageSetContents::default())
}

impl Packager for ImageSetPackager {
    fn kind(&self) -> Option<PackageKind> {
        Some(PackageKind::ImageSet)
    }

    fn destination(&self) -> &Path {
        &self.dst
    }

    fn prepare(&mut self, _sources: &[PathBuf]) -> Result<(), PackageError> {
        if self.replace {
            info!("Clearing {}", self.dst.display());
            clear_folder(&self.dst);
        }
        Ok(())
    }

    fn place(&mut self, suggested: &Path, state: &mut SourceState) -> Result<PathBuf, PackageError> {
        let set_dir = image_set_path(suggested);
        if !state.container_ready {
            debug!("Resetting {}", set_dir.display());
            reset_set(&set_dir)?;
            state.container_ready = true;
        }

        let contents_path = set_dir.join(CONTENTS_FILENAME);
        let mut contents: ImageSetContents = read_contents(&contents_path)?;

        let filename = file_name(suggested);
        contents.images.retain(|r| r.filename.as_deref() != Some(filename.as_str()));
        contents.images.push(ImageRecord::universal(filename.clone(), scale_for(suggested)));
        write_contents(&contents_path, &contents)?;

        Ok(set_dir.join(filename))
    }

    fn discard(&mut self, placed: &Path) -> Result<(), PackageError> {
        let Some(set_dir) = placed.parent() else {
            return Ok(());
        };
        let contents_path = set_dir.join(CONTENTS_FILENAME);
        let mut contents: ImageSetContents = read_contents(&contents_path)?;
        let filename = file_name(placed);
        contents.images.retain(|r| r.filename.as_deref() != Some(filename.as_str()));
        write_contents(&contents_path, &contents)
    }
}
