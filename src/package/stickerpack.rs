//! `.stickerpack` packaging
//!
//! ```text
//! Pack.stickerpack/
//!   Contents.json          { "stickers": [{ "filename": "cat.sticker" }], ... }
//!   cat.sticker/
//!     Contents.json        { "properties": { "filename": "cat.png" }, ... }
//!     cat.png
//! ```

use super::contents::{
    read_contents, write_contents, StickerContents, StickerEntry, StickerPackContents,
    StickerProperties, CONTENTS_FILENAME,
};
use super::{check_destination, PackageError, Packager, SourceState};
use crate::models::{PackageKind, Preset};
use crate::naming::{change_extension, file_name};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Places each output in its own `.sticker` container inside the pack.
#[derive(Debug)]
pub struct StickerPackPackager {
    dst: PathBuf,
    replace: bool,
    preset: Option<Preset>,
}

impl StickerPackPackager {
    pub fn new(dst: PathBuf, replace: bool, preset: Option<Preset>) -> Self {
        Self { dst, replace, preset }
    }

    fn contents_path(&self) -> PathBuf {
        self.dst.join(CONTENTS_FILENAME)
    }

    /// The pack sidecar, or an empty one when the pack is new.
    fn load(&self) -> Result<StickerPackContents, PackageError> {
        let path = self.contents_path();
        if path.exists() {
            read_contents(&path)
        } else {
            Ok(StickerPackContents::default())
        }
    }

    /// Remove every listed sticker container and empty the list.
    fn clear(&self, contents: &mut StickerPackContents) {
        info!("Clearing sticker pack {}", self.dst.display());
        for sticker in contents.stickers.drain(..) {
            let path = self.dst.join(&sticker.filename);
            if path.exists() {
                if let Err(e) = fs::remove_dir_all(&path) {
                    warn!("Error deleting sticker {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl Packager for StickerPackPackager {
    fn kind(&self) -> Option<PackageKind> {
        Some(PackageKind::StickerPack)
    }

    fn destination(&self) -> &Path {
        &self.dst
    }

    fn prepare(&mut self, _sources: &[PathBuf]) -> Result<(), PackageError> {
        check_destination(PackageKind::StickerPack, &self.dst)?;
        fs::create_dir_all(&self.dst).map_err(|e| PackageError::io(&self.dst, e))?;

        let mut contents = self.load()?;
        if self.replace {
            self.clear(&mut contents);
        }
        if let Some(grid_size) = self.preset.and_then(|p| p.sticker_grid_size()) {
            debug!("Sticker grid size: {}", grid_size);
            contents.properties.grid_size = grid_size.to_string();
        }
        write_contents(&self.contents_path(), &contents)
    }

    fn place(&mut self, suggested: &Path, _state: &mut SourceState) -> Result<PathBuf, PackageError> {
        let filename = file_name(suggested);
        let sticker_name = file_name(&change_extension(Path::new(&filename), "sticker"));
        let sticker_dir = self.dst.join(&sticker_name);
        fs::create_dir_all(&sticker_dir).map_err(|e| PackageError::io(&sticker_dir, e))?;

        let sticker = StickerContents {
            properties: StickerProperties { filename: filename.clone() },
            ..Default::default()
        };
        write_contents(&sticker_dir.join(CONTENTS_FILENAME), &sticker)?;

        let mut contents = self.load()?;
        if !contents.stickers.iter().any(|s| s.filename == sticker_name) {
            contents.stickers.push(StickerEntry { filename: sticker_name });
        }
        write_contents(&self.contents_path(), &contents)?;

        Ok(sticker_dir.join(filename))
    }

    fn discard(&mut self, placed: &Path) -> Result<(), PackageError> {
        let Some(sticker_dir) = placed.parent() else {
            return Ok(());
        };
        if sticker_dir.exists() {
            fs::remove_dir_all(sticker_dir).map_err(|e| PackageError::io(sticker_dir, e))?;
        }

        let sticker_name = file_name(sticker_dir);
        let mut contents = self.load()?;
        contents.stickers.retain(|s| s.filename != sticker_name);
        write_contents(&self.contents_path(), &contents)
    }
}
