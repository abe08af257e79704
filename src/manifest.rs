//! Line-oriented manifest files
//!
//! A manifest selects source files and overrides settings, one block at a
//! time. The grammar is deliberately tiny:
//!
//! ```text
//! # comment
//! = dst, ~~/out
//! = preset, imageSet
//! photo@3x.png
//! --
//! = src, ~/Pictures/stickers
//! ```
//!
//! - `# ` starts a comment line
//! - `= key, value[, value...]` is a setting
//! - `--` closes the current block and starts a new one
//! - any other non-blank line is a file name
//!
//! The final block is always emitted, even when empty.

use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Error reading a manifest or writing the sample manifest
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("failed to write manifest {path}: {source}")]
    Write { path: String, source: std::io::Error },
}

/// One `= key, values...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    pub key: String,
    pub values: Vec<String>,
}

impl Setting {
    /// The first value. Parsed settings always carry at least one.
    pub fn value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

/// Settings and file names between two `--` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestBlock {
    pub files: Vec<String>,
    pub settings: Vec<Setting>,
}

impl ManifestBlock {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.settings.is_empty()
    }
}

/// Parse a single setting line body (the text after `= `).
///
/// Returns `None` when fewer than two comma-separated fields are present.
pub fn parse_setting(body: &str) -> Option<Setting> {
    let mut parts = body.split(',').map(str::trim);
    let key = parts.next()?.to_string();
    let values: Vec<String> = parts.map(str::to_string).collect();
    if values.is_empty() {
        return None;
    }
    Some(Setting { key, values })
}

/// Parse manifest text into its ordered blocks.
pub fn parse_manifest(text: &str) -> Vec<ManifestBlock> {
    let mut blocks = Vec::new();
    let mut current = ManifestBlock::default();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with("# ") {
            continue;
        } else if let Some(body) = line.strip_prefix("= ") {
            match parse_setting(body) {
                Some(setting) => current.settings.push(setting),
                None => warn!("Bad setting in manifest (line {}): {}", index + 1, line),
            }
        } else if line.starts_with("--") {
            blocks.push(std::mem::take(&mut current));
        } else {
            current.files.push(line.to_string());
        }
    }

    blocks.push(current);
    blocks
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestBlock>, ManifestError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ManifestError::Read { path: path.display().to_string(), source })?;
    Ok(parse_manifest(&text))
}

/// A commented manifest documenting every recognized setting.
pub const SAMPLE_MANIFEST: &str = "\
# imgx manifest
#
# Lines starting with '# ' are comments.
# Lines starting with '= ' are settings: '= key, value[, value...]'.
# A line starting with '--' ends the current block and starts a new one.
# Every other line names a source file; when a block lists files, only
# those files are processed and all of them must exist.
#
# Path settings (src, dst, out-manifest) accept '~~/' for paths relative to
# this manifest's directory and '~/' for paths relative to your home.

# directory (or single file) with source images
= src, ~~/images
# directory or package to write output into
= dst, ~~/Stickers.xcstickers/Sticker Pack.stickerpack
# preset: smallSticker, mediumSticker, largeSticker, thumb256, imageSet,
#         imageSetForLargeSticker, largeStickerWithImageSet
= preset, largeSticker
# source extensions to accept (jpg also accepts jpeg, tif also accepts tiff)
= valid-format, png, jpg
# output image format: jpg, png, gif, tif (omit to keep the source format)
= out-format, png
# output package: stickerpack, imageset, iconset, icns, catalog
= out-package, stickerpack
# clear the package before adding images: true | false
= out-package-replace, true
# write the processed image names as a JSON array (catalog only)
# = out-manifest, ~~/names.json
# uniform scale factor; cannot be combined with the max-* settings
# = scale, 0.5
# bounding box; max-px sets both width and height
# = max-px, 512
# = max-width-px, 512
# = max-height-px, 256

cat.png
dog.png
--
# a second block starts from the command line settings again
= src, ~~/icons/app@3x.png
= dst, ~~/Assets.xcassets/AppIcon.appiconset
= out-package, iconset
";

/// Write [`SAMPLE_MANIFEST`] to `path`.
pub fn write_sample_manifest(path: &Path) -> Result<(), ManifestError> {
    fs::write(path, SAMPLE_MANIFEST)
        .map_err(|source| ManifestError::Write { path: path.display().to_string(), source })
}
