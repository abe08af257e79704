//! `Contents.json` sidecar documents
//!
//! Every container in an asset catalog carries a `Contents.json` with an
//! `info` header and a shape specific to the container kind:
//!
//! ```json
//! {
//!   "images": [
//!     { "filename": "photo.png", "idiom": "universal", "scale": "1x" }
//!   ],
//!   "info": { "version": 1, "author": "xcode" }
//! }
//! ```

use super::PackageError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name of every sidecar.
pub const CONTENTS_FILENAME: &str = "Contents.json";

/// `info.author` written into every sidecar.
pub const AUTHOR: &str = "xcode";

/// `info.version` written into every sidecar.
pub const VERSION: i32 = 1;

/// `info` header shared by all sidecar shapes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub version: i32,
    pub author: String,
}

impl Default for Info {
    fn default() -> Self {
        Self { version: VERSION, author: AUTHOR.to_string() }
    }
}

/// Sidecar of a `.stickerpack`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerPackContents {
    pub stickers: Vec<StickerEntry>,
    pub info: Info,
    pub properties: StickerPackProperties,
}

/// One `.sticker` container referenced by a pack
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerEntry {
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerPackProperties {
    #[serde(rename = "grid-size")]
    pub grid_size: String,
}

/// Sidecar of a `.sticker`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerContents {
    pub info: Info,
    pub properties: StickerProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerProperties {
    pub filename: String,
}

/// Sidecar of an `.imageset`, `.appiconset` or `.stickersiconset`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSetContents {
    pub images: Vec<ImageRecord>,
    pub info: Info,
}

/// One member image.
///
/// Keys this tool does not manage (`role`, `subtype`, ...) are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idiom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImageRecord {
    /// A `universal` record for `filename` at `scale` (`1x`, `2x`, `3x`).
    pub fn universal(filename: impl Into<String>, scale: &str) -> Self {
        Self {
            filename: Some(filename.into()),
            idiom: Some("universal".to_string()),
            scale: Some(scale.to_string()),
            ..Default::default()
        }
    }
}

/// Sidecar at the root of an `.xcassets` catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogContents {
    pub info: Info,
}

/// Read a sidecar.
pub fn read_contents<T: DeserializeOwned>(path: &Path) -> Result<T, PackageError> {
    let data = fs::read(path).map_err(|e| PackageError::io(path, e))?;
    serde_json::from_slice(&data).map_err(|e| PackageError::Json { path: path.to_path_buf(), source: e })
}

/// Write a sidecar, pretty-printed with two-space indentation.
pub fn write_contents<T: Serialize>(path: &Path, contents: &T) -> Result<(), PackageError> {
    let json = serde_json::to_string_pretty(contents)
        .map_err(|e| PackageError::Json { path: path.to_path_buf(), source: e })?;
    fs::write(path, json).map_err(|e| PackageError::io(path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
