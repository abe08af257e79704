//! Image formats understood by the pipeline

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// An encodable image format.
///
/// "Unchanged" output is modelled as `Option<ImageFormat>::None` by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum ImageFormat {
    #[value(name = "jpg")]
    #[serde(rename = "jpg")]
    Jpeg,
    #[value(name = "png")]
    #[serde(rename = "png")]
    Png,
    #[value(name = "gif")]
    #[serde(rename = "gif")]
    Gif,
    #[value(name = "tif")]
    #[serde(rename = "tif")]
    Tiff,
}

impl ImageFormat {
    /// Parse a setting value (`jpg`, `png`, `gif`, `tif`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "jpg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "tif" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }

    /// Map a file extension (without the dot, case-sensitive) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            _ => None,
        }
    }

    /// Detect the format of a file from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    /// The canonical setting string, which is also the extension written.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Tiff => "tif",
        }
    }

    /// Extension used for files written in this format.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// The codec identifier handed to the `image` crate.
    pub fn codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_strings() {
        assert_eq!(ImageFormat::parse("jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::parse("tif"), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::parse("jpeg"), None);
        assert_eq!(ImageFormat::parse("PNG"), None);
    }

    #[test]
    fn test_from_path_accepts_long_extensions() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.jpeg")), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_path(Path::new("b.tiff")), Some(ImageFormat::Tiff));
        assert_eq!(ImageFormat::from_path(Path::new("b.PNG")), None);
        assert_eq!(ImageFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_as_str_roundtrips_through_parse() {
        for format in [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif, ImageFormat::Tiff] {
            assert_eq!(ImageFormat::parse(format.as_str()), Some(format));
        }
    }
}
