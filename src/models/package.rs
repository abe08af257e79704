//! Output package kinds

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The asset package layout a run writes into.
///
/// A run without a package writes plain files into the destination folder,
/// which callers model as `Option<PackageKind>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    /// `.stickerpack` folder of `.sticker` containers
    #[value(name = "stickerpack")]
    StickerPack,
    /// `.imageset` containers with 1x/2x/3x variants
    #[value(name = "imageset")]
    ImageSet,
    /// Pre-declared `.appiconset` / `.stickersiconset`
    #[value(name = "iconset")]
    IconSet,
    /// Single `.icns` bundle built by an external tool
    #[value(name = "icns")]
    Icns,
    /// `.xcassets` catalog of sticker image sets
    #[value(name = "catalog")]
    Catalog,
}

impl PackageKind {
    /// Parse a setting value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "stickerpack" => Some(PackageKind::StickerPack),
            "imageset" => Some(PackageKind::ImageSet),
            "iconset" => Some(PackageKind::IconSet),
            "icns" => Some(PackageKind::Icns),
            "catalog" => Some(PackageKind::Catalog),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::StickerPack => "stickerpack",
            PackageKind::ImageSet => "imageset",
            PackageKind::IconSet => "iconset",
            PackageKind::Icns => "icns",
            PackageKind::Catalog => "catalog",
        }
    }

    /// Name endings the destination path must carry for this package.
    ///
    /// An empty slice means any destination is accepted.
    pub fn destination_suffixes(&self) -> &'static [&'static str] {
        match self {
            PackageKind::StickerPack => &[".stickerpack"],
            PackageKind::ImageSet => &[],
            PackageKind::IconSet => &[".stickersiconset", ".appiconset"],
            PackageKind::Icns => &[".icns"],
            PackageKind::Catalog => &[".xcassets"],
        }
    }

    /// Check a destination against [`Self::destination_suffixes`].
    pub fn accepts_destination(&self, dst: &Path) -> bool {
        let suffixes = self.destination_suffixes();
        if suffixes.is_empty() {
            return true;
        }
        let dst = dst.to_string_lossy();
        let dst = dst.trim_end_matches('/');
        suffixes.iter().any(|suffix| dst.ends_with(suffix))
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
