//! Named presets

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named shorthand that expands to one or more transform plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    #[value(name = "smallSticker")]
    SmallSticker,
    #[value(name = "mediumSticker")]
    MediumSticker,
    #[value(name = "largeSticker")]
    LargeSticker,
    #[value(name = "thumb256")]
    Thumb256,
    #[value(name = "imageSet")]
    ImageSet,
    #[value(name = "imageSetForLargeSticker")]
    ImageSetForLargeSticker,
    #[value(name = "largeStickerWithImageSet")]
    LargeStickerWithImageSet,
}

impl Preset {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "smallSticker" => Some(Preset::SmallSticker),
            "mediumSticker" => Some(Preset::MediumSticker),
            "largeSticker" => Some(Preset::LargeSticker),
            "thumb256" => Some(Preset::Thumb256),
            "imageSet" => Some(Preset::ImageSet),
            "imageSetForLargeSticker" => Some(Preset::ImageSetForLargeSticker),
            "largeStickerWithImageSet" => Some(Preset::LargeStickerWithImageSet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::SmallSticker => "smallSticker",
            Preset::MediumSticker => "mediumSticker",
            Preset::LargeSticker => "largeSticker",
            Preset::Thumb256 => "thumb256",
            Preset::ImageSet => "imageSet",
            Preset::ImageSetForLargeSticker => "imageSetForLargeSticker",
            Preset::LargeStickerWithImageSet => "largeStickerWithImageSet",
        }
    }

    /// The sticker pack `grid-size` property matching a sticker preset.
    pub fn sticker_grid_size(&self) -> Option<&'static str> {
        match self {
            Preset::SmallSticker => Some("small"),
            Preset::MediumSticker => Some("regular"),
            Preset::LargeSticker => Some("large"),
            _ => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
