//! Transform plans and preset compilation
//!
//! A [`TransformPlan`] is one geometry + format + package recipe applied to
//! a source image. Presets expand to an ordered list of plans; without a
//! preset a single plan is taken from the configuration's scalar settings.
//!
//! | preset | plans |
//! |--------|-------|
//! | `smallSticker` / `mediumSticker` / `largeSticker` | 300 / 408 / 618 px box, PNG |
//! | `thumb256` | 256 px box |
//! | `imageSet` | `@3x` source at scale 1, 2/3 (`@2x`) and 1/3 (no suffix) |
//! | `imageSetForLargeSticker` | 618 px box, PNG |
//! | `largeStickerWithImageSet` | 206 px box `@1x`, 618 px box `@3x`, PNG |

use crate::config::Configuration;
use crate::models::{ImageFormat, PackageKind, Preset};

/// Scale value meaning "keep the source size".
pub const NEUTRAL_SCALE: f64 = 1.0;

/// One recipe applied to a source image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformPlan {
    /// Uniform scale factor; `0` means unset
    pub scale: f64,
    /// Bounding box width for fit; `0` means unconstrained
    pub box_width: u32,
    /// Bounding box height for fit; `0` means unconstrained
    pub box_height: u32,
    /// `None` keeps the source format
    pub output_format: Option<ImageFormat>,
    pub output_package: Option<PackageKind>,
    /// Sources whose stem lacks this suffix skip the plan
    pub required_suffix: Option<String>,
    /// Suffix stripped from the destination stem
    pub remove_suffix: Option<String>,
    /// Suffix appended to the destination stem
    pub add_suffix: Option<String>,
}

/// What a plan does to the pixels, in priority order of the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Multiply both dimensions by the factor
    Scale(f64),
    /// Write the source unresized
    Passthrough,
    /// Resize to this width keeping the aspect ratio
    Width(u32),
    /// Resize to this height keeping the aspect ratio
    Height(u32),
    /// Fit inside the box keeping the aspect ratio
    Fit { width: u32, height: u32 },
}

impl TransformPlan {
    /// The plan described by a configuration's scalar settings.
    pub fn from_configuration(config: &Configuration) -> Self {
        Self {
            scale: config.scale,
            box_width: config.max_width,
            box_height: config.max_height,
            output_format: config.out_format,
            output_package: config.out_package,
            ..Default::default()
        }
    }

    /// A square fit box.
    fn square(size: u32, format: Option<ImageFormat>, package: Option<PackageKind>) -> Self {
        Self {
            box_width: size,
            box_height: size,
            output_format: format,
            output_package: package,
            ..Default::default()
        }
    }

    fn with_suffixes(mut self, required: Option<&str>, remove: Option<&str>, add: Option<&str>) -> Self {
        self.required_suffix = required.map(str::to_string);
        self.remove_suffix = remove.map(str::to_string);
        self.add_suffix = add.map(str::to_string);
        self
    }

    /// Resolve the geometry policy.
    ///
    /// A non-zero scale wins (the neutral scale passes through); otherwise
    /// two zero box dimensions pass through, one zero dimension resizes the
    /// other axis only, and a full box fits.
    pub fn geometry(&self) -> Geometry {
        if self.scale != 0.0 {
            if self.scale == NEUTRAL_SCALE {
                return Geometry::Passthrough;
            }
            return Geometry::Scale(self.scale);
        }

        match (self.box_width, self.box_height) {
            (0, 0) => Geometry::Passthrough,
            (width, 0) => Geometry::Width(width),
            (0, height) => Geometry::Height(height),
            (width, height) => Geometry::Fit { width, height },
        }
    }
}

/// Expand `preset` into its plans, propagating `base`'s package kind and,
/// where the preset does not force one, its output format.
pub fn compile_plans(preset: Option<Preset>, base: &TransformPlan) -> Vec<TransformPlan> {
    let package = base.output_package;
    let format = base.output_format;
    let png = Some(ImageFormat::Png);

    let Some(preset) = preset else {
        return vec![base.clone()];
    };

    match preset {
        Preset::SmallSticker => vec![TransformPlan::square(300, png, package)],
        Preset::MediumSticker => vec![TransformPlan::square(408, png, package)],
        Preset::LargeSticker => vec![TransformPlan::square(618, png, package)],
        Preset::Thumb256 => vec![TransformPlan::square(256, format, package)],
        Preset::ImageSet => {
            let scaled = |scale: f64| TransformPlan {
                scale,
                output_format: format,
                output_package: package,
                ..Default::default()
            };
            vec![
                scaled(1.0).with_suffixes(Some("@3x"), None, None),
                scaled(0.666666).with_suffixes(Some("@3x"), Some("@3x"), Some("@2x")),
                scaled(0.333333).with_suffixes(Some("@3x"), Some("@3x"), None),
            ]
        }
        Preset::ImageSetForLargeSticker => vec![TransformPlan::square(618, png, package)],
        Preset::LargeStickerWithImageSet => vec![
            TransformPlan::square(206, png, package).with_suffixes(None, None, Some("@1x")),
            TransformPlan::square(618, png, package).with_suffixes(None, None, Some("@3x")),
        ],
    }
}
