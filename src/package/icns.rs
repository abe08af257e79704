//! `.icns` bundle packaging
//!
//! The source is filled into the ten standard icon variants inside a
//! temporary `<name>.iconset` directory next to the destination, which an
//! [`IconConverter`] then compresses into the `.icns` file. The temporary
//! directory is removed afterwards whether or not conversion succeeded.

use super::{check_destination, check_single_source, PackageError, Packager};
use crate::build::{ProcessError, ProcessResult};
use crate::imaging;
use crate::models::{ImageFormat, PackageKind};
use crate::naming::{change_extension, file_name, has_suffix};
use crate::plan::TransformPlan;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// `(points, scale)` of every variant an icns bundle is built from.
pub const ICNS_VARIANTS: [(u32, u32); 10] = [
    (16, 1),
    (16, 2),
    (32, 1),
    (32, 2),
    (128, 1),
    (128, 2),
    (256, 1),
    (256, 2),
    (512, 1),
    (512, 2),
];

/// Compresses an `.iconset` directory into an `.icns` file.
pub trait IconConverter {
    fn convert(&self, iconset: &Path, output: &Path) -> Result<(), PackageError>;
}

/// Runs macOS `iconutil`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Iconutil;

impl IconConverter for Iconutil {
    fn convert(&self, iconset: &Path, output: &Path) -> Result<(), PackageError> {
        debug!("iconutil --convert icns --output {} {}", output.display(), iconset.display());
        let result = Command::new("iconutil")
            .args(["--convert", "icns", "--output"])
            .arg(output)
            .arg(iconset)
            .output()
            .map_err(|e| PackageError::ConverterUnavailable { tool: "iconutil".to_string(), source: e })?;

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            Err(PackageError::ConvertFailed(format!("{} {}", result.status, stderr.trim())))
        }
    }
}

/// Name of a variant inside the iconset, e.g. `icon_32x32@2x.png`.
pub fn variant_name(points: u32, scale: u32) -> String {
    if scale == 2 {
        format!("icon_{points}x{points}@2x.png")
    } else {
        format!("icon_{points}x{points}.png")
    }
}

/// Builds a single `.icns` bundle from one source.
pub struct IcnsPackager {
    dst: PathBuf,
    converter: Rc<dyn IconConverter>,
}

impl IcnsPackager {
    pub fn new(dst: PathBuf, converter: Rc<dyn IconConverter>) -> Self {
        Self { dst, converter }
    }

    /// The temporary variant directory.
    pub fn iconset_dir(&self) -> PathBuf {
        change_extension(&self.dst, "iconset")
    }

    /// Write every variant; returns the failures, empty when all were written.
    fn write_variants(&self, source: &Path, plan: &TransformPlan, iconset: &Path) -> Vec<ProcessResult> {
        if let Some(suffix) = &plan.required_suffix {
            if !has_suffix(source, suffix) {
                return vec![ProcessResult::skipped(source, ProcessError::MissingSuffix(suffix.clone()))];
            }
        }
        if ImageFormat::from_path(source).is_none() {
            return vec![ProcessResult::failed(source, None, ProcessError::UnsupportedFormat)];
        }
        let image = match imaging::open(source) {
            Ok(image) => image,
            Err(e) => return vec![ProcessResult::failed(source, None, ProcessError::Open(e))],
        };

        let mut failures = Vec::new();
        for (points, scale) in ICNS_VARIANTS {
            let pixels = points * scale;
            let path = iconset.join(variant_name(points, scale));
            let output = imaging::fill(&image, pixels, pixels);
            if let Err(e) = imaging::save(&output, &path, ImageFormat::Png) {
                failures.push(ProcessResult::failed(source, Some(path), ProcessError::Save(e)));
            }
        }
        failures
    }
}

impl Packager for IcnsPackager {
    fn kind(&self) -> Option<PackageKind> {
        Some(PackageKind::Icns)
    }

    fn destination(&self) -> &Path {
        &self.dst
    }

    fn prepare(&mut self, sources: &[PathBuf]) -> Result<(), PackageError> {
        check_destination(PackageKind::Icns, &self.dst)?;
        check_single_source(PackageKind::Icns, sources)
    }

    fn process_source(&mut self, source: &Path, plans: &[TransformPlan]) -> Vec<ProcessResult> {
        info!("Processing: {}", file_name(source));
        let plan = plans.first().cloned().unwrap_or_default();

        let iconset = self.iconset_dir();
        if let Err(e) = fs::create_dir_all(&iconset) {
            return vec![ProcessResult::failed(source, None, PackageError::io(&iconset, e).into())];
        }

        let mut results = self.write_variants(source, &plan, &iconset);
        if results.is_empty() {
            match self.converter.convert(&iconset, &self.dst) {
                Ok(()) => results.push(ProcessResult::success(source, self.dst.clone())),
                Err(e) => results.push(ProcessResult::failed(source, Some(self.dst.clone()), e.into())),
            }
        }

        if let Err(e) = fs::remove_dir_all(&iconset) {
            warn!("Error deleting {}: {}", iconset.display(), e);
        }
        results
    }
}
