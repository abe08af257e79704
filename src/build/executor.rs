//! Per-source plan execution.

use crate::build::{ProcessError, ProcessResult};
use crate::imaging;
use crate::models::ImageFormat;
use crate::naming::{change_extension, change_suffix, file_name, has_suffix};
use crate::package::{Packager, SourceState};
use crate::plan::TransformPlan;
use image::{DynamicImage, ImageError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The output path a plan suggests for `source` inside `dst_dir`.
///
/// The extension follows the plan's output format, then the stem suffix is
/// rewritten.
pub fn destination_path(source: &Path, plan: &TransformPlan, dst_dir: &Path) -> PathBuf {
    let mut path = dst_dir.join(file_name(source));
    if let Some(format) = plan.output_format {
        path = change_extension(&path, format.extension());
    }
    if plan.remove_suffix.is_some() || plan.add_suffix.is_some() {
        path = change_suffix(
            &path,
            plan.remove_suffix.as_deref().unwrap_or(""),
            plan.add_suffix.as_deref().unwrap_or(""),
        );
    }
    path
}

/// Apply every plan to `source` in order.
///
/// A plan whose required suffix is missing is skipped and the next plan
/// runs. Any other failure is fatal and abandons the remaining plans. The
/// source is decoded at most once.
pub fn process_image<P: Packager + ?Sized>(
    source: &Path,
    plans: &[TransformPlan],
    dst_dir: &Path,
    packager: &mut P,
) -> Vec<ProcessResult> {
    info!("Processing: {}", file_name(source));

    let mut results = Vec::with_capacity(plans.len());
    let mut state = SourceState::default();
    let mut decoded: Option<DynamicImage> = None;

    for plan in plans {
        let result = run_plan(source, plan, dst_dir, packager, &mut state, &mut decoded);
        let fatal = result.is_failure();
        results.push(result);
        if fatal {
            break;
        }
    }
    results
}

fn run_plan<P: Packager + ?Sized>(
    source: &Path,
    plan: &TransformPlan,
    dst_dir: &Path,
    packager: &mut P,
    state: &mut SourceState,
    decoded: &mut Option<DynamicImage>,
) -> ProcessResult {
    if let Some(suffix) = &plan.required_suffix {
        if !has_suffix(source, suffix) {
            debug!("Skipping {}: missing suffix {}", source.display(), suffix);
            return ProcessResult::skipped(source, ProcessError::MissingSuffix(suffix.clone()));
        }
    }

    let suggested = destination_path(source, plan, dst_dir);
    let Some(source_format) = ImageFormat::from_path(source) else {
        return ProcessResult::failed(source, None, ProcessError::UnsupportedFormat);
    };
    let format = plan.output_format.unwrap_or(source_format);

    let image = match decoded.take() {
        Some(image) => image,
        None => match imaging::open(source) {
            Ok(image) => image,
            Err(e) => return ProcessResult::failed(source, Some(suggested), ProcessError::Open(e)),
        },
    };
    let output = imaging::apply_geometry(&image, plan.geometry());
    *decoded = Some(image);

    // encode before the packager records anything
    let bytes = match imaging::encode(&output, format) {
        Ok(bytes) => bytes,
        Err(e) => return ProcessResult::failed(source, Some(suggested), ProcessError::Save(e)),
    };

    let destination = match packager.place(&suggested, state) {
        Ok(path) => path,
        Err(e) => return ProcessResult::failed(source, Some(suggested), e.into()),
    };

    if let Err(e) = imaging::write(&bytes, &destination) {
        if destination.exists() {
            if let Err(remove) = fs::remove_file(&destination) {
                warn!("Error deleting partial output {}: {}", destination.display(), remove);
            }
        }
        if let Err(discard) = packager.discard(&destination) {
            warn!("Error removing {} from package: {}", destination.display(), discard);
        }
        return ProcessResult::failed(source, Some(destination), ProcessError::Save(ImageError::IoError(e)));
    }
    debug!("Wrote {}", destination.display());
    ProcessResult::success(source, destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::FolderPackager;
    use image::{GenericImageView, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])).save(path).unwrap();
    }

    #[test]
    fn test_destination_path_format_then_suffix() {
        let plan = TransformPlan {
            output_format: Some(ImageFormat::Png),
            remove_suffix: Some("@3x".to_string()),
            add_suffix: Some("@2x".to_string()),
            ..Default::default()
        };
        let path = destination_path(Path::new("in/photo@3x.jpg"), &plan, Path::new("out"));
        assert_eq!(path, PathBuf::from("out/photo@2x.png"));
    }

    #[test]
    fn test_destination_path_keeps_name() {
        let path = destination_path(Path::new("in/photo.jpeg"), &TransformPlan::default(), Path::new("out"));
        assert_eq!(path, PathBuf::from("out/photo.jpeg"));
    }

    #[test]
    fn test_process_writes_resized_output() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("wide.png");
        write_png(&source, 200, 100);
        let dst = temp.path().join("out");

        let plan = TransformPlan { box_width: 50, box_height: 50, ..Default::default() };
        let mut packager = FolderPackager::new(dst.clone(), false);
        let results = process_image(&source, &[plan], &dst, &mut packager);

        assert_eq!(results.len(), 1);
        assert!(results[0].is_success());
        let written = imaging::open(&dst.join("wide.png")).unwrap();
        assert_eq!(written.dimensions(), (50, 25));
    }

    #[test]
    fn test_suffix_skip_continues() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("photo.png");
        write_png(&source, 10, 10);
        let dst = temp.path().join("out");

        let plans = vec![
            TransformPlan { required_suffix: Some("@3x".to_string()), ..Default::default() },
            TransformPlan::default(),
        ];
        let mut packager = FolderPackager::new(dst.clone(), false);
        let results = process_image(&source, &plans, &dst, &mut packager);

        assert_eq!(results.len(), 2);
        assert!(results[0].is_skipped());
        assert!(results[1].is_success());
    }

    #[test]
    fn test_unsupported_format_is_fatal() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("photo.bmp");
        std::fs::write(&source, b"BM").unwrap();
        let dst = temp.path().join("out");

        let plans = vec![TransformPlan::default(), TransformPlan::default()];
        let mut packager = FolderPackager::new(dst.clone(), false);
        let results = process_image(&source, &plans, &dst, &mut packager);

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].error, Some(ProcessError::UnsupportedFormat)));
    }

    #[test]
    fn test_encode_failure_leaves_no_output() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("wide.png");
        write_png(&source, 70_000, 1);
        let dst = temp.path().join("out");

        let plan = TransformPlan { output_format: Some(ImageFormat::Jpeg), ..Default::default() };
        let mut packager = FolderPackager::new(dst.clone(), false);
        let results = process_image(&source, &[plan], &dst, &mut packager);

        assert!(matches!(results[0].error, Some(ProcessError::Save(_))));
        assert!(!dst.join("wide.jpg").exists());
    }

    #[test]
    fn test_decode_failure_abandons_remaining_plans() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("broken.png");
        std::fs::write(&source, b"not a png").unwrap();
        let dst = temp.path().join("out");

        let plans = vec![TransformPlan::default(), TransformPlan::default()];
        let mut packager = FolderPackager::new(dst.clone(), false);
        let results = process_image(&source, &plans, &dst, &mut packager);

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].error, Some(ProcessError::Open(_))));
        assert!(!dst.join("broken.png").exists());
    }
}
