//! Icon set and icns package tests
//!
//! Icon sets fill a pre-declared `Contents.json`; icns bundles go through a
//! fake converter so no external tool is needed.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

use image::{GenericImageView, Rgba, RgbaImage};
use imgx::build::{BuildError, Pipeline, ProcessError, RunReport};
use imgx::config::Configuration;
use imgx::models::PackageKind;
use imgx::package::contents::ImageSetContents;
use imgx::package::{IconConverter, PackageError};

// ============================================================================
// Test Utilities
// ============================================================================

fn write_png(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(width, height, Rgba([250, 120, 0, 255])).save(path).unwrap();
}

fn icon_config(src: &Path, dst: &Path, package: PackageKind) -> Configuration {
    Configuration {
        src: Some(src.to_path_buf()),
        dst: Some(dst.to_path_buf()),
        out_package: Some(package),
        ..Default::default()
    }
}

fn run_with(config: &Configuration, converter: Rc<dyn IconConverter>) -> Result<RunReport, BuildError> {
    Pipeline::new(config.clone()).with_converter(converter).run_block(config, &[])
}

/// Records what it was asked to convert and writes a stub bundle.
#[derive(Default)]
struct FakeConverter {
    fail: bool,
    seen: RefCell<Vec<Vec<String>>>,
}

impl IconConverter for FakeConverter {
    fn convert(&self, iconset: &Path, output: &Path) -> Result<(), PackageError> {
        let mut names: Vec<String> = fs::read_dir(iconset)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        self.seen.borrow_mut().push(names);

        if self.fail {
            return Err(PackageError::ConvertFailed("exit status: 1".to_string()));
        }
        fs::write(output, b"icns").unwrap();
        Ok(())
    }
}

const APP_ICON_CONTENTS: &str = r#"{
  "images" : [
    { "idiom" : "mac", "size" : "32x32", "scale" : "2x" },
    { "idiom" : "mac", "size" : "16x16", "scale" : "1x", "filename" : "old-16.png" }
  ],
  "info" : { "version" : 1, "author" : "xcode" }
}"#;

// ============================================================================
// Icon Set
// ============================================================================

#[test]
fn test_icon_set_fills_declared_entries() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/icon.png");
    write_png(&src, 200, 100);
    let dst = temp.path().join("AppIcon.appiconset");
    fs::create_dir_all(&dst).unwrap();
    fs::write(dst.join("Contents.json"), APP_ICON_CONTENTS).unwrap();
    fs::write(dst.join("old-16.png"), b"stale").unwrap();

    let report = run_with(&icon_config(&src, &dst, PackageKind::IconSet), Rc::new(FakeConverter::default())).unwrap();

    assert!(report.is_success(), "{:?}", report.error_lines());
    assert_eq!(report.success_count(), 2);
    assert_eq!(image::open(dst.join("icon-32x32-2x.png")).unwrap().dimensions(), (64, 64));
    assert_eq!(image::open(dst.join("icon-16x16-1x.png")).unwrap().dimensions(), (16, 16));
    assert!(!dst.join("old-16.png").exists());

    let contents: ImageSetContents =
        serde_json::from_str(&fs::read_to_string(dst.join("Contents.json")).unwrap()).unwrap();
    assert_eq!(contents.images.len(), 2);
    assert_eq!(contents.images[0].filename.as_deref(), Some("icon-32x32-2x.png"));
    assert_eq!(contents.images[1].filename.as_deref(), Some("icon-16x16-1x.png"));
    assert_eq!(contents.images[0].idiom.as_deref(), Some("mac"));
}

#[test]
fn test_icon_set_missing_scale_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/icon.png");
    write_png(&src, 64, 64);
    let dst = temp.path().join("Stickers.stickersiconset");
    fs::create_dir_all(&dst).unwrap();
    let contents = r#"{"images":[{"size":"16x16","scale":"1x"},{"size":"32x32"}],"info":{"version":1,"author":"xcode"}}"#;
    fs::write(dst.join("Contents.json"), contents).unwrap();

    let report = run_with(&icon_config(&src, &dst, PackageKind::IconSet), Rc::new(FakeConverter::default())).unwrap();

    assert_eq!(report.failed_count(), 1);
    assert!(matches!(report.results[0].error, Some(ProcessError::Package(PackageError::MissingScale))));
    assert!(!dst.join("icon-16x16-1x.png").exists());
    assert_eq!(fs::read_to_string(dst.join("Contents.json")).unwrap(), contents);
}

#[test]
fn test_icon_set_requires_single_source() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in");
    write_png(&src.join("a.png"), 16, 16);
    write_png(&src.join("b.png"), 16, 16);
    let dst = temp.path().join("AppIcon.appiconset");
    fs::create_dir_all(&dst).unwrap();
    fs::write(dst.join("Contents.json"), APP_ICON_CONTENTS).unwrap();

    let result = run_with(&icon_config(&src, &dst, PackageKind::IconSet), Rc::new(FakeConverter::default()));
    assert!(matches!(
        result,
        Err(BuildError::Package(PackageError::SingleSourceRequired(PackageKind::IconSet)))
    ));
}

#[test]
fn test_icon_set_requires_existing_sidecar() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/icon.png");
    write_png(&src, 16, 16);
    let dst = temp.path().join("AppIcon.appiconset");

    let result = run_with(&icon_config(&src, &dst, PackageKind::IconSet), Rc::new(FakeConverter::default()));
    assert!(matches!(result, Err(BuildError::Package(PackageError::Io { .. }))));
}

// ============================================================================
// Icns
// ============================================================================

#[test]
fn test_icns_converts_ten_variants() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/app.png");
    write_png(&src, 1024, 1024);
    let dst = temp.path().join("App.icns");
    let converter = Rc::new(FakeConverter::default());

    let report = run_with(&icon_config(&src, &dst, PackageKind::Icns), converter.clone()).unwrap();

    assert!(report.is_success(), "{:?}", report.error_lines());
    assert_eq!(report.outputs(), vec![dst.as_path()]);
    assert!(dst.exists());
    assert!(!temp.path().join("App.iconset").exists());

    let seen = converter.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].len(), 10);
    assert!(seen[0].contains(&"icon_16x16.png".to_string()));
    assert!(seen[0].contains(&"icon_512x512@2x.png".to_string()));
}

#[test]
fn test_icns_conversion_failure_still_cleans_up() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/app.png");
    write_png(&src, 64, 64);
    let dst = temp.path().join("App.icns");
    let converter = Rc::new(FakeConverter { fail: true, ..Default::default() });

    let report = run_with(&icon_config(&src, &dst, PackageKind::Icns), converter.clone()).unwrap();

    assert_eq!(report.failed_count(), 1);
    assert!(matches!(
        report.results[0].error,
        Some(ProcessError::Package(PackageError::ConvertFailed(_)))
    ));
    assert_eq!(converter.seen.borrow()[0].len(), 10);
    assert!(!dst.exists());
    assert!(!temp.path().join("App.iconset").exists());
}

#[test]
fn test_icns_unreadable_source_skips_conversion() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/app.png");
    fs::create_dir_all(src.parent().unwrap()).unwrap();
    fs::write(&src, b"not an image").unwrap();
    let dst = temp.path().join("App.icns");
    let converter = Rc::new(FakeConverter::default());

    let report = run_with(&icon_config(&src, &dst, PackageKind::Icns), converter.clone()).unwrap();

    assert_eq!(report.failed_count(), 1);
    assert!(converter.seen.borrow().is_empty());
    assert!(!temp.path().join("App.iconset").exists());
}

#[test]
fn test_icns_destination_suffix() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("in/app.png");
    write_png(&src, 16, 16);
    let dst: PathBuf = temp.path().join("App.png");

    let result = run_with(&icon_config(&src, &dst, PackageKind::Icns), Rc::new(FakeConverter::default()));
    assert!(matches!(result, Err(BuildError::Package(PackageError::InvalidDestination { .. }))));
}
