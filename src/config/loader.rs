//! Configuration loading and resolution
//!
//! Provides functions to find and load `imgx.toml`, fold command line
//! overrides into it, and apply manifest block settings on top.

use super::schema::{ConfigError, Configuration, ImgxConfig};
use crate::manifest::Setting;
use crate::models::{ImageFormat, PackageKind, Preset};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Default configuration file name.
pub const CONFIG_FILENAME: &str = "imgx.toml";

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub src: Option<PathBuf>,
    pub dst: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub preset: Option<Preset>,
    pub valid_formats: Vec<ImageFormat>,
    pub out_format: Option<ImageFormat>,
    pub out_manifest: Option<PathBuf>,
    pub out_package: Option<PackageKind>,
    pub out_package_replace: bool,
    pub scale: Option<f64>,
    pub max_px: Option<u32>,
    pub max_width_px: Option<u32>,
    pub max_height_px: Option<u32>,
}

/// Find `imgx.toml` by walking up from the current working directory,
/// falling back to the XDG config directory.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Checks XDG_CONFIG_HOME/imgx/imgx.toml or ~/.config/imgx/imgx.toml
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("imgx").join(CONFIG_FILENAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find `imgx.toml` by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from the discovered file.
///
/// A missing file yields the default (empty) configuration.
pub fn load_config(path: Option<&Path>) -> Result<ImgxConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            debug!("Using config: {}", p.display());
            let contents = fs::read_to_string(&p)?;
            Ok(toml::from_str(&contents)?)
        }
        None => Ok(ImgxConfig::default()),
    }
}

/// Fold command line overrides into a base configuration.
///
/// `scale` excludes every max dimension and `max-px` excludes the per-axis
/// limits. Zero values count as "not given".
pub fn merge_cli_overrides(
    base: &Configuration,
    overrides: &CliOverrides,
) -> Result<Configuration, ConfigError> {
    let scale = overrides.scale.filter(|s| *s != 0.0);
    let max_px = overrides.max_px.filter(|v| *v != 0);
    let max_width = overrides.max_width_px.filter(|v| *v != 0);
    let max_height = overrides.max_height_px.filter(|v| *v != 0);

    if scale.is_some() && (max_px.is_some() || max_width.is_some() || max_height.is_some()) {
        return Err(ConfigError::ScaleWithMaxSize);
    }
    if max_px.is_some() && (max_width.is_some() || max_height.is_some()) {
        return Err(ConfigError::MaxPxWithAxis);
    }

    let mut config = base.clone();

    if let Some(src) = &overrides.src {
        if !src.exists() {
            return Err(ConfigError::SourceNotFound(src.clone()));
        }
        config.src = Some(src.clone());
    }
    if let Some(dst) = &overrides.dst {
        config.dst = Some(dst.clone());
    }
    if let Some(manifest) = &overrides.manifest {
        let absolute = fs::canonicalize(manifest)
            .map_err(|_| ConfigError::ManifestNotFound(manifest.clone()))?;
        config.manifest = Some(absolute);
    }
    if let Some(preset) = overrides.preset {
        config.preset = Some(preset);
    }
    if !overrides.valid_formats.is_empty() {
        config.valid_formats =
            overrides.valid_formats.iter().map(|f| f.as_str().to_string()).collect();
    }
    if let Some(format) = overrides.out_format {
        config.out_format = Some(format);
    }
    if let Some(out_manifest) = &overrides.out_manifest {
        config.out_manifest = Some(out_manifest.clone());
    }
    if let Some(package) = overrides.out_package {
        config.out_package = Some(package);
    }
    if overrides.out_package_replace {
        config.out_package_replace = true;
    }
    if let Some(scale) = scale {
        config.scale = scale;
    }
    if let Some(max_px) = max_px {
        config.max_width = max_px;
        config.max_height = max_px;
    }
    if let Some(width) = max_width {
        config.max_width = width;
    }
    if let Some(height) = max_height {
        config.max_height = height;
    }

    Ok(config)
}

/// Apply one manifest block's settings, in order, to `base`.
///
/// Unknown keys and unparseable values are logged and skipped.
pub fn apply_settings(base: &Configuration, settings: &[Setting]) -> Configuration {
    let mut config = base.clone();
    let manifest_dir = config.manifest.as_deref().and_then(Path::parent).map(Path::to_path_buf);

    for setting in settings {
        let value = setting.value();
        match setting.key.as_str() {
            "src" => config.src = Some(resolve_setting_path(value, manifest_dir.as_deref())),
            "dst" => config.dst = Some(resolve_setting_path(value, manifest_dir.as_deref())),
            "out-manifest" => {
                config.out_manifest = Some(resolve_setting_path(value, manifest_dir.as_deref()))
            }
            "preset" => match Preset::parse(value) {
                Some(preset) => config.preset = Some(preset),
                None => warn!("Unknown preset in manifest: {}", value),
            },
            "valid-format" => config.valid_formats = setting.values.clone(),
            "out-format" => match ImageFormat::parse(value) {
                Some(format) => config.out_format = Some(format),
                None => warn!("Unknown out-format in manifest: {}", value),
            },
            "out-package" => match PackageKind::parse(value) {
                Some(package) => config.out_package = Some(package),
                None => warn!("Unknown out-package in manifest: {}", value),
            },
            "out-package-replace" => match parse_bool(value) {
                Some(flag) => config.out_package_replace = flag,
                None => warn!("Invalid out-package-replace in manifest: {}", value),
            },
            "scale" => match value.parse::<f64>() {
                Ok(scale) => config.scale = scale,
                Err(_) => warn!("Invalid scale in manifest: {}", value),
            },
            "max-px" => match value.parse::<u32>() {
                Ok(px) => {
                    config.max_width = px;
                    config.max_height = px;
                }
                Err(_) => warn!("Invalid max-px in manifest: {}", value),
            },
            "max-width-px" => match value.parse::<u32>() {
                Ok(px) => config.max_width = px,
                Err(_) => warn!("Invalid max-width-px in manifest: {}", value),
            },
            "max-height-px" => match value.parse::<u32>() {
                Ok(px) => config.max_height = px,
                Err(_) => warn!("Invalid max-height-px in manifest: {}", value),
            },
            other => warn!("Unknown manifest setting: {}", other),
        }
    }

    config
}

/// Resolve a path-valued setting.
///
/// `~~` is relative to the manifest's directory; `~` is the home directory.
pub fn resolve_setting_path(value: &str, manifest_dir: Option<&Path>) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~~") {
        let relative = format!(".{}", rest);
        let root = manifest_dir.unwrap_or_else(|| Path::new(""));
        normalize(&root.join(relative))
    } else {
        expand_tilde(value)
    }
}

/// Expand a leading `~` to `$HOME`.
pub fn expand_tilde(value: &str) -> PathBuf {
    let home = || env::var("HOME").ok().map(PathBuf::from);
    if value == "~" {
        if let Some(home) = home() {
            return home;
        }
    } else if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = home() {
            return home.join(rest);
        }
    }
    PathBuf::from(value)
}

/// Drop `.` components so joined paths read cleanly.
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf =
        path.components().filter(|c| !matches!(c, Component::CurDir)).collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// Parse a boolean setting (`true/false`, `yes/no`, `1/0`).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
