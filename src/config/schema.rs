//! Configuration types for jobs and for `imgx.toml`

use crate::models::{ImageFormat, PackageKind, Preset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Missing src.")]
    MissingSource,
    #[error("Missing dst.")]
    MissingDestination,
    #[error("Can not specify scale and max-width / max-height.")]
    ScaleWithMaxSize,
    #[error("Can not specify max-px and any of max-width-px, max-height-px.")]
    MaxPxWithAxis,
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),
    #[error("Invalid arguments: {0}")]
    Arguments(String),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse imgx.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One resolved job.
///
/// `scale` and the max dimensions use `0` for "not set".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    /// Source directory, or a single source file
    pub src: Option<PathBuf>,
    /// Destination directory, package container or `.icns` file
    pub dst: Option<PathBuf>,
    /// Manifest selecting blocks of work
    pub manifest: Option<PathBuf>,
    pub preset: Option<Preset>,
    /// Source extensions as selected; expanded by the collector
    pub valid_formats: Vec<String>,
    /// Where the catalog package writes its list of processed names
    pub out_manifest: Option<PathBuf>,
    /// `None` keeps each source's format
    pub out_format: Option<ImageFormat>,
    /// `None` writes plain files into `dst`
    pub out_package: Option<PackageKind>,
    pub out_package_replace: bool,
    pub scale: f64,
    pub max_width: u32,
    pub max_height: u32,
}

impl Configuration {
    /// Check the invariants every job must satisfy before running.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.src.as_ref().map_or(true, |p| p.as_os_str().is_empty()) {
            return Err(ConfigError::MissingSource);
        }
        if self.dst.as_ref().map_or(true, |p| p.as_os_str().is_empty()) {
            return Err(ConfigError::MissingDestination);
        }
        if self.scale != 0.0 && (self.max_width != 0 || self.max_height != 0) {
            return Err(ConfigError::ScaleWithMaxSize);
        }
        Ok(())
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string for `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Root of `imgx.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgxConfig {
    /// Defaults applied beneath the command line
    pub defaults: DefaultsConfig,
    pub logging: LoggingConfig,
}

/// `[defaults]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dst: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valid_formats: Vec<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_format: Option<ImageFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_package: Option<PackageKind>,
    pub out_package_replace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_manifest: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_px: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width_px: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height_px: Option<u32>,
}

impl DefaultsConfig {
    /// The base configuration these defaults describe.
    pub fn to_configuration(&self) -> Configuration {
        let max_px = self.max_px.unwrap_or(0);
        Configuration {
            src: self.src.clone(),
            dst: self.dst.clone(),
            manifest: None,
            preset: self.preset,
            valid_formats: self.valid_formats.iter().map(|f| f.as_str().to_string()).collect(),
            out_manifest: self.out_manifest.clone(),
            out_format: self.out_format,
            out_package: self.out_package,
            out_package_replace: self.out_package_replace,
            scale: self.scale.unwrap_or(0.0),
            max_width: self.max_width_px.unwrap_or(max_px),
            max_height: self.max_height_px.unwrap_or(max_px),
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
