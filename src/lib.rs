//! imgx - Library for batch image transforms and asset packaging
//!
//! This library provides functionality to:
//! - Parse manifests selecting files and per-block settings
//! - Expand presets into transform plans and apply them to source images
//! - Assemble outputs into sticker packs, image sets, icon sets, icns
//!   bundles and asset catalogs, keeping their `Contents.json` in sync

pub mod build;
pub mod cli;
pub mod collect;
pub mod config;
pub mod imaging;
pub mod logging;
pub mod manifest;
pub mod models;
pub mod naming;
pub mod package;
pub mod plan;
