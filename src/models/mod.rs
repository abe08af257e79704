//! Closed vocabularies shared by the CLI, manifests and the pipeline.
//!
//! Each enum maps to and from the exact strings used on the command line,
//! in manifest settings and in `imgx.toml`.

mod format;
mod package;
mod preset;

pub use format::ImageFormat;
pub use package::PackageKind;
pub use preset::Preset;
