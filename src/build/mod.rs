//! Batch pipeline for imgx
//!
//! Turns a resolved configuration into written images:
//!
//! - **Collection**: find the source files for a block
//! - **Planning**: expand the preset into transform plans
//! - **Execution**: apply each plan to each source through the packager
//!
//! # Example
//!
//! ```ignore
//! use imgx::build::Pipeline;
//!
//! let pipeline = Pipeline::new(config);
//! for outcome in pipeline.run() {
//!     println!("{}", outcome.result?.summary());
//! }
//! ```

pub mod executor;
pub mod pipeline;
pub mod result;

pub use executor::*;
pub use pipeline::*;
pub use result::*;

use crate::collect::CollectError;
use crate::config::ConfigError;
use crate::manifest::ManifestError;
use crate::package::PackageError;
use thiserror::Error;

/// Error that stops a whole block.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error(transparent)]
    Package(#[from] PackageError),
}
