//! Job configuration
//!
//! A [`Configuration`] describes one resolved job. It is assembled from an
//! optional `imgx.toml`, then the command line, then (per block) manifest
//! settings, and validated before anything touches the filesystem.

pub mod loader;
pub mod schema;

pub use schema::*;
