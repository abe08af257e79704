//! Source file collection
//!
//! Resolves a source path, an extension filter and an optional explicit
//! subset of names into the list of files a job processes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "tif", "tiff"];

/// File collection error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CollectError {
    #[error("Failed to list {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Missing files from manifest: {}", .missing.join(", "))]
    MissingFiles { missing: Vec<String> },
}

/// Expand a selection of extensions into the accepted set.
///
/// An empty selection accepts [`DEFAULT_EXTENSIONS`]. Selecting `jpg` also
/// accepts `jpeg`, and `tif` also accepts `tiff`; never the other way round.
///
/// ```
/// use imgx::collect::allowed_extensions;
///
/// let allowed = allowed_extensions(&["jpg".to_string()]);
/// assert_eq!(allowed, vec!["jpg", "jpeg"]);
/// ```
pub fn allowed_extensions(selected: &[String]) -> Vec<String> {
    if selected.is_empty() {
        return DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    }

    let mut allowed: Vec<String> = selected.to_vec();
    for value in selected {
        let implied = match value.as_str() {
            "jpg" => "jpeg",
            "tif" => "tiff",
            _ => continue,
        };
        if !allowed.iter().any(|a| a == implied) {
            allowed.push(implied.to_string());
        }
    }
    allowed
}

/// Split a source path into the directory to scan and the names requested.
///
/// A single file becomes its parent directory plus a one-name subset
/// appended to `requested`.
pub fn resolve_source(src: &Path, requested: &[String]) -> (PathBuf, Vec<String>) {
    let mut names = requested.to_vec();
    if src.is_dir() {
        return (src.to_path_buf(), names);
    }

    let dir = src.parent().map(Path::to_path_buf).unwrap_or_default();
    let dir = if dir.as_os_str().is_empty() { PathBuf::from(".") } else { dir };
    if let Some(name) = src.file_name() {
        names.push(name.to_string_lossy().into_owned());
    }
    (dir, names)
}

fn has_allowed_extension(name: &str, allowed: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| !ext.is_empty() && allowed.iter().any(|a| a == ext))
}

/// Sorted names of the regular files directly inside `dir`.
fn list_files(dir: &Path) -> Result<Vec<String>, CollectError> {
    let io_err = |source| CollectError::Io { path: dir.to_path_buf(), source };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Collect the files to process.
///
/// Without `requested`, every file directly in `dir` with an allowed
/// extension is returned in name order. With `requested`, every name must
/// exist and carry an allowed extension, or the whole collection fails;
/// results keep the requested order.
pub fn collect_files(
    dir: &Path,
    selected_extensions: &[String],
    requested: &[String],
) -> Result<Vec<PathBuf>, CollectError> {
    let allowed = allowed_extensions(selected_extensions);
    let listing = list_files(dir)?;

    if requested.is_empty() {
        return Ok(listing
            .iter()
            .filter(|name| has_allowed_extension(name, &allowed))
            .map(|name| dir.join(name))
            .collect());
    }

    let missing: Vec<String> = requested
        .iter()
        .filter(|name| !listing.contains(name) || !has_allowed_extension(name, &allowed))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(CollectError::MissingFiles { missing });
    }

    Ok(requested.iter().map(|name| dir.join(name)).collect())
}
