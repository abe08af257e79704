//! File name rewriting helpers
//!
//! Output names are derived from source names by swapping extensions and
//! editing the *suffix* of the file stem, e.g. `photo@3x.png` becomes
//! `photo@2x.png` by removing `@3x` and adding `@2x`.

use std::path::{Path, PathBuf};

/// The file name of `path` without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// The file name of `path` including its extension.
pub fn file_name(path: &Path) -> String {
    path.file_name().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Replace the extension of `path`. An empty `ext` strips it.
pub fn change_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

/// Whether the stem of `path` ends with `suffix`.
///
/// ```
/// use imgx::naming::has_suffix;
/// use std::path::Path;
///
/// assert!(has_suffix(Path::new("dir/photo@3x.png"), "@3x"));
/// assert!(!has_suffix(Path::new("dir/photo.png"), "@3x"));
/// ```
pub fn has_suffix(path: &Path, suffix: &str) -> bool {
    file_stem(path).ends_with(suffix)
}

/// Rewrite the stem of `path`: strip `remove` if the stem ends with it, then
/// append `add`. Directory and extension are kept.
///
/// ```
/// use imgx::naming::change_suffix;
/// use std::path::{Path, PathBuf};
///
/// let path = change_suffix(Path::new("out/photo@3x.png"), "@3x", "@2x");
/// assert_eq!(path, PathBuf::from("out/photo@2x.png"));
/// ```
pub fn change_suffix(path: &Path, remove: &str, add: &str) -> PathBuf {
    let stem = file_stem(path);
    let base = if remove.is_empty() {
        stem.as_str()
    } else {
        stem.strip_suffix(remove).unwrap_or(stem.as_str())
    };

    let mut name = format!("{}{}", base, add);
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_suffix_remove_only() {
        assert_eq!(
            change_suffix(Path::new("photo@3x.png"), "@3x", ""),
            PathBuf::from("photo.png")
        );
    }

    #[test]
    fn test_change_suffix_add_only() {
        assert_eq!(
            change_suffix(Path::new("a/b/photo.jpg"), "", "@1x"),
            PathBuf::from("a/b/photo@1x.jpg")
        );
    }

    #[test]
    fn test_change_suffix_missing_remove_still_adds() {
        assert_eq!(
            change_suffix(Path::new("photo.png"), "@3x", "@2x"),
            PathBuf::from("photo@2x.png")
        );
    }

    #[test]
    fn test_change_suffix_without_extension() {
        assert_eq!(change_suffix(Path::new("icon_"), "", "16x16"), PathBuf::from("icon_16x16"));
    }

    #[test]
    fn test_change_extension() {
        assert_eq!(change_extension(Path::new("x/photo.jpeg"), "png"), PathBuf::from("x/photo.png"));
        assert_eq!(change_extension(Path::new("photo.png"), ""), PathBuf::from("photo"));
        assert_eq!(change_extension(Path::new("photo"), "sticker"), PathBuf::from("photo.sticker"));
    }

    #[test]
    fn test_has_suffix_ignores_extension() {
        assert!(has_suffix(Path::new("photo@2x.jpg"), "@2x"));
        assert!(!has_suffix(Path::new("photo.@2x"), "@2x"));
    }

    #[test]
    fn test_file_stem_and_name() {
        assert_eq!(file_stem(Path::new("/a/b/photo@3x.png")), "photo@3x");
        assert_eq!(file_name(Path::new("/a/b/photo@3x.png")), "photo@3x.png");
    }
}
