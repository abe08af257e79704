//! Plain destination folder

use super::{clear_folder, PackageError, Packager};
use crate::models::PackageKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes outputs straight into the destination directory.
#[derive(Debug)]
pub struct FolderPackager {
    dst: PathBuf,
    replace: bool,
}

impl FolderPackager {
    pub fn new(dst: PathBuf, replace: bool) -> Self {
        Self { dst, replace }
    }
}

impl Packager for FolderPackager {
    fn kind(&self) -> Option<PackageKind> {
        None
    }

    fn destination(&self) -> &Path {
        &self.dst
    }

    fn prepare(&mut self, _sources: &[PathBuf]) -> Result<(), PackageError> {
        if self.replace {
            info!("Clearing {}", self.dst.display());
            clear_folder(&self.dst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_replace_clears_destination() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("old.png"), b"x").unwrap();

        let mut packager = FolderPackager::new(temp.path().to_path_buf(), true);
        packager.prepare(&[]).unwrap();
        assert!(!temp.path().join("old.png").exists());
    }

    #[test]
    fn test_without_replace_keeps_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("old.png"), b"x").unwrap();

        let mut packager = FolderPackager::new(temp.path().to_path_buf(), false);
        packager.prepare(&[]).unwrap();
        assert!(temp.path().join("old.png").exists());
    }
}
