//! Post-download packaging step: relocating the extracted directory.
//!
//! Registry source archives unpack to a directory named after the repo
//! and tag (e.g. `widget-1.2.0/`) rather than the package identifier the
//! host expects. Install orchestration, which lives outside this core,
//! calls [`relocate_extracted_dir`] to fix that up with a single atomic
//! rename. On failure the original path is left unchanged so the host
//! can report an install failure.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while relocating the extracted release directory.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The extracted directory was not found where expected.
    #[error("extracted directory '{}' does not exist", .0.display())]
    SourceMissing(PathBuf),

    /// The destination is already occupied; refusing to clobber it.
    #[error("destination '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    /// The rename itself failed; the source is untouched.
    #[error("failed to move '{}' to '{}': {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Move the extracted directory to the path the host expects.
///
/// A no-op when the paths already match. Uses one atomic `rename`, so a
/// failure leaves the original directory in place.
pub fn relocate_extracted_dir(actual: &Path, expected: &Path) -> Result<PathBuf, InstallError> {
    if actual == expected {
        return Ok(expected.to_path_buf());
    }
    if !actual.exists() {
        return Err(InstallError::SourceMissing(actual.to_path_buf()));
    }
    if expected.exists() {
        return Err(InstallError::DestinationExists(expected.to_path_buf()));
    }

    fs::rename(actual, expected).map_err(|e| InstallError::Rename {
        from: actual.to_path_buf(),
        to: expected.to_path_buf(),
        source: e,
    })?;

    log::info!(
        "relocated extracted release from {} to {}",
        actual.display(),
        expected.display()
    );
    Ok(expected.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relocate_renames_directory() {
        let temp = TempDir::new().unwrap();
        let actual = temp.path().join("widget-1.2.0");
        let expected = temp.path().join("widget");
        fs::create_dir(&actual).unwrap();
        fs::write(actual.join("widget.txt"), "contents").unwrap();

        let moved = relocate_extracted_dir(&actual, &expected).unwrap();
        assert_eq!(moved, expected);
        assert!(!actual.exists());
        assert!(expected.join("widget.txt").exists());
    }

    #[test]
    fn test_relocate_matching_paths_is_noop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("widget");
        fs::create_dir(&path).unwrap();

        let moved = relocate_extracted_dir(&path, &path).unwrap();
        assert_eq!(moved, path);
        assert!(path.exists());
    }

    #[test]
    fn test_relocate_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let actual = temp.path().join("nope");
        let expected = temp.path().join("widget");

        let err = relocate_extracted_dir(&actual, &expected).unwrap_err();
        assert!(matches!(err, InstallError::SourceMissing(_)));
    }

    #[test]
    fn test_relocate_refuses_to_clobber() {
        let temp = TempDir::new().unwrap();
        let actual = temp.path().join("widget-1.2.0");
        let expected = temp.path().join("widget");
        fs::create_dir(&actual).unwrap();
        fs::create_dir(&expected).unwrap();

        let err = relocate_extracted_dir(&actual, &expected).unwrap_err();
        assert!(matches!(err, InstallError::DestinationExists(_)));
        // Source untouched on failure.
        assert!(actual.exists());
    }
}
