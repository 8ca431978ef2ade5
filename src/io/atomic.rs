//! All-or-nothing file output.
//!
//! Content is first staged in a temp file next to its destination. Staged files
//! are renamed over their targets only by `commit`, so a run that fails while
//! producing any of its outputs leaves every previous output untouched.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::AppError;

/// Fully written content waiting to replace `target`.
///
/// Dropping it without committing removes the temp file.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged content over the target.
    pub fn commit(self) -> Result<(), AppError> {
        self.temp.persist(&self.target).map_err(|e| {
            AppError::output(format!(
                "Failed to move output into '{}': {}",
                self.target.display(),
                e.error
            ))
        })?;
        Ok(())
    }
}

/// Write content for `path` into a temp file in the same directory.
pub fn stage_file<F>(path: &Path, write: F) -> Result<StagedFile, AppError>
where
    F: FnOnce(&mut File) -> Result<(), AppError>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .map_err(|e| AppError::output(format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::output(format!("Failed to stage '{}': {e}", path.display())))?;

    write(temp.as_file_mut())?;

    Ok(StagedFile {
        temp,
        target: path.to_path_buf(),
    })
}

/// Commit staged outputs in order. Call only once every output is staged.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<(), AppError> {
    for file in staged {
        file.commit()?;
    }
    Ok(())
}

pub fn write_atomically<F>(path: &Path, write: F) -> Result<(), AppError>
where
    F: FnOnce(&mut File) -> Result<(), AppError>,
{
    stage_file(path, write)?.commit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn failed_writer_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old").unwrap();

        let result = write_atomically(&path, |f| {
            f.write_all(b"partial").unwrap();
            Err(AppError::output("boom"))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/final/out.txt");
        write_atomically(&path, |f| f.write_all(b"new").map_err(|e| AppError::output(e.to_string()))).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn staged_file_is_invisible_until_committed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old").unwrap();

        let staged = stage_file(&path, |f| f.write_all(b"new").map_err(|e| AppError::output(e.to_string()))).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(staged.target(), path.as_path());

        staged.commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn dropped_stage_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        {
            let _staged = stage_file(&path, |f| f.write_all(b"new").map_err(|e| AppError::output(e.to_string()))).unwrap();
        }
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
