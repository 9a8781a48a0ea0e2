//! Atomic file replacement.
//!
//! Contents are written to a hidden temporary file beside the target, synced,
//! and renamed over it, so readers never observe a partially written file and
//! a failed write leaves the previous target untouched.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs::{Dir, File, OpenOptions};

use crate::error::OutputError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A hidden temporary file that replaces its target on [`commit`].
///
/// [`commit`]: StagedTarget::commit
#[derive(Debug)]
pub(crate) struct StagedTarget {
    tmp_name: String,
    target_name: String,
    target_path: Utf8PathBuf,
}

impl StagedTarget {
    /// Creates the temporary file for `path` inside `dir`.
    ///
    /// `path` must be a bare file name relative to `dir`. The target itself
    /// is not opened.
    pub(crate) fn create(dir: &Dir, path: &Utf8Path) -> Result<(Self, File), OutputError> {
        let mut components = path.components();
        let (Some(Utf8Component::Normal(file_name)), None) =
            (components.next(), components.next())
        else {
            return Err(OutputError::WriteFailure {
                path: path.to_path_buf(),
                message: "output path must be a file name".to_owned(),
            });
        };
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        let staged = Self {
            tmp_name: format!(".{file_name}.tmp.{}.{suffix}.{counter}", std::process::id()),
            target_name: file_name.to_owned(),
            target_path: path.to_path_buf(),
        };

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let file = dir
            .open_with(&staged.tmp_name, &options)
            .map_err(|err| staged.tmp_failure(&err))?;
        Ok((staged, file))
    }

    /// Renames the temporary file over the target and syncs the directory.
    ///
    /// The temporary file is removed if the rename fails.
    pub(crate) fn commit(self, dir: &Dir) -> Result<(), OutputError> {
        if let Err(err) = rename_over_target(dir, &self.tmp_name, &self.target_name) {
            drop(dir.remove_file(&self.tmp_name));
            return Err(OutputError::WriteFailure {
                path: self.target_path,
                message: err.to_string(),
            });
        }
        sync_directory(dir);
        Ok(())
    }

    /// Removes the temporary file, leaving the target as it was.
    pub(crate) fn discard(self, dir: &Dir) -> io::Result<()> {
        dir.remove_file(&self.tmp_name)
    }

    fn tmp_failure(&self, err: &io::Error) -> OutputError {
        OutputError::WriteFailure {
            path: self.target_path.with_file_name(&self.tmp_name),
            message: err.to_string(),
        }
    }
}

/// Writes `contents` to `path` inside `dir`, replacing any existing file.
///
/// `path` must be a bare file name relative to `dir`.
///
/// # Errors
///
/// Returns [`OutputError::WriteFailure`] naming the file that could not be
/// created, written, synced, or renamed. The temporary file is removed on a
/// best-effort basis.
pub(crate) fn write_atomic(dir: &Dir, path: &Utf8Path, contents: &[u8]) -> Result<(), OutputError> {
    let (staged, mut file) = StagedTarget::create(dir, path)?;

    if let Err(err) = file.write_all(contents).and_then(|()| file.sync_all()) {
        drop(file);
        let failure = staged.tmp_failure(&err);
        drop(staged.discard(dir));
        return Err(failure);
    }
    drop(file);

    staged.commit(dir)
}

#[cfg(windows)]
fn rename_over_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn rename_over_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; some platforms cannot fsync a directory handle.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}
