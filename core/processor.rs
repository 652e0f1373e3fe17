use crate::error::IoErrorList;
use crate::file_finder::IokitArgs;
use crate::for_all;
use crate::stream::IoStream;
use std::cell::Cell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationMode {
    #[default]
    List,
    Count,
    Delete,
}

impl OperationMode {
    pub fn from_args(args: &IokitArgs) -> Self {
        if args.delete {
            OperationMode::Delete
        } else if args.count {
            OperationMode::Count
        } else {
            OperationMode::List
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub mode: OperationMode,
    pub files: usize,
    /// Sum of regular-file sizes; only filled by `Count`.
    pub total_bytes: u64,
    pub deleted: usize,
}

fn size_of(path: &PathBuf) -> io::Result<u64> {
    let meta = fs::metadata(path)?;
    Ok(if meta.is_file() { meta.len() } else { 0 })
}

/// Removes a file or link, or a directory when it is empty.
fn remove(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir(path)?;
    } else {
        fs::remove_file(path)?;
    }
    debug!(path = %path.display(), "deleted");
    Ok(())
}

/// Applies `mode` to every path. Every path is attempted; the failures come
/// back together, indexed like `files`.
pub fn process_files(files: &[PathBuf], mode: OperationMode) -> Result<ProcessReport, IoErrorList> {
    let mut report = ProcessReport {
        mode,
        files: files.len(),
        ..ProcessReport::default()
    };
    match mode {
        OperationMode::List => {}
        OperationMode::Count => {
            let total = Cell::new(0u64);
            IoStream::of(files).map(size_of).for_all(|n: u64| -> io::Result<()> {
                total.set(total.get() + n);
                Ok(())
            })?;
            report.total_bytes = total.get();
        }
        OperationMode::Delete => {
            for_all::for_all_with(
                files,
                |p: &PathBuf| remove(p),
                |i, e| io::Error::new(e.kind(), format!("{}: {}", files[i].display(), e)),
            )?;
            report.deleted = files.len();
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_files() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = [("a", 3), ("b", 0), ("c", 5)]
            .iter()
            .map(|(name, len)| {
                let p = dir.path().join(name);
                fs::write(&p, vec![b'x'; *len]).unwrap();
                p
            })
            .collect();
        (dir, files)
    }

    #[test]
    fn mode_follows_flags() {
        let mut args = IokitArgs::default();
        assert_eq!(OperationMode::from_args(&args), OperationMode::List);
        args.count = true;
        assert_eq!(OperationMode::from_args(&args), OperationMode::Count);
        args.delete = true;
        assert_eq!(OperationMode::from_args(&args), OperationMode::Delete);
    }

    #[test]
    fn list_touches_nothing() {
        let (_dir, files) = three_files();
        let report = process_files(&files, OperationMode::List).unwrap();
        assert_eq!(report.files, 3);
        assert!(files.iter().all(|p| p.exists()));
    }

    #[test]
    fn count_sums_sizes() {
        let (dir, mut files) = three_files();
        files.push(dir.path().to_path_buf());
        let report = process_files(&files, OperationMode::Count).unwrap();
        assert_eq!(report.total_bytes, 8);
        assert_eq!(report.files, 4);
    }

    #[test]
    fn count_reports_missing_files_by_index() {
        let (dir, mut files) = three_files();
        files.insert(1, dir.path().join("gone"));
        let err = process_files(&files, OperationMode::Count).unwrap_err();
        assert_eq!(err.indexes(), vec![1]);
        assert_eq!(err.cause(0).unwrap().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn delete_attempts_everything_and_names_failures() {
        let (dir, mut files) = three_files();
        let gone = dir.path().join("gone");
        files.insert(0, gone.clone());
        let err = process_files(&files, OperationMode::Delete).unwrap_err();
        assert_eq!(err.indexes(), vec![0]);
        assert!(err.cause(0).unwrap().to_string().starts_with(&gone.display().to_string()));
        assert!(files[1..].iter().all(|p| !p.exists()));
    }

    #[test]
    fn delete_removes_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let report = process_files(std::slice::from_ref(&sub), OperationMode::Delete).unwrap();
        assert_eq!(report.deleted, 1);
        assert!(!sub.exists());
    }
}
