use crate::filter::{FileFilter, file_name};
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Regular files whose length lies in `[min, max)`. Other entries are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeFilter {
    min: u64,
    max: Option<u64>,
}

impl SizeFilter {
    pub fn at_least(min: u64) -> Self {
        SizeFilter { min, max: None }
    }

    pub fn smaller_than(max: u64) -> Self {
        SizeFilter { min: 0, max: Some(max) }
    }

    pub fn range(min: u64, max: u64) -> Self {
        SizeFilter { min, max: Some(max) }
    }
}

impl FileFilter for SizeFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            return Ok(false);
        }
        let len = meta.len();
        Ok(len >= self.min && self.max.is_none_or(|max| len < max))
    }

    fn name(&self) -> &'static str {
        "size"
    }
}

/// Compares the last-modified time with a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeFilter {
    cutoff: SystemTime,
    accept_older: bool,
}

impl AgeFilter {
    pub fn older_than(cutoff: SystemTime) -> Self {
        AgeFilter {
            cutoff,
            accept_older: true,
        }
    }

    pub fn newer_than(cutoff: SystemTime) -> Self {
        AgeFilter {
            cutoff,
            accept_older: false,
        }
    }

    pub fn older_than_ago(age: Duration) -> Self {
        AgeFilter::older_than(ago(age))
    }

    pub fn newer_than_ago(age: Duration) -> Self {
        AgeFilter::newer_than(ago(age))
    }

    pub fn cutoff(&self) -> SystemTime {
        self.cutoff
    }
}

fn ago(age: Duration) -> SystemTime {
    SystemTime::now()
        .checked_sub(age)
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

impl FileFilter for AgeFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        let newer = fs::metadata(path)?.modified()? > self.cutoff;
        Ok(newer != self.accept_older)
    }

    fn name(&self) -> &'static str {
        "age"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyFilter;

impl FileFilter for EmptyFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        let meta = fs::metadata(path)?;
        if meta.is_dir() {
            Ok(fs::read_dir(path)?.next().is_none())
        } else {
            Ok(meta.is_file() && meta.len() == 0)
        }
    }

    fn name(&self) -> &'static str {
        "empty"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenFilter;

impl FileFilter for HiddenFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        Ok(file_name(path)
            .is_some_and(|name| name.starts_with('.') && name != "." && name != ".."))
    }

    fn name(&self) -> &'static str {
        "hidden"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

/// Selects one kind of entry. Links are not followed, so a link to a file is
/// a `Symlink`, never a `File`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter {
    kind: EntryKind,
}

impl KindFilter {
    pub fn new(kind: EntryKind) -> Self {
        KindFilter { kind }
    }
}

impl FileFilter for KindFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        let file_type = fs::symlink_metadata(path)?.file_type();
        Ok(match self.kind {
            EntryKind::File => file_type.is_file(),
            EntryKind::Directory => file_type.is_dir(),
            EntryKind::Symlink => file_type.is_symlink(),
        })
    }

    fn name(&self) -> &'static str {
        "kind"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    Execute,
}

/// Checks permission bits, not the calling process's actual access.
///
/// On Unix a bit set for any of owner, group or others counts, so a `0o004`
/// file is readable here even to an owner who cannot open it, and root's
/// overrides are not modelled. Elsewhere reads always pass and execution goes
/// by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessFilter {
    access: Access,
}

impl AccessFilter {
    pub fn new(access: Access) -> Self {
        AccessFilter { access }
    }
}

impl FileFilter for AccessFilter {
    #[cfg(unix)]
    fn accept(&self, path: &Path) -> io::Result<bool> {
        use std::os::unix::fs::PermissionsExt;

        let mode = fs::metadata(path)?.permissions().mode();
        Ok(match self.access {
            Access::Read => mode & 0o444 != 0,
            Access::Write => mode & 0o222 != 0,
            Access::Execute => mode & 0o111 != 0,
        })
    }

    #[cfg(not(unix))]
    fn accept(&self, path: &Path) -> io::Result<bool> {
        let meta = fs::metadata(path)?;
        Ok(match self.access {
            Access::Read => true,
            Access::Write => !meta.permissions().readonly(),
            Access::Execute => path.extension().is_some_and(|e| {
                ["exe", "bat", "cmd", "com"]
                    .iter()
                    .any(|x| e.eq_ignore_ascii_case(x))
            }),
        })
    }

    fn name(&self) -> &'static str {
        "access"
    }
}
