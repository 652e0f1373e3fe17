use crate::filter::FileFilter;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Regular files holding `magic` at byte `offset`.
///
/// Files too short to hold the magic are rejected. Directories are rejected
/// without being opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicNumberFilter {
    magic: Vec<u8>,
    offset: u64,
}

impl MagicNumberFilter {
    pub fn new(magic: impl Into<Vec<u8>>) -> Self {
        MagicNumberFilter {
            magic: magic.into(),
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Parses the magic from hex digits, e.g. `"cafebabe"` or `"CA FE BA BE"`.
    pub fn from_hex(digits: &str) -> io::Result<Self> {
        let compact: String = digits.split_whitespace().collect();
        if compact.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "magic is empty"));
        }
        let magic = hex::decode(&compact).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("bad magic {:?}: {}", digits, e),
            )
        })?;
        Ok(MagicNumberFilter::new(magic))
    }

    pub fn magic(&self) -> &[u8] {
        &self.magic
    }
}

impl FileFilter for MagicNumberFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        if !fs::metadata(path)?.is_file() {
            return Ok(false);
        }
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut found = vec![0u8; self.magic.len()];
        match file.read_exact(&mut found) {
            Ok(()) => Ok(found == self.magic),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn name(&self) -> &'static str {
        "magic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASS: [u8; 8] = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x00, 0x00, 0x34];

    #[test]
    fn matches_at_start_and_offset() {
        let dir = tempfile::tempdir().unwrap();
        let class = dir.path().join("Main.class");
        fs::write(&class, CLASS).unwrap();

        assert!(MagicNumberFilter::from_hex("CA FE BA BE").unwrap().accept(&class).unwrap());
        let version = MagicNumberFilter::new([0x00, 0x34]).with_offset(6);
        assert!(version.accept(&class).unwrap());
        assert!(!MagicNumberFilter::new(*b"PK").accept(&class).unwrap());
    }

    #[test]
    fn short_files_and_directories_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tiny = dir.path().join("tiny");
        fs::write(&tiny, [0xCA]).unwrap();
        let filter = MagicNumberFilter::new(&CLASS[..4]);
        assert!(!filter.accept(&tiny).unwrap());
        assert!(!filter.clone().with_offset(100).accept(&tiny).unwrap());
        assert!(!filter.accept(dir.path()).unwrap());
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = MagicNumberFilter::new(*b"%PDF");
        let e = pdf.accept(&dir.path().join("x.pdf")).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(MagicNumberFilter::from_hex("7f454c46").unwrap().magic(), b"\x7fELF");
        for bad in ["", "  ", "abc", "zz", "+f", "+f+f", "-1"] {
            let e = MagicNumberFilter::from_hex(bad).unwrap_err();
            assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
        }
    }
}
