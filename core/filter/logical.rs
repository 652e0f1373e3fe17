use crate::filter::FileFilter;
use std::io;
use std::path::Path;

/// Accepts every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueFilter;

impl FileFilter for TrueFilter {
    fn accept(&self, _path: &Path) -> io::Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "true"
    }
}

/// Rejects every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FalseFilter;

impl FileFilter for FalseFilter {
    fn accept(&self, _path: &Path) -> io::Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "false"
    }
}

#[derive(Debug)]
pub struct NotFilter {
    inner: Box<dyn FileFilter>,
}

impl NotFilter {
    pub fn new<F: FileFilter + 'static>(inner: F) -> Self {
        NotFilter {
            inner: Box::new(inner),
        }
    }
}

impl FileFilter for NotFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        self.inner.accept(path).map(|accepted| !accepted)
    }

    fn name(&self) -> &'static str {
        "not"
    }
}

/// Accepts when every member does. An empty conjunction rejects.
#[derive(Debug, Default)]
pub struct AndFilter {
    filters: Vec<Box<dyn FileFilter>>,
}

impl AndFilter {
    pub fn new(filters: Vec<Box<dyn FileFilter>>) -> Self {
        AndFilter { filters }
    }

    pub fn push<F: FileFilter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FileFilter for AndFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        if self.filters.is_empty() {
            return Ok(false);
        }
        for filter in &self.filters {
            if !filter.accept(path)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "and"
    }
}

/// Accepts when any member does. An empty disjunction rejects.
#[derive(Debug, Default)]
pub struct OrFilter {
    filters: Vec<Box<dyn FileFilter>>,
}

impl OrFilter {
    pub fn new(filters: Vec<Box<dyn FileFilter>>) -> Self {
        OrFilter { filters }
    }

    pub fn push<F: FileFilter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }
}

impl FileFilter for OrFilter {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        for filter in &self.filters {
            if filter.accept(path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "or"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FileFilterExt, SizeFilter};

    const P: &str = "/nonexistent/iokit/path";

    #[test]
    fn constants() {
        assert!(TrueFilter.accept(Path::new(P)).unwrap());
        assert!(!FalseFilter.accept(Path::new(P)).unwrap());
        assert!(NotFilter::new(FalseFilter).accept(Path::new(P)).unwrap());
    }

    #[test]
    fn empty_combinations_reject() {
        assert!(!AndFilter::default().accept(Path::new(P)).unwrap());
        assert!(!OrFilter::default().accept(Path::new(P)).unwrap());
    }

    #[test]
    fn short_circuit_skips_failing_member() {
        // SizeFilter fails on a missing path, so reaching it would error.
        let and = FalseFilter.and(SizeFilter::at_least(1));
        assert!(!and.accept(Path::new(P)).unwrap());
        let or = TrueFilter.or(SizeFilter::at_least(1));
        assert!(or.accept(Path::new(P)).unwrap());
    }

    #[test]
    fn failure_propagates() {
        let mut and = AndFilter::default();
        and.push(TrueFilter);
        and.push(SizeFilter::at_least(1));
        assert_eq!(and.len(), 2);
        let e = and.accept(Path::new(P)).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::NotFound);
        assert!(NotFilter::new(SizeFilter::at_least(1)).accept(Path::new(P)).is_err());
    }
}
