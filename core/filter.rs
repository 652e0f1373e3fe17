pub mod attribute;
pub mod logical;
pub mod magic;
pub mod name;

pub use attribute::{
    Access, AccessFilter, AgeFilter, EmptyFilter, EntryKind, HiddenFilter, KindFilter, SizeFilter,
};
pub use logical::{AndFilter, FalseFilter, NotFilter, OrFilter, TrueFilter};
pub use magic::MagicNumberFilter;
pub use name::{NameFilter, PrefixFilter, RegexFilter, SuffixFilter, WildcardFilter};

use crate::error::{IndexedIoError, IoErrorList};
use crate::function::IoPredicate;
use rayon::prelude::*;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// Decides whether a path is selected. Reading the file system may fail.
pub trait FileFilter: fmt::Debug + Send + Sync {
    fn accept(&self, path: &Path) -> io::Result<bool>;

    fn name(&self) -> &'static str;
}

impl<F: FileFilter + ?Sized> FileFilter for Box<F> {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        (**self).accept(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<F: FileFilter + ?Sized> FileFilter for Arc<F> {
    fn accept(&self, path: &Path) -> io::Result<bool> {
        (**self).accept(path)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

pub trait FileFilterExt: FileFilter + Sized + 'static {
    fn and<F: FileFilter + 'static>(self, other: F) -> AndFilter {
        AndFilter::new(vec![self.boxed(), other.boxed()])
    }

    fn or<F: FileFilter + 'static>(self, other: F) -> OrFilter {
        OrFilter::new(vec![self.boxed(), other.boxed()])
    }

    fn negate(self) -> NotFilter {
        NotFilter::new(self)
    }

    fn boxed(self) -> Box<dyn FileFilter> {
        Box::new(self)
    }

    /// Borrows the filter as an [`IoPredicate`] over paths.
    fn as_predicate(&self) -> impl for<'p> Fn(&'p Path) -> io::Result<bool> + '_ {
        move |path: &Path| self.accept(path)
    }
}

impl<F: FileFilter + Sized + 'static> FileFilterExt for F {}

/// Any path predicate seen as a [`FileFilter`].
pub struct PredicateFilter<P> {
    label: &'static str,
    predicate: P,
}

impl<P> PredicateFilter<P>
where
    P: for<'p> IoPredicate<&'p Path> + Send + Sync,
{
    pub fn new(label: &'static str, predicate: P) -> Self {
        PredicateFilter { label, predicate }
    }
}

impl<P> fmt::Debug for PredicateFilter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl<P> FileFilter for PredicateFilter<P>
where
    P: for<'p> IoPredicate<&'p Path> + Send + Sync,
{
    fn accept(&self, path: &Path) -> io::Result<bool> {
        self.predicate.test(path)
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

/// How file names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoCase {
    #[default]
    Sensitive,
    Insensitive,
    /// Whatever the host file system usually does: insensitive on Windows.
    System,
}

impl IoCase {
    pub fn is_case_sensitive(self) -> bool {
        match self {
            IoCase::Sensitive => true,
            IoCase::Insensitive => false,
            IoCase::System => !cfg!(windows),
        }
    }

    fn fold(self, s: &str) -> String {
        if self.is_case_sensitive() {
            s.to_string()
        } else {
            s.to_lowercase()
        }
    }

    pub fn equals(self, a: &str, b: &str) -> bool {
        self.fold(a) == self.fold(b)
    }

    pub fn starts_with(self, s: &str, prefix: &str) -> bool {
        self.fold(s).starts_with(&self.fold(prefix))
    }

    pub fn ends_with(self, s: &str, suffix: &str) -> bool {
        self.fold(s).ends_with(&self.fold(suffix))
    }
}

pub(crate) fn file_name(path: &Path) -> Option<std::borrow::Cow<'_, str>> {
    path.file_name().map(|n| n.to_string_lossy())
}

/// Runs `filter` over `paths` in parallel, keeping input order and indexes.
pub fn select<F>(paths: &[PathBuf], filter: &F) -> (Vec<PathBuf>, Option<IoErrorList>)
where
    F: FileFilter + ?Sized,
{
    let outcomes: Vec<io::Result<bool>> = paths.par_iter().map(|p| filter.accept(p)).collect();

    let mut selected = Vec::new();
    let mut errors = Vec::new();
    for (index, (path, outcome)) in paths.iter().zip(outcomes).enumerate() {
        match outcome {
            Ok(true) => selected.push(path.clone()),
            Ok(false) => trace!(path = %path.display(), filter = filter.name(), "rejected"),
            Err(e) => errors.push(IndexedIoError::new(index, e)),
        }
    }
    (selected, IoErrorList::check_empty(errors).err())
}
