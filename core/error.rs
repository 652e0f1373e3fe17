use std::fmt;
use std::io;

/// An I/O failure raised where the surrounding contract cannot return it.
#[derive(thiserror::Error, Debug)]
#[error("{}", describe_unchecked(.message, .source))]
pub struct UncheckedIoError {
    message: Option<String>,
    #[source]
    source: io::Error,
}

fn describe_unchecked(message: &Option<String>, source: &io::Error) -> String {
    match message {
        Some(m) => format!("{}: {}", m, source),
        None => source.to_string(),
    }
}

impl UncheckedIoError {
    pub fn new(source: io::Error) -> Self {
        UncheckedIoError {
            message: None,
            source,
        }
    }

    pub fn with_message(message: impl Into<String>, source: io::Error) -> Self {
        UncheckedIoError {
            message: Some(message.into()),
            source,
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn get_ref(&self) -> &io::Error {
        &self.source
    }

    pub fn into_inner(self) -> io::Error {
        self.source
    }
}

impl From<io::Error> for UncheckedIoError {
    fn from(e: io::Error) -> Self {
        UncheckedIoError::new(e)
    }
}

/// A failure recorded for the element at `index` of a traversal.
#[derive(thiserror::Error, Debug)]
#[error("#{index}: {source}")]
pub struct IndexedIoError {
    pub index: usize,
    #[source]
    pub source: io::Error,
}

impl IndexedIoError {
    pub fn new(index: usize, source: io::Error) -> Self {
        IndexedIoError { index, source }
    }
}

/// Every per-element failure of one traversal, in traversal order.
#[derive(Debug)]
pub struct IoErrorList {
    errors: Vec<IndexedIoError>,
}

impl IoErrorList {
    pub fn new(errors: Vec<IndexedIoError>) -> Self {
        IoErrorList { errors }
    }

    pub fn check_empty(errors: Vec<IndexedIoError>) -> Result<(), IoErrorList> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(IoErrorList::new(errors))
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[IndexedIoError] {
        &self.errors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexedIoError> {
        self.errors.iter()
    }

    pub fn indexes(&self) -> Vec<usize> {
        self.errors.iter().map(|e| e.index).collect()
    }

    /// The failure recorded at position `i` of the list (not traversal index).
    pub fn cause(&self, i: usize) -> Option<&io::Error> {
        self.errors.get(i).map(|e| &e.source)
    }

    /// Collapses the aggregate into one checked failure. A single entry is
    /// returned unchanged so its kind survives.
    pub fn into_io_error(mut self) -> io::Error {
        if self.errors.len() == 1 {
            if let Some(only) = self.errors.pop() {
                return only.source;
            }
        }
        io::Error::other(self)
    }
}

impl fmt::Display for IoErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.errors.len();
        write!(f, "{} I/O {}: [", n, if n == 1 { "error" } else { "errors" })?;
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", e)?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for IoErrorList {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.errors
            .first()
            .map(|e| &e.source as &(dyn std::error::Error + 'static))
    }
}

impl IntoIterator for IoErrorList {
    type Item = IndexedIoError;
    type IntoIter = std::vec::IntoIter<IndexedIoError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl From<IoErrorList> for io::Error {
    fn from(list: IoErrorList) -> Self {
        list.into_io_error()
    }
}
