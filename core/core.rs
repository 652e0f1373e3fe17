pub mod error;
pub mod file_finder;
pub mod filter;
pub mod for_all;
pub mod function;
pub mod processor;
pub mod stream;
pub mod uncheck;

pub use error::{IndexedIoError, IoErrorList, UncheckedIoError};

pub use file_finder::{
    CliArgs, Command, CompletionArgs, FindReport, IokitArgs, build_filter, find_files, list_files,
};

pub use filter::{FileFilter, FileFilterExt, IoCase, select};
pub use for_all::{for_all, for_all_io, for_all_with};
pub use function::{
    IoBiConsumer, IoBiFunction, IoBiPredicate, IoBinaryOperator, IoComparator, IoConsumer,
    IoFunction, IoPredicate, IoQuadConsumer, IoQuadFunction, IoRunnable, IoSupplier,
    IoTriConsumer, IoTriFunction, IoUnaryOperator,
};
pub use processor::{OperationMode, ProcessReport, process_files};
pub use stream::{IoIterator, IoSpliterator, IoStream};

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{failed} of {total} files failed")]
    Partial {
        failed: usize,
        total: usize,
        #[source]
        errors: IoErrorList,
    },

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl CoreError {
    pub fn partial(total: usize, errors: IoErrorList) -> Self {
        CoreError::Partial {
            failed: errors.len(),
            total,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn partial_failure_keeps_the_list_as_source() {
        let list = IoErrorList::new(vec![
            IndexedIoError::new(0, io::Error::other("a")),
            IndexedIoError::new(2, io::Error::other("c")),
        ]);
        let err = CoreError::partial(5, list);
        assert_eq!(err.to_string(), "2 of 5 files failed");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "2 I/O errors: [#0: a, #2: c]");
    }
}
