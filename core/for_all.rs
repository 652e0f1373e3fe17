use crate::error::{IndexedIoError, IoErrorList};
use crate::function::IoConsumer;
use crate::stream::IoIterator;
use std::io;
use tracing::debug;

/// Applies `action` to every element, keeping going after failures.
pub fn for_all<I, C>(items: I, action: C) -> Result<(), IoErrorList>
where
    I: IntoIterator,
    C: IoConsumer<I::Item>,
{
    for_all_with(items, action, |_, e| e)
}

pub fn for_all_with<I, C, M>(items: I, action: C, map_error: M) -> Result<(), IoErrorList>
where
    I: IntoIterator,
    C: IoConsumer<I::Item>,
    M: Fn(usize, io::Error) -> io::Error,
{
    let mut errors = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        if let Err(e) = action.accept(item) {
            debug!(index, error = %e, "action failed, continuing");
            errors.push(IndexedIoError::new(index, map_error(index, e)));
        }
    }
    IoErrorList::check_empty(errors)
}

// A failed advance takes the index of the element it replaced.
pub fn for_all_io<I, C>(mut iter: I, action: C) -> Result<(), IoErrorList>
where
    I: IoIterator,
    C: IoConsumer<I::Item>,
{
    let mut errors = Vec::new();
    let mut index = 0;
    loop {
        let outcome = match iter.next() {
            Ok(Some(item)) => action.accept(item),
            Ok(None) => break,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            debug!(index, error = %e, "element failed, continuing");
            errors.push(IndexedIoError::new(index, e));
        }
        index += 1;
    }
    IoErrorList::check_empty(errors)
}
