use crate::function::IoConsumer;
use crate::uncheck;
use std::io;

/// An iterator whose advance may fail. After an `Err` it may continue or end.
pub trait IoIterator {
    type Item;

    fn next(&mut self) -> io::Result<Option<Self::Item>>;

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }

    fn for_each_remaining<C>(&mut self, action: &C) -> io::Result<()>
    where
        Self: Sized,
        C: IoConsumer<Self::Item> + ?Sized,
    {
        while let Some(item) = self.next()? {
            action.accept(item)?;
        }
        Ok(())
    }

    /// The standard view. A failed advance is raised as `UncheckedIoError`.
    fn as_iterator(self) -> IntoStdIter<Self>
    where
        Self: Sized,
    {
        IntoStdIter { inner: self }
    }

    fn by_ref(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self
    }
}

impl<I: IoIterator + ?Sized> IoIterator for &mut I {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        (**self).next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

impl<I: IoIterator + ?Sized> IoIterator for Box<I> {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        (**self).next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}

#[derive(Debug, Clone)]
pub struct Adapter<I> {
    inner: I,
}

impl<I: Iterator> IoIterator for Adapter<I> {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        Ok(self.inner.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub fn adapt<I: IntoIterator>(items: I) -> Adapter<I::IntoIter> {
    Adapter {
        inner: items.into_iter(),
    }
}

#[derive(Debug, Clone)]
pub struct FromResults<I> {
    inner: I,
}

impl<T, I: Iterator<Item = io::Result<T>>> IoIterator for FromResults<I> {
    type Item = T;

    fn next(&mut self) -> io::Result<Option<T>> {
        self.inner.next().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub fn from_results<T, I>(items: I) -> FromResults<I::IntoIter>
where
    I: IntoIterator<Item = io::Result<T>>,
{
    FromResults {
        inner: items.into_iter(),
    }
}

/// The standard [`Iterator`] view of an [`IoIterator`].
#[derive(Debug, Clone)]
pub struct IntoStdIter<I> {
    inner: I,
}

impl<I> IntoStdIter<I> {
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: IoIterator> Iterator for IntoStdIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        uncheck::unchecked(self.inner.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn drain<I: IoIterator>(mut it: I) -> io::Result<Vec<I::Item>> {
        let mut out = Vec::new();
        while let Some(x) = it.next()? {
            out.push(x);
        }
        Ok(out)
    }

    #[test]
    fn std_view_matches_checked_sequence() {
        let checked = drain(adapt(vec![1, 2, 3])).unwrap();
        let unchecked: Vec<i32> = adapt(vec![1, 2, 3]).as_iterator().collect();
        assert_eq!(checked, vec![1, 2, 3]);
        assert_eq!(unchecked, checked);
    }

    #[test]
    fn empty_sequence_ends_immediately() {
        let mut it = adapt(Vec::<i32>::new());
        assert!(it.next().unwrap().is_none());
        assert_eq!(adapt(Vec::<i32>::new()).as_iterator().next(), None);
    }

    #[test]
    fn from_results_continues_after_failure() {
        let mut it = from_results(vec![Ok(1), Err(io::Error::other("bad entry")), Ok(3)]);
        assert_eq!(it.next().unwrap(), Some(1));
        assert_eq!(it.next().unwrap_err().to_string(), "bad entry");
        assert_eq!(it.next().unwrap(), Some(3));
        assert_eq!(it.next().unwrap(), None);
    }

    #[test]
    fn std_view_raises_failure() {
        let it = from_results(vec![Ok(1), Err(io::Error::from(io::ErrorKind::Interrupted))]);
        let e = uncheck::catch_unchecked(|| it.as_iterator().count()).unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::Interrupted);
    }

    #[test]
    fn for_each_remaining_stops_at_consumer_failure() {
        let seen = RefCell::new(Vec::new());
        let action = |x: i32| -> io::Result<()> {
            if x == 2 {
                return Err(io::Error::other("two"));
            }
            seen.borrow_mut().push(x);
            Ok(())
        };
        let mut it = adapt(vec![1, 2, 3]);
        assert!(it.for_each_remaining(&action).is_err());
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(it.next().unwrap(), Some(3));
    }

    #[test]
    fn boxed_and_borrowed_iterators() {
        let mut boxed: Box<dyn IoIterator<Item = u8>> = Box::new(adapt(vec![7, 8]));
        assert_eq!(boxed.by_ref().next().unwrap(), Some(7));
        assert_eq!(drain(&mut boxed).unwrap(), vec![8]);
    }
}
