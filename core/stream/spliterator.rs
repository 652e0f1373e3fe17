use crate::function::IoConsumer;
use crate::stream::IoIterator;
use crate::uncheck;
use std::cell::Cell;
use std::collections::VecDeque;
use std::io;

/// A splittable source whose element hand-off may fail.
pub trait IoSpliterator {
    type Item;

    fn try_advance<C>(&mut self, action: &C) -> io::Result<bool>
    where
        C: IoConsumer<Self::Item> + ?Sized;

    fn for_each_remaining<C>(&mut self, action: &C) -> io::Result<()>
    where
        C: IoConsumer<Self::Item> + ?Sized,
    {
        while self.try_advance(action)? {}
        Ok(())
    }

    /// Remaining elements, or `usize::MAX` when unknown.
    fn estimate_size(&self) -> usize;

    fn exact_size_if_known(&self) -> Option<usize> {
        None
    }

    /// Moves a prefix of the remaining elements into a new spliterator.
    fn try_split(&mut self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    fn as_iterator(self) -> SpliteratorIter<Self>
    where
        Self: Sized,
    {
        SpliteratorIter { inner: self }
    }
}

/// A standard iterator seen as an [`IoSpliterator`]. It cannot split.
#[derive(Debug, Clone)]
pub struct Adapter<I> {
    inner: I,
}

pub fn adapt<I: IntoIterator>(items: I) -> Adapter<I::IntoIter> {
    Adapter {
        inner: items.into_iter(),
    }
}

impl<I: Iterator> IoSpliterator for Adapter<I> {
    type Item = I::Item;

    fn try_advance<C>(&mut self, action: &C) -> io::Result<bool>
    where
        C: IoConsumer<I::Item> + ?Sized,
    {
        match self.inner.next() {
            Some(item) => action.accept(item).map(|_| true),
            None => Ok(false),
        }
    }

    fn estimate_size(&self) -> usize {
        self.inner.size_hint().1.unwrap_or(usize::MAX)
    }

    fn exact_size_if_known(&self) -> Option<usize> {
        match self.inner.size_hint() {
            (lo, Some(hi)) if lo == hi => Some(lo),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct FromIoIterator<I> {
    inner: I,
}

pub fn from_io_iterator<I: IoIterator>(inner: I) -> FromIoIterator<I> {
    FromIoIterator { inner }
}

impl<I: IoIterator> IoSpliterator for FromIoIterator<I> {
    type Item = I::Item;

    fn try_advance<C>(&mut self, action: &C) -> io::Result<bool>
    where
        C: IoConsumer<I::Item> + ?Sized,
    {
        match self.inner.next()? {
            Some(item) => action.accept(item).map(|_| true),
            None => Ok(false),
        }
    }

    fn estimate_size(&self) -> usize {
        self.inner.size_hint().1.unwrap_or(usize::MAX)
    }
}

/// Owns its elements, so it knows its size and splits in halves.
#[derive(Debug, Clone, Default)]
pub struct VecSpliterator<T> {
    items: VecDeque<T>,
}

impl<T> VecSpliterator<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        VecSpliterator {
            items: items.into_iter().collect(),
        }
    }
}

impl<T> IoSpliterator for VecSpliterator<T> {
    type Item = T;

    fn try_advance<C>(&mut self, action: &C) -> io::Result<bool>
    where
        C: IoConsumer<T> + ?Sized,
    {
        match self.items.pop_front() {
            Some(item) => action.accept(item).map(|_| true),
            None => Ok(false),
        }
    }

    fn estimate_size(&self) -> usize {
        self.items.len()
    }

    fn exact_size_if_known(&self) -> Option<usize> {
        Some(self.items.len())
    }

    fn try_split(&mut self) -> Option<Self> {
        let half = self.items.len() / 2;
        if half == 0 {
            return None;
        }
        let rest = self.items.split_off(half);
        let prefix = std::mem::replace(&mut self.items, rest);
        Some(VecSpliterator { items: prefix })
    }
}

/// The standard [`Iterator`] view of an [`IoSpliterator`].
#[derive(Debug)]
pub struct SpliteratorIter<S> {
    inner: S,
}

impl<S: IoSpliterator> Iterator for SpliteratorIter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        let slot = Cell::new(None);
        let store = |item: S::Item| -> io::Result<()> {
            slot.set(Some(item));
            Ok(())
        };
        match self.inner.try_advance(&store) {
            Ok(true) => slot.take(),
            Ok(false) => None,
            Err(e) => uncheck::raise(e),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.inner.exact_size_if_known() {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}
