use crate::error::IoErrorList;
use crate::for_all;
use crate::function::{IoBinaryOperator, IoComparator, IoConsumer, IoFunction, IoPredicate};
use crate::function::{IoRunnable, IoSupplier};
use crate::stream::iterator::{self, IntoStdIter, IoIterator};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::io;
use std::marker::PhantomData;
use std::rc::Rc;

/// A lazy, single-pass pipeline. Close handlers only run on [`IoStream::close`].
pub struct IoStream<'a, T> {
    source: Box<dyn IoIterator<Item = T> + 'a>,
    close_handlers: Vec<Box<dyn IoRunnable + 'a>>,
}

impl<'a, T: 'a> IoStream<'a, T> {
    pub fn from_io_iterator(source: impl IoIterator<Item = T> + 'a) -> Self {
        IoStream {
            source: Box::new(source),
            close_handlers: Vec::new(),
        }
    }

    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::from_io_iterator(iterator::adapt(items))
    }

    pub fn adapt<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::of(items)
    }

    pub fn of_values(values: Vec<T>) -> Self {
        Self::of(values)
    }

    pub fn from_results<I>(items: I) -> Self
    where
        I: IntoIterator<Item = io::Result<T>>,
        I::IntoIter: 'a,
    {
        Self::from_io_iterator(iterator::from_results(items))
    }

    pub fn empty() -> Self {
        Self::of(std::iter::empty())
    }

    /// `seed`, `step(seed)`, `step(step(seed))`, ... Ends after a failed step.
    pub fn iterate<F>(seed: T, step: F) -> Self
    where
        T: Clone,
        F: IoFunction<T, T> + 'a,
    {
        Self::from_io_iterator(Iterate {
            cursor: Cursor::Unstarted(seed),
            step,
        })
    }

    pub fn generate<S>(supplier: S) -> Self
    where
        S: IoSupplier<T> + 'a,
    {
        Self::from_io_iterator(Generate {
            supplier,
            _value: PhantomData,
        })
    }

    fn with_handlers(
        source: impl IoIterator<Item = T> + 'a,
        close_handlers: Vec<Box<dyn IoRunnable + 'a>>,
    ) -> Self {
        IoStream {
            source: Box::new(source),
            close_handlers,
        }
    }

    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: for<'x> IoPredicate<&'x T> + 'a,
    {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(Filter { inner, predicate }, close_handlers)
    }

    pub fn map<R: 'a, F>(self, f: F) -> IoStream<'a, R>
    where
        F: IoFunction<T, R> + 'a,
    {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(
            Map {
                inner,
                f,
                _out: PhantomData,
            },
            close_handlers,
        )
    }

    /// Concatenates the streams produced by `f`. Each inner stream is closed
    /// once drained; one left open by an early stop is closed with the outer
    /// stream.
    pub fn flat_map<R: 'a, F>(self, f: F) -> IoStream<'a, R>
    where
        F: IoFunction<T, IoStream<'a, R>> + 'a,
    {
        let IoStream {
            source: inner,
            mut close_handlers,
        } = self;
        let current: Rc<RefCell<Option<IoStream<'a, R>>>> = Rc::new(RefCell::new(None));
        let open = Rc::clone(&current);
        close_handlers.push(Box::new(move || -> io::Result<()> {
            let left_open = open.borrow_mut().take();
            match left_open {
                Some(stream) => stream.close(),
                None => Ok(()),
            }
        }));
        IoStream::with_handlers(FlatMap { inner, f, current }, close_handlers)
    }

    pub fn peek<C>(self, action: C) -> Self
    where
        C: for<'x> IoConsumer<&'x T> + 'a,
    {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(Peek { inner, action }, close_handlers)
    }

    pub fn limit(self, max: usize) -> Self {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(
            Limit {
                inner,
                remaining: max,
            },
            close_handlers,
        )
    }

    pub fn skip(self, n: usize) -> Self {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(Skip { inner, pending: n }, close_handlers)
    }

    pub fn take_while<P>(self, predicate: P) -> Self
    where
        P: for<'x> IoPredicate<&'x T> + 'a,
    {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(
            TakeWhile {
                inner,
                predicate,
                done: false,
            },
            close_handlers,
        )
    }

    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(
            Distinct {
                inner,
                seen: HashSet::new(),
            },
            close_handlers,
        )
    }

    /// Stable sort. Buffers the whole upstream on first demand.
    pub fn sorted<C>(self, comparator: C) -> Self
    where
        C: IoComparator<T> + 'a,
    {
        let IoStream {
            source: inner,
            close_handlers,
        } = self;
        IoStream::with_handlers(
            Sorted {
                inner: Some(inner),
                comparator,
                buffer: Vec::new().into_iter(),
            },
            close_handlers,
        )
    }

    pub fn chain(self, other: IoStream<'a, T>) -> Self {
        let IoStream {
            source: first,
            mut close_handlers,
        } = self;
        close_handlers.extend(other.close_handlers);
        IoStream::with_handlers(
            Chain {
                first: Some(first),
                second: other.source,
            },
            close_handlers,
        )
    }

    pub fn on_close<R>(mut self, handler: R) -> Self
    where
        R: IoRunnable + 'a,
    {
        self.close_handlers.push(Box::new(handler));
        self
    }

    /// Runs every close handler in registration order, even after one fails.
    /// A single failure comes back unchanged; several come back as one error
    /// wrapping an [`IoErrorList`].
    pub fn close(self) -> io::Result<()> {
        for_all::for_all(self.close_handlers.iter(), |h: &Box<dyn IoRunnable + 'a>| h.run())
            .map_err(IoErrorList::into_io_error)
    }

    pub fn for_each<C: IoConsumer<T>>(&mut self, action: C) -> io::Result<()> {
        while let Some(item) = self.source.next()? {
            action.accept(item)?;
        }
        Ok(())
    }

    pub fn for_all<C: IoConsumer<T>>(&mut self, action: C) -> Result<(), IoErrorList> {
        for_all::for_all_io(&mut self.source, action)
    }

    pub fn collect<B: FromIterator<T>>(&mut self) -> io::Result<B> {
        let mut failure = None;
        let source = &mut self.source;
        let out = std::iter::from_fn(|| match source.next() {
            Ok(item) => item,
            Err(e) => {
                failure = Some(e);
                None
            }
        })
        .collect();
        match failure {
            Some(e) => Err(e),
            None => Ok(out),
        }
    }

    pub fn count(&mut self) -> io::Result<usize> {
        let mut n = 0;
        while self.source.next()?.is_some() {
            n += 1;
        }
        Ok(n)
    }

    pub fn reduce<F: IoBinaryOperator<T>>(&mut self, identity: T, op: F) -> io::Result<T> {
        let mut acc = identity;
        while let Some(item) = self.source.next()? {
            acc = op.apply(acc, item)?;
        }
        Ok(acc)
    }

    pub fn reduce_with<F: IoBinaryOperator<T>>(&mut self, op: F) -> io::Result<Option<T>> {
        match self.source.next()? {
            Some(first) => self.reduce(first, op).map(Some),
            None => Ok(None),
        }
    }

    pub fn any_match<P>(&mut self, predicate: P) -> io::Result<bool>
    where
        P: for<'x> IoPredicate<&'x T>,
    {
        while let Some(item) = self.source.next()? {
            if predicate.test(&item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn all_match<P>(&mut self, predicate: P) -> io::Result<bool>
    where
        P: for<'x> IoPredicate<&'x T>,
    {
        while let Some(item) = self.source.next()? {
            if !predicate.test(&item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn none_match<P>(&mut self, predicate: P) -> io::Result<bool>
    where
        P: for<'x> IoPredicate<&'x T>,
    {
        self.any_match(predicate).map(|any| !any)
    }

    pub fn next(&mut self) -> io::Result<Option<T>> {
        self.source.next()
    }

    pub fn find_first(&mut self) -> io::Result<Option<T>> {
        self.source.next()
    }

    pub fn min<C: IoComparator<T>>(&mut self, comparator: C) -> io::Result<Option<T>> {
        self.select(|candidate, best| {
            Ok(comparator.compare(candidate, best)? == Ordering::Less)
        })
    }

    pub fn max<C: IoComparator<T>>(&mut self, comparator: C) -> io::Result<Option<T>> {
        self.select(|candidate, best| {
            Ok(comparator.compare(candidate, best)? == Ordering::Greater)
        })
    }

    fn select(
        &mut self,
        replaces: impl Fn(&T, &T) -> io::Result<bool>,
    ) -> io::Result<Option<T>> {
        let mut best = match self.source.next()? {
            Some(first) => first,
            None => return Ok(None),
        };
        while let Some(item) = self.source.next()? {
            if replaces(&item, &best)? {
                best = item;
            }
        }
        Ok(Some(best))
    }

    pub fn iter_mut(&mut self) -> &mut (dyn IoIterator<Item = T> + 'a) {
        &mut *self.source
    }

    /// Gives up the pipeline. Registered close handlers are dropped unrun.
    pub fn into_io_iterator(self) -> Box<dyn IoIterator<Item = T> + 'a> {
        self.source
    }

    /// The standard view; a failed step is raised as `UncheckedIoError`.
    pub fn as_iterator(&mut self) -> IntoStdIter<&mut (dyn IoIterator<Item = T> + 'a)> {
        self.iter_mut().as_iterator()
    }
}

impl<T> std::fmt::Debug for IoStream<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoStream")
            .field("size_hint", &self.source.size_hint())
            .field("close_handlers", &self.close_handlers.len())
            .finish()
    }
}

// Explicit state instead of a sentinel seed, so `T = Option<_>` works.
enum Cursor<T> {
    Unstarted(T),
    Started(T),
    Exhausted,
}

struct Iterate<T, F> {
    cursor: Cursor<T>,
    step: F,
}

impl<T: Clone, F: IoFunction<T, T>> IoIterator for Iterate<T, F> {
    type Item = T;

    fn next(&mut self) -> io::Result<Option<T>> {
        match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            Cursor::Unstarted(seed) => {
                self.cursor = Cursor::Started(seed.clone());
                Ok(Some(seed))
            }
            Cursor::Started(prev) => {
                let next = self.step.apply(prev)?;
                self.cursor = Cursor::Started(next.clone());
                Ok(Some(next))
            }
            Cursor::Exhausted => Ok(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Cursor::Exhausted => (0, Some(0)),
            _ => (usize::MAX, None),
        }
    }
}

struct Generate<S, T> {
    supplier: S,
    _value: PhantomData<fn() -> T>,
}

impl<T, S: IoSupplier<T>> IoIterator for Generate<S, T> {
    type Item = T;

    fn next(&mut self) -> io::Result<Option<T>> {
        self.supplier.get().map(Some)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

struct Filter<I, P> {
    inner: I,
    predicate: P,
}

impl<I, P> IoIterator for Filter<I, P>
where
    I: IoIterator,
    P: for<'x> IoPredicate<&'x I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        while let Some(item) = self.inner.next()? {
            if self.predicate.test(&item)? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

struct Map<I, F, R> {
    inner: I,
    f: F,
    _out: PhantomData<fn() -> R>,
}

impl<I: IoIterator, R, F: IoFunction<I::Item, R>> IoIterator for Map<I, F, R> {
    type Item = R;

    fn next(&mut self) -> io::Result<Option<R>> {
        match self.inner.next()? {
            Some(item) => self.f.apply(item).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

struct FlatMap<'a, I, F, R> {
    inner: I,
    f: F,
    current: Rc<RefCell<Option<IoStream<'a, R>>>>,
}

impl<'a, I, F, R: 'a> IoIterator for FlatMap<'a, I, F, R>
where
    I: IoIterator,
    F: IoFunction<I::Item, IoStream<'a, R>>,
{
    type Item = R;

    fn next(&mut self) -> io::Result<Option<R>> {
        loop {
            let drained = {
                let mut slot = self.current.borrow_mut();
                let step = match slot.as_mut() {
                    Some(current) => Some(current.next()?),
                    None => None,
                };
                match step {
                    Some(Some(item)) => return Ok(Some(item)),
                    Some(None) => slot.take(),
                    None => None,
                }
            };
            if let Some(done) = drained {
                done.close()?;
            }
            match self.inner.next()? {
                Some(outer) => {
                    let next = self.f.apply(outer)?;
                    *self.current.borrow_mut() = Some(next);
                }
                None => return Ok(None),
            }
        }
    }
}

struct Peek<I, C> {
    inner: I,
    action: C,
}

impl<I, C> IoIterator for Peek<I, C>
where
    I: IoIterator,
    C: for<'x> IoConsumer<&'x I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        match self.inner.next()? {
            Some(item) => {
                self.action.accept(&item)?;
                Ok(Some(item))
            }
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

struct Limit<I> {
    inner: I,
    remaining: usize,
}

impl<I: IoIterator> IoIterator for Limit<I> {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        // A failed advance still uses up one element.
        let item = match self.inner.next() {
            Ok(item) => item,
            Err(e) => {
                self.remaining -= 1;
                return Err(e);
            }
        };
        if item.is_some() {
            self.remaining -= 1;
        } else {
            self.remaining = 0;
        }
        Ok(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.inner.size_hint();
        let hi = hi.map_or(self.remaining, |h| h.min(self.remaining));
        (lo.min(self.remaining), Some(hi))
    }
}

struct Skip<I> {
    inner: I,
    pending: usize,
}

impl<I: IoIterator> IoIterator for Skip<I> {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        while self.pending > 0 {
            if self.inner.next()?.is_none() {
                self.pending = 0;
                return Ok(None);
            }
            self.pending -= 1;
        }
        self.inner.next()
    }
}

struct TakeWhile<I, P> {
    inner: I,
    predicate: P,
    done: bool,
}

impl<I, P> IoIterator for TakeWhile<I, P>
where
    I: IoIterator,
    P: for<'x> IoPredicate<&'x I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        if self.done {
            return Ok(None);
        }
        match self.inner.next()? {
            Some(item) if self.predicate.test(&item)? => Ok(Some(item)),
            _ => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

struct Distinct<I: IoIterator> {
    inner: I,
    seen: HashSet<I::Item>,
}

impl<I> IoIterator for Distinct<I>
where
    I: IoIterator,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        while let Some(item) = self.inner.next()? {
            if self.seen.insert(item.clone()) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}

struct Sorted<I: IoIterator, C> {
    inner: Option<I>,
    comparator: C,
    buffer: std::vec::IntoIter<I::Item>,
}

impl<I: IoIterator, C: IoComparator<I::Item>> Sorted<I, C> {
    // Binary insertion after equal elements keeps the sort stable, and a
    // failing comparison stops the sort immediately.
    fn sort(&self, mut upstream: I) -> io::Result<Vec<I::Item>> {
        let mut sorted: Vec<I::Item> = Vec::new();
        while let Some(item) = upstream.next()? {
            let (mut lo, mut hi) = (0, sorted.len());
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                match self.comparator.compare(&item, &sorted[mid])? {
                    Ordering::Less => hi = mid,
                    _ => lo = mid + 1,
                }
            }
            sorted.insert(lo, item);
        }
        Ok(sorted)
    }
}

impl<I: IoIterator, C: IoComparator<I::Item>> IoIterator for Sorted<I, C> {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        if let Some(upstream) = self.inner.take() {
            self.buffer = self.sort(upstream)?.into_iter();
        }
        Ok(self.buffer.next())
    }
}

struct Chain<I> {
    first: Option<I>,
    second: I,
}

impl<I: IoIterator> IoIterator for Chain<I> {
    type Item = I::Item;

    fn next(&mut self) -> io::Result<Option<I::Item>> {
        if let Some(first) = self.first.as_mut() {
            match first.next()? {
                Some(item) => return Ok(Some(item)),
                None => self.first = None,
            }
        }
        self.second.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::comparator;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn odd_fails(x: i32) -> io::Result<i32> {
        if x % 2 == 1 {
            Err(io::Error::new(io::ErrorKind::InvalidData, format!("odd {}", x)))
        } else {
            Ok(x)
        }
    }

    #[test]
    fn iterate_yields_seed_first() {
        let v: Vec<i32> = IoStream::iterate(0, |x: i32| Ok(x + 1))
            .limit(5)
            .collect()
            .unwrap();
        assert_eq!(v, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn iterate_handles_optional_elements() {
        let step = |x: Option<u8>| -> io::Result<Option<u8>> {
            Ok(match x {
                None => Some(1),
                Some(n) => Some(n + 1),
            })
        };
        let v: Vec<Option<u8>> = IoStream::iterate(None, step).limit(3).collect().unwrap();
        assert_eq!(v, vec![None, Some(1), Some(2)]);
    }

    #[test]
    fn into_io_iterator_continues_where_the_stream_stopped() {
        let mut stream = IoStream::of(vec![1, 2, 3]);
        assert_eq!(stream.next().unwrap(), Some(1));
        let mut rest = stream.into_io_iterator();
        assert_eq!(rest.next().unwrap(), Some(2));
        assert_eq!(rest.next().unwrap(), Some(3));
        assert_eq!(rest.next().unwrap(), None);
    }

    #[test]
    fn iterate_ends_after_failed_step() {
        let step = |x: i32| -> io::Result<i32> {
            if x >= 1 {
                Err(io::Error::other("overflow"))
            } else {
                Ok(x + 1)
            }
        };
        let mut s = IoStream::iterate(0, step);
        assert_eq!(s.next().unwrap(), Some(0));
        assert_eq!(s.next().unwrap(), Some(1));
        assert!(s.next().is_err());
        assert_eq!(s.next().unwrap(), None);
    }

    #[test]
    fn failure_in_map_keeps_identity_and_skips_later_stages() {
        let peeked = Cell::new(0);
        let e = IoStream::of(vec![2, 4, 5, 6])
            .map(odd_fails)
            .peek(|_: &i32| -> io::Result<()> {
                peeked.set(peeked.get() + 1);
                Ok(())
            })
            .collect::<Vec<_>>()
            .unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
        assert_eq!(e.to_string(), "odd 5");
        assert_eq!(peeked.get(), 2);
    }

    #[test]
    fn filter_map_chain() {
        let v: Vec<String> = IoStream::of(1..=6)
            .filter(|x: &i32| -> io::Result<bool> { Ok(x % 2 == 0) })
            .map(|x: i32| Ok(format!("#{}", x)))
            .collect()
            .unwrap();
        assert_eq!(v, vec!["#2", "#4", "#6"]);
    }

    #[test]
    fn flat_map_closes_inner_streams() {
        let closed = Rc::new(Cell::new(0));
        let c = closed.clone();
        let v: Vec<i32> = IoStream::of(vec![1, 2])
            .flat_map(move |x: i32| {
                let c = c.clone();
                Ok(IoStream::of(vec![x, x * 10]).on_close(move || -> io::Result<()> {
                    c.set(c.get() + 1);
                    Ok(())
                }))
            })
            .collect()
            .unwrap();
        assert_eq!(v, vec![1, 10, 2, 20]);
        assert_eq!(closed.get(), 2);
    }

    #[test]
    fn flat_map_closes_an_unfinished_inner_stream_with_the_outer_one() {
        let closed = Rc::new(Cell::new(0));
        let c = closed.clone();
        let mut stream = IoStream::of(vec![1, 2])
            .flat_map(move |x: i32| -> io::Result<IoStream<'static, i32>> {
                let c = c.clone();
                Ok(IoStream::of(vec![x, x * 10]).on_close(move || -> io::Result<()> {
                    c.set(c.get() + 1);
                    Ok(())
                }))
            })
            .limit(1);
        let v: Vec<i32> = stream.collect().unwrap();
        assert_eq!(v, vec![1]);
        assert_eq!(closed.get(), 0);
        stream.close().unwrap();
        assert_eq!(closed.get(), 1);
    }

    #[test]
    fn limit_counts_failed_elements() {
        let calls = Cell::new(0);
        let supplier = || -> io::Result<i32> {
            calls.set(calls.get() + 1);
            Err(io::Error::other("source down"))
        };
        let errors = IoStream::generate(supplier)
            .limit(3)
            .for_all(|_: i32| -> io::Result<()> { Ok(()) })
            .unwrap_err();
        assert_eq!(errors.indexes(), vec![0, 1, 2]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn skip_take_while_distinct_chain() {
        let v: Vec<i32> = IoStream::of(vec![1, 1, 2, 3, 3, 4, 9, 1])
            .distinct()
            .skip(1)
            .take_while(|x: &i32| -> io::Result<bool> { Ok(*x < 5) })
            .chain(IoStream::of(vec![100]))
            .collect()
            .unwrap();
        assert_eq!(v, vec![2, 3, 4, 100]);
    }

    #[test]
    fn sorted_is_stable_and_propagates_failure() {
        let by_key = comparator::comparing(|p: &(u8, char)| Ok(p.0));
        let v: Vec<(u8, char)> = IoStream::of(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')])
            .sorted(by_key)
            .collect()
            .unwrap();
        assert_eq!(v, vec![(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);

        let broken = |_: &u8, _: &u8| -> io::Result<Ordering> { Err(io::Error::other("cmp")) };
        let e = IoStream::of(vec![2u8, 1])
            .sorted(broken)
            .count()
            .unwrap_err();
        assert_eq!(e.to_string(), "cmp");
    }

    #[test]
    fn matching_short_circuits() {
        let tested = Cell::new(0);
        let big = |x: &i32| -> io::Result<bool> {
            tested.set(tested.get() + 1);
            Ok(*x > 2)
        };
        assert!(IoStream::of(1..=10).any_match(big).unwrap());
        assert_eq!(tested.get(), 3);

        let small = |x: &i32| -> io::Result<bool> { Ok(*x < 3) };
        assert!(!IoStream::of(1..=10).all_match(small).unwrap());
        assert!(IoStream::of(3..=9).none_match(small).unwrap());
        let never = |_: &i32| -> io::Result<bool> { Ok(false) };
        assert!(IoStream::<i32>::empty().all_match(never).unwrap());
    }

    #[test]
    fn reductions() {
        let add = |a: i32, b: i32| -> io::Result<i32> { Ok(a + b) };
        assert_eq!(IoStream::of(1..=4).reduce(0, add).unwrap(), 10);
        assert_eq!(IoStream::of(1..=4).reduce_with(add).unwrap(), Some(10));
        assert_eq!(IoStream::<i32>::empty().reduce_with(add).unwrap(), None);
        assert_eq!(IoStream::of(1..=4).count().unwrap(), 4);
        assert_eq!(
            IoStream::of(vec![3, 1, 3]).max(comparator::natural()).unwrap(),
            Some(3)
        );
        assert_eq!(
            IoStream::of(vec![3, 1, 1]).min(comparator::natural()).unwrap(),
            Some(1)
        );
        assert_eq!(IoStream::of(vec![5, 6]).find_first().unwrap(), Some(5));
    }

    #[test]
    fn generate_with_limit() {
        let n = Cell::new(0);
        let next = || -> io::Result<i32> {
            n.set(n.get() + 1);
            Ok(n.get())
        };
        let v: Vec<i32> = IoStream::generate(next).limit(3).collect().unwrap();
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn for_all_collects_indexed_failures() {
        let err = IoStream::of(vec![1, 2, 3])
            .for_all(|x: i32| odd_fails(x).map(|_| ()))
            .unwrap_err();
        assert_eq!(err.indexes(), vec![0, 2]);
    }

    #[test]
    fn for_each_is_fail_fast() {
        let seen = RefCell::new(Vec::new());
        let e = IoStream::of(vec![2, 3, 4])
            .for_each(|x: i32| -> io::Result<()> {
                odd_fails(x)?;
                seen.borrow_mut().push(x);
                Ok(())
            })
            .unwrap_err();
        assert_eq!(e.to_string(), "odd 3");
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn close_runs_every_handler() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (order.clone(), order.clone());
        let s = IoStream::of(vec![1])
            .on_close(move || -> io::Result<()> {
                a.borrow_mut().push("first");
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            })
            .filter(|_: &i32| -> io::Result<bool> { Ok(true) })
            .on_close(move || -> io::Result<()> {
                b.borrow_mut().push("second");
                Ok(())
            });
        let e = s.close().unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn close_with_several_failures_aggregates() {
        let fail = || -> io::Result<()> { Err(io::Error::other("x")) };
        let e = IoStream::of(vec![0u8])
            .on_close(fail)
            .on_close(fail)
            .close()
            .unwrap_err();
        let list = e.get_ref().unwrap().downcast_ref::<IoErrorList>().unwrap();
        assert_eq!(list.indexes(), vec![0, 1]);
    }

    #[test]
    fn std_view_yields_same_elements() {
        let mut s = IoStream::of(vec![1, 2, 3]);
        let v: Vec<i32> = s.as_iterator().collect();
        assert_eq!(v, vec![1, 2, 3]);
        assert!(s.close().is_ok());

        let mut failing = IoStream::from_results(vec![Ok(1), Err(io::Error::other("late"))]);
        let e = crate::uncheck::catch_unchecked(|| failing.as_iterator().count()).unwrap_err();
        assert_eq!(e.to_string(), "late");
    }
}
