use crate::uncheck;
use std::cmp::Ordering;
use std::io;

/// An ordering that may need I/O to decide, e.g. comparing files by size.
pub trait IoComparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> io::Result<Ordering>;

    /// Breaks ties with `next`. `next` only runs on `Equal`.
    fn then_comparing<C>(self, next: C) -> ThenComparing<Self, C>
    where
        Self: Sized,
        C: IoComparator<T>,
    {
        ThenComparing { first: self, next }
    }

    fn reversed(self) -> Reversed<Self>
    where
        Self: Sized,
    {
        Reversed { inner: self }
    }

    fn as_comparator(self) -> impl Fn(&T, &T) -> Ordering
    where
        Self: Sized,
    {
        move |a, b| uncheck::unchecked(self.compare(a, b))
    }
}

impl<T: ?Sized, F> IoComparator<T> for F
where
    F: Fn(&T, &T) -> io::Result<Ordering>,
{
    fn compare(&self, a: &T, b: &T) -> io::Result<Ordering> {
        self(a, b)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ThenComparing<A, B> {
    first: A,
    next: B,
}

impl<T: ?Sized, A: IoComparator<T>, B: IoComparator<T>> IoComparator<T> for ThenComparing<A, B> {
    fn compare(&self, a: &T, b: &T) -> io::Result<Ordering> {
        match self.first.compare(a, b)? {
            Ordering::Equal => self.next.compare(a, b),
            decided => Ok(decided),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Reversed<A> {
    inner: A,
}

impl<T: ?Sized, A: IoComparator<T>> IoComparator<T> for Reversed<A> {
    fn compare(&self, a: &T, b: &T) -> io::Result<Ordering> {
        self.inner.compare(b, a)
    }
}

/// Orders by `T: Ord`; never fails.
pub fn natural<T: Ord + ?Sized>() -> fn(&T, &T) -> io::Result<Ordering> {
    |a, b| Ok(a.cmp(b))
}

/// Orders by a fallible key, e.g. a file's modification time.
pub fn comparing<T: ?Sized, K: Ord>(
    key: impl Fn(&T) -> io::Result<K>,
) -> impl Fn(&T, &T) -> io::Result<Ordering> {
    move |a, b| Ok(key(a)?.cmp(&key(b)?))
}

pub fn adapt<T: ?Sized>(
    comparator: impl Fn(&T, &T) -> Ordering,
) -> impl Fn(&T, &T) -> io::Result<Ordering> {
    move |a, b| uncheck::catch_unchecked(|| comparator(a, b))
}
