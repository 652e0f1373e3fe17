use crate::uncheck;
use std::io;

/// An operation on one input that may fail with an I/O error.
pub trait IoConsumer<T> {
    fn accept(&self, t: T) -> io::Result<()>;

    /// Runs `self`, then `after` on the same input. `after` is skipped when
    /// `self` fails.
    fn and_then<A>(self, after: A) -> AndThen<Self, A>
    where
        Self: Sized,
        A: IoConsumer<T>,
    {
        AndThen {
            first: self,
            second: after,
        }
    }

    /// The standard view: failures are raised as `UncheckedIoError`.
    fn as_consumer(self) -> impl Fn(T)
    where
        Self: Sized,
    {
        move |t| uncheck::unchecked(self.accept(t))
    }
}

impl<T, F> IoConsumer<T> for F
where
    F: Fn(T) -> io::Result<()>,
{
    fn accept(&self, t: T) -> io::Result<()> {
        self(t)
    }
}

pub trait IoBiConsumer<T, U> {
    fn accept(&self, t: T, u: U) -> io::Result<()>;

    fn and_then<A>(self, after: A) -> BiAndThen<Self, A>
    where
        Self: Sized,
        A: IoBiConsumer<T, U>,
    {
        BiAndThen {
            first: self,
            second: after,
        }
    }

    fn as_bi_consumer(self) -> impl Fn(T, U)
    where
        Self: Sized,
    {
        move |t, u| uncheck::unchecked(self.accept(t, u))
    }
}

impl<T, U, F> IoBiConsumer<T, U> for F
where
    F: Fn(T, U) -> io::Result<()>,
{
    fn accept(&self, t: T, u: U) -> io::Result<()> {
        self(t, u)
    }
}

pub trait IoTriConsumer<T, U, V> {
    fn accept(&self, t: T, u: U, v: V) -> io::Result<()>;

    fn and_then<A>(self, after: A) -> TriAndThen<Self, A>
    where
        Self: Sized,
        A: IoTriConsumer<T, U, V>,
    {
        TriAndThen {
            first: self,
            second: after,
        }
    }

    fn as_tri_consumer(self) -> impl Fn(T, U, V)
    where
        Self: Sized,
    {
        move |t, u, v| uncheck::unchecked(self.accept(t, u, v))
    }
}

impl<T, U, V, F> IoTriConsumer<T, U, V> for F
where
    F: Fn(T, U, V) -> io::Result<()>,
{
    fn accept(&self, t: T, u: U, v: V) -> io::Result<()> {
        self(t, u, v)
    }
}

pub trait IoQuadConsumer<T, U, V, W> {
    fn accept(&self, t: T, u: U, v: V, w: W) -> io::Result<()>;

    fn and_then<A>(self, after: A) -> QuadAndThen<Self, A>
    where
        Self: Sized,
        A: IoQuadConsumer<T, U, V, W>,
    {
        QuadAndThen {
            first: self,
            second: after,
        }
    }

    fn as_quad_consumer(self) -> impl Fn(T, U, V, W)
    where
        Self: Sized,
    {
        move |t, u, v, w| uncheck::unchecked(self.accept(t, u, v, w))
    }
}

impl<T, U, V, W, F> IoQuadConsumer<T, U, V, W> for F
where
    F: Fn(T, U, V, W) -> io::Result<()>,
{
    fn accept(&self, t: T, u: U, v: V, w: W) -> io::Result<()> {
        self(t, u, v, w)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AndThen<A, B> {
    first: A,
    second: B,
}

#[derive(Debug, Clone, Copy)]
pub struct BiAndThen<A, B> {
    first: A,
    second: B,
}

#[derive(Debug, Clone, Copy)]
pub struct TriAndThen<A, B> {
    first: A,
    second: B,
}

#[derive(Debug, Clone, Copy)]
pub struct QuadAndThen<A, B> {
    first: A,
    second: B,
}

impl<T: Clone, A, B> IoConsumer<T> for AndThen<A, B>
where
    A: IoConsumer<T>,
    B: IoConsumer<T>,
{
    fn accept(&self, t: T) -> io::Result<()> {
        self.first.accept(t.clone())?;
        self.second.accept(t)
    }
}

impl<T: Clone, U: Clone, A, B> IoBiConsumer<T, U> for BiAndThen<A, B>
where
    A: IoBiConsumer<T, U>,
    B: IoBiConsumer<T, U>,
{
    fn accept(&self, t: T, u: U) -> io::Result<()> {
        self.first.accept(t.clone(), u.clone())?;
        self.second.accept(t, u)
    }
}

impl<T: Clone, U: Clone, V: Clone, A, B> IoTriConsumer<T, U, V> for TriAndThen<A, B>
where
    A: IoTriConsumer<T, U, V>,
    B: IoTriConsumer<T, U, V>,
{
    fn accept(&self, t: T, u: U, v: V) -> io::Result<()> {
        self.first.accept(t.clone(), u.clone(), v.clone())?;
        self.second.accept(t, u, v)
    }
}

impl<T: Clone, U: Clone, V: Clone, W: Clone, A, B> IoQuadConsumer<T, U, V, W> for QuadAndThen<A, B>
where
    A: IoQuadConsumer<T, U, V, W>,
    B: IoQuadConsumer<T, U, V, W>,
{
    fn accept(&self, t: T, u: U, v: V, w: W) -> io::Result<()> {
        self.first.accept(t.clone(), u.clone(), v.clone(), w.clone())?;
        self.second.accept(t, u, v, w)
    }
}

/// Wraps a standard consumer. A raised `UncheckedIoError` comes back as the
/// original `io::Error`.
pub fn adapt<T>(consumer: impl Fn(T)) -> impl Fn(T) -> io::Result<()> {
    move |t| uncheck::catch_unchecked(|| consumer(t))
}

pub fn adapt_bi<T, U>(consumer: impl Fn(T, U)) -> impl Fn(T, U) -> io::Result<()> {
    move |t, u| uncheck::catch_unchecked(|| consumer(t, u))
}

pub fn adapt_tri<T, U, V>(consumer: impl Fn(T, U, V)) -> impl Fn(T, U, V) -> io::Result<()> {
    move |t, u, v| uncheck::catch_unchecked(|| consumer(t, u, v))
}

pub fn adapt_quad<T, U, V, W>(
    consumer: impl Fn(T, U, V, W),
) -> impl Fn(T, U, V, W) -> io::Result<()> {
    move |t, u, v, w| uncheck::catch_unchecked(|| consumer(t, u, v, w))
}

pub fn noop<T>() -> fn(T) -> io::Result<()> {
    |_| Ok(())
}

pub fn noop_bi<T, U>() -> fn(T, U) -> io::Result<()> {
    |_, _| Ok(())
}
