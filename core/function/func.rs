use crate::function::IoConsumer;
use crate::uncheck;
use std::io;
use std::marker::PhantomData;

/// A function of one input that may fail with an I/O error.
pub trait IoFunction<T, R> {
    fn apply(&self, t: T) -> io::Result<R>;

    /// `after(self(t))`; `after` never runs when `self` fails.
    fn and_then<V, A>(self, after: A) -> AndThen<Self, A, R>
    where
        Self: Sized,
        A: IoFunction<R, V>,
    {
        AndThen {
            first: self,
            second: after,
            _mid: PhantomData,
        }
    }

    /// `self(before(v))`; `self` never runs when `before` fails.
    fn compose<V, B>(self, before: B) -> AndThen<B, Self, T>
    where
        Self: Sized,
        B: IoFunction<V, T>,
    {
        AndThen {
            first: before,
            second: self,
            _mid: PhantomData,
        }
    }

    /// Feeds the result into a consumer.
    fn and_then_accept<C>(self, after: C) -> Accept<Self, C, R>
    where
        Self: Sized,
        C: IoConsumer<R>,
    {
        Accept {
            function: self,
            consumer: after,
            _mid: PhantomData,
        }
    }

    fn as_function(self) -> impl Fn(T) -> R
    where
        Self: Sized,
    {
        move |t| uncheck::unchecked(self.apply(t))
    }
}

impl<T, R, F> IoFunction<T, R> for F
where
    F: Fn(T) -> io::Result<R>,
{
    fn apply(&self, t: T) -> io::Result<R> {
        self(t)
    }
}

pub trait IoBiFunction<T, U, R> {
    fn apply(&self, t: T, u: U) -> io::Result<R>;

    fn and_then<V, A>(self, after: A) -> BiAndThen<Self, A, R>
    where
        Self: Sized,
        A: IoFunction<R, V>,
    {
        BiAndThen {
            first: self,
            second: after,
            _mid: PhantomData,
        }
    }

    fn as_bi_function(self) -> impl Fn(T, U) -> R
    where
        Self: Sized,
    {
        move |t, u| uncheck::unchecked(self.apply(t, u))
    }
}

impl<T, U, R, F> IoBiFunction<T, U, R> for F
where
    F: Fn(T, U) -> io::Result<R>,
{
    fn apply(&self, t: T, u: U) -> io::Result<R> {
        self(t, u)
    }
}

pub trait IoTriFunction<T, U, V, R> {
    fn apply(&self, t: T, u: U, v: V) -> io::Result<R>;

    fn and_then<X, A>(self, after: A) -> TriAndThen<Self, A, R>
    where
        Self: Sized,
        A: IoFunction<R, X>,
    {
        TriAndThen {
            first: self,
            second: after,
            _mid: PhantomData,
        }
    }

    fn as_tri_function(self) -> impl Fn(T, U, V) -> R
    where
        Self: Sized,
    {
        move |t, u, v| uncheck::unchecked(self.apply(t, u, v))
    }
}

impl<T, U, V, R, F> IoTriFunction<T, U, V, R> for F
where
    F: Fn(T, U, V) -> io::Result<R>,
{
    fn apply(&self, t: T, u: U, v: V) -> io::Result<R> {
        self(t, u, v)
    }
}

pub trait IoQuadFunction<T, U, V, W, R> {
    fn apply(&self, t: T, u: U, v: V, w: W) -> io::Result<R>;

    fn and_then<X, A>(self, after: A) -> QuadAndThen<Self, A, R>
    where
        Self: Sized,
        A: IoFunction<R, X>,
    {
        QuadAndThen {
            first: self,
            second: after,
            _mid: PhantomData,
        }
    }

    fn as_quad_function(self) -> impl Fn(T, U, V, W) -> R
    where
        Self: Sized,
    {
        move |t, u, v, w| uncheck::unchecked(self.apply(t, u, v, w))
    }
}

impl<T, U, V, W, R, F> IoQuadFunction<T, U, V, W, R> for F
where
    F: Fn(T, U, V, W) -> io::Result<R>,
{
    fn apply(&self, t: T, u: U, v: V, w: W) -> io::Result<R> {
        self(t, u, v, w)
    }
}

// `M` is the intermediate type; it only appears in the impls below.
pub struct AndThen<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M>,
}

pub struct BiAndThen<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M>,
}

pub struct TriAndThen<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M>,
}

pub struct QuadAndThen<A, B, M> {
    first: A,
    second: B,
    _mid: PhantomData<fn() -> M>,
}

pub struct Accept<F, C, M> {
    function: F,
    consumer: C,
    _mid: PhantomData<fn() -> M>,
}

impl<T, M, R, A, B> IoFunction<T, R> for AndThen<A, B, M>
where
    A: IoFunction<T, M>,
    B: IoFunction<M, R>,
{
    fn apply(&self, t: T) -> io::Result<R> {
        self.second.apply(self.first.apply(t)?)
    }
}

impl<T, U, M, R, A, B> IoBiFunction<T, U, R> for BiAndThen<A, B, M>
where
    A: IoBiFunction<T, U, M>,
    B: IoFunction<M, R>,
{
    fn apply(&self, t: T, u: U) -> io::Result<R> {
        self.second.apply(self.first.apply(t, u)?)
    }
}

impl<T, U, V, M, R, A, B> IoTriFunction<T, U, V, R> for TriAndThen<A, B, M>
where
    A: IoTriFunction<T, U, V, M>,
    B: IoFunction<M, R>,
{
    fn apply(&self, t: T, u: U, v: V) -> io::Result<R> {
        self.second.apply(self.first.apply(t, u, v)?)
    }
}

impl<T, U, V, W, M, R, A, B> IoQuadFunction<T, U, V, W, R> for QuadAndThen<A, B, M>
where
    A: IoQuadFunction<T, U, V, W, M>,
    B: IoFunction<M, R>,
{
    fn apply(&self, t: T, u: U, v: V, w: W) -> io::Result<R> {
        self.second.apply(self.first.apply(t, u, v, w)?)
    }
}

impl<T, M, F, C> IoConsumer<T> for Accept<F, C, M>
where
    F: IoFunction<T, M>,
    C: IoConsumer<M>,
{
    fn accept(&self, t: T) -> io::Result<()> {
        self.consumer.accept(self.function.apply(t)?)
    }
}

/// Wraps a standard function, restoring raised `UncheckedIoError`s.
pub fn adapt<T, R>(function: impl Fn(T) -> R) -> impl Fn(T) -> io::Result<R> {
    move |t| uncheck::catch_unchecked(|| function(t))
}

pub fn adapt_bi<T, U, R>(function: impl Fn(T, U) -> R) -> impl Fn(T, U) -> io::Result<R> {
    move |t, u| uncheck::catch_unchecked(|| function(t, u))
}

pub fn adapt_tri<T, U, V, R>(
    function: impl Fn(T, U, V) -> R,
) -> impl Fn(T, U, V) -> io::Result<R> {
    move |t, u, v| uncheck::catch_unchecked(|| function(t, u, v))
}

pub fn adapt_quad<T, U, V, W, R>(
    function: impl Fn(T, U, V, W) -> R,
) -> impl Fn(T, U, V, W) -> io::Result<R> {
    move |t, u, v, w| uncheck::catch_unchecked(|| function(t, u, v, w))
}

pub fn identity<T>() -> fn(T) -> io::Result<T> {
    Ok
}
