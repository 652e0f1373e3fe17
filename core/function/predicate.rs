use crate::uncheck;
use std::io;

/// A boolean test that may fail with an I/O error.
pub trait IoPredicate<T> {
    fn test(&self, t: T) -> io::Result<bool>;

    /// Short-circuits on `false` and on failure.
    fn and<P>(self, other: P) -> And<Self, P>
    where
        Self: Sized,
        P: IoPredicate<T>,
    {
        And {
            left: self,
            right: other,
        }
    }

    /// Short-circuits on `true` and on failure.
    fn or<P>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
        P: IoPredicate<T>,
    {
        Or {
            left: self,
            right: other,
        }
    }

    fn negate(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not { inner: self }
    }

    fn as_predicate(self) -> impl Fn(T) -> bool
    where
        Self: Sized,
    {
        move |t| uncheck::unchecked(self.test(t))
    }
}

impl<T, F> IoPredicate<T> for F
where
    F: Fn(T) -> io::Result<bool>,
{
    fn test(&self, t: T) -> io::Result<bool> {
        self(t)
    }
}

pub trait IoBiPredicate<T, U> {
    fn test(&self, t: T, u: U) -> io::Result<bool>;

    fn and<P>(self, other: P) -> BiAnd<Self, P>
    where
        Self: Sized,
        P: IoBiPredicate<T, U>,
    {
        BiAnd {
            left: self,
            right: other,
        }
    }

    fn or<P>(self, other: P) -> BiOr<Self, P>
    where
        Self: Sized,
        P: IoBiPredicate<T, U>,
    {
        BiOr {
            left: self,
            right: other,
        }
    }

    fn negate(self) -> BiNot<Self>
    where
        Self: Sized,
    {
        BiNot { inner: self }
    }

    fn as_bi_predicate(self) -> impl Fn(T, U) -> bool
    where
        Self: Sized,
    {
        move |t, u| uncheck::unchecked(self.test(t, u))
    }
}

impl<T, U, F> IoBiPredicate<T, U> for F
where
    F: Fn(T, U) -> io::Result<bool>,
{
    fn test(&self, t: T, u: U) -> io::Result<bool> {
        self(t, u)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct And<A, B> {
    left: A,
    right: B,
}

#[derive(Debug, Clone, Copy)]
pub struct Or<A, B> {
    left: A,
    right: B,
}

#[derive(Debug, Clone, Copy)]
pub struct Not<A> {
    inner: A,
}

#[derive(Debug, Clone, Copy)]
pub struct BiAnd<A, B> {
    left: A,
    right: B,
}

#[derive(Debug, Clone, Copy)]
pub struct BiOr<A, B> {
    left: A,
    right: B,
}

#[derive(Debug, Clone, Copy)]
pub struct BiNot<A> {
    inner: A,
}

impl<T: Clone, A: IoPredicate<T>, B: IoPredicate<T>> IoPredicate<T> for And<A, B> {
    fn test(&self, t: T) -> io::Result<bool> {
        Ok(self.left.test(t.clone())? && self.right.test(t)?)
    }
}

impl<T: Clone, A: IoPredicate<T>, B: IoPredicate<T>> IoPredicate<T> for Or<A, B> {
    fn test(&self, t: T) -> io::Result<bool> {
        Ok(self.left.test(t.clone())? || self.right.test(t)?)
    }
}

impl<T, A: IoPredicate<T>> IoPredicate<T> for Not<A> {
    fn test(&self, t: T) -> io::Result<bool> {
        self.inner.test(t).map(|b| !b)
    }
}

impl<T: Clone, U: Clone, A, B> IoBiPredicate<T, U> for BiAnd<A, B>
where
    A: IoBiPredicate<T, U>,
    B: IoBiPredicate<T, U>,
{
    fn test(&self, t: T, u: U) -> io::Result<bool> {
        Ok(self.left.test(t.clone(), u.clone())? && self.right.test(t, u)?)
    }
}

impl<T: Clone, U: Clone, A, B> IoBiPredicate<T, U> for BiOr<A, B>
where
    A: IoBiPredicate<T, U>,
    B: IoBiPredicate<T, U>,
{
    fn test(&self, t: T, u: U) -> io::Result<bool> {
        Ok(self.left.test(t.clone(), u.clone())? || self.right.test(t, u)?)
    }
}

impl<T, U, A: IoBiPredicate<T, U>> IoBiPredicate<T, U> for BiNot<A> {
    fn test(&self, t: T, u: U) -> io::Result<bool> {
        self.inner.test(t, u).map(|b| !b)
    }
}

pub fn adapt<T>(predicate: impl Fn(T) -> bool) -> impl Fn(T) -> io::Result<bool> {
    move |t| uncheck::catch_unchecked(|| predicate(t))
}

pub fn adapt_bi<T, U>(predicate: impl Fn(T, U) -> bool) -> impl Fn(T, U) -> io::Result<bool> {
    move |t, u| uncheck::catch_unchecked(|| predicate(t, u))
}

pub fn always_true<T>() -> fn(T) -> io::Result<bool> {
    |_| Ok(true)
}

pub fn always_false<T>() -> fn(T) -> io::Result<bool> {
    |_| Ok(false)
}
