use crate::function::{IoBiFunction, IoComparator, IoFunction};
use std::cmp::Ordering;
use std::io;

/// An [`IoFunction`] whose input and output types match.
pub trait IoUnaryOperator<T>: IoFunction<T, T> {}

impl<T, F: IoFunction<T, T>> IoUnaryOperator<T> for F {}

/// An [`IoBiFunction`] combining two values of one type into a third.
pub trait IoBinaryOperator<T>: IoBiFunction<T, T, T> {}

impl<T, F: IoBiFunction<T, T, T>> IoBinaryOperator<T> for F {}

/// The lesser of two values; the first wins ties.
pub fn min_by<T, C: IoComparator<T>>(comparator: C) -> impl Fn(T, T) -> io::Result<T> {
    move |a, b| match comparator.compare(&a, &b)? {
        Ordering::Greater => Ok(b),
        _ => Ok(a),
    }
}

/// The greater of two values; the first wins ties.
pub fn max_by<T, C: IoComparator<T>>(comparator: C) -> impl Fn(T, T) -> io::Result<T> {
    move |a, b| match comparator.compare(&a, &b)? {
        Ordering::Less => Ok(b),
        _ => Ok(a),
    }
}
