//! The boundary between checked (`io::Result`) and unchecked (panicking) form.
//!
//! A checked failure crossing into a standard closure or iterator is raised as
//! a panic whose payload is [`UncheckedIoError`]. [`catch_unchecked`] recovers
//! the original `io::Error` on the way back, so a checked -> unchecked ->
//! checked round trip keeps the failure's kind and message. Any other panic
//! keeps unwinding untouched.
//!
//! Raising goes through the installed panic hook, so with the default hook
//! every unchecked failure prints a "thread ... panicked" line to stderr even
//! when [`catch_unchecked`] recovers it. Requires `panic = "unwind"`.

use crate::error::UncheckedIoError;
use crate::function::{
    IoBiConsumer, IoBiFunction, IoComparator, IoConsumer, IoFunction, IoPredicate, IoRunnable,
    IoSupplier,
};
use std::cmp::Ordering;
use std::io;
use std::panic::{self, AssertUnwindSafe};

/// Raises `err` as an unchecked failure.
pub fn raise(err: io::Error) -> ! {
    panic::panic_any(UncheckedIoError::new(err))
}

/// Raises `err` as an unchecked failure carrying `message`.
pub fn raise_with_message(message: impl Into<String>, err: io::Error) -> ! {
    panic::panic_any(UncheckedIoError::with_message(message, err))
}

/// Unwraps a checked result, raising its failure as unchecked.
pub fn unchecked<R>(result: io::Result<R>) -> R {
    match result {
        Ok(r) => r,
        Err(e) => raise(e),
    }
}

/// Runs `f`, turning a raised [`UncheckedIoError`] back into its checked form.
pub fn catch_unchecked<R>(f: impl FnOnce() -> R) -> io::Result<R> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(r) => Ok(r),
        Err(payload) => match payload.downcast::<UncheckedIoError>() {
            Ok(unchecked) => Err(unchecked.into_inner()),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

pub fn accept<T>(consumer: &impl IoConsumer<T>, t: T) {
    unchecked(consumer.accept(t))
}

pub fn accept_bi<T, U>(consumer: &impl IoBiConsumer<T, U>, t: T, u: U) {
    unchecked(consumer.accept(t, u))
}

pub fn apply<T, R>(function: &impl IoFunction<T, R>, t: T) -> R {
    unchecked(function.apply(t))
}

pub fn apply_bi<T, U, R>(function: &impl IoBiFunction<T, U, R>, t: T, u: U) -> R {
    unchecked(function.apply(t, u))
}

pub fn get<T>(supplier: &impl IoSupplier<T>) -> T {
    unchecked(supplier.get())
}

/// Like [`get`], with a message attached to the raised failure.
pub fn get_with_message<T>(supplier: &impl IoSupplier<T>, message: impl FnOnce() -> String) -> T {
    match supplier.get() {
        Ok(t) => t,
        Err(e) => raise_with_message(message(), e),
    }
}

pub fn test<T>(predicate: &impl IoPredicate<T>, t: T) -> bool {
    unchecked(predicate.test(t))
}

pub fn compare<T>(comparator: &impl IoComparator<T>, a: &T, b: &T) -> Ordering {
    unchecked(comparator.compare(a, b))
}

pub fn run(runnable: &impl IoRunnable) {
    unchecked(runnable.run())
}
