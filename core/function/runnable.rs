use crate::uncheck;
use std::io;

/// A side effect with no inputs that may fail, e.g. flushing or closing.
pub trait IoRunnable {
    fn run(&self) -> io::Result<()>;

    fn and_then<R>(self, after: R) -> AndThen<Self, R>
    where
        Self: Sized,
        R: IoRunnable,
    {
        AndThen {
            first: self,
            second: after,
        }
    }

    fn as_runnable(self) -> impl Fn()
    where
        Self: Sized,
    {
        move || uncheck::unchecked(self.run())
    }
}

impl<F> IoRunnable for F
where
    F: Fn() -> io::Result<()>,
{
    fn run(&self) -> io::Result<()> {
        self()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AndThen<A, B> {
    first: A,
    second: B,
}

impl<A: IoRunnable, B: IoRunnable> IoRunnable for AndThen<A, B> {
    fn run(&self) -> io::Result<()> {
        self.first.run()?;
        self.second.run()
    }
}

pub fn adapt(runnable: impl Fn()) -> impl Fn() -> io::Result<()> {
    move || uncheck::catch_unchecked(&runnable)
}

pub fn noop() -> fn() -> io::Result<()> {
    || Ok(())
}
