use crate::function::IoFunction;
use crate::uncheck;
use std::io;
use std::marker::PhantomData;

/// Produces a value, possibly doing I/O to get it.
pub trait IoSupplier<T> {
    fn get(&self) -> io::Result<T>;

    /// Applies `f` to the supplied value.
    fn map<R, F>(self, f: F) -> Map<Self, F, T>
    where
        Self: Sized,
        F: IoFunction<T, R>,
    {
        Map {
            supplier: self,
            f,
            _value: PhantomData,
        }
    }

    fn as_supplier(self) -> impl Fn() -> T
    where
        Self: Sized,
    {
        move || uncheck::unchecked(self.get())
    }
}

impl<T, F> IoSupplier<T> for F
where
    F: Fn() -> io::Result<T>,
{
    fn get(&self) -> io::Result<T> {
        self()
    }
}

pub struct Map<S, F, T> {
    supplier: S,
    f: F,
    _value: PhantomData<fn() -> T>,
}

impl<T, R, S, F> IoSupplier<R> for Map<S, F, T>
where
    S: IoSupplier<T>,
    F: IoFunction<T, R>,
{
    fn get(&self) -> io::Result<R> {
        self.f.apply(self.supplier.get()?)
    }
}

pub fn adapt<T>(supplier: impl Fn() -> T) -> impl Fn() -> io::Result<T> {
    move || uncheck::catch_unchecked(&supplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value.txt");
        let read = || fs::read_to_string(&path);

        assert_eq!(read.get().unwrap_err().kind(), io::ErrorKind::NotFound);
        fs::write(&path, "hello").unwrap();
        assert_eq!(read.get().unwrap(), "hello");
    }

    #[test]
    fn map_skips_function_on_failure() {
        let missing = || -> io::Result<String> { Err(io::Error::from(io::ErrorKind::NotFound)) };
        let len = |s: String| -> io::Result<usize> { panic!("must not run for {}", s) };
        assert_eq!(
            missing.map(len).get().unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        let present = || -> io::Result<String> { Ok("abcd".to_string()) };
        let len = |s: String| -> io::Result<usize> { Ok(s.len()) };
        assert_eq!(present.map(len).get().unwrap(), 4);
    }

    #[test]
    fn unchecked_and_back() {
        let failing = || -> io::Result<u8> { Err(io::Error::other("disk on fire")) };
        let e = adapt(failing.as_supplier()).get().unwrap_err();
        assert_eq!(e.to_string(), "disk on fire");

        let fine = || -> io::Result<u8> { Ok(1) };
        assert_eq!(fine.as_supplier()(), 1);
    }
}
