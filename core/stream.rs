pub mod io_stream;
pub mod iterator;
pub mod spliterator;

pub use io_stream::IoStream;
pub use iterator::{IntoStdIter, IoIterator};
pub use spliterator::{IoSpliterator, VecSpliterator};
