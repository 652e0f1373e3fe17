pub mod comparator;
pub mod consumer;
pub mod func;
pub mod operator;
pub mod predicate;
pub mod runnable;
pub mod supplier;

pub use comparator::IoComparator;
pub use consumer::{IoBiConsumer, IoConsumer, IoQuadConsumer, IoTriConsumer};
pub use func::{IoBiFunction, IoFunction, IoQuadFunction, IoTriFunction};
pub use operator::{IoBinaryOperator, IoUnaryOperator};
pub use predicate::{IoBiPredicate, IoPredicate};
pub use runnable::IoRunnable;
pub use supplier::IoSupplier;
