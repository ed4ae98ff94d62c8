mod book;

pub use self::book::*;

/// Folds a change into an entity in memory, before it is written back.
pub trait Applier<T> {
    fn apply(&mut self, value: T);
}
