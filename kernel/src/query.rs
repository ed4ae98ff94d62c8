mod book;

pub use self::book::*;
