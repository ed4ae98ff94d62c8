mod book;
mod root;

pub use self::{book::*, root::*};
