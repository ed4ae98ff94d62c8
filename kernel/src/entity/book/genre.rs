use vodca::{AsRefln, Fromln};

use crate::entity::common::bounded;
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookGenre(String);

impl BookGenre {
    pub const MAX_LENGTH: usize = 100;

    pub fn new(genre: impl Into<String>) -> Self {
        Self(genre.into())
    }

    pub fn parse(genre: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        bounded("genre", genre.into(), Self::MAX_LENGTH).map(Self)
    }
}
