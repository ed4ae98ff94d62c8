use vodca::{AsRefln, Fromln};

use crate::entity::common::required;
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookAuthor(String);

impl BookAuthor {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(author: impl Into<String>) -> Self {
        Self(author.into())
    }

    pub fn parse(author: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        required("author", author.into(), Self::MAX_LENGTH).map(Self)
    }
}
