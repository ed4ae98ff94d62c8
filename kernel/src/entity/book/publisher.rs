use vodca::{AsRefln, Fromln};

use crate::entity::common::bounded;
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookPublisher(String);

impl BookPublisher {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(publisher: impl Into<String>) -> Self {
        Self(publisher.into())
    }

    pub fn parse(publisher: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        bounded("publisher", publisher.into(), Self::MAX_LENGTH).map(Self)
    }
}
