use vodca::{AsRefln, Fromln};

use crate::entity::common::required;
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct BookTitle(String);

impl BookTitle {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn parse(title: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        required("title", title.into(), Self::MAX_LENGTH).map(Self)
    }
}
