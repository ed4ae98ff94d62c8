use std::marker::PhantomData;

use time::OffsetDateTime;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct CreatedAt<T>(OffsetDateTime, PhantomData<T>);

impl<T> CreatedAt<T> {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into(), PhantomData)
    }
}

/// Absent until the first mutation after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct UpdatedAt<T>(OffsetDateTime, PhantomData<T>);

impl<T> UpdatedAt<T> {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into(), PhantomData)
    }
}
