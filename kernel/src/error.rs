use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    /// Input rejected before any store access.
    Validation,
    NotFound,
    /// Strict creation hit an existing ISBN.
    DuplicateKey,
    /// Store failure caused by the transport (socket, TLS, connect timeout).
    Connection,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Invalid book data"),
            KernelError::NotFound => write!(f, "Book not found"),
            KernelError::DuplicateKey => write!(f, "Book with the same ISBN already exists"),
            KernelError::Connection => write!(f, "Database connection failure"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
