use error_stack::ResultExt;
use kernel::KernelError;

pub mod database;
mod error;

pub(crate) fn env(key: &str) -> error_stack::Result<String, KernelError> {
    dotenvy::var(key)
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Env {} not specified", key))
}

/// Reads `key` from the environment (or `.env`), falling back to `default`.
pub fn env_or(key: &str, default: &str) -> String {
    dotenvy::var(key).unwrap_or_else(|_| default.to_string())
}
