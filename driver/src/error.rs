use error_stack::Report;
use kernel::KernelError;
use sqlx::Error;

pub(crate) trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = classify(&error);
            Report::from(error).change_context(context)
        })
    }
}

/// Transport and TLS failures count as connection errors, as do server messages
/// that mention SSL or a connection.
pub(crate) fn classify(error: &Error) -> KernelError {
    match error {
        Error::Io(_)
        | Error::Tls(_)
        | Error::PoolTimedOut
        | Error::PoolClosed
        | Error::WorkerCrashed => KernelError::Connection,
        other => {
            let message = other.to_string();
            if message.contains("SSL") || message.to_lowercase().contains("connection") {
                KernelError::Connection
            } else {
                KernelError::Internal
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::io;

    use kernel::KernelError;
    use sqlx::Error;

    use super::{classify, ConvertError};

    #[test]
    fn transport_failures_are_connection_errors() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        assert_eq!(classify(&Error::Io(reset)), KernelError::Connection);
        assert_eq!(classify(&Error::PoolTimedOut), KernelError::Connection);
        assert_eq!(classify(&Error::PoolClosed), KernelError::Connection);
    }

    #[test]
    fn messages_mentioning_the_connection_are_connection_errors() {
        let ssl = Error::Protocol("SSL SYSCALL error: EOF detected".to_string());
        assert_eq!(classify(&ssl), KernelError::Connection);
        let closed = Error::Protocol("server closed the Connection unexpectedly".to_string());
        assert_eq!(classify(&closed), KernelError::Connection);
    }

    #[test]
    fn everything_else_is_internal() {
        assert_eq!(classify(&Error::RowNotFound), KernelError::Internal);
        let column = Error::ColumnNotFound("isbn".to_string());
        assert_eq!(classify(&column), KernelError::Internal);
    }

    #[test]
    fn convert_error_keeps_classification() {
        let result: Result<(), Error> = Err(Error::PoolTimedOut);
        let report = result.convert_error().unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Connection);
    }
}
