use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::{AttachmentKind, FrameKind, Report};
use kernel::KernelError;
use serde_json::json;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl From<JsonRejection> for ErrorStatus {
    fn from(rejection: JsonRejection) -> Self {
        ErrorStatus(Report::new(KernelError::Validation).attach_printable(rejection.body_text()))
    }
}

impl From<QueryRejection> for ErrorStatus {
    fn from(rejection: QueryRejection) -> Self {
        ErrorStatus(Report::new(KernelError::Validation).attach_printable(rejection.body_text()))
    }
}

impl From<PathRejection> for ErrorStatus {
    fn from(rejection: PathRejection) -> Self {
        ErrorStatus(Report::new(KernelError::Validation).attach_printable(rejection.body_text()))
    }
}

impl ErrorStatus {
    fn status(&self) -> StatusCode {
        match self.0.current_context() {
            KernelError::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            KernelError::NotFound => StatusCode::NOT_FOUND,
            KernelError::DuplicateKey => StatusCode::BAD_REQUEST,
            KernelError::Connection => StatusCode::SERVICE_UNAVAILABLE,
            KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client errors carry their reason as the most recent printable attachment.
    /// Store failures are never described to the caller.
    fn detail(&self) -> String {
        let context = self.0.current_context();
        match context {
            KernelError::Connection => {
                "Database connection error. Please try again.".to_string()
            }
            KernelError::Internal => "Failed to process the book request".to_string(),
            KernelError::Validation | KernelError::NotFound | KernelError::DuplicateKey => self
                .0
                .frames()
                .find_map(|frame| match frame.kind() {
                    FrameKind::Attachment(AttachmentKind::Printable(printable)) => {
                        Some(printable.to_string())
                    }
                    _ => None,
                })
                .unwrap_or_else(|| context.to_string()),
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self.0, "Request failed");
        } else {
            tracing::debug!(error = ?self.0, "Request rejected");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
