use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use category_core::CategoryError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("Malformed request body: {0}")]
    InvalidBody(String),

    #[error("Not found: {0}")]
    InvalidPath(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::Category(CategoryError::Validation { .. }) | AppError::InvalidBody(_) => {
                "validation_error"
            }
            AppError::Category(CategoryError::NotFound(_)) | AppError::InvalidPath(_) => {
                "not_found"
            }
            AppError::Category(CategoryError::Structural(_)) => "structural_error",
            AppError::Category(_) => "internal_error",
            AppError::MethodNotAllowed => "method_not_allowed",
        }
    }

    fn field(&self) -> Option<&'static str> {
        match self {
            AppError::Category(CategoryError::Validation { field, .. }) => Some(*field),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Category(CategoryError::Validation { .. }) => StatusCode::BAD_REQUEST,
            AppError::Category(CategoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Category(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidPath(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type(),
                field: self.field(),
            },
        };
        HttpResponse::build(status_code).json(error_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_errors_map_to_http_statuses() {
        let cases = [
            (
                AppError::from(CategoryError::duplicate_name()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(CategoryError::NotFound(3)),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(CategoryError::Structural("cycle".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::InvalidBody("expected value".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_code(), expected, "{error}");
        }
    }

    #[test]
    fn validation_errors_name_the_field() {
        let error = AppError::from(CategoryError::duplicate_name());
        assert_eq!(error.field(), Some("name"));
        assert_eq!(error.error_type(), "validation_error");
        assert_eq!(AppError::MethodNotAllowed.field(), None);
    }
}
