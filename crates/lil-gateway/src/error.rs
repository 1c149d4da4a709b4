use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lil_redirector::RedirectorError;
use lil_shortener::ShortenerError;
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
    #[error("short link not found")]
    LinkNotFound,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidCode(_)
                | ShortenerError::InvalidUrl(_)
                | ShortenerError::InvalidTtl(_)
                | ShortenerError::InvalidLimit(_)
                | ShortenerError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::CodeCollision(_) | ShortenerError::CreateExhausted { .. } => {
                    StatusCode::CONFLICT
                }
                ShortenerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                ShortenerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Redirector(e) => match e {
                RedirectorError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RedirectorError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::LinkNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (ShortenerError::InvalidCode("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::InvalidLimit(0), StatusCode::BAD_REQUEST),
            (ShortenerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ShortenerError::CodeCollision("x".into()), StatusCode::CONFLICT),
            (ShortenerError::CreateExhausted { attempts: 5 }, StatusCode::CONFLICT),
            (ShortenerError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ShortenerError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }

        assert_eq!(
            AppError::from(RedirectorError::Unavailable("x".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::LinkNotFound.status(), StatusCode::NOT_FOUND);
    }
}
