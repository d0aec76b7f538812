use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tinyscale_core::{RedirectorError, ShortenerError, StorageError};
use tracing::error;

use crate::model::ApiResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(&'static str),
    #[error("{0}")]
    InvalidUrl(String),
    #[error("{0}")]
    InvalidQuery(String),
    #[error("tiny url not found")]
    NotFound,
    #[error("no free alias left for this url after {attempts} attempts")]
    Exhausted { attempts: usize },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::InvalidUrl(_) | AppError::InvalidQuery(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Exhausted { .. } => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(e: ShortenerError) -> Self {
        match e {
            ShortenerError::InvalidUrl(msg) => AppError::InvalidUrl(msg),
            ShortenerError::Exhausted { attempts } => AppError::Exhausted { attempts },
            ShortenerError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl From<RedirectorError> for AppError {
    fn from(e: RedirectorError) -> Self {
        match e {
            RedirectorError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = match &self {
            AppError::Storage(e) => {
                error!(error = %e, "request failed on the durable store");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ApiResponse::new(status, msg))).into_response()
    }
}
