use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::StoreError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Record not found")]
    NotFound,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound,
            other => AppError::InternalError(Box::new(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("{self}");
        }

        (status, self.to_string()).into_response()
    }
}
