use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use llm_service::LlmError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("failed to read context file {path}")]
    ContextFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request handling ---
    #[error("HTML missing")]
    MissingHtml,

    #[error("background task failed")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingHtml => StatusCode::BAD_REQUEST,

            AppError::Llm(_)
            | AppError::ContextFile { .. }
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::TaskJoin(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape shared with the streaming error frame.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
