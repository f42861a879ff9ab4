use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::types::ErrorResponse;

pub enum AppError {
    /// The request body did not match the expected shape.
    Rejected(JsonRejection),
    /// The send operation failed. `context` prefixes the detail text.
    Send {
        context: &'static str,
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn send(context: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Send {
            context,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(rejection) => rejection.status(),
            Self::Send { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Rejected(rejection) => rejection.body_text(),
            Self::Send { context, source } => format!("{}: {}", context, source),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection)
    }
}
