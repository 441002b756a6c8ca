use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum::Json;
use serde_json::json;

use crate::services::tabular::ParseError;

#[derive(Debug)]
pub enum AppError {
    InvalidInput(String),
    NoData(String),
    Superseded(String),
    Parse(ParseError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NoData(msg) => write!(f, "{}", msg),
            AppError::Superseded(msg) => write!(f, "{}", msg),
            AppError::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Parse(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NoData(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Superseded(msg) => (StatusCode::CONFLICT, msg),
            AppError::Parse(err) => {
                let status = match &err {
                    ParseError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    ParseError::EmptyData(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ParseError::Format(_) => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
