use axum::http::{ header, HeaderValue, StatusCode };
use axum::response::{ IntoResponse, Response };
use axum::Json;
use log::error;

use crate::models::api::ApiResponse;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Errors surfaced to HTTP clients. Every variant renders as
/// `{success:false, message}`; internal details are logged, never returned.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{detail}")]
    Internal { message: String, detail: String },
    #[error("rate limit exceeded")]
    RateLimited { retry_after: u64 },
    #[error("endpoint not found")]
    NotFound,
}

impl ApiError {
    pub fn internal(message: impl Into<String>, detail: impl ToString) -> Self {
        ApiError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal { message, detail } => {
                error!("Request failed: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::RateLimited { retry_after } => {
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ApiResponse::failure(RATE_LIMIT_MESSAGE)),
                ).into_response();
                if let Ok(val) = HeaderValue::from_str(&retry_after.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, val);
                }
                return response;
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
        };

        (status, Json(ApiResponse::failure(message))).into_response()
    }
}
