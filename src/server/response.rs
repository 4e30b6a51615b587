use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::error::Error;

/// Standard response envelope: `{status, data, time}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "data": self.data,
            "time": Utc::now(),
        });
        (self.status, Json(body)).into_response()
    }
}

/// API error carrying a stable status code; the envelope mirrors the
/// success shape with `data: null` and an `error` message.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::Conflict => StatusCode::CONFLICT,
            Error::LimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::Config(_) | Error::Renderer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // internal detail stays in the log, never in the response
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {err}");
            return Self {
                status,
                message: "Internal server error".to_string(),
            };
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": self.status.as_u16(),
            "data": null,
            "error": self.message,
            "time": Utc::now(),
        });
        (self.status, Json(body)).into_response()
    }
}
