use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::error::ErrorReport;
use crate::application::posts::PostServiceError;

use super::models::ErrorResponse;

/// An API failure: generic envelope for the client, structured report for
/// the logging middleware.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<Vec<String>>,
    report: ErrorReport,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::from_message(
            "infra::http::auth",
            StatusCode::UNAUTHORIZED,
            "Invalid or missing API key",
        )
    }

    pub fn not_found(message: &str) -> Self {
        Self::from_message("infra::http", StatusCode::NOT_FOUND, message)
    }

    pub fn endpoint_not_found() -> Self {
        Self::from_message("infra::http::fallback", StatusCode::NOT_FOUND, "Endpoint not found")
    }

    pub fn validation(details: Vec<String>) -> Self {
        let report = ErrorReport::from_message(
            "infra::http::validation",
            StatusCode::BAD_REQUEST,
            details.join("; "),
        );
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "Validation error".to_string(),
            details: Some(details),
            report,
        }
    }

    pub fn rate_limited(retry_after: u64) -> Response {
        let error = Self::from_message(
            "infra::http::rate_limit",
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests from this IP, please try again later.",
        );
        let mut response = error.into_response();
        if let Ok(value) = axum::http::HeaderValue::from_str(&retry_after.to_string()) {
            response
                .headers_mut()
                .insert(axum::http::header::RETRY_AFTER, value);
        }
        response
    }

    /// Map a service failure to the operation's public error message.
    /// Store faults keep their diagnostic chain in the report only.
    pub fn from_service(
        source: &'static str,
        public_message: &str,
        error: PostServiceError,
    ) -> Self {
        match error {
            PostServiceError::Validation(invalid) => Self::validation(invalid.messages),
            PostServiceError::NotFound => Self::not_found("Blog post not found"),
            PostServiceError::Store(store) => {
                let report = ErrorReport::from_error(
                    source,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &store,
                );
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: public_message.to_string(),
                    details: None,
                    report,
                }
            }
        }
    }

    fn from_message(source: &'static str, status: StatusCode, message: &str) -> Self {
        Self {
            status,
            error: message.to_string(),
            details: None,
            report: ErrorReport::from_message(source, status, message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.error,
            details: self.details,
        };
        let mut response = (self.status, Json(body)).into_response();
        self.report.attach(&mut response);
        response
    }
}
