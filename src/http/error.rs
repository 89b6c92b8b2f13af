use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::app::ServiceError;
use crate::config::roles::PostAction;
use crate::infra::api::ApiError;

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Status { status, message } => match status.as_u16() {
                400 | 422 => AppError::bad_request(message.clone()),
                401 => AppError::unauthorized(message.clone()),
                403 => AppError::forbidden(message.clone()),
                404 => AppError::not_found(message.clone()),
                413 => AppError::payload_too_large(message.clone()),
                _ => {
                    tracing::error!(error = ?err, "content API request failed");
                    AppError::bad_gateway("content API request failed")
                }
            },
            _ => {
                tracing::error!(error = ?err, "content API unavailable");
                AppError::bad_gateway("content API unavailable")
            }
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => AppError::bad_request(err.to_string()),
            ServiceError::Forbidden(action) => {
                AppError::forbidden(format!("not allowed to {}", action_name(action)))
            }
            ServiceError::Denied(message) => AppError::forbidden(message),
            ServiceError::NotEditable(status) => {
                AppError::conflict(format!("post with status {} cannot be edited", status))
            }
            ServiceError::Api(err) => err.into(),
        }
    }
}

fn action_name(action: PostAction) -> &'static str {
    match action {
        PostAction::Create => "create posts",
        PostAction::Edit => "edit posts",
        PostAction::SaveDraft => "save drafts",
        PostAction::Schedule => "schedule posts",
        PostAction::Publish => "publish posts",
        PostAction::Delete => "delete posts",
        PostAction::Repost => "repost posts",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}
