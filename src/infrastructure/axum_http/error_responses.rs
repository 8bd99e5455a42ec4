use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::application::errors::UseCaseError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Page not found")]
    NotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<UseCaseError> for AppError {
    fn from(err: UseCaseError) -> Self {
        match err {
            UseCaseError::Internal(err) => AppError::Internal(err),
            err if err.is_not_found() => AppError::NotFound,
            err => AppError::BadRequest(err.to_string()),
        }
    }
}

/// Status a form page is re-rendered with when its submission fails.
pub fn status_for(err: &UseCaseError) -> StatusCode {
    match err {
        UseCaseError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        err if err.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Splits a failed submission into what the page shows, or the error page for internal failures.
pub fn form_error(err: UseCaseError) -> Result<(StatusCode, String), AppError> {
    match err {
        UseCaseError::Internal(err) => Err(AppError::Internal(err)),
        err => Ok((status_for(&err), err.to_string())),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Internal(err) => {
                error!(error = ?err, "http: internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, please try again later.".to_string(),
                )
            }
        };

        // Written by hand so a failing template engine can still report itself.
        let body = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{code} | StreamFlow</title></head>\
             <body><main class=\"error\"><h1>{code}</h1><p>{message}</p><a href=\"/\">Back to StreamFlow</a></main></body></html>",
            code = status.as_u16(),
            message = handlebars::html_escape(&message),
        );

        (status, Html(body)).into_response()
    }
}
