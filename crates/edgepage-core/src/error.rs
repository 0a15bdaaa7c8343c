use std::fmt::Display;

use anyhow::Error as AnyError;
use thiserror::Error;

use crate::body::Body;
use crate::http::{Response, StatusCode};
use crate::response::{text_response, IntoResponse};

/// Body served for every path outside the route table.
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Application-level error that carries an HTTP status code.
#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("no route matched path: {path}")]
    NotFound { path: String },
    #[error("render error: {message}")]
    Render { message: String },
    #[error("internal error: {source}")]
    Internal {
        #[from]
        source: AnyError,
    },
}

impl EdgeError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        EdgeError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        EdgeError::NotFound { path: path.into() }
    }

    pub fn render<E>(error: E) -> Self
    where
        E: Display,
    {
        EdgeError::Render {
            message: error.to_string(),
        }
    }

    pub fn internal<E>(error: E) -> Self
    where
        E: Into<AnyError>,
    {
        EdgeError::Internal {
            source: error.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            EdgeError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            EdgeError::NotFound { .. } => StatusCode::NOT_FOUND,
            EdgeError::Render { .. } | EdgeError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            EdgeError::BadRequest { message } => message.clone(),
            EdgeError::NotFound { path } => format!("no route matched path: {path}"),
            EdgeError::Render { message } => format!("render error: {message}"),
            EdgeError::Internal { source } => format!("internal error: {source}"),
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        match self {
            // The public 404 body is fixed; the unmatched path only goes to the logs.
            EdgeError::NotFound { .. } => text_response(StatusCode::NOT_FOUND, NOT_FOUND_BODY),
            other => {
                let status = other.status();
                text_response(status, Body::text(other.message()))
            }
        }
    }
}
