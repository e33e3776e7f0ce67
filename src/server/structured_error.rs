use std::fmt::Display;

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::server::error_mapping::ToStructuredError;

/// JSON error body returned by every failing API route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredError {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl StructuredError {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            error: message,
            code: code.to_string(),
            tip: None,
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: &str) -> Self {
        self.tip = Some(tip.to_string());
        self
    }
}

/// A domain error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: StructuredError,
}

impl ApiError {
    pub fn from_error<E: ToStructuredError + Display>(err: &E) -> Self {
        let (code, tip) = err.error_code_and_tip();
        let mut body = StructuredError::new(code, err.to_string());
        if let Some(tip) = tip {
            body = body.with_tip(tip);
        }
        Self {
            status: err.status_code(),
            body,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &StructuredError {
        &self.body
    }
}

impl<E: ToStructuredError + Display> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self::from_error(&err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
#[path = "structured_error_tests.rs"]
mod tests;
