//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Success body: the HTTP verb that was served and its payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub action: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Response to a DELETE request.
    pub const fn delete(data: T) -> Self {
        Self {
            action: "DELETE",
            data,
        }
    }

    /// Response to a POST request.
    pub const fn post(data: T) -> Self {
        Self {
            action: "POST",
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
