//! Response conversion.
//!
//! Maps the pipeline's `AckResponse` onto an HTTP response. The status is
//! taken from the pipeline as-is; the body is always JSON.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::report::AckResponse;

impl IntoResponse for AckResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}
