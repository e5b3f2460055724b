use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// Total match count reported on paginated list responses
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Successful API response: the bare JSON body plus status and list metadata
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
    pub total_count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: None,
            total_count: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: Some(StatusCode::CREATED),
            total_count: None,
        }
    }

    pub fn with_total_count(mut self, total: usize) -> Self {
        self.total_count = Some(total);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);
        let mut response = (status, Json(self.data)).into_response();

        if let Some(total) = self.total_count {
            response.headers_mut().insert(
                HeaderName::from_static(TOTAL_COUNT_HEADER),
                HeaderValue::from(total),
            );
        }

        response
    }
}

// Convenience type aliases
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
