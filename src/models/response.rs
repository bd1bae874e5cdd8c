//! Response envelope shared by all service-facing callers

use serde::Serialize;

use crate::error::AppError;

/// Uniform envelope carrying an explicit success flag alongside the payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful response wrapping a payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful response with a human-readable message (deletes, job runs).
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Failed response. Client mistakes keep their message; server faults
    /// are reduced to a generic one so internals never leak to callers.
    pub fn error(err: &AppError) -> Self {
        let message = if err.is_client_error() {
            err.to_string()
        } else {
            "Internal server error".to_string()
        };
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

impl<T> From<Result<T, AppError>> for ApiResponse<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_carries_payload() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_client_error_keeps_message() {
        let err = AppError::Validation("Part name cannot be empty".to_string());
        let response = ApiResponse::<()>::error(&err);
        assert!(!response.success);
        assert_eq!(
            response.message.as_deref(),
            Some("Validation error: Part name cannot be empty")
        );
        assert!(response.data.is_none());
    }

    #[test]
    fn test_server_fault_message_is_masked() {
        let err = AppError::Internal("pool exhausted".to_string());
        let response = ApiResponse::<()>::error(&err);
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn test_from_result_maps_both_arms() {
        let ok: ApiResponse<i64> = Ok(7).into();
        assert!(ok.success);
        assert_eq!(ok.data, Some(7));

        let err: ApiResponse<i64> =
            Err(AppError::NotFound("Spare part 9 not found".to_string())).into();
        assert!(!err.success);
        assert_eq!(
            err.message.as_deref(),
            Some("Not found: Spare part 9 not found")
        );
    }
}
