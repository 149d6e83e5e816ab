//! Common API response model
//!
//! Every endpoint answers with the same envelope.

use chrono::Utc;
use chrono_tz::Asia::Kolkata;
use serde::{Deserialize, Serialize};

/// Current time in India Standard Time (UTC+5:30)
pub fn get_india_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&Kolkata)
}

/// Uniform API response
///
/// - success: whether the request succeeded
/// - data: payload (present on success, and on failures that carry a result)
/// - message: human readable message
/// - timestamp: response time (India time, RFC 3339)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Build a success response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_india_time().to_rfc3339(),
        }
    }

    /// Build an error response
    ///
    /// # Arguments
    /// - message: error description
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: get_india_time().to_rfc3339(),
        }
    }

    /// Error response that still carries its payload
    pub fn failure(message: String, data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::error(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_in_india_time() {
        let response = ApiResponse::success(1);
        assert!(response.timestamp.ends_with("+05:30"));
        assert!(response.success);
    }

    #[test]
    fn error_response_has_no_data() {
        let response = ApiResponse::<u32>::error("bad".to_string());
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.message, "bad");
    }

    #[test]
    fn failure_response_keeps_payload() {
        let response = ApiResponse::failure("upstream down".to_string(), 7);
        assert!(!response.success);
        assert_eq!(response.data, Some(7));
        assert_eq!(response.message, "upstream down");
    }
}
