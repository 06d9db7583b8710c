use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{TripStatus, User};

// ============================================================================
// Envelope
// ============================================================================

/// Uniform wrapper returned by every endpoint except `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Success with no payload: `{"success": true}`
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub token: String,
}

// ============================================================================
// Trips
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub image_url: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTripRequest {
    pub status: Option<TripStatus>,
    pub budget: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: Option<String>,
    pub trip_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryQuery {
    pub trip_id: Option<String>,
}

// ============================================================================
// Safety
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyQuery {
    pub trip_id: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyReport {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_shape() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_envelope_error_shape() {
        let json = serde_json::to_value(ApiResponse::<()>::error("Trip not found")).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "error": "Trip not found"}));
    }

    #[test]
    fn test_envelope_empty() {
        let json = serde_json::to_string(&ApiResponse::empty()).unwrap();
        assert_eq!(json, "{\"success\":true}");
    }

    #[test]
    fn test_create_trip_request_camel_case() {
        let req: CreateTripRequest = serde_json::from_str(
            r#"{"destination":"Lisbon, Portugal","startDate":"2025-06-01","endDate":"2025-06-08"}"#,
        )
        .unwrap();
        assert_eq!(req.start_date.as_deref(), Some("2025-06-01"));
        assert!(req.description.is_none());
    }

    #[test]
    fn test_emergency_report_type_field() {
        let report: EmergencyReport =
            serde_json::from_str(r#"{"type":"medical","details":{"note":"allergy"}}"#).unwrap();
        assert_eq!(report.kind.as_deref(), Some("medical"));
        assert_eq!(report.details.unwrap()["note"], "allergy");
    }
}
