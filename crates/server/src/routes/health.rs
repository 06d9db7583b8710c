use axum::Json;
use chrono::Utc;
use shared::HealthStatus;

/// Liveness probe. Not wrapped in the envelope.
/// GET /health
pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_is_unwrapped() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn test_unknown_route_is_enveloped_404() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Route not found");
    }
}
