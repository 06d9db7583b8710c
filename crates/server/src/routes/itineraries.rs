use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::{ApiResponse, Itinerary};

use super::extract::ApiJson;
use crate::{
    db::DbError,
    error::{AppError, ResultExt},
    mapper::{self, ItineraryDayInput},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UpsertItineraryRequest {
    pub days: Option<Vec<ItineraryDayInput>>,
}

/// GET /itineraries/:trip_id
pub async fn get_itinerary(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<ApiResponse<Itinerary>>, AppError> {
    const FAILED: &str = "Failed to fetch itinerary";

    let row = state.db.get_itinerary(&trip_id).await.or_fail(FAILED)?;
    Ok(Json(ApiResponse::ok(Itinerary::try_from(row).or_fail(FAILED)?)))
}

/// Replace the whole day list of a trip's itinerary. Legacy activity shapes
/// are normalized before storage. Concurrent writers race; the last one wins.
/// PUT /itineraries/:trip_id
pub async fn upsert_itinerary(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    ApiJson(req): ApiJson<UpsertItineraryRequest>,
) -> Result<Json<ApiResponse<Itinerary>>, AppError> {
    const FAILED: &str = "Failed to update itinerary";

    let days = req.days.ok_or_else(|| AppError::validation("days is required"))?;
    let days = mapper::days_from_input(days).map_err(AppError::Validation)?;
    let text = mapper::serialize_days(&days).or_fail(FAILED)?;

    let row = match state.db.upsert_itinerary(&trip_id, &text).await {
        Err(DbError::Constraint(_)) => return Err(AppError::not_found("Trip")),
        other => other.or_fail(FAILED)?,
    };
    tracing::debug!("Stored {} itinerary days for trip {}", days.len(), trip_id);

    Ok(Json(ApiResponse::ok(Itinerary::try_from(row).or_fail(FAILED)?)))
}

#[cfg(test)]
mod tests {
    use crate::{db::DEMO_TRIP_ID, test_support::TestApp};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_then_get_itinerary() {
        let app = TestApp::new().await;
        let (_, created) = app
            .post(
                "/trips",
                json!({"destination": "Lisbon, Portugal", "startDate": "2025-06-01", "endDate": "2025-06-08"}),
            )
            .await;
        let trip_id = created["data"]["id"].as_str().unwrap().to_string();
        let uri = format!("/itineraries/{trip_id}");

        let (status, _) = app.get(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .send(
                "PUT",
                &uri,
                &[],
                Some(json!({"days": [{"day": 1, "date": "2025-06-01", "activities": []}]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tripId"], trip_id.as_str());

        let (status, body) = app.get(&uri).await;
        assert_eq!(status, StatusCode::OK);
        let days = body["data"]["days"].as_array().unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0]["day"], 1);
        assert_eq!(days[0]["date"], "2025-06-01");
    }

    #[tokio::test]
    async fn test_put_replaces_whole_day_list() {
        let app = TestApp::new().await;
        let uri = format!("/itineraries/{DEMO_TRIP_ID}");

        let (_, before) = app.get(&uri).await;
        assert!(before["data"]["days"].as_array().unwrap().len() > 1);
        let id = before["data"]["id"].clone();

        let days = json!([{
            "day": 2,
            "date": "2024-03-16",
            "activities": [{
                "id": "a1",
                "title": "Ramen lunch",
                "startTime": "12:00",
                "endTime": "13:00",
                "location": {"name": "Ichiran", "latitude": 35.6938, "longitude": 139.7034},
                "category": "food",
                "cost": 12.5
            }]
        }]);
        let (status, body) = app.send("PUT", &uri, &[], Some(json!({"days": days}))).await;
        assert_eq!(status, StatusCode::OK);
        // Same itinerary row, new content
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["days"], days);

        let (_, after) = app.get(&uri).await;
        assert_eq!(after["data"]["days"], days);
    }

    #[tokio::test]
    async fn test_put_translates_legacy_activities() {
        let app = TestApp::new().await;
        let uri = format!("/itineraries/{DEMO_TRIP_ID}");
        let (status, body) = app
            .send(
                "PUT",
                &uri,
                &[],
                Some(json!({"days": [{
                    "day": 1,
                    "date": "2024-03-15",
                    "activities": [{
                        "title": "Sushi dinner",
                        "time": "19:00",
                        "duration": "1h 30m",
                        "location": "Tsukiji",
                        "category": "meal"
                    }]
                }]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let activity = &body["data"]["days"][0]["activities"][0];
        assert_eq!(activity["id"], "d1-a1");
        assert_eq!(activity["startTime"], "19:00");
        assert_eq!(activity["endTime"], "20:30");
        assert_eq!(activity["location"]["name"], "Tsukiji");
        assert_eq!(activity["category"], "food");
    }

    #[tokio::test]
    async fn test_put_with_oversized_duration_keeps_envelope() {
        let app = TestApp::new().await;
        let uri = format!("/itineraries/{DEMO_TRIP_ID}");
        let (status, body) = app
            .send(
                "PUT",
                &uri,
                &[],
                Some(json!({"days": [{
                    "day": 1,
                    "date": "2024-03-15",
                    "activities": [
                        {"title": "Endless", "time": "09:00", "duration": "1000000000000000 min"},
                        {"title": "Overflow", "time": "09:00", "duration": "200000000000000000 h"}
                    ]
                }]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let activities = body["data"]["days"][0]["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 2);
        for activity in activities {
            assert_eq!(activity["startTime"], "09:00");
            assert!(activity.get("endTime").is_none());
        }
    }

    #[tokio::test]
    async fn test_put_validation_and_missing_trip() {
        let app = TestApp::new().await;
        let uri = format!("/itineraries/{DEMO_TRIP_ID}");

        let (status, body) = app.send("PUT", &uri, &[], Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "days is required");

        let (status, _) = app
            .send("PUT", &uri, &[], Some(json!({"days": [{"day": 0, "date": "2024-03-15"}]})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(
                "PUT",
                "/itineraries/no-such-trip",
                &[],
                Some(json!({"days": [{"day": 1, "date": "2025-06-01", "activities": []}]})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Trip not found");
    }
}
