use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use shared::{ApiResponse, CreateTripRequest, Trip, TripSummary, UpdateTripRequest};

use super::{
    extract::{ApiJson, UserContext},
    non_blank, required,
};
use crate::{
    db::{NewTrip, TripPatch},
    error::{AppError, ResultExt},
    state::AppState,
};

/// GET /trips
pub async fn list_trips(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TripSummary>>>, AppError> {
    const FAILED: &str = "Failed to fetch trips";

    let rows = state.db.list_trips().await.or_fail(FAILED)?;
    let trips = rows
        .into_iter()
        .map(|row| Trip::try_from(row).map(TripSummary::from))
        .collect::<Result<Vec<_>, _>>()
        .or_fail(FAILED)?;

    Ok(Json(ApiResponse::ok(trips)))
}

/// GET /trips/:id
pub async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    const FAILED: &str = "Failed to fetch trip";

    let row = state
        .db
        .get_trip(&id)
        .await
        .or_fail(FAILED)?
        .ok_or_else(|| AppError::not_found("Trip"))?;

    Ok(Json(ApiResponse::ok(Trip::try_from(row).or_fail(FAILED)?)))
}

/// Create a trip owned by the caller. The owner row is created on demand so
/// a bare `user-id` header is enough.
/// POST /trips
pub async fn create_trip(
    State(state): State<AppState>,
    ctx: UserContext,
    ApiJson(req): ApiJson<CreateTripRequest>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    const FAILED: &str = "Failed to create trip";

    let destination = required(req.destination.as_deref(), "destination")?;
    let start_date = parse_date(req.start_date.as_deref(), "startDate")?;
    let end_date = parse_date(req.end_date.as_deref(), "endDate")?;
    if start_date > end_date {
        return Err(AppError::validation("startDate must not be after endDate"));
    }
    check_budget(req.budget)?;

    state.db.ensure_user(&ctx.user_id).await.or_fail(FAILED)?;

    let new_trip = NewTrip {
        user_id: ctx.user_id,
        destination: destination.to_string(),
        start_date,
        end_date,
        description: non_blank(req.description),
        budget: req.budget,
        image_url: non_blank(req.image_url),
    };
    let row = state.db.create_trip(&new_trip).await.or_fail(FAILED)?;
    tracing::info!("Created trip {} to {}", row.id, row.destination);

    Ok(Json(ApiResponse::ok(Trip::try_from(row).or_fail(FAILED)?)))
}

/// PATCH /trips/:id
pub async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateTripRequest>,
) -> Result<Json<ApiResponse<Trip>>, AppError> {
    const FAILED: &str = "Failed to update trip";

    check_budget(req.budget)?;

    let patch = TripPatch {
        status: req.status,
        budget: req.budget,
        description: req.description,
        image_url: req.image_url,
    };
    let row = state.db.update_trip(&id, &patch).await.or_fail(FAILED)?;

    Ok(Json(ApiResponse::ok(Trip::try_from(row).or_fail(FAILED)?)))
}

/// DELETE /trips/:id
pub async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.db.delete_trip(&id).await.or_fail("Failed to delete trip")?;
    tracing::info!("Deleted trip {}", id);
    Ok(Json(ApiResponse::empty()))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    let value = required(value, field)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

fn check_budget(budget: Option<f64>) -> Result<(), AppError> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => {
            Err(AppError::validation("budget must be a non-negative number"))
        }
        _ => Ok(()),
    }
}
