use axum::{
    extract::{Query, State},
    Json,
};
use shared::{ApiResponse, EmergencyReport, SafetyInfo, SafetyQuery};

use super::{
    extract::{ApiJson, UserContext},
    non_blank, required,
};
use crate::{
    error::{AppError, ResultExt},
    safety::country_from_destination,
    state::AppState,
};

/// Safety snapshot for a trip's destination or an explicit country. An
/// explicit `country` wins over the one derived from the trip.
/// GET /safety
pub async fn get_safety_info(
    State(state): State<AppState>,
    Query(query): Query<SafetyQuery>,
) -> Result<Json<ApiResponse<SafetyInfo>>, AppError> {
    let country = non_blank(query.country);

    let info = match non_blank(query.trip_id) {
        Some(trip_id) => {
            let trip = state
                .db
                .get_trip(&trip_id)
                .await
                .or_fail("Failed to fetch safety information")?
                .ok_or_else(|| AppError::not_found("Trip"))?;
            let country = country
                .as_deref()
                .unwrap_or_else(|| country_from_destination(&trip.destination));
            state.safety.lookup(Some(country), Some(&trip.destination))
        }
        None => state.safety.lookup(country.as_deref(), None),
    };

    Ok(Json(ApiResponse::ok(info)))
}

/// Acknowledge an emergency report. Reports are logged, not stored.
/// POST /safety/emergency
pub async fn report_emergency(
    ctx: UserContext,
    ApiJson(report): ApiJson<EmergencyReport>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let kind = required(report.kind.as_deref(), "type")?;
    let details = report.details.unwrap_or_default();

    tracing::warn!(user_id = %ctx.user_id, kind, %details, "Emergency reported");

    Ok(Json(ApiResponse::empty()))
}
