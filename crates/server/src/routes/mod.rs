use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{error::AppError, state::AppState};

mod auth;
mod chat;
mod extract;
mod health;
mod itineraries;
mod safety;
mod trips;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/preferences", post(auth::save_preferences))
        // Trips and itineraries
        .route("/trips", get(trips::list_trips).post(trips::create_trip))
        .route(
            "/trips/:id",
            get(trips::get_trip)
                .patch(trips::update_trip)
                .delete(trips::delete_trip),
        )
        .route(
            "/itineraries/:trip_id",
            get(itineraries::get_itinerary).put(itineraries::upsert_itinerary),
        )
        // Chat
        .route("/chat/message", post(chat::send_message))
        .route("/chat/history", get(chat::chat_history))
        // Safety
        .route("/safety", get(safety::get_safety_info))
        .route("/safety/emergency", post(safety::report_emergency))
        .fallback(route_not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// A trimmed, non-empty string field, or a validation error naming it.
pub(crate) fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(format!("{field} is required")))
}

/// Blank optional strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
