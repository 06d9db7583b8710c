use chrono::NaiveDate;
use shared::TripStatus;
use sqlx::FromRow;

// Rows as persisted: snake_case columns, nested structures as JSON text,
// timestamps as RFC 3339 text.

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub preferences: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct TripRow {
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub budget: Option<f64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ItineraryRow {
    pub id: String,
    pub trip_id: String,
    pub days: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: String,
    pub user_id: String,
    pub trip_id: Option<String>,
    pub content: String,
    pub role: String,
    pub suggestions: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone)]
pub struct NewTrip {
    pub user_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub image_url: Option<String>,
}

/// Set-only trip update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    pub status: Option<TripStatus>,
    pub budget: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: String,
    pub trip_id: Option<String>,
    pub content: String,
    pub role: &'static str,
    /// JSON-encoded list of follow-up prompts
    pub suggestions: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    /// JSON-encoded preferences document
    pub preferences: Option<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password_hash: None,
            preferences: None,
        }
    }
}
