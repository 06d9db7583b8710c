//! Conversion between persisted rows and the wire contract.
//!
//! Rows carry snake_case columns, JSON text for nested documents and text
//! timestamps; the wire types in `shared` carry parsed, camelCase values.
//! Every function here is pure: the same input always maps to the same
//! output, and a stored value that fails to parse is a data-integrity
//! error, never a missing row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use shared::{
    Activity, ActivityCategory, ChatMessage, ChatRole, Itinerary, ItineraryDay, Location, Trip,
    TripStatus, User,
};

use crate::db::{ItineraryRow, MessageRow, TripRow, UserRow};

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("stored {field} is not valid JSON: {source}")]
    Json {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored {field} is invalid: {value}")]
    Value { field: &'static str, value: String },
}

pub type MapResult<T> = Result<T, MappingError>;

// ============================================================================
// Rows -> wire
// ============================================================================

impl TryFrom<UserRow> for User {
    type Error = MappingError;

    fn try_from(row: UserRow) -> MapResult<Self> {
        let preferences = row
            .preferences
            .as_deref()
            .map(|text| parse_json("users.preferences", text))
            .transpose()?;

        Ok(User {
            preferences,
            created_at: parse_timestamp("users.created_at", &row.created_at)?,
            updated_at: parse_timestamp("users.updated_at", &row.updated_at)?,
            id: row.id,
            email: row.email,
            name: row.name,
        })
    }
}

impl TryFrom<TripRow> for Trip {
    type Error = MappingError;

    fn try_from(row: TripRow) -> MapResult<Self> {
        let status = row
            .status
            .parse::<TripStatus>()
            .map_err(|_| invalid("trips.status", &row.status))?;

        Ok(Trip {
            start_date: parse_date("trips.start_date", &row.start_date)?,
            end_date: parse_date("trips.end_date", &row.end_date)?,
            status,
            created_at: parse_timestamp("trips.created_at", &row.created_at)?,
            updated_at: parse_timestamp("trips.updated_at", &row.updated_at)?,
            id: row.id,
            user_id: row.user_id,
            destination: row.destination,
            budget: row.budget,
            description: row.description,
            image_url: row.image_url,
        })
    }
}

impl TryFrom<ItineraryRow> for Itinerary {
    type Error = MappingError;

    fn try_from(row: ItineraryRow) -> MapResult<Self> {
        Ok(Itinerary {
            days: parse_days(&row.days)?,
            created_at: parse_timestamp("itineraries.created_at", &row.created_at)?,
            updated_at: parse_timestamp("itineraries.updated_at", &row.updated_at)?,
            id: row.id,
            trip_id: row.trip_id,
        })
    }
}

impl TryFrom<MessageRow> for ChatMessage {
    type Error = MappingError;

    fn try_from(row: MessageRow) -> MapResult<Self> {
        let role = row
            .role
            .parse::<ChatRole>()
            .map_err(|_| invalid("messages.role", &row.role))?;
        let suggestions = row
            .suggestions
            .as_deref()
            .map(|text| parse_json("messages.suggestions", text))
            .transpose()?;

        Ok(ChatMessage {
            role,
            suggestions,
            timestamp: parse_timestamp("messages.timestamp", &row.timestamp)?,
            id: row.id,
            user_id: row.user_id,
            trip_id: row.trip_id,
            content: row.content,
        })
    }
}

/// Parse a stored `days` document. Rows written before the canonical
/// activity shape existed are translated on the way out.
pub fn parse_days(text: &str) -> MapResult<Vec<ItineraryDay>> {
    let raw: Vec<ItineraryDayInput> = parse_json("itineraries.days", text)?;
    days_from_input(raw).map_err(|value| MappingError::Value {
        field: "itineraries.days",
        value,
    })
}

// ============================================================================
// Wire -> columns
// ============================================================================

pub fn serialize_days(days: &[ItineraryDay]) -> MapResult<String> {
    serde_json::to_string(days).map_err(|source| MappingError::Json {
        field: "itineraries.days",
        source,
    })
}

pub fn serialize_preferences(preferences: &serde_json::Value) -> String {
    preferences.to_string()
}

pub fn serialize_suggestions(suggestions: &[String]) -> String {
    serde_json::Value::from(suggestions.to_vec()).to_string()
}

// ============================================================================
// Itinerary input (canonical or legacy activity shape)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ItineraryDayInput {
    pub day: i64,
    pub date: String,
    #[serde(default)]
    pub activities: Vec<ActivityInput>,
}

/// Accepts both the canonical `startTime`/`endTime` activity and the legacy
/// `time` + `duration` one with a plain-string location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub location: Option<LocationInput>,
    #[serde(default)]
    pub category: ActivityCategory,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    Name(String),
    Structured(Location),
}

impl From<LocationInput> for Location {
    fn from(input: LocationInput) -> Self {
        match input {
            LocationInput::Name(name) => Location::named(name),
            LocationInput::Structured(location) => location,
        }
    }
}

/// Normalize submitted days into the canonical shape, or describe the first
/// problem found.
pub fn days_from_input(days: Vec<ItineraryDayInput>) -> Result<Vec<ItineraryDay>, String> {
    days.into_iter().map(day_from_input).collect()
}

fn day_from_input(input: ItineraryDayInput) -> Result<ItineraryDay, String> {
    let day = u32::try_from(input.day)
        .ok()
        .filter(|d| *d >= 1)
        .ok_or_else(|| format!("day must be a positive integer, got {}", input.day))?;
    let date = parse_flexible_date(&input.date)
        .ok_or_else(|| format!("day {day} has an invalid date: {}", input.date))?;

    let activities = input
        .activities
        .into_iter()
        .enumerate()
        .map(|(index, activity)| activity_from_input(day, index, activity))
        .collect();

    Ok(ItineraryDay {
        day,
        date,
        activities,
    })
}

fn activity_from_input(day: u32, index: usize, input: ActivityInput) -> Activity {
    let start_time = input.start_time.or(input.time);
    let end_time = input.end_time.or_else(|| {
        let start = start_time.as_deref()?;
        let minutes = parse_duration_minutes(input.duration.as_deref()?)?;
        add_minutes(start, minutes)
    });

    Activity {
        // Deterministic so re-normalizing the same document is stable
        id: input
            .id
            .unwrap_or_else(|| format!("d{}-a{}", day, index + 1)),
        title: input.title,
        description: input.description,
        start_time,
        end_time,
        location: input.location.map(Location::from),
        category: input.category,
        cost: input.cost,
        notes: input.notes,
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse free-text durations like `"1h 30m"`, `"2 hours"` or `"45 min"`.
pub fn parse_duration_minutes(text: &str) -> Option<i64> {
    let text = text.trim().to_lowercase();
    let mut total = 0i64;
    let mut chars = text.chars().peekable();
    let mut matched = false;

    while chars.peek().is_some() {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut digits = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            digits.push(c);
        }
        if digits.is_empty() {
            return None;
        }
        let value: i64 = digits.parse().ok()?;

        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut unit = String::new();
        while let Some(c) = chars.next_if(|c| c.is_ascii_alphabetic()) {
            unit.push(c);
        }
        let factor = match unit.as_str() {
            "h" | "hr" | "hrs" | "hour" | "hours" => 60,
            "m" | "min" | "mins" | "minute" | "minutes" => 1,
            _ => return None,
        };
        total = value.checked_mul(factor)?.checked_add(total)?;
        matched = true;

        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}
    }

    matched.then_some(total)
}

/// `None` for durations longer than a day, which a clock time cannot express.
fn add_minutes(start: &str, minutes: i64) -> Option<String> {
    if minutes > MINUTES_PER_DAY {
        return None;
    }
    let start = NaiveTime::parse_from_str(start, "%H:%M").ok()?;
    let end = start + chrono::Duration::try_minutes(minutes)?;
    Some(end.format("%H:%M").to_string())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_json<T: serde::de::DeserializeOwned>(field: &'static str, text: &str) -> MapResult<T> {
    serde_json::from_str(text).map_err(|source| MappingError::Json { field, source })
}

fn invalid(field: &'static str, value: &str) -> MappingError {
    MappingError::Value {
        field,
        value: value.to_string(),
    }
}

/// RFC 3339, or the `YYYY-MM-DD HH:MM:SS` form `CURRENT_TIMESTAMP` writes.
fn parse_timestamp(field: &'static str, value: &str) -> MapResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| invalid(field, value))
}

fn parse_date(field: &'static str, value: &str) -> MapResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid(field, value))
}

/// Calendar date, also accepting a full RFC 3339 timestamp.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|ts| ts.date_naive()))
}
