use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a stored or submitted enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Opaque preferences document (budget tier, interests, travel style, ...)
    pub preferences: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Trips
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    #[default]
    #[serde(alias = "planned")]
    Upcoming,
    #[serde(alias = "ongoing")]
    Active,
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Upcoming => "upcoming",
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" | "planned" => Ok(TripStatus::Upcoming),
            "active" | "ongoing" => Ok(TripStatus::Active),
            "completed" => Ok(TripStatus::Completed),
            other => Err(UnknownVariant {
                kind: "trip status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub budget: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of trip fields returned by the trip listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl From<Trip> for TripSummary {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination,
            start_date: trip.start_date,
            end_date: trip.end_date,
            status: trip.status,
            image_url: trip.image_url,
            description: trip.description,
        }
    }
}

// ============================================================================
// Itineraries
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Transport,
    Accommodation,
    #[serde(alias = "meal")]
    Food,
    #[serde(alias = "activity")]
    Sightseeing,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            latitude: None,
            longitude: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default)]
    pub category: ActivityCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub id: String,
    pub trip_id: String,
    pub days: Vec<ItineraryDay>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    #[serde(alias = "ai")]
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl FromStr for ChatRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ChatRole::User),
            "assistant" | "ai" => Ok(ChatRole::Assistant),
            other => Err(UnknownVariant {
                kind: "chat role",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    /// `None` for general chat not tied to a trip
    pub trip_id: Option<String>,
    #[serde(alias = "text")]
    pub content: String,
    #[serde(alias = "sender")]
    pub role: ChatRole,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

// ============================================================================
// Safety
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyService {
    Police,
    Ambulance,
    Fire,
    Embassy,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyNumber {
    #[serde(rename = "type")]
    pub service: EmergencyService,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Computed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyInfo {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub warnings: Vec<String>,
    pub emergency_numbers: Vec<EmergencyNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_info: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_status_aliases() {
        let status: TripStatus = serde_json::from_str("\"planned\"").unwrap();
        assert_eq!(status, TripStatus::Upcoming);
        let status: TripStatus = serde_json::from_str("\"ongoing\"").unwrap();
        assert_eq!(status, TripStatus::Active);

        assert_eq!(serde_json::to_string(&TripStatus::Upcoming).unwrap(), "\"upcoming\"");
        assert_eq!("completed".parse::<TripStatus>().unwrap(), TripStatus::Completed);
        assert!("cancelled".parse::<TripStatus>().is_err());
    }

    #[test]
    fn test_activity_category_legacy_values() {
        let meal: ActivityCategory = serde_json::from_str("\"meal\"").unwrap();
        assert_eq!(meal, ActivityCategory::Food);
        let activity: ActivityCategory = serde_json::from_str("\"activity\"").unwrap();
        assert_eq!(activity, ActivityCategory::Sightseeing);

        // Legacy values are read but never written back
        assert_eq!(serde_json::to_string(&meal).unwrap(), "\"food\"");
    }

    #[test]
    fn test_activity_omits_empty_optionals() {
        let activity = Activity {
            id: "a1".to_string(),
            title: "Museum".to_string(),
            description: None,
            start_time: Some("10:00".to_string()),
            end_time: None,
            location: Some(Location::named("Louvre")),
            category: ActivityCategory::Sightseeing,
            cost: None,
            notes: None,
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["startTime"], "10:00");
        assert_eq!(json["location"]["name"], "Louvre");
        assert!(json.get("endTime").is_none());
        assert!(json.get("cost").is_none());
    }

    #[test]
    fn test_chat_role_accepts_ai_sender() {
        let role: ChatRole = serde_json::from_str("\"ai\"").unwrap();
        assert_eq!(role, ChatRole::Assistant);
        assert_eq!("ai".parse::<ChatRole>().unwrap(), ChatRole::Assistant);
        assert_eq!(ChatRole::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_chat_message_reads_legacy_fields() {
        let message: ChatMessage = serde_json::from_str(
            r#"{"id":"m1","userId":"u1","tripId":null,"text":"Try the ramen","sender":"ai","timestamp":"2024-03-15T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(message.content, "Try the ramen");
        assert_eq!(message.role, ChatRole::Assistant);

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"], "Try the ramen");
        assert_eq!(json["role"], "assistant");
    }

    #[test]
    fn test_trip_serializes_camel_case() {
        let trip = Trip {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            destination: "Lisbon, Portugal".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
            status: TripStatus::Upcoming,
            budget: Some(1200.0),
            description: None,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["startDate"], "2025-06-01");
        assert_eq!(json["status"], "upcoming");

        let summary = TripSummary::from(trip);
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("userId").is_none());
        assert_eq!(json["endDate"], "2025-06-08");
    }

    #[test]
    fn test_emergency_number_type_field() {
        let number = EmergencyNumber {
            service: EmergencyService::Police,
            number: "110".to_string(),
            description: None,
        };
        let json = serde_json::to_string(&number).unwrap();
        assert!(json.contains("\"type\":\"police\""));
    }
}
