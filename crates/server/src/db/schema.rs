use serde_json::json;

use super::{new_id, now, Database, DbResult};

/// Trip created by the demo seed; stable so clients can deep-link to it.
pub const DEMO_TRIP_ID: &str = "sample-trip-tokyo";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        name TEXT NOT NULL,
        password_hash TEXT,
        preferences TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS trips (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        destination TEXT NOT NULL,
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'upcoming',
        budget REAL,
        image_url TEXT,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS itineraries (
        id TEXT PRIMARY KEY,
        trip_id TEXT NOT NULL UNIQUE REFERENCES trips(id) ON DELETE CASCADE,
        days TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        trip_id TEXT REFERENCES trips(id) ON DELETE SET NULL,
        content TEXT NOT NULL,
        role TEXT NOT NULL,
        suggestions TEXT,
        timestamp TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_trips_user_id ON trips(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_itineraries_trip_id ON itineraries(trip_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_user_id ON messages(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_messages_trip_id ON messages(trip_id)",
];

impl Database {
    /// Create every table and index if missing. Safe to call on every start.
    pub async fn run_migrations(&self) -> DbResult<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Insert the demo user, trip, itinerary and conversation.
    ///
    /// Does nothing when the users table already has rows, so repeated
    /// startups never duplicate the demo data. Returns whether it seeded.
    pub async fn seed_demo_data(&self, demo_user_id: &str) -> DbResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            tracing::info!("Database already has data, skipping seed");
            return Ok(false);
        }

        let preferences = json!({
            "budget": "medium",
            "interests": ["Culture", "Food", "Adventure"],
            "travelStyle": "moderate",
            "accommodationType": ["Hotel", "Airbnb"],
            "dietaryRestrictions": ["None"]
        });
        let days = json!([
            {
                "day": 1,
                "date": "2024-03-15",
                "activities": [
                    {
                        "id": "1",
                        "title": "Arrive at Narita Airport",
                        "description": "Land at Narita International Airport and take the Narita Express to Tokyo",
                        "startTime": "09:00",
                        "endTime": "10:30",
                        "location": {"name": "Narita International Airport"},
                        "category": "transport",
                        "cost": 30.0
                    },
                    {
                        "id": "2",
                        "title": "Check-in at Hotel",
                        "description": "Check into your hotel in Shibuya district",
                        "startTime": "12:00",
                        "location": {"name": "Shibuya, Tokyo"},
                        "category": "accommodation"
                    },
                    {
                        "id": "3",
                        "title": "Dinner at Ichiran Ramen",
                        "description": "Authentic tonkotsu ramen",
                        "startTime": "18:00",
                        "endTime": "19:00",
                        "location": {"name": "Shibuya, Tokyo"},
                        "category": "food",
                        "cost": 15.0
                    }
                ]
            },
            {
                "day": 2,
                "date": "2024-03-16",
                "activities": [
                    {
                        "id": "4",
                        "title": "Visit Senso-ji Temple",
                        "description": "Explore Tokyo's oldest temple in Asakusa",
                        "startTime": "09:00",
                        "endTime": "11:00",
                        "location": {"name": "Asakusa, Tokyo"},
                        "category": "sightseeing",
                        "cost": 0.0
                    },
                    {
                        "id": "5",
                        "title": "Tokyo Skytree",
                        "description": "Panoramic views from the tallest structure in Japan",
                        "startTime": "15:00",
                        "endTime": "17:00",
                        "location": {"name": "Tokyo Skytree"},
                        "category": "sightseeing",
                        "cost": 25.0
                    }
                ]
            }
        ]);
        let suggestions = json!(["7 days in March", "5 days in April", "10 days in May"]);
        let ts = now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO users (id, email, name, preferences, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(demo_user_id)
        .bind("demo@example.com")
        .bind("Demo User")
        .bind(preferences.to_string())
        .bind(&ts)
        .bind(&ts)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO trips (id, user_id, destination, start_date, end_date, status, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 'upcoming', ?, ?, ?)
            "#,
        )
        .bind(DEMO_TRIP_ID)
        .bind(demo_user_id)
        .bind("Tokyo, Japan")
        .bind("2024-03-15")
        .bind("2024-03-22")
        .bind("A week exploring the vibrant culture and cuisine of Tokyo")
        .bind(&ts)
        .bind(&ts)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO itineraries (id, trip_id, days, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_id())
        .bind(DEMO_TRIP_ID)
        .bind(days.to_string())
        .bind(&ts)
        .bind(&ts)
        .execute(&mut *tx)
        .await?;

        let conversation = [
            ("Hello! I want to plan a trip to Tokyo", "user", None),
            (
                "That sounds exciting! I can help you plan an amazing trip to Tokyo. When are you planning to go, and for how many days?",
                "assistant",
                Some(suggestions.to_string()),
            ),
        ];
        for (content, role, suggestions) in conversation {
            sqlx::query(
                "INSERT INTO messages (id, user_id, trip_id, content, role, suggestions, timestamp) VALUES (?, ?, NULL, ?, ?, ?, ?)",
            )
            .bind(new_id())
            .bind(demo_user_id)
            .bind(content)
            .bind(role)
            .bind(suggestions)
            .bind(&ts)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Sample data seeded for {}", demo_user_id);
        Ok(true)
    }
}
