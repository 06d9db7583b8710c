use super::{new_id, now, Database, DbError, DbResult, ItineraryRow};

impl Database {
    pub async fn get_itinerary(&self, trip_id: &str) -> DbResult<ItineraryRow> {
        let row = sqlx::query_as::<_, ItineraryRow>(
            "SELECT id, trip_id, days, created_at, updated_at FROM itineraries WHERE trip_id = ?",
        )
        .bind(trip_id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(DbError::NotFound("Itinerary"))
    }

    /// Insert the trip's itinerary, or replace its `days` document wholesale.
    ///
    /// There is no merge and no version check: concurrent writers race and
    /// the last write wins.
    pub async fn upsert_itinerary(&self, trip_id: &str, days: &str) -> DbResult<ItineraryRow> {
        let ts = now();
        let row = sqlx::query_as::<_, ItineraryRow>(
            r#"
            INSERT INTO itineraries (id, trip_id, days, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(trip_id) DO UPDATE SET
                days = excluded.days,
                updated_at = excluded.updated_at
            RETURNING id, trip_id, days, created_at, updated_at
            "#,
        )
        .bind(new_id())
        .bind(trip_id)
        .bind(days)
        .bind(&ts)
        .bind(&ts)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::trips::tests::new_trip;

    async fn db_with_trip() -> (Database, String) {
        let db = Database::in_memory().await;
        db.ensure_user("u1").await.unwrap();
        let trip = db
            .create_trip(&new_trip("u1", "Lisbon, Portugal", "2025-06-01", "2025-06-08"))
            .await
            .unwrap();
        (db, trip.id)
    }

    #[tokio::test]
    async fn test_missing_itinerary_is_not_found() {
        let (db, trip_id) = db_with_trip().await;
        let err = db.get_itinerary(&trip_id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound("Itinerary")));
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let (db, trip_id) = db_with_trip().await;

        let first = db.upsert_itinerary(&trip_id, r#"[{"day":1}]"#).await.unwrap();
        let second = db.upsert_itinerary(&trip_id, r#"[{"day":2}]"#).await.unwrap();

        // Same row, document replaced rather than merged
        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(second.days, r#"[{"day":2}]"#);
        assert_eq!(db.get_itinerary(&trip_id).await.unwrap().days, r#"[{"day":2}]"#);
    }

    #[tokio::test]
    async fn test_upsert_for_unknown_trip_violates_constraint() {
        let db = Database::in_memory().await;
        let err = db.upsert_itinerary("no-such-trip", "[]").await.unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_delete_trip_removes_itinerary() {
        let (db, trip_id) = db_with_trip().await;
        db.upsert_itinerary(&trip_id, "[]").await.unwrap();
        db.delete_trip(&trip_id).await.unwrap();
        assert!(db.get_itinerary(&trip_id).await.is_err());
    }
}
