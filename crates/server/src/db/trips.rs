use super::{new_id, now, Database, DbError, DbResult, NewTrip, TripPatch, TripRow};

const TRIP_COLUMNS: &str = "id, user_id, destination, start_date, end_date, status, budget, image_url, description, created_at, updated_at";

impl Database {
    pub async fn list_trips(&self) -> DbResult<Vec<TripRow>> {
        let trips = sqlx::query_as::<_, TripRow>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips ORDER BY start_date DESC, created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(trips)
    }

    pub async fn get_trip(&self, id: &str) -> DbResult<Option<TripRow>> {
        let trip = sqlx::query_as::<_, TripRow>(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(trip)
    }

    /// Insert a trip; status takes the column default (`upcoming`).
    pub async fn create_trip(&self, trip: &NewTrip) -> DbResult<TripRow> {
        let ts = now();
        let row = sqlx::query_as::<_, TripRow>(&format!(
            r#"
            INSERT INTO trips (id, user_id, destination, start_date, end_date, budget, image_url, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(new_id())
        .bind(&trip.user_id)
        .bind(&trip.destination)
        .bind(trip.start_date.format("%Y-%m-%d").to_string())
        .bind(trip.end_date.format("%Y-%m-%d").to_string())
        .bind(trip.budget)
        .bind(&trip.image_url)
        .bind(&trip.description)
        .bind(&ts)
        .bind(&ts)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update_trip(&self, id: &str, patch: &TripPatch) -> DbResult<TripRow> {
        let row = sqlx::query_as::<_, TripRow>(&format!(
            r#"
            UPDATE trips SET
                status = COALESCE(?, status),
                budget = COALESCE(?, budget),
                description = COALESCE(?, description),
                image_url = COALESCE(?, image_url),
                updated_at = ?
            WHERE id = ?
            RETURNING {TRIP_COLUMNS}
            "#
        ))
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.budget)
        .bind(&patch.description)
        .bind(&patch.image_url)
        .bind(now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(DbError::NotFound("Trip"))
    }

    /// Remove a trip. Its itinerary is deleted; its messages lose the trip link.
    pub async fn delete_trip(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Trip"));
        }
        Ok(())
    }
}
