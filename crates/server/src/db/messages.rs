use super::{new_id, now, Database, DbResult, MessageRow, NewMessage};

impl Database {
    pub async fn append_message(&self, message: &NewMessage) -> DbResult<MessageRow> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, user_id, trip_id, content, role, suggestions, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, trip_id, content, role, suggestions, timestamp
            "#,
        )
        .bind(new_id())
        .bind(&message.user_id)
        .bind(&message.trip_id)
        .bind(&message.content)
        .bind(message.role)
        .bind(&message.suggestions)
        .bind(now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// The most recent `limit` messages of a conversation, oldest first.
    ///
    /// `trip_id = None` selects general chat only (messages with no trip),
    /// never "all trips".
    pub async fn list_messages(
        &self,
        user_id: &str,
        trip_id: Option<&str>,
        limit: i64,
    ) -> DbResult<Vec<MessageRow>> {
        let filter = match trip_id {
            Some(_) => "user_id = ? AND trip_id = ?",
            None => "user_id = ? AND trip_id IS NULL",
        };
        let sql = format!(
            r#"
            SELECT id, user_id, trip_id, content, role, suggestions, timestamp FROM (
                SELECT id, user_id, trip_id, content, role, suggestions, timestamp, rowid AS seq
                FROM messages
                WHERE {filter}
                ORDER BY timestamp DESC, seq DESC
                LIMIT ?
            )
            ORDER BY timestamp ASC, seq ASC
            "#
        );

        let mut query = sqlx::query_as::<_, MessageRow>(&sql).bind(user_id);
        if let Some(trip_id) = trip_id {
            query = query.bind(trip_id);
        }
        let messages = query.bind(limit).fetch_all(&self.pool).await?;
        Ok(messages)
    }
}
