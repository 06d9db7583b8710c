use super::{new_id, now, Database, DbError, DbResult, NewUser, UserRow};

const USER_COLUMNS: &str = "id, email, name, password_hash, preferences, created_at, updated_at";

impl Database {
    pub async fn find_user_by_email(&self, email: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> DbResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a user under a freshly generated id. A taken email fails with
    /// [`DbError::Conflict`].
    pub async fn create_user(&self, user: &NewUser) -> DbResult<UserRow> {
        let ts = now();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, preferences, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new_id())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.preferences)
        .bind(&ts)
        .bind(&ts)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Return the user with `id`, creating a placeholder demo identity when
    /// no such row exists.
    pub async fn ensure_user(&self, id: &str) -> DbResult<UserRow> {
        let ts = now();
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, created_at, updated_at)
            VALUES (?, ?, 'Demo User', ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(placeholder_email(id))
        .bind(&ts)
        .bind(&ts)
        .execute(&self.pool)
        .await?;

        // Nothing inserted and no row by id means the placeholder email was taken
        self.get_user(id)
            .await?
            .ok_or_else(|| DbError::Conflict(format!("placeholder email for {id} is taken")))
    }

    pub async fn upsert_user_preferences(&self, id: &str, preferences: &str) -> DbResult<UserRow> {
        self.ensure_user(id).await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET preferences = ?, updated_at = ? WHERE id = ? RETURNING {USER_COLUMNS}"
        ))
        .bind(preferences)
        .bind(now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or(DbError::NotFound("User"))
    }

    /// Remove a user; trips, itineraries and messages go with it.
    // No endpoint deletes users yet; the cascade tests drive this.
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn delete_user(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("User"));
        }
        Ok(())
    }
}

fn placeholder_email(id: &str) -> String {
    format!("{id}@demo.travel-buddy.local")
}
