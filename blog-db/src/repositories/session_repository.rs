// Inkwell - A small multi-user blog built with Rust
// Copyright (C) 2025 Inkwell Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use blog_core::models::session::Session;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

type SessionRow = (String, i64, String, String, String);

/// Accepts both RFC3339 (what we write) and SQLite's `datetime('now')` format
fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    if value.contains('T') {
        Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("Failed to parse {} as RFC3339", column))?
            .with_timezone(&Utc))
    } else {
        Ok(
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .with_context(|| format!("Failed to parse {} as SQLite format", column))?
                .and_utc(),
        )
    }
}

fn session_from_row(
    (id, user_id, csrf_token, expires_at, created_at): SessionRow,
) -> Result<Session> {
    Ok(Session {
        id,
        user_id,
        csrf_token,
        expires_at: parse_timestamp(&expires_at, "expires_at")?,
        created_at: parse_timestamp(&created_at, "created_at")?,
    })
}

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, csrf_token, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(&session.csrf_token)
        .bind(session.expires_at.to_rfc3339())
        .bind(session.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to create session")?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, user_id, csrf_token, expires_at, created_at
            FROM sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find session by id")?;

        row.map(session_from_row).transpose()
    }

    /// Remove every session past its expiry; returns how many were removed
    pub async fn delete_expired(&self) -> Result<u64> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to delete expired sessions")?;

        Ok(result.rows_affected())
    }

    /// Delete a session. Returns false when there was nothing to delete.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete session")?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::init_memory_database;
    use crate::repositories::UserRepository;
    use blog_core::models::user::User;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn session_for(user_id: i64, lifetime: Duration) -> Session {
        Session::new(user_id, lifetime, "csrf-token".to_string())
    }

    async fn create_test_user(pool: &SqlitePool) -> Result<i64> {
        let user = User::new(
            "test@example.com".to_string(),
            "Test User".to_string(),
            "password123",
        )?;
        UserRepository::new(pool.clone()).create(&user).await
    }

    #[tokio::test]
    async fn test_create_and_find_session() -> Result<()> {
        let pool = init_memory_database().await?;
        let user_id = create_test_user(&pool).await?;
        let repo = SessionRepository::new(pool);

        let session = session_for(user_id, Duration::hours(24));
        repo.create(&session).await?;

        let found = repo.find_by_id(&session.id).await?.expect("session exists");
        assert_eq!(found.id, session.id);
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.csrf_token, "csrf-token");
        assert_eq!(found.expires_at, session.expires_at);
        assert!(!found.is_expired());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_unknown_session() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = SessionRepository::new(pool);

        assert!(repo.find_by_id("no-such-session").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_session_requires_existing_user() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = SessionRepository::new(pool);

        let result = repo.create(&session_for(404, Duration::hours(24))).await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() -> Result<()> {
        let pool = init_memory_database().await?;
        let user_id = create_test_user(&pool).await?;
        let repo = SessionRepository::new(pool);

        let session = session_for(user_id, Duration::hours(24));
        repo.create(&session).await?;

        assert!(repo.delete(&session.id).await?);
        assert!(!repo.delete(&session.id).await?);
        assert!(repo.find_by_id(&session.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expired() -> Result<()> {
        let pool = init_memory_database().await?;
        let user_id = create_test_user(&pool).await?;
        let repo = SessionRepository::new(pool);

        let live = session_for(user_id, Duration::hours(1));
        let dead = session_for(user_id, Duration::hours(-1));
        repo.create(&live).await?;
        repo.create(&dead).await?;

        assert_eq!(repo.delete_expired().await?, 1);
        assert!(repo.find_by_id(&live.id).await?.is_some());
        assert!(repo.find_by_id(&dead.id).await?.is_none());
        Ok(())
    }

    #[test]
    fn test_parse_sqlite_timestamp() {
        let parsed = parse_timestamp("2026-10-16 08:30:00", "created_at").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-10-16T08:30:00+00:00");
        assert!(parse_timestamp("yesterday", "created_at").is_err());
    }
}
