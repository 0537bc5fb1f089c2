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
use blog_core::models::user::User;
use sqlx::SqlitePool;

type UserRow = (i64, String, String, String);

fn user_from_row((id, email, name, password_hash): UserRow) -> User {
    User {
        id: Some(id),
        email,
        name,
        password_hash,
    }
}

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<i64> {
        if let Err(e) = user.is_valid() {
            return Err(anyhow::anyhow!("Invalid user: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .execute(&self.pool)
        .await
        .context("Failed to create user")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by id")?;

        Ok(row.map(user_from_row))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find user by email")?;

        Ok(row.map(user_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::init_memory_database;
    use crate::repositories::is_unique_violation;
    use pretty_assertions::assert_eq;

    async fn user_count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    fn test_user(email: &str) -> User {
        User::new(email.to_string(), "Test User".to_string(), "password123").unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = UserRepository::new(pool);

        let user = test_user("test@example.com");
        let id = repo.create(&user).await?;
        assert_eq!(id, 1);

        let found = repo.find_by_id(id).await?.expect("user should exist");
        assert_eq!(found.id, Some(id));
        assert_eq!(found.email, "test@example.com");
        assert_eq!(found.name, "Test User");
        assert_eq!(found.password_hash, user.password_hash);
        assert!(found.is_admin());

        Ok(())
    }

    #[tokio::test]
    async fn test_second_user_is_not_admin() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = UserRepository::new(pool);

        repo.create(&test_user("first@example.com")).await?;
        let id = repo.create(&test_user("second@example.com")).await?;

        let second = repo.find_by_id(id).await?.unwrap();
        assert!(!second.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn test_find_by_email() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = UserRepository::new(pool);

        repo.create(&test_user("test@example.com")).await?;

        assert!(repo.find_by_email("test@example.com").await?.is_some());
        assert!(repo.find_by_email("other@example.com").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_find_missing_user() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = UserRepository::new(pool);

        assert!(repo.find_by_id(999).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_fails() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = UserRepository::new(pool.clone());

        repo.create(&test_user("dup@example.com")).await?;
        let err = repo
            .create(&test_user("dup@example.com"))
            .await
            .unwrap_err();

        assert!(is_unique_violation(&err));
        assert_eq!(user_count(&pool).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_invalid_user_fails() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = UserRepository::new(pool.clone());

        let mut user = test_user("ok@example.com");
        user.email = "broken".to_string();

        let err = repo.create(&user).await.unwrap_err();
        assert!(!is_unique_violation(&err));
        assert_eq!(user_count(&pool).await?, 0);
        Ok(())
    }
}
