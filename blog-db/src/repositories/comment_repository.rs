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
use blog_core::models::comment::{Comment, CommentView};
use sqlx::SqlitePool;

pub struct CommentRepository {
    pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a comment. The post and user must exist.
    pub async fn create(&self, comment: &Comment) -> Result<i64> {
        if let Err(e) = Comment::validate_text(&comment.text) {
            return Err(anyhow::anyhow!("Invalid comment: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO comments (text, user_id, post_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&comment.text)
        .bind(comment.user_id)
        .bind(comment.post_id)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(result.last_insert_rowid())
    }

    /// Comments on a post with their authors, oldest first
    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let rows = sqlx::query_as::<_, (i64, String, i64, i64, String, String)>(
            r#"
            SELECT c.id, c.text, c.user_id, c.post_id, u.name, u.email
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ?
            ORDER BY c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments for post")?;

        rows.into_iter()
            .map(|(id, text, user_id, post_id, name, email)| {
                let comment = Comment {
                    id: Some(id),
                    text,
                    user_id,
                    post_id,
                };
                CommentView::new(comment, name, &email)
            })
            .collect()
    }
}
