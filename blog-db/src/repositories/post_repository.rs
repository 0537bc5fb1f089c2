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
use blog_core::models::post::BlogPost;
use sqlx::SqlitePool;

type PostRow = (i64, String, String, String, String, String, String, i64);

fn post_from_row(
    (id, title, subtitle, author, date, body, img_url, user_id): PostRow,
) -> BlogPost {
    BlogPost {
        id: Some(id),
        title,
        subtitle,
        author,
        date,
        body,
        img_url,
        user_id,
    }
}

pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, post: &BlogPost) -> Result<i64> {
        if let Err(e) = post.is_valid() {
            return Err(anyhow::anyhow!("Invalid post: {}", e));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO blog_posts (title, subtitle, author, date, body, img_url, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post.title)
        .bind(&post.subtitle)
        .bind(&post.author)
        .bind(&post.date)
        .bind(&post.body)
        .bind(&post.img_url)
        .bind(post.user_id)
        .execute(&self.pool)
        .await
        .context("Failed to create post")?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, subtitle, author, date, body, img_url, user_id
            FROM blog_posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find post by id")?;

        Ok(row.map(post_from_row))
    }

    pub async fn find_by_title(&self, title: &str) -> Result<Option<BlogPost>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, subtitle, author, date, body, img_url, user_id
            FROM blog_posts
            WHERE title = ?
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find post by title")?;

        Ok(row.map(post_from_row))
    }

    /// All posts in storage order
    pub async fn list_all(&self) -> Result<Vec<BlogPost>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, subtitle, author, date, body, img_url, user_id
            FROM blog_posts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list posts")?;

        Ok(rows.into_iter().map(post_from_row).collect())
    }

    /// Save the editable fields of an existing post
    pub async fn update(&self, post: &BlogPost) -> Result<()> {
        let id = post
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update post without id"))?;

        if let Err(e) = post.is_valid() {
            return Err(anyhow::anyhow!("Invalid post: {}", e));
        }

        let rows_affected = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?, subtitle = ?, body = ?, img_url = ?
            WHERE id = ?
            "#,
        )
        .bind(&post.title)
        .bind(&post.subtitle)
        .bind(&post.body)
        .bind(&post.img_url)
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update post")?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!("Post not found"));
        }

        Ok(())
    }

    /// Delete a post together with its comments.
    /// Returns false when no post had that id.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete post comments")?;

        let rows_affected = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete post")?
            .rows_affected();

        tx.commit().await.context("Failed to commit post deletion")?;

        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::init_memory_database;
    use crate::repositories::{is_unique_violation, CommentRepository, UserRepository};
    use blog_core::models::{comment::Comment, post::PostContent, user::User};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    async fn create_admin(pool: &SqlitePool) -> Result<User> {
        let mut user = User::new(
            "admin@example.com".to_string(),
            "Admin".to_string(),
            "password123",
        )?;
        user.id = Some(UserRepository::new(pool.clone()).create(&user).await?);
        Ok(user)
    }

    fn draft(title: &str, author: &User) -> BlogPost {
        BlogPost::new(
            PostContent {
                title: title.to_string(),
                subtitle: "A subtitle".to_string(),
                img_url: "https://example.com/img.jpg".to_string(),
                body: "<p>Body</p>".to_string(),
            },
            author,
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() -> Result<()> {
        let pool = init_memory_database().await?;
        let admin = create_admin(&pool).await?;
        let repo = PostRepository::new(pool);

        let post = draft("First", &admin);
        let id = repo.create(&post).await?;

        let found = repo.find_by_id(id).await?.expect("post exists");
        assert_eq!(found.id, Some(id));
        assert_eq!(found.title, "First");
        assert_eq!(found.author, "Admin");
        assert_eq!(found.date, "October 16, 2026");
        assert_eq!(found.user_id, admin.id.unwrap());

        assert!(repo.find_by_title("First").await?.is_some());
        assert!(repo.find_by_title("Second").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_title_is_unique() -> Result<()> {
        let pool = init_memory_database().await?;
        let admin = create_admin(&pool).await?;
        let repo = PostRepository::new(pool);

        repo.create(&draft("Same", &admin)).await?;
        let err = repo.create(&draft("Same", &admin)).await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert_eq!(repo.list_all().await?.len(), 1);

        let other = repo.create(&draft("Other", &admin)).await?;
        let mut renamed = repo.find_by_id(other).await?.unwrap();
        renamed.title = "Same".to_string();
        let err = repo.update(&renamed).await.unwrap_err();
        assert!(is_unique_violation(&err));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_all_in_storage_order() -> Result<()> {
        let pool = init_memory_database().await?;
        let admin = create_admin(&pool).await?;
        let repo = PostRepository::new(pool);

        assert!(repo.list_all().await?.is_empty());

        repo.create(&draft("One", &admin)).await?;
        repo.create(&draft("Two", &admin)).await?;
        repo.create(&draft("Three", &admin)).await?;

        let titles: Vec<String> = repo.list_all().await?.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_keeps_author_and_date() -> Result<()> {
        let pool = init_memory_database().await?;
        let admin = create_admin(&pool).await?;
        let repo = PostRepository::new(pool);

        let id = repo.create(&draft("Original", &admin)).await?;
        let mut post = repo.find_by_id(id).await?.unwrap();
        post.apply(PostContent {
            title: "Edited".to_string(),
            subtitle: "Edited subtitle".to_string(),
            img_url: "https://example.com/other.jpg".to_string(),
            body: "<p>Edited</p>".to_string(),
        });
        post.author = "Someone else".to_string();
        repo.update(&post).await?;

        let saved = repo.find_by_id(id).await?.unwrap();
        assert_eq!(saved.title, "Edited");
        assert_eq!(saved.body, "<p>Edited</p>");
        assert_eq!(saved.author, "Admin");
        assert_eq!(saved.date, "October 16, 2026");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_post_fails() -> Result<()> {
        let pool = init_memory_database().await?;
        let admin = create_admin(&pool).await?;
        let repo = PostRepository::new(pool);

        let mut post = draft("Ghost", &admin);
        post.id = Some(42);
        assert!(repo.update(&post).await.is_err());

        post.id = None;
        assert!(repo.update(&post).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_post_and_comments() -> Result<()> {
        let pool = init_memory_database().await?;
        let admin = create_admin(&pool).await?;
        let repo = PostRepository::new(pool.clone());
        let comments = CommentRepository::new(pool);

        let keep = repo.create(&draft("Keep", &admin)).await?;
        let gone = repo.create(&draft("Gone", &admin)).await?;
        comments
            .create(&Comment::new("on gone".to_string(), admin.id.unwrap(), gone)?)
            .await?;
        comments
            .create(&Comment::new("on keep".to_string(), admin.id.unwrap(), keep)?)
            .await?;

        assert!(repo.delete(gone).await?);

        let remaining: Vec<i64> = repo.list_all().await?.into_iter().filter_map(|p| p.id).collect();
        assert_eq!(remaining, vec![keep]);
        assert!(comments.list_for_post(gone).await?.is_empty());
        assert_eq!(comments.list_for_post(keep).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_post() -> Result<()> {
        let pool = init_memory_database().await?;
        let repo = PostRepository::new(pool);

        assert!(!repo.delete(12345).await?);
        Ok(())
    }
}
