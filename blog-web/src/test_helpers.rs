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

use anyhow::Result;
use blog_core::models::user::User;
use blog_db::{init_memory_database, repositories::UserRepository};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::{rate_limit::create_login_rate_limiter, templates::init_templates, AppState, Config};

/// State over a fresh in-memory database. Keep the returned directory alive:
/// it holds the templates.
pub async fn create_test_app_state() -> Result<(AppState, TempDir)> {
    let db = init_memory_database().await?;
    let dir = tempfile::tempdir()?;
    let templates_dir = dir.path().join("templates");

    let config = Config {
        templates_dir: templates_dir.to_string_lossy().into_owned(),
        static_dir: dir.path().join("static").to_string_lossy().into_owned(),
        secret_key: "test-secret".to_string(),
        ..Config::default()
    };

    let templates = init_templates(&config.templates_dir, false)?;
    let state = AppState::new(db, templates, config, create_login_rate_limiter(1000));

    Ok((state, dir))
}

/// Store a user with password "password"
pub async fn create_test_user(pool: &SqlitePool, email: &str, name: &str) -> Result<User> {
    let mut user = User::new(email.to_string(), name.to_string(), "password")?;
    let id = UserRepository::new(pool.clone()).create(&user).await?;
    user.id = Some(id);
    Ok(user)
}
