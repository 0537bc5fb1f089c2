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

//! Registration and credential checks, shared by the auth handlers.

use blog_core::models::user::User;
use blog_db::repositories::{is_unique_violation, UserRepository};
use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("User already registered with that email")]
    DuplicateUser,

    #[error("User not found please try again")]
    NotFound,

    #[error("Password incorrect please try again")]
    InvalidCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Create an account. The first account ever created becomes the admin.
pub async fn register(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    name: &str,
) -> Result<User, AccountError> {
    let repo = UserRepository::new(pool.clone());

    if repo.find_by_email(email).await?.is_some() {
        tracing::debug!(email, "Registration for existing email");
        return Err(AccountError::DuplicateUser);
    }

    let mut user = User::new(email.to_string(), name.to_string(), password)?;
    let id = insert_user(&repo, &user).await?;
    user.id = Some(id);

    tracing::info!(user_id = id, admin = user.is_admin(), "User registered");
    Ok(user)
}

/// A concurrent registration can still win the race after the lookup above;
/// the UNIQUE index on email catches it.
async fn insert_user(repo: &UserRepository, user: &User) -> Result<i64, AccountError> {
    match repo.create(user).await {
        Ok(id) => Ok(id),
        Err(e) if is_unique_violation(&e) => {
            tracing::debug!(email = %user.email, "Lost registration race");
            Err(AccountError::DuplicateUser)
        }
        Err(e) => Err(e.into()),
    }
}

/// Look up `email` and check `password` against the stored hash
pub async fn authenticate(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<User, AccountError> {
    let repo = UserRepository::new(pool.clone());

    let user = repo
        .find_by_email(email)
        .await?
        .ok_or(AccountError::NotFound)?;

    if !user.verify_password(password)? {
        tracing::debug!(user_id = ?user.id, "Wrong password");
        return Err(AccountError::InvalidCredentials);
    }

    Ok(user)
}
